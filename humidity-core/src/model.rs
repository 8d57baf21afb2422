use crate::client::FetchError;

/// Parameters needed to ask the weather endpoint for current conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub api_key: String,
}

/// Data-loading status of the humidity screen.
///
/// Starts as [`FetchState::Loading`] and settles exactly once into either
/// [`FetchState::Success`] or [`FetchState::Failure`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    Loading,
    Success {
        humidity: i64,
    },
    Failure {
        message: String,
    },
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn is_settled(&self) -> bool {
        !self.is_loading()
    }

    /// Apply the outcome of a fetch.
    ///
    /// Returns `true` if the state changed. Terminal states are never left, so
    /// settling an already settled state is a no-op.
    pub fn settle(&mut self, outcome: Result<i64, FetchError>) -> bool {
        if self.is_settled() {
            return false;
        }

        *self = match outcome {
            Ok(humidity) => FetchState::Success { humidity },
            Err(err) => FetchState::Failure { message: err.to_string() },
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_loading() {
        let state = FetchState::default();
        assert!(state.is_loading());
        assert!(!state.is_settled());
    }

    #[test]
    fn settles_to_success() {
        let mut state = FetchState::Loading;

        let changed = state.settle(Ok(75));

        assert!(changed);
        assert_eq!(state, FetchState::Success { humidity: 75 });
    }

    #[test]
    fn settles_to_failure_with_error_text() {
        let mut state = FetchState::Loading;

        let changed = state.settle(Err(FetchError::RequestFailed));

        assert!(changed);
        assert_eq!(
            state,
            FetchState::Failure { message: "Failed to fetch weather data".to_string() }
        );
    }

    #[test]
    fn terminal_states_are_final() {
        let mut state = FetchState::Success { humidity: 40 };
        assert!(!state.settle(Err(FetchError::TransportError("reset".into()))));
        assert_eq!(state, FetchState::Success { humidity: 40 });

        let mut state = FetchState::Failure { message: "boom".into() };
        assert!(!state.settle(Ok(10)));
        assert_eq!(state, FetchState::Failure { message: "boom".into() });
    }
}
