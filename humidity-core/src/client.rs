use crate::{Config, WeatherQuery, client::openweather::OpenWeatherClient};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use thiserror::Error;

pub mod openweather;

/// Reasons a humidity fetch can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, timeout, reset).
    #[error("{0}")]
    TransportError(String),

    /// The endpoint answered with a non-success status.
    #[error("Failed to fetch weather data")]
    RequestFailed,

    /// The body could not be read as a weather payload with `main.humidity`.
    #[error("Malformed weather response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait HumidityClient: Send + Sync + Debug {
    /// Fetch the current relative humidity (percent) for the query location.
    async fn fetch_humidity(&self, query: &WeatherQuery) -> Result<i64, FetchError>;
}

/// Construct the OpenWeather client described by the config.
pub fn client_from_config(config: &Config) -> anyhow::Result<Arc<dyn HumidityClient>> {
    let client = OpenWeatherClient::from_config(config)?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failed_has_fixed_message() {
        assert_eq!(FetchError::RequestFailed.to_string(), "Failed to fetch weather data");
    }

    #[test]
    fn transport_error_is_verbatim() {
        let err = FetchError::TransportError("connection reset by peer".into());
        assert_eq!(err.to_string(), "connection reset by peer");
    }

    #[test]
    fn malformed_response_names_detail() {
        let err = FetchError::MalformedResponse("missing field `main.humidity`".into());
        assert!(err.to_string().starts_with("Malformed weather response"));
        assert!(err.to_string().contains("main.humidity"));
    }

    #[test]
    fn client_from_default_config_works() {
        let cfg = Config::default();
        assert!(client_from_config(&cfg).is_ok());
    }
}
