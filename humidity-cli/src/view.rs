//! Terminal rendering of the humidity screen.

use humidity_core::FetchState;

const SPINNER: &[char] = &['|', '/', '-', '\\'];

pub const TITLE: &str = "Humidity (%)";
pub const DISCLAIMER: &str = "Source: OpenWeather API";

/// Render a state as the text shown on screen.
pub fn render(state: &FetchState) -> String {
    match state {
        FetchState::Loading => "Loading...".to_string(),
        FetchState::Success { humidity } => format!("{TITLE}\n{humidity}\n\n{DISCLAIMER}"),
        FetchState::Failure { message } => message.clone(),
    }
}

/// Loading line with an animated spinner, for the given animation frame.
pub fn loading_frame(frame: usize) -> String {
    format!("{} {}", SPINNER[frame % SPINNER.len()], render(&FetchState::Loading))
}
