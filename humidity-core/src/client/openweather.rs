use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::{Config, WeatherQuery};

use super::{FetchError, HumidityClient};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Client for the OpenWeather current-weather endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at another deployment of the API, e.g. a mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/weather", self.base_url.trim_end_matches('/'))
    }
}

impl Default for OpenWeatherClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    humidity: Option<serde_json::Number>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: Option<OwMain>,
}

#[async_trait]
impl HumidityClient for OpenWeatherClient {
    #[instrument(skip(self, query), fields(lat = query.latitude, lon = query.longitude))]
    async fn fetch_humidity(&self, query: &WeatherQuery) -> Result<i64, FetchError> {
        let url = self.endpoint();
        debug!(url = %url, "Requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", query.latitude.to_string()),
                ("lon", query.longitude.to_string()),
                ("appid", query.api_key.clone()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(%status, body = %truncate_body(&body), "OpenWeather request failed");
            return Err(FetchError::RequestFailed);
        }

        let body = res.text().await.map_err(transport_error)?;
        let humidity = parse_humidity(&body)?;
        debug!(humidity, "Received current humidity");

        Ok(humidity)
    }
}

/// Pull `main.humidity` out of a current-weather body, ignoring everything else.
fn parse_humidity(body: &str) -> Result<i64, FetchError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

    let number = parsed
        .main
        .and_then(|main| main.humidity)
        .ok_or_else(|| FetchError::MalformedResponse("missing field `main.humidity`".into()))?;

    humidity_from_number(&number).ok_or_else(|| {
        FetchError::MalformedResponse(format!("`main.humidity` does not fit an integer: {number}"))
    })
}

/// Integers pass through unchanged, fractions round to nearest; `None` if out of `i64` range.
fn humidity_from_number(number: &serde_json::Number) -> Option<i64> {
    if let Some(n) = number.as_i64() {
        return Some(n);
    }
    if number.is_u64() {
        return None;
    }

    let rounded = number.as_f64()?.round();
    // `i64::MAX as f64` is 2^63, the first value that does not fit.
    (rounded >= i64::MIN as f64 && rounded < i64::MAX as f64).then_some(rounded as i64)
}

// The URL carries the API key, keep it out of user-facing messages.
fn transport_error(err: reqwest::Error) -> FetchError {
    let err = anyhow::Error::from(err.without_url());
    FetchError::TransportError(format!("{err:#}"))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
