//! Core library for the `humidity` screen.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather humidity client and its abstraction
//! - The fetch state machine that drives the screen
//!
//! It is used by `humidity-cli`, but any other shell can mount a [`ScreenController`]
//! and render its [`FetchState`].

pub mod client;
pub mod config;
pub mod model;
pub mod screen;

pub use client::{FetchError, HumidityClient, client_from_config, openweather::OpenWeatherClient};
pub use config::Config;
pub use model::{FetchState, WeatherQuery};
pub use screen::ScreenController;
