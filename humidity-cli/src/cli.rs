use std::{
    io::{IsTerminal, Write},
    process::ExitCode,
    time::Duration,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use humidity_core::{Config, FetchState, ScreenController, client_from_config};
use inquire::{CustomType, Password};
use tracing::debug;

use crate::view;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "humidity", version, about = "Current humidity from OpenWeather")]
pub struct Cli {
    /// Print debug diagnostics to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store coordinates and the OpenWeather API key.
    Configure,

    /// Fetch and show the current humidity.
    ///
    /// LAT, LON and WEATHER_API_KEY override the stored configuration.
    Show,

    /// Print the location of the configuration file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => configure(),
            Command::Show => show().await,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn configure() -> anyhow::Result<ExitCode> {
    let mut cfg = Config::load()?;

    let mut latitude = CustomType::<f64>::new("Latitude:")
        .with_error_message("Please type a valid number");
    if let Some(current) = cfg.latitude {
        latitude = latitude.with_default(current);
    }

    let mut longitude = CustomType::<f64>::new("Longitude:")
        .with_error_message("Please type a valid number");
    if let Some(current) = cfg.longitude {
        longitude = longitude.with_default(current);
    }

    cfg.latitude = Some(latitude.prompt().context("Failed to read latitude")?);
    cfg.longitude = Some(longitude.prompt().context("Failed to read longitude")?);

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    cfg.api_key = Some(api_key.trim().to_string());

    let path = cfg.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(ExitCode::SUCCESS)
}

async fn show() -> anyhow::Result<ExitCode> {
    let cfg = Config::load_with_env()?;
    let query = cfg.query()?;
    let client = client_from_config(&cfg)?;
    debug!(base_url = cfg.base_url(), "Mounting humidity screen");

    let screen = ScreenController::mount(client, query);
    let state = wait_with_spinner(&screen).await;

    println!("{}", view::render(&state));

    let code = match state {
        FetchState::Failure { .. } => ExitCode::FAILURE,
        FetchState::Success { .. } | FetchState::Loading => ExitCode::SUCCESS,
    };
    Ok(code)
}

/// Await the settled state, animating the loading line while stderr is a terminal.
async fn wait_with_spinner(screen: &ScreenController) -> FetchState {
    let interactive = std::io::stderr().is_terminal();
    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    let mut frame = 0;

    let settled = screen.settled();
    tokio::pin!(settled);

    let state = loop {
        tokio::select! {
            state = &mut settled => break state,
            _ = ticker.tick(), if interactive => {
                let mut stderr = std::io::stderr();
                let _ = write!(stderr, "\r{}", view::loading_frame(frame));
                let _ = stderr.flush();
                frame += 1;
            }
        }
    };

    if interactive && frame > 0 {
        let _ = write!(std::io::stderr(), "\r\x1b[2K");
    }
    state
}
