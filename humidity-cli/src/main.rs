//! Binary crate for the `humidity` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Rendering the humidity screen to the terminal

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod view;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.verbose);
    cmd.run().await
}

/// Debug output for this tool's own crates only; HTTP internals stay quiet.
const VERBOSE_DIRECTIVES: &str = "humidity_core=debug,humidity=debug";

/// Diagnostics go to stderr so they never mix with the rendered screen.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_DIRECTIVES)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_filter_is_scoped_to_own_crates() {
        assert!(EnvFilter::try_new(VERBOSE_DIRECTIVES).is_ok());
        for directive in VERBOSE_DIRECTIVES.split(',') {
            assert!(directive.starts_with("humidity"), "unscoped directive: {directive}");
        }
    }
}
