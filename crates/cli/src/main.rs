//! Teakworld storefront CLI
//!
//! Browse the catalog, manage the persisted cart and place orders against the
//! storefront backend.

use std::{io, process::ExitCode};

use crate::config::CliConfig;

mod commands;
mod config;
mod errors;
mod logging;
mod render;

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration from .env and CLI arguments
    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(parse_error) => parse_error.exit(),
    };

    if let Err(init_error) = logging::init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("Logging error: {init_error}");
        }

        return ExitCode::FAILURE;
    }

    let mut out = io::stdout().lock();

    match commands::run(config, &mut out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(command_error) => {
            #[expect(clippy::print_stderr, reason = "user-facing error output")]
            {
                eprintln!("Error: {command_error}");
            }

            ExitCode::FAILURE
        }
    }
}
