//! Bellespot Gateway server binary

#![allow(missing_docs)]

use bellespot_gateway::utils::init_tracing;
use bellespot_gateway::{Config, Gateway};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Rate limiting and authentication gateway for the Bellespot API
#[derive(Debug, Parser)]
#[command(name = "gateway", version, about)]
struct Cli {
    /// Configuration file. Missing files fall back to defaults plus environment.
    #[arg(short, long, env = "GATEWAY_CONFIG", default_value = "config/gateway.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config).await {
        Ok(config) => config,
        Err(e) => {
            // Print error using Display (not Debug) to preserve newlines
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.gateway.logging);

    let result = match Gateway::new(config).await {
        Ok(gateway) => gateway.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Gateway stopped with error: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
