//! IoT discovery CLI - LAN discovery server for headless smart devices.
//!
//! Broadcasts discovery requests, lists the devices that answer, and silences
//! their repeat announcements.

mod cli;
mod commands;
mod config;
mod error;
mod filter;
mod output;

use clap::Parser;

use cli::{Cli, Commands};
use error::{exit_codes, CliError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

/// `RUST_LOG` wins over the `-v` count.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = config::resolve_config(&cli)?;
    log::debug!("Resolved configuration: {:?}", config);

    match &cli.command {
        Commands::Serve(args) => commands::run_serve(args, config, cli.json).await,
        Commands::Discover(args) => commands::run_discover(args, config, cli.json).await,
    }
}
