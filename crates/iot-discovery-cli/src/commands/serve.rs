//! Serve command implementation.

use std::io::{self, Write};

use colored::*;
use iot_discovery_core::config::DiscoveryConfig;
use iot_discovery_core::discovery::DiscoveryEngine;
use regex::Regex;
use tokio::sync::broadcast::error::RecvError;

use crate::cli::ServeArgs;
use crate::error::Result;
use crate::filter::{filter_devices, name_filter};
use crate::output::{get_formatter, OutputFormatter};

/// Run the discovery server until Ctrl+C, re-rendering on every roster change.
pub async fn run_serve(args: &ServeArgs, config: DiscoveryConfig, json: bool) -> Result<()> {
    let formatter = get_formatter(json);
    let filter = name_filter(args.name.as_deref())?;

    let engine = DiscoveryEngine::with_http_silencer(config)?;
    let mut changes = engine.subscribe();
    let handle = engine.start().await?;
    let port = handle.local_addr().port();

    render(&engine, port, filter.as_ref(), formatter.as_ref(), json).await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("Received Ctrl+C, shutting down...");
                break;
            }
            changed = changes.recv() => match changed {
                Ok(()) | Err(RecvError::Lagged(_)) => {
                    render(&engine, port, filter.as_ref(), formatter.as_ref(), json).await;
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    drop(handle);
    eprintln!("{}", formatter.format_message("Discovery server stopped"));
    Ok(())
}

async fn render(
    engine: &DiscoveryEngine,
    port: u16,
    filter: Option<&Regex>,
    formatter: &dyn OutputFormatter,
    json: bool,
) {
    let devices = filter_devices(engine.devices().await, filter);

    if !json {
        // Clear screen and print header
        print!("\x1B[2J\x1B[1;1H");
        println!("{}", "IoT Discovery Server".bold());
        println!(
            "{}",
            format!(
                "Listening on UDP port {} - updated {} - press Ctrl+C to stop",
                port,
                chrono::Local::now().format("%H:%M:%S")
            )
            .dimmed()
        );
        println!();
    }

    println!("{}", formatter.format_devices(&devices));

    io::stdout().flush().ok();
}
