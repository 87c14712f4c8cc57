//! Discover command implementation.

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use iot_discovery_core::config::DiscoveryConfig;
use iot_discovery_core::discovery::DiscoveryEngine;
use iot_discovery_core::types::DiscoverableDevice;
use tokio::sync::broadcast::error::RecvError;

use crate::cli::DiscoverArgs;
use crate::error::{CliError, Result};
use crate::filter::{filter_devices, name_filter};
use crate::output::get_formatter;
use crate::output::json::devices_document;

/// Run the discover command
pub async fn run_discover(args: &DiscoverArgs, config: DiscoveryConfig, json: bool) -> Result<()> {
    let formatter = get_formatter(json);
    let filter = name_filter(args.name.as_deref())?;
    let duration = Duration::from_secs(args.duration);

    let engine = DiscoveryEngine::with_http_silencer(config)?;
    let mut changes = engine.subscribe();
    let handle = engine.start().await?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!(
        "Discovering devices for {} seconds...",
        duration.as_secs()
    ));

    let deadline = tokio::time::sleep(duration);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            changed = changes.recv() => match changed {
                Ok(()) | Err(RecvError::Lagged(_)) => {
                    spinner.set_message(format!(
                        "Discovering devices... {} found",
                        engine.device_count().await
                    ));
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    spinner.finish_and_clear();
    drop(handle);

    let devices = filter_devices(engine.devices().await, filter.as_ref());

    if let Some(path) = &args.output {
        write_roster(path, &devices).await?;
    }

    println!("{}", formatter.format_devices(&devices));

    if let Some(path) = &args.output {
        eprintln!(
            "{}",
            formatter.format_message(&format!(
                "Saved {} device(s) to {}",
                devices.len(),
                path.display()
            ))
        );
    }

    if devices.is_empty() {
        return Err(CliError::NoDevicesFound);
    }

    Ok(())
}

async fn write_roster(path: &Path, devices: &[DiscoverableDevice]) -> Result<()> {
    let contents = serde_json::to_string_pretty(&devices_document(devices))?;
    tokio::fs::write(path, contents).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_write_roster() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.json");
        let devices = vec![DiscoverableDevice::new("Lamp", "10.0.0.7", json!({"serial": "1"}))];

        write_roster(&path, &devices).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["count"], 1);
        assert_eq!(written["devices"][0]["name"], "Lamp");
    }
}
