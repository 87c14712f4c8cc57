//! Configuration layering for the CLI.
//!
//! Defaults, then the `--config` file, then environment and flags (clap
//! merges those two, flags first).

use iot_discovery_core::config::DiscoveryConfig;

use crate::cli::Cli;
use crate::error::Result;

/// Build the engine configuration from the parsed command line.
pub fn resolve_config(cli: &Cli) -> Result<DiscoveryConfig> {
    let mut config = match &cli.config {
        Some(path) => DiscoveryConfig::from_file(path)?,
        None => DiscoveryConfig::default(),
    };

    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(interval) = cli.interval {
        config.interval_secs = interval;
    }
    if let Some(ip) = cli.advertise_ip {
        config.advertise_ip = Some(ip);
    }
    if cli.reuse_port {
        config.reuse_port = true;
    }

    config.validate()?;
    Ok(config)
}
