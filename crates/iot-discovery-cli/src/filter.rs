//! Device name filtering with shell-style wildcards.

use iot_discovery_core::types::DiscoverableDevice;
use regex::Regex;

use crate::error::{CliError, Result};

/// Compile a `*`/`?` wildcard pattern into an anchored regex.
pub fn name_filter(pattern: Option<&str>) -> Result<Option<Regex>> {
    let Some(pattern) = pattern else {
        return Ok(None);
    };

    let regex_pattern = regex::escape(pattern)
        .replace(r"\*", ".*")
        .replace(r"\?", ".");

    Regex::new(&format!("^{}$", regex_pattern))
        .map(Some)
        .map_err(|e| CliError::InvalidArgument(format!("Invalid name pattern '{}': {}", pattern, e)))
}

pub fn filter_devices(
    devices: Vec<DiscoverableDevice>,
    filter: Option<&Regex>,
) -> Vec<DiscoverableDevice> {
    match filter {
        Some(regex) => devices
            .into_iter()
            .filter(|d| regex.is_match(&d.name))
            .collect(),
        None => devices,
    }
}
