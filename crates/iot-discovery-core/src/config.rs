//! Discovery engine configuration.

use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default UDP port for sending requests and receiving announcements
pub const DEFAULT_DISCOVERY_PORT: u16 = 5000;

/// Default duty-cycle period in seconds
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Product string identifying the server role in outgoing requests
pub const DEFAULT_PRODUCT: &str = "Server";

/// Engine configuration.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoveryConfig {
    /// Port used both for listening and as the broadcast destination
    pub port: u16,
    pub broadcast_address: Ipv4Addr,
    /// Seconds between discovery broadcasts
    pub interval_secs: u64,
    pub product: String,
    /// Address embedded in requests; detected from host interfaces when unset
    pub advertise_ip: Option<Ipv4Addr>,
    pub silence_timeout_ms: u64,
    pub send_timeout_ms: u64,
    /// Share the port with other reuse-enabled sockets; off means a second
    /// server on the same port fails to start
    pub reuse_port: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_DISCOVERY_PORT,
            broadcast_address: Ipv4Addr::BROADCAST,
            interval_secs: DEFAULT_INTERVAL_SECS,
            product: DEFAULT_PRODUCT.to_string(),
            advertise_ip: None,
            silence_timeout_ms: 5000,
            send_timeout_ms: 2000,
            reuse_port: false,
        }
    }
}

impl DiscoveryConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "intervalSecs must be greater than zero".to_string(),
            ));
        }
        if self.silence_timeout_ms == 0 || self.send_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn silence_timeout(&self) -> Duration {
        Duration::from_millis(self.silence_timeout_ms)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}
