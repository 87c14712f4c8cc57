//! Shared data model.

use serde::{Deserialize, Serialize};

/// A device known to the discovery server.
///
/// `name` is the roster key. Only `ip_address` changes after the first
/// announcement; `device_info` is stored as received and never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverableDevice {
    pub name: String,
    pub ip_address: String,
    pub device_info: serde_json::Value,
}

impl DiscoverableDevice {
    pub fn new(
        name: impl Into<String>,
        ip_address: impl Into<String>,
        device_info: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            ip_address: ip_address.into(),
            device_info,
        }
    }
}
