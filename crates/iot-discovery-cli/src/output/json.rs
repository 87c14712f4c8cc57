//! JSON-formatted output for CLI.

use iot_discovery_core::types::DiscoverableDevice;
use serde::Serialize;
use serde_json::json;

use super::OutputFormatter;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Roster document shared by stdout output and `--output` files.
pub fn devices_document(devices: &[DiscoverableDevice]) -> serde_json::Value {
    json!({
        "devices": devices,
        "count": devices.len()
    })
}

impl OutputFormatter for JsonOutput {
    fn format_devices(&self, devices: &[DiscoverableDevice]) -> String {
        Self::to_json(&devices_document(devices))
    }

    fn format_message(&self, message: &str) -> String {
        Self::to_json(&json!({ "message": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_devices() {
        let devices = vec![DiscoverableDevice::new(
            "PotPiPowerBox",
            "10.0.0.202",
            json!({"serial": "1234-abcd"}),
        )];

        let output = JsonOutput::new().format_devices(&devices);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["count"], 1);
        assert_eq!(value["devices"][0]["name"], "PotPiPowerBox");
        assert_eq!(value["devices"][0]["ipAddress"], "10.0.0.202");
        assert_eq!(value["devices"][0]["deviceInfo"]["serial"], "1234-abcd");
    }

    #[test]
    fn test_format_empty() {
        let value: serde_json::Value =
            serde_json::from_str(&JsonOutput::new().format_devices(&[])).unwrap();
        assert_eq!(value["count"], 0);
        assert_eq!(value["devices"], json!([]));
    }
}
