//! Table-formatted output for CLI.

use colored::*;
use comfy_table::{Cell, ContentArrangement, Table};
use iot_discovery_core::types::DiscoverableDevice;

use super::OutputFormatter;

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }

    fn device_info_summary(info: &serde_json::Value) -> String {
        match info.as_object() {
            Some(map) if map.is_empty() => "-".to_string(),
            Some(map) => map
                .iter()
                .map(|(key, value)| match value.as_str() {
                    Some(s) => format!("{}={}", key, s),
                    None => format!("{}={}", key, value),
                })
                .collect::<Vec<_>>()
                .join(", "),
            None => info.to_string(),
        }
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_devices(&self, devices: &[DiscoverableDevice]) -> String {
        if devices.is_empty() {
            return "No devices found.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Name", "IP Address", "Device Info"]);

        for device in devices {
            table.add_row(vec![
                Cell::new(&device.name),
                Cell::new(&device.ip_address),
                Cell::new(Self::device_info_summary(&device.device_info)),
            ]);
        }

        format!("{}\n\nFound {} device(s)", table, devices.len())
    }

    fn format_message(&self, message: &str) -> String {
        message.dimmed().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_roster() {
        assert_eq!(TableOutput::new().format_devices(&[]), "No devices found.");
    }

    #[test]
    fn test_table_lists_devices() {
        let devices = vec![
            DiscoverableDevice::new("PotPiPowerBox", "10.0.0.202", json!({"serial": "1234-abcd"})),
            DiscoverableDevice::new("Lamp", "10.0.0.7", json!({})),
        ];

        let output = TableOutput::new().format_devices(&devices);

        assert!(output.contains("PotPiPowerBox"));
        assert!(output.contains("10.0.0.202"));
        assert!(output.contains("serial=1234-abcd"));
        assert!(output.ends_with("Found 2 device(s)"));
    }

    #[test]
    fn test_device_info_summary() {
        assert_eq!(
            TableOutput::device_info_summary(&json!({"serial": "1234", "port": 215})),
            "port=215, serial=1234"
        );
        assert_eq!(TableOutput::device_info_summary(&json!({})), "-");
    }
}
