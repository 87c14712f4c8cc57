//! In-memory roster of discovered devices, keyed by name.

use std::collections::HashMap;

use crate::types::DiscoverableDevice;

/// Outcome of reconciling a candidate against the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertResult {
    Inserted,
    Updated,
    Unchanged,
}

impl UpsertResult {
    /// Whether observers should be told about this outcome.
    pub fn is_change(self) -> bool {
        matches!(self, UpsertResult::Inserted | UpsertResult::Updated)
    }
}

/// Known devices in insertion order, with a name index for lookup.
///
/// Entries are never removed.
#[derive(Debug, Default)]
pub struct DeviceRoster {
    devices: Vec<DiscoverableDevice>,
    by_name: HashMap<String, usize>,
}

impl DeviceRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact-match lookup.
    pub fn find_by_name(&self, name: &str) -> Option<&DiscoverableDevice> {
        self.by_name.get(name).map(|&idx| &self.devices[idx])
    }

    /// Insert an unseen device or refresh the address of a known one.
    ///
    /// Only `ip_address` is updated for known devices; the stored
    /// `device_info` is kept as first announced.
    pub fn upsert(&mut self, candidate: DiscoverableDevice) -> UpsertResult {
        match self.by_name.get(&candidate.name) {
            Some(&idx) => {
                let existing = &mut self.devices[idx];
                if existing.ip_address == candidate.ip_address {
                    UpsertResult::Unchanged
                } else {
                    existing.ip_address = candidate.ip_address;
                    UpsertResult::Updated
                }
            }
            None => {
                self.by_name
                    .insert(candidate.name.clone(), self.devices.len());
                self.devices.push(candidate);
                UpsertResult::Inserted
            }
        }
    }

    /// Copy of the current contents in insertion order.
    pub fn snapshot(&self) -> Vec<DiscoverableDevice> {
        self.devices.clone()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device(name: &str, ip: &str) -> DiscoverableDevice {
        DiscoverableDevice::new(name, ip, json!({"serial": name}))
    }

    #[test]
    fn test_insert_then_unchanged() {
        let mut roster = DeviceRoster::new();

        assert_eq!(roster.upsert(device("X", "10.0.0.5")), UpsertResult::Inserted);
        assert_eq!(roster.upsert(device("X", "10.0.0.5")), UpsertResult::Unchanged);
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_address_update_in_place() {
        let mut roster = DeviceRoster::new();
        roster.upsert(device("X", "10.0.0.5"));

        let moved = DiscoverableDevice::new("X", "10.0.0.9", json!({"serial": "other"}));
        assert_eq!(roster.upsert(moved), UpsertResult::Updated);

        let stored = roster.find_by_name("X").unwrap();
        assert_eq!(stored.ip_address, "10.0.0.9");
        assert_eq!(stored.device_info, json!({"serial": "X"}));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_dedup_over_many_announcements() {
        let mut roster = DeviceRoster::new();
        for i in 0..50 {
            roster.upsert(device("Lamp", &format!("10.0.0.{}", i % 4)));
        }
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.find_by_name("Lamp").unwrap().ip_address, "10.0.0.1");
    }

    #[test]
    fn test_find_by_name_is_exact() {
        let mut roster = DeviceRoster::new();
        roster.upsert(device("Lamp", "10.0.0.5"));

        assert!(roster.find_by_name("Lamp").is_some());
        assert!(roster.find_by_name("lamp").is_none());
        assert!(roster.find_by_name("Lam").is_none());
    }

    #[test]
    fn test_snapshot_keeps_insertion_order() {
        let mut roster = DeviceRoster::new();
        roster.upsert(device("C", "10.0.0.3"));
        roster.upsert(device("A", "10.0.0.1"));
        roster.upsert(device("B", "10.0.0.2"));
        roster.upsert(device("C", "10.0.0.30"));

        let names: Vec<_> = roster.snapshot().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert_eq!(roster.snapshot()[0].ip_address, "10.0.0.30");
    }

    #[test]
    fn test_is_change() {
        assert!(UpsertResult::Inserted.is_change());
        assert!(UpsertResult::Updated.is_change());
        assert!(!UpsertResult::Unchanged.is_change());
    }
}
