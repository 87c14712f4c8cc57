//! Discovery wire messages.
//!
//! One JSON object per datagram. Inbound messages carry no type tag and are
//! classified by which fields are present.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::types::DiscoverableDevice;

/// Command literal carried by discovery requests
pub const DISCOVER_COMMAND: &str = "DISCOVER";

/// Outbound request soliciting announcements.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryRequestMessage<'a> {
    pub command: &'a str,
    pub product: &'a str,
    pub ip_address: &'a str,
    /// Devices already known, so responders can skip replying
    pub known_devices: &'a [DiscoverableDevice],
}

/// A device announcing itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub name: String,
    pub device_info: Value,
    /// Sender address from the datagram envelope
    pub ip_address: String,
    pub silence_url: Option<String>,
}

impl Announcement {
    /// Host-and-path to call back, formed by plain concatenation.
    pub fn callback_address(&self) -> Option<String> {
        self.silence_url
            .as_ref()
            .map(|suffix| format!("{}{}", self.ip_address, suffix))
    }

    pub fn to_device(&self) -> DiscoverableDevice {
        DiscoverableDevice::new(
            self.name.clone(),
            self.ip_address.clone(),
            self.device_info.clone(),
        )
    }
}

/// A classified inbound datagram.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Another server's request
    DiscoveryRequest,
    Announcement(Announcement),
}

/// Serialize a discovery request embedding the current roster.
pub fn encode_request(
    known_devices: &[DiscoverableDevice],
    product: &str,
    self_ip: &str,
) -> Vec<u8> {
    let message = DiscoveryRequestMessage {
        command: DISCOVER_COMMAND,
        product,
        ip_address: self_ip,
        known_devices,
    };
    // Plain structs of strings and JSON values always serialize.
    serde_json::to_vec(&message).unwrap_or_default()
}

/// Parse and classify an inbound datagram from `sender_ip`.
pub fn decode(data: &[u8], sender_ip: &str) -> Result<InboundMessage, ParseError> {
    let value: Value = serde_json::from_slice(data)?;
    let object = value.as_object().ok_or(ParseError::NotAnObject)?;

    if is_discovery_request(object) {
        return Ok(InboundMessage::DiscoveryRequest);
    }

    let name = match object.get("name") {
        None | Some(Value::Null) => return Err(ParseError::MissingField("name")),
        Some(Value::String(name)) => name.clone(),
        Some(_) => {
            return Err(ParseError::InvalidField {
                field: "name",
                expected: "string",
            })
        }
    };

    let device_info = match object.get("deviceInfo") {
        None | Some(Value::Null) => return Err(ParseError::MissingField("deviceInfo")),
        Some(info @ Value::Object(_)) => info.clone(),
        Some(_) => {
            return Err(ParseError::InvalidField {
                field: "deviceInfo",
                expected: "object",
            })
        }
    };

    let silence_url = object
        .get("silenceUrl")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(InboundMessage::Announcement(Announcement {
        name,
        device_info,
        ip_address: sender_ip.to_string(),
        silence_url,
    }))
}

fn is_discovery_request(object: &Map<String, Value>) -> bool {
    object
        .get("command")
        .and_then(Value::as_str)
        .map(|command| command.eq_ignore_ascii_case(DISCOVER_COMMAND))
        .unwrap_or(false)
}
