//! Error types for the discovery core.

use thiserror::Error;

/// Core error type for shared operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Discovery engine errors
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Failed to bind UDP port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Discovery engine is already running")]
    AlreadyRunning,

    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(#[source] ConfigError),

    #[error("Failed to send discovery request: {0}")]
    Send(#[source] std::io::Error),

    #[error("Silence call failed: {0}")]
    Silence(String),
}

/// Inbound payload errors. Always terminal to the packet that caused them.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Payload is not a JSON object")]
    NotAnObject,

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid field '{field}': expected {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_error_display() {
        let err = DiscoveryError::Bind {
            port: 5000,
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        };
        assert_eq!(format!("{}", err), "Failed to bind UDP port 5000: in use");
    }

    #[test]
    fn test_core_error_from_parse_error() {
        let err: CoreError = ParseError::MissingField("name").into();
        assert!(format!("{}", err).contains("Missing field: name"));
    }

    #[test]
    fn test_invalid_field_display() {
        let err = ParseError::InvalidField {
            field: "deviceInfo",
            expected: "object",
        };
        assert_eq!(
            format!("{}", err),
            "Invalid field 'deviceInfo': expected object"
        );
    }
}
