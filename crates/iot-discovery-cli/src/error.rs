//! Error types for the discovery CLI.
//!
//! CliError wraps CoreError from the shared library and adds CLI-specific variants.

use iot_discovery_core::error::CoreError;
use thiserror::Error;

pub use iot_discovery_core::error::{ConfigError, DiscoveryError};

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NETWORK_ERROR: i32 = 2;
    pub const NO_DEVICES: i32 = 3;
    pub const INVALID_ARGS: i32 = 4;
}

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No devices found")]
    NoDevicesFound,
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(e) => match e {
                CoreError::Discovery(DiscoveryError::InvalidConfig(_)) => exit_codes::INVALID_ARGS,
                CoreError::Discovery(_) => exit_codes::NETWORK_ERROR,
                CoreError::Config(_) => exit_codes::INVALID_ARGS,
                CoreError::Parse(_) => exit_codes::GENERAL_ERROR,
                CoreError::Io(_) => exit_codes::GENERAL_ERROR,
                CoreError::Other(_) => exit_codes::GENERAL_ERROR,
            },
            CliError::Io(_) => exit_codes::GENERAL_ERROR,
            CliError::Json(_) => exit_codes::GENERAL_ERROR,
            CliError::InvalidArgument(_) => exit_codes::INVALID_ARGS,
            CliError::NoDevicesFound => exit_codes::NO_DEVICES,
        }
    }
}

// Conversions from core error subtypes to CliError
impl From<DiscoveryError> for CliError {
    fn from(e: DiscoveryError) -> Self {
        CliError::Core(CoreError::Discovery(e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Core(CoreError::Config(e))
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_failure_is_network_error() {
        let err: CliError = DiscoveryError::Bind {
            port: 5000,
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        }
        .into();
        assert_eq!(err.exit_code(), exit_codes::NETWORK_ERROR);
    }

    #[test]
    fn test_invalid_engine_config_is_invalid_args() {
        let err: CliError =
            DiscoveryError::InvalidConfig(ConfigError::Invalid("bad".to_string())).into();
        assert_eq!(err.exit_code(), exit_codes::INVALID_ARGS);
    }

    #[test]
    fn test_config_error_is_invalid_args() {
        let err: CliError = ConfigError::Invalid("bad".to_string()).into();
        assert_eq!(err.exit_code(), exit_codes::INVALID_ARGS);
    }

    #[test]
    fn test_no_devices_exit_code() {
        assert_eq!(CliError::NoDevicesFound.exit_code(), exit_codes::NO_DEVICES);
        assert_eq!(format!("{}", CliError::NoDevicesFound), "No devices found");
    }
}
