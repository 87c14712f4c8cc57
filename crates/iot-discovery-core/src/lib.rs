//! Core library for the IoT discovery server.
//!
//! Broadcasts `DISCOVER` requests on the local segment, keeps a roster of the
//! devices that announce themselves, and silences their repeat announcements.

pub mod config;
pub mod device;
pub mod discovery;
pub mod error;
pub mod net;
pub mod protocol;
pub mod types;

pub use config::DiscoveryConfig;
pub use discovery::{DiscoveryEngine, EngineHandle, EngineState};
pub use error::{CoreError, Result};
pub use types::DiscoverableDevice;
