//! LAN device discovery.
//!
//! Provides the device roster, the change signal, and the engine that ties
//! them to the network.

pub mod engine;
pub mod notifier;
pub mod roster;

pub use engine::{DiscoveryEngine, EngineHandle, EngineState, PacketOutcome};
pub use notifier::ChangeNotifier;
pub use roster::{DeviceRoster, UpsertResult};
