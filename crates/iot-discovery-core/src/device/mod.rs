//! Outbound calls to discovered devices.

pub mod silence;

pub use silence::{HttpSilencer, NoopSilencer, SilenceNotifier};
