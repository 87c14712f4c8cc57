//! Command implementations.

pub mod discover;
pub mod serve;

pub use discover::run_discover;
pub use serve::run_serve;
