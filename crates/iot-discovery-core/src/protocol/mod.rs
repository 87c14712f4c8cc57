//! Protocol layer for discovery traffic.
//!
//! This module builds outgoing requests and classifies incoming datagrams.

pub mod message;

pub use message::{decode, encode_request, Announcement, InboundMessage, DISCOVER_COMMAND};
