//! Shared types and utilities used across all botflow crates.

pub mod time;
pub mod types;

pub use types::{ChatKind, InboundMessage};
