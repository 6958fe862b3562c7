//! The channel seam: how the engine talks back to the messaging transport.
//!
//! The engine only ever calls these traits; connecting, authenticating, and
//! the wire protocol live entirely in the concrete channel implementation.

pub mod adapter;

pub use adapter::{ChannelAdapter, MediaKind, Presence};
