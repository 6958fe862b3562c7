//! Session records and storage.
//!
//! One session exists per (instance, conversation, bot family). The record
//! is the only shared mutable state between concurrent turns of the same
//! conversation; the engine serializes all transitions on it.

pub mod session;
pub mod store;

pub use {
    session::{Session, SessionKey, SessionStatus},
    store::{InMemorySessionStore, SessionStore},
};
