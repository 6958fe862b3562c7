//! The dispatch-and-session engine.
//!
//! One [`Engine::dispatch`] call per inbound message fans the event out to
//! every registered bot family. Each family independently runs trigger
//! matching, the settings cascade, debounce coalescing, the session state
//! machine, its provider adapter, and paced reply delivery. Families never
//! suppress each other; within a family, overlapping turns for the same
//! conversation are rejected by the `awaiting_user` gate.

pub mod dispatch;
pub mod turn;

pub use dispatch::Engine;
