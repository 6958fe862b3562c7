//! Instance settings, per-bot overrides, and the resolve cascade.
//!
//! `EffectiveSettings` is recomputed for every turn from the instance
//! defaults plus the matched bot's overrides; it is never persisted.

pub mod ignore;
pub mod schema;
pub mod store;

pub use {
    ignore::is_ignored,
    schema::{DefaultSettings, EffectiveSettings, SettingsOverrides, resolve},
    store::{InMemorySettingsStore, SettingsStore},
};
