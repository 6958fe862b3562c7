//! Bot definitions, configuration-time validation, and trigger matching.

pub mod definition;
pub mod error;
pub mod matcher;
pub mod store;

pub use {
    definition::{BotDefinition, Trigger, TriggerOperator},
    error::{Error, Result},
    matcher::match_bot,
    store::{BotStore, InMemoryBotStore},
};
