/// Crate-wide result type for bot configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed errors raised at bot configuration time. The dispatch engine never
/// observes these; invalid definitions are rejected before they are stored.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A second enabled catch-all bot for the same instance and family.
    #[error("instance {instance_id} already has an enabled catch-all bot for family {family}")]
    DuplicateCatchAll {
        instance_id: String,
        family: String,
    },

    /// Keyword triggers need a non-empty value.
    #[error("bot {bot_id} has a keyword trigger with an empty value")]
    EmptyKeyword { bot_id: String },

    /// Advanced triggers must compile as a regular expression.
    #[error("bot {bot_id} has an invalid trigger pattern: {source}")]
    InvalidPattern {
        bot_id: String,
        #[source]
        source: regex::Error,
    },

    /// A referenced bot ID is not in the store.
    #[error("unknown bot: {bot_id}")]
    UnknownBot { bot_id: String },

    /// Wrapped failure from a concrete store backend.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
