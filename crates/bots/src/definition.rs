use {
    botflow_settings::SettingsOverrides,
    serde::{Deserialize, Serialize},
};

use crate::error::{Error, Result};

/// Comparison applied by keyword triggers. Case-sensitive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TriggerOperator {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
}

/// The rule deciding whether a bot claims an inbound message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trigger {
    /// Claims every message. At most one enabled catch-all bot may exist
    /// per instance and family.
    All,
    /// Claims messages whose text satisfies `operator` against `value`.
    Keyword {
        operator: TriggerOperator,
        value: String,
    },
    /// Claims messages matching `pattern` as a regular expression.
    Advanced { pattern: String },
    /// Never claims a message; reachable only as fallback or via a bound
    /// session.
    None,
}

/// One configured responder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotDefinition {
    pub id: String,
    pub instance_id: String,
    /// Bot family this definition belongs to (one backend integration).
    pub family: String,
    pub enabled: bool,
    pub trigger: Trigger,
    /// Per-bot settings overrides; `None` fields inherit instance defaults.
    #[serde(default)]
    pub overrides: SettingsOverrides,
    /// Backend connection data, opaque to the engine. Handed verbatim to
    /// the family's provider adapter.
    #[serde(default)]
    pub backend: serde_json::Value,
}

impl BotDefinition {
    /// New enabled definition with a fresh ID and no overrides.
    pub fn new(
        instance_id: impl Into<String>,
        family: impl Into<String>,
        trigger: Trigger,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            instance_id: instance_id.into(),
            family: family.into(),
            enabled: true,
            trigger,
            overrides: SettingsOverrides::default(),
            backend: serde_json::Value::Null,
        }
    }

    /// Validate the definition in isolation (exclusivity is checked by the
    /// store against its siblings).
    pub fn validate(&self) -> Result<()> {
        match &self.trigger {
            Trigger::Keyword { value, .. } if value.is_empty() => Err(Error::EmptyKeyword {
                bot_id: self.id.clone(),
            }),
            Trigger::Advanced { pattern } => match regex::Regex::new(pattern) {
                Ok(_) => Ok(()),
                Err(source) => Err(Error::InvalidPattern {
                    bot_id: self.id.clone(),
                    source,
                }),
            },
            _ => Ok(()),
        }
    }

    /// Whether this bot's trigger claims `content`.
    pub fn matches(&self, content: &str) -> bool {
        match &self.trigger {
            Trigger::All => true,
            Trigger::Keyword { operator, value } => match operator {
                TriggerOperator::Equals => content == value,
                TriggerOperator::Contains => content.contains(value.as_str()),
                TriggerOperator::StartsWith => content.starts_with(value.as_str()),
                TriggerOperator::EndsWith => content.ends_with(value.as_str()),
            },
            Trigger::Advanced { pattern } => match regex::Regex::new(pattern) {
                Ok(re) => re.is_match(content),
                Err(e) => {
                    tracing::warn!(bot_id = %self.id, error = %e, "invalid trigger pattern");
                    false
                },
            },
            Trigger::None => false,
        }
    }
}
