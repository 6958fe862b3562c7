use serde::{Deserialize, Serialize};

/// Instance-wide default settings. Every field can be overridden per bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSettings {
    /// Minutes of inactivity before a session expires. `0` disables expiry.
    pub expire_minutes: u32,
    /// Message that terminates the session (case-insensitive exact match).
    /// Empty disables keyword termination.
    pub keyword_finish: String,
    /// Flat per-message delivery delay, used when `ms_per_character` is 0.
    pub reply_delay_ms: u64,
    /// Sent when the backend errors or a message carries no usable text.
    pub unknown_message: Option<String>,
    /// Process messages authored by the conversation owner.
    pub listening_from_me: bool,
    /// An owner-authored message pauses the session (human takeover).
    pub stop_bot_from_me: bool,
    /// Keep closed sessions around instead of deleting them.
    pub keep_open_on_close: bool,
    /// Quiet period for coalescing message bursts. `0` disables debouncing.
    pub debounce_seconds: u64,
    /// Conversations the bot must never respond in. Entries are exact
    /// conversation IDs or the `@all-groups` / `@all-contacts` markers.
    pub ignored: Vec<String>,
    /// Split reply text on blank lines into independent messages.
    pub split_messages: bool,
    /// Per-character delivery delay; `0` falls back to `reply_delay_ms`.
    pub ms_per_character: u64,
    /// Bot to route to when no trigger matches.
    pub fallback_bot_id: Option<String>,
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            expire_minutes: 0,
            keyword_finish: String::new(),
            reply_delay_ms: default_reply_delay_ms(),
            unknown_message: None,
            listening_from_me: false,
            stop_bot_from_me: false,
            keep_open_on_close: false,
            debounce_seconds: 0,
            ignored: Vec::new(),
            split_messages: false,
            ms_per_character: 0,
            fallback_bot_id: None,
        }
    }
}

fn default_reply_delay_ms() -> u64 {
    1000
}

/// Per-bot overrides. `None` means "inherit the instance default";
/// explicit `false`/`0` values are taken as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsOverrides {
    pub expire_minutes: Option<u32>,
    pub keyword_finish: Option<String>,
    pub reply_delay_ms: Option<u64>,
    pub unknown_message: Option<String>,
    pub listening_from_me: Option<bool>,
    pub stop_bot_from_me: Option<bool>,
    pub keep_open_on_close: Option<bool>,
    pub debounce_seconds: Option<u64>,
    pub ignored: Option<Vec<String>>,
    pub split_messages: Option<bool>,
    pub ms_per_character: Option<u64>,
    pub fallback_bot_id: Option<String>,
}

/// The merged per-turn configuration. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveSettings {
    pub expire_minutes: u32,
    pub keyword_finish: String,
    pub reply_delay_ms: u64,
    pub unknown_message: Option<String>,
    pub listening_from_me: bool,
    pub stop_bot_from_me: bool,
    pub keep_open_on_close: bool,
    pub debounce_seconds: u64,
    pub ignored: Vec<String>,
    pub split_messages: bool,
    pub ms_per_character: u64,
    pub fallback_bot_id: Option<String>,
}

impl Default for EffectiveSettings {
    fn default() -> Self {
        resolve(&DefaultSettings::default(), &SettingsOverrides::default())
    }
}

/// Merge instance defaults with a bot's overrides. Pure, total, no I/O.
pub fn resolve(defaults: &DefaultSettings, overrides: &SettingsOverrides) -> EffectiveSettings {
    EffectiveSettings {
        expire_minutes: overrides.expire_minutes.unwrap_or(defaults.expire_minutes),
        keyword_finish: overrides
            .keyword_finish
            .clone()
            .unwrap_or_else(|| defaults.keyword_finish.clone()),
        reply_delay_ms: overrides.reply_delay_ms.unwrap_or(defaults.reply_delay_ms),
        unknown_message: overrides
            .unknown_message
            .clone()
            .or_else(|| defaults.unknown_message.clone()),
        listening_from_me: overrides
            .listening_from_me
            .unwrap_or(defaults.listening_from_me),
        stop_bot_from_me: overrides
            .stop_bot_from_me
            .unwrap_or(defaults.stop_bot_from_me),
        keep_open_on_close: overrides
            .keep_open_on_close
            .unwrap_or(defaults.keep_open_on_close),
        debounce_seconds: overrides
            .debounce_seconds
            .unwrap_or(defaults.debounce_seconds),
        ignored: overrides
            .ignored
            .clone()
            .unwrap_or_else(|| defaults.ignored.clone()),
        split_messages: overrides.split_messages.unwrap_or(defaults.split_messages),
        ms_per_character: overrides
            .ms_per_character
            .unwrap_or(defaults.ms_per_character),
        fallback_bot_id: overrides
            .fallback_bot_id
            .clone()
            .or_else(|| defaults.fallback_bot_id.clone()),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_takes_defaults_when_no_overrides() {
        let defaults = DefaultSettings {
            expire_minutes: 30,
            debounce_seconds: 5,
            ..Default::default()
        };
        let effective = resolve(&defaults, &SettingsOverrides::default());
        assert_eq!(effective.expire_minutes, 30);
        assert_eq!(effective.debounce_seconds, 5);
        assert_eq!(effective.reply_delay_ms, 1000);
    }

    #[test]
    fn resolve_prefers_overrides() {
        let defaults = DefaultSettings {
            expire_minutes: 30,
            keyword_finish: "bye".into(),
            ..Default::default()
        };
        let overrides = SettingsOverrides {
            expire_minutes: Some(10),
            keyword_finish: Some("done".into()),
            ..Default::default()
        };
        let effective = resolve(&defaults, &overrides);
        assert_eq!(effective.expire_minutes, 10);
        assert_eq!(effective.keyword_finish, "done");
    }

    #[test]
    fn explicit_false_and_zero_override_truthy_defaults() {
        let defaults = DefaultSettings {
            listening_from_me: true,
            keep_open_on_close: true,
            expire_minutes: 15,
            ..Default::default()
        };
        let overrides = SettingsOverrides {
            listening_from_me: Some(false),
            keep_open_on_close: Some(false),
            expire_minutes: Some(0),
            ..Default::default()
        };
        let effective = resolve(&defaults, &overrides);
        assert!(!effective.listening_from_me);
        assert!(!effective.keep_open_on_close);
        assert_eq!(effective.expire_minutes, 0);
    }

    #[test]
    fn fallback_bot_cascades_through_options() {
        let defaults = DefaultSettings {
            fallback_bot_id: Some("default-bot".into()),
            ..Default::default()
        };
        let effective = resolve(&defaults, &SettingsOverrides::default());
        assert_eq!(effective.fallback_bot_id.as_deref(), Some("default-bot"));

        let overrides = SettingsOverrides {
            fallback_bot_id: Some("special".into()),
            ..Default::default()
        };
        let effective = resolve(&defaults, &overrides);
        assert_eq!(effective.fallback_bot_id.as_deref(), Some("special"));
    }

    #[test]
    fn built_in_defaults() {
        let effective = EffectiveSettings::default();
        assert_eq!(effective.debounce_seconds, 0);
        assert!(!effective.keep_open_on_close);
        assert_eq!(effective.expire_minutes, 0);
        assert!(effective.keyword_finish.is_empty());
    }
}
