use tracing::debug;

use crate::definition::BotDefinition;

/// Select the bot that claims `content`, or `None`.
///
/// A conversation with a live session stays bound to its bot: when
/// `bound_bot_id` is set, that bot is returned directly (or `None` when it
/// has vanished or been disabled) and trigger evaluation is skipped
/// entirely. New conversations evaluate enabled bots sorted by ID —
/// first match wins — then fall back to `fallback_bot_id` if that bot is
/// present and enabled.
pub fn match_bot<'a>(
    content: &str,
    bots: &'a [BotDefinition],
    bound_bot_id: Option<&str>,
    fallback_bot_id: Option<&str>,
) -> Option<&'a BotDefinition> {
    if let Some(bound) = bound_bot_id {
        let bot = bots.iter().find(|b| b.id == bound && b.enabled);
        if bot.is_none() {
            debug!(bot_id = bound, "session bound to a vanished or disabled bot");
        }
        return bot;
    }

    let mut enabled: Vec<&BotDefinition> = bots.iter().filter(|b| b.enabled).collect();
    enabled.sort_by(|a, b| a.id.cmp(&b.id));

    if let Some(bot) = enabled.iter().find(|b| b.matches(content)) {
        return Some(bot);
    }

    fallback_bot_id.and_then(|fallback| enabled.into_iter().find(|b| b.id == fallback))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::definition::{Trigger, TriggerOperator},
    };

    fn bot(id: &str, trigger: Trigger) -> BotDefinition {
        let mut bot = BotDefinition::new("inst", "webhook", trigger);
        bot.id = id.into();
        bot
    }

    #[test]
    fn bound_session_short_circuits_triggers() {
        let bots = vec![
            bot("a", Trigger::All),
            bot(
                "b",
                Trigger::Keyword {
                    operator: TriggerOperator::Equals,
                    value: "hi".into(),
                },
            ),
        ];
        let matched = match_bot("hi", &bots, Some("b"), None).unwrap();
        assert_eq!(matched.id, "b");
    }

    #[test]
    fn bound_to_disabled_bot_matches_nothing() {
        let mut disabled = bot("a", Trigger::All);
        disabled.enabled = false;
        assert!(match_bot("hi", &[disabled], Some("a"), None).is_none());
    }

    #[test]
    fn first_match_wins_in_id_order() {
        let bots = vec![
            bot(
                "b-keyword",
                Trigger::Keyword {
                    operator: TriggerOperator::Contains,
                    value: "help".into(),
                },
            ),
            bot("a-all", Trigger::All),
        ];
        let matched = match_bot("help me", &bots, None, None).unwrap();
        assert_eq!(matched.id, "a-all");
    }

    #[test]
    fn keyword_beats_fallback() {
        let bots = vec![
            bot(
                "kw",
                Trigger::Keyword {
                    operator: TriggerOperator::StartsWith,
                    value: "!".into(),
                },
            ),
            bot("fb", Trigger::None),
        ];
        let matched = match_bot("!menu", &bots, None, Some("fb")).unwrap();
        assert_eq!(matched.id, "kw");
    }

    #[test]
    fn falls_back_when_nothing_matches() {
        let bots = vec![
            bot(
                "kw",
                Trigger::Keyword {
                    operator: TriggerOperator::Equals,
                    value: "hi".into(),
                },
            ),
            bot("fb", Trigger::None),
        ];
        let matched = match_bot("hello", &bots, None, Some("fb")).unwrap();
        assert_eq!(matched.id, "fb");
    }

    #[test]
    fn no_match_no_fallback_is_none() {
        let bots = vec![bot(
            "kw",
            Trigger::Keyword {
                operator: TriggerOperator::Equals,
                value: "hi".into(),
            },
        )];
        assert!(match_bot("hello", &bots, None, None).is_none());
        assert!(match_bot("hello", &bots, None, Some("missing")).is_none());
    }

    #[test]
    fn disabled_bots_are_invisible() {
        let mut all = bot("a", Trigger::All);
        all.enabled = false;
        assert!(match_bot("anything", &[all], None, None).is_none());
    }
}
