use botflow_common::ChatKind;

/// Marker matching every group conversation.
pub const ALL_GROUPS: &str = "@all-groups";
/// Marker matching every direct conversation.
pub const ALL_CONTACTS: &str = "@all-contacts";

/// Check whether a conversation is on the ignore list.
///
/// Entries are matched case-insensitively against the conversation ID.
/// The `@all-groups` / `@all-contacts` markers ignore an entire chat kind.
pub fn is_ignored(conversation_id: &str, kind: ChatKind, ignored: &[String]) -> bool {
    if ignored.is_empty() {
        return false;
    }
    let conversation_lower = conversation_id.to_lowercase();
    ignored.iter().any(|entry| match entry.as_str() {
        ALL_GROUPS => kind == ChatKind::Group,
        ALL_CONTACTS => kind == ChatKind::Direct,
        other => other.to_lowercase() == conversation_lower,
    })
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_ignores_nobody() {
        assert!(!is_ignored("anyone", ChatKind::Direct, &[]));
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        let list = vec!["Alice@Chat".into()];
        assert!(is_ignored("alice@chat", ChatKind::Direct, &list));
        assert!(!is_ignored("bob@chat", ChatKind::Direct, &list));
    }

    #[test]
    fn all_groups_marker() {
        let list = vec![ALL_GROUPS.into()];
        assert!(is_ignored("some-room", ChatKind::Group, &list));
        assert!(!is_ignored("some-room", ChatKind::Direct, &list));
    }

    #[test]
    fn all_contacts_marker() {
        let list = vec![ALL_CONTACTS.into()];
        assert!(is_ignored("peer", ChatKind::Direct, &list));
        assert!(!is_ignored("peer", ChatKind::Group, &list));
    }
}
