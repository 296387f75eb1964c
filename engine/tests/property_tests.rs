use proptest::prelude::*;
use decide_engine::session::{derive_title, SessionStore, ELLIPSIS, MAX_TITLE_CHARS};
use sdk::types::{Message, SessionPatch, PLACEHOLDER_TITLE};

const PHRASES: [&str; 7] = [
    "should i",
    "Should I",
    "can i",
    "how do i",
    "What should I",
    "when should i",
    "WHY SHOULD I",
];

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// Title derivation: phrase stripped, '?' dropped, first letter capitalized,
// truncated to MAX_TITLE_CHARS plus the ellipsis
proptest! {
    #[test]
    fn test_title_strips_phrase_and_truncates(
        phrase_index in 0..PHRASES.len(),
        body in "x[a-z ]{0,80}",
        marks in 0..3usize,
    ) {
        let question = format!("  {} {}{}  ", PHRASES[phrase_index], body, "?".repeat(marks));
        let title = derive_title(&question);

        let expected = capitalize(body.trim_end());
        if expected.chars().count() > MAX_TITLE_CHARS {
            let head: String = expected.chars().take(MAX_TITLE_CHARS).collect();
            prop_assert_eq!(title, format!("{}{}", head, ELLIPSIS));
        } else {
            prop_assert_eq!(title, expected);
        }
    }

    #[test]
    fn test_title_is_bounded_for_any_input(question in "\\PC{0,200}") {
        let title = derive_title(&question);
        prop_assert!(title.chars().count() <= MAX_TITLE_CHARS + ELLIPSIS.chars().count());
        prop_assert_eq!(title.trim(), title.as_str());
        prop_assert!(!title.ends_with('?'), "title kept a question mark: {:?}", title);
    }
}

// Deleting a session removes exactly that session; the active session only
// changes when it was the one deleted
proptest! {
    #[test]
    fn test_delete_keeps_active_consistent(
        count in 1..8usize,
        active_index in 0..8usize,
        delete_index in 0..8usize,
    ) {
        let mut store = SessionStore::new();
        let ids: Vec<String> = (0..count).map(|_| store.create().id.clone()).collect();

        let active = ids[active_index % count].clone();
        let victim = ids[delete_index % count].clone();
        prop_assert!(store.select(&active));

        prop_assert!(store.delete(&victim));
        prop_assert_eq!(store.len(), count - 1);
        prop_assert!(store.get(&victim).is_none());
        prop_assert!(!store.delete(&victim));

        if victim == active {
            let expected = store.sessions().first().map(|s| s.id.clone());
            prop_assert_eq!(store.active_id().map(str::to_string), expected);
        } else {
            prop_assert_eq!(store.active_id(), Some(active.as_str()));
        }
    }

    #[test]
    fn test_whitespace_rename_is_rejected(blank in "[ \\t\\n]{0,6}") {
        let mut store = SessionStore::new();
        let id = store.create().id.clone();

        prop_assert!(!store.rename(&id, &blank));
        prop_assert_eq!(store.get(&id).unwrap().title.as_str(), PLACEHOLDER_TITLE);
    }

    #[test]
    fn test_rename_trims_title(title in "[a-zA-Z][a-zA-Z ]{0,20}[a-zA-Z]", pad in "[ \\t]{0,3}") {
        let mut store = SessionStore::new();
        let id = store.create().id.clone();

        let padded = format!("{}{}{}", pad, title, pad);
        prop_assert!(store.rename(&id, &padded));
        prop_assert_eq!(store.get(&id).unwrap().title.as_str(), title.as_str());
    }

    #[test]
    fn test_updates_preserve_message_order(contents in prop::collection::vec("[a-z]{1,10}", 1..10)) {
        let mut store = SessionStore::new();
        let id = store.create().id.clone();

        let mut messages = Vec::new();
        for (i, content) in contents.iter().enumerate() {
            messages.push(if i % 2 == 0 {
                Message::question(content.clone(), None)
            } else {
                Message::response(content.clone())
            });
            prop_assert!(store.update(&id, SessionPatch::messages(messages.clone())));
        }

        let stored: Vec<&str> = store
            .get(&id)
            .unwrap()
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        let expected: Vec<&str> = contents.iter().map(String::as_str).collect();
        prop_assert_eq!(stored, expected);
    }
}
