//! Session title derivation
//!
//! A session keeps its placeholder title until the first question arrives.
//! The question is then turned into a short label: "Should I change careers?"
//! becomes "Change careers".
//!
//! Only the first leading phrase is removed. A repeated phrase survives in the
//! title: "Should I should I go?" becomes "Should I go".

use regex::Regex;
use std::sync::OnceLock;

/// Longest derived title before the ellipsis is added
pub const MAX_TITLE_CHARS: usize = 50;

/// Marker appended to truncated titles
pub const ELLIPSIS: &str = "...";

static LEADING_PHRASE: OnceLock<Regex> = OnceLock::new();

fn leading_phrase() -> &'static Regex {
    LEADING_PHRASE.get_or_init(|| {
        Regex::new(
            r"(?i)^(what should i|when should i|where should i|why should i|should i|can i|how do i)\b",
        )
        .expect("Invalid leading phrase pattern")
    })
}

/// Derive a session title from a question
///
/// Strips one leading interrogative phrase ("should i", "how do i", ...),
/// trailing question marks and surrounding whitespace, capitalizes the first
/// letter and truncates to [`MAX_TITLE_CHARS`] characters plus [`ELLIPSIS`].
///
/// Returns an empty string when nothing is left, e.g. for "Should I?".
pub fn derive_title(question: &str) -> String {
    let stripped = leading_phrase().replace(question.trim(), "");
    let cleaned = stripped
        .trim()
        .trim_end_matches(|c: char| c == '?' || c.is_whitespace());

    let mut chars = cleaned.chars();
    let title: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => return String::new(),
    };

    if title.chars().count() > MAX_TITLE_CHARS {
        let mut truncated: String = title.chars().take(MAX_TITLE_CHARS).collect();
        truncated.push_str(ELLIPSIS);
        truncated
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_should_i() {
        assert_eq!(derive_title("Should I change careers?"), "Change careers");
    }

    #[test]
    fn test_phrase_match_is_case_insensitive() {
        assert_eq!(derive_title("HOW DO I negotiate rent"), "Negotiate rent");
        assert_eq!(derive_title("what Should I eat??"), "Eat");
        assert_eq!(derive_title("Can i retire early?"), "Retire early");
    }

    #[test]
    fn test_every_phrase_is_stripped() {
        for phrase in [
            "should i",
            "can i",
            "how do i",
            "what should i",
            "when should i",
            "where should i",
            "why should i",
        ] {
            let title = derive_title(&format!("{} buy a house?", phrase));
            assert_eq!(title, "Buy a house", "phrase: {}", phrase);
        }
    }

    #[test]
    fn test_spaced_question_marks_are_stripped() {
        assert_eq!(derive_title("Should I rent? ?"), "Rent");
        assert_eq!(derive_title("Can I retire early ?? ?"), "Retire early");
        assert_eq!(derive_title("? ?"), "");
    }

    #[test]
    fn test_only_one_phrase_is_stripped() {
        assert_eq!(derive_title("Should I should I go"), "Should I go");
    }

    #[test]
    fn test_phrase_must_end_on_word_boundary() {
        assert_eq!(
            derive_title("Should investors worry?"),
            "Should investors worry"
        );
    }

    #[test]
    fn test_question_without_phrase_is_capitalized() {
        assert_eq!(derive_title("rent or buy?"), "Rent or buy");
    }

    #[test]
    fn test_long_titles_are_truncated() {
        let question = format!("Should I {}?", "a".repeat(80));
        let title = derive_title(&question);
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS + ELLIPSIS.len());
        assert!(title.ends_with("..."));
        assert!(title.starts_with('A'));
    }

    #[test]
    fn test_exactly_fifty_chars_is_not_truncated() {
        let body = "b".repeat(MAX_TITLE_CHARS);
        let title = derive_title(&body);
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS);
        assert!(!title.ends_with("..."));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let question = "é".repeat(60);
        let title = derive_title(&question);
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS + 3);
        assert!(title.starts_with('É'));
    }

    #[test]
    fn test_bare_phrase_yields_empty_title() {
        assert_eq!(derive_title("Should I?"), "");
        assert_eq!(derive_title("   "), "");
    }
}
