use std::sync::LazyLock;

use regex::Regex;

static LOCATION_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:in|at)\s+(.+)$").ok());

/// Pick the location phrase out of a free-text query.
///
/// The first `in <phrase>` or `at <phrase>` captures everything up to the end
/// of the text; without one, the whole trimmed text is the phrase.
pub fn extract_location_phrase(text: &str) -> &str {
    let text = text.trim();
    LOCATION_PATTERN
        .as_ref()
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|phrase| !phrase.is_empty())
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_in_phrase() {
        assert_eq!(extract_location_phrase("deforestation in Mangalore"), "Mangalore");
    }

    #[test]
    fn test_at_phrase_is_greedy() {
        assert_eq!(
            extract_location_phrase("urban change at Lake Tahoe, California since 2019"),
            "Lake Tahoe, California since 2019"
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(extract_location_phrase("Floods IN Kerala"), "Kerala");
    }

    #[test]
    fn test_word_boundary() {
        // "within" must not trigger the pattern
        assert_eq!(extract_location_phrase("Nairobi"), "Nairobi");
        assert_eq!(extract_location_phrase("changes within Lagos"), "changes within Lagos");
    }

    #[test]
    fn test_no_preposition_uses_whole_text() {
        assert_eq!(extract_location_phrase("  Amazon basin  "), "Amazon basin");
    }

    #[test]
    fn test_dangling_preposition_uses_whole_text() {
        assert_eq!(extract_location_phrase("what changed in"), "what changed in");
    }

    proptest! {
        #[test]
        fn prop_phrase_is_substring(text in "[a-zA-Z ,]{0,40}") {
            let phrase = extract_location_phrase(&text);
            prop_assert!(text.contains(phrase));
        }
    }
}
