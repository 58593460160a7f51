//! Parsing side of the mention pipeline.
//!
//! Mentions are written as `[Name]` in comment text. Extraction is a pure
//! scan; resolution against registered users happens in the comment service
//! so the parse stays testable without a database.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Bracketed name, no nested brackets.
    static ref MENTION_RE: Regex = Regex::new(r"\[([^\[\]]+)\]").unwrap();
}

/// Extract candidate mention names from comment text, in order of
/// appearance. Repeated tokens yield repeated names; the ledger stage owns
/// de-duplication. Surrounding whitespace inside the brackets is trimmed.
pub fn extract_mention_names(text: &str) -> Vec<String> {
    MENTION_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let name = caps[1].trim();
            if name.is_empty() {
                None
            } else {
                Some(name.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(extract_mention_names("").is_empty());
    }

    #[test]
    fn test_text_without_brackets_yields_nothing() {
        assert!(extract_mention_names("no mentions here, sorry").is_empty());
    }

    #[test]
    fn test_single_mention() {
        assert_eq!(extract_mention_names("I agree [Bob]"), vec!["Bob"]);
    }

    #[test]
    fn test_multiple_mentions_keep_order() {
        assert_eq!(
            extract_mention_names("[Alice] please loop in [Bob] and [Carol]"),
            vec!["Alice", "Bob", "Carol"]
        );
    }

    #[test]
    fn test_repeated_tokens_yield_repeats() {
        assert_eq!(
            extract_mention_names("[Bob] again [Bob]"),
            vec!["Bob", "Bob"]
        );
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(extract_mention_names("hey [  Bob ]"), vec!["Bob"]);
    }

    #[test]
    fn test_names_with_spaces() {
        assert_eq!(
            extract_mention_names("cc [Mary Jane Watson]"),
            vec!["Mary Jane Watson"]
        );
    }

    #[test]
    fn test_empty_brackets_are_skipped() {
        assert!(extract_mention_names("weird [] token [  ]").is_empty());
    }

    #[test]
    fn test_nested_brackets_do_not_match_outer() {
        // Inner pair still parses; the outer pair is not a valid token.
        assert_eq!(extract_mention_names("[[Bob]]"), vec!["Bob"]);
    }
}
