// Text normalization — lowercase, strip punctuation, collapse whitespace.
//
// Every analysis stage goes through this one normalizer so that the corpus
// the vocabulary counter sees and the tokens the per-post extractor counts
// agree on what a word is.

use std::sync::LazyLock;

use regex::Regex;

/// Anything that is neither a Unicode word character nor whitespace.
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("static regex is valid"));

/// Normalize an optional text field. Missing text becomes `""`.
pub fn normalize(text: Option<&str>) -> String {
    text.map(normalize_str).unwrap_or_default()
}

/// Lowercase `text`, drop punctuation and symbols, and collapse runs of
/// whitespace to single spaces with no leading or trailing space.
pub fn normalize_str(text: &str) -> String {
    let lower = text.to_lowercase();
    let stripped = NON_WORD.replace_all(&lower, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace tokenization of already-normalized text.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(normalize_str("Hello, World!"), "hello world");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize_str("  a \t\n b   c  "), "a b c");
    }

    #[test]
    fn punctuation_only_is_empty() {
        assert_eq!(normalize_str("?!... --- ;;"), "");
    }

    #[test]
    fn missing_text_is_empty() {
        assert_eq!(normalize(None), "");
    }

    #[test]
    fn keeps_underscores_digits_and_accents() {
        assert_eq!(normalize_str("Café_42 rocks!"), "café_42 rocks");
    }

    #[test]
    fn removal_joins_words_without_space() {
        // Apostrophes and hyphens are removed, not replaced by spaces.
        assert_eq!(normalize_str("don't self-host"), "dont selfhost");
    }
}
