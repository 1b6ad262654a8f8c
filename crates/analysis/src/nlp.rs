use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static WORD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z']+").expect("word pattern"));

static ALPHA_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{Alphabetic}']+").expect("alphabetic pattern"));

const CLITIC_SUFFIXES: &[&str] = &["'s", "'re", "'ll", "'ve", "'d", "'m"];

const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "and", "a", "an", "to", "of", "in", "on", "for", "with", "at", "by", "from", "is", "am",
    "are", "was", "were", "be", "been", "being", "do", "does", "did", "have", "has", "had", "will",
    "would", "can", "could", "should", "shall", "may", "you", "u", "i", "im", "i'm", "me", "my",
    "mine", "we", "our", "ours", "he", "she", "it", "they", "them", "their", "theirs", "his",
    "her", "hers", "this", "that", "these", "those", "here", "there", "then", "than", "so", "but",
    "or", "if", "as", "because", "when", "while", "what", "which", "who", "how", "why", "like",
    "really", "just", "literally", "kinda", "sorta", "maybe", "probably", "thing", "things",
    "stuff", "okay", "ok", "yeah", "yep", "nope",
];

/// Case-insensitive stopword filter for English chat text.
#[derive(Debug, Clone)]
pub struct Stopwords {
    stopwords: HashSet<String>,
}

impl Stopwords {
    /// Create a filter with the default chat stopword list.
    pub fn new() -> Self {
        Self::with_custom_list(DEFAULT_STOPWORDS.iter().copied())
    }

    /// Create a filter from a custom list.
    pub fn with_custom_list<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stopwords: stopwords
                .into_iter()
                .map(|word| word.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Default list plus `extra` words.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::new();
        filter
            .stopwords
            .extend(extra.into_iter().map(|word| word.as_ref().to_lowercase()));
        filter
    }

    /// Check if a word is a stopword, ignoring case.
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word) || self.stopwords.contains(&word.to_lowercase())
    }

    /// Filter stopwords from a list of words.
    pub fn filter_stopwords(&self, words: Vec<String>) -> Vec<String> {
        words
            .into_iter()
            .filter(|word| !self.is_stopword(word))
            .collect()
    }

    /// Lowercased letter/apostrophe runs of `text`, stopwords removed.
    pub fn content_words(&self, text: &str) -> Vec<String> {
        self.filter_stopwords(word_tokens(text))
    }

    /// Lowercased alphabetic tokens of `text`, stopwords removed.
    pub fn content_alpha_tokens(&self, text: &str) -> Vec<String> {
        self.filter_stopwords(alpha_tokens(text))
    }
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::new()
    }
}

/// Maximal runs of ASCII letters and apostrophes, lowercased.
pub fn word_tokens(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Purely alphabetic words, lowercased.
///
/// Words are split on anything but letters and apostrophes. Clitics such as
/// `'s` or `'ll` are stripped from their host word; negated contractions
/// (`don't`, `won't`) and any other word still holding an apostrophe are
/// dropped rather than split into fragments.
pub fn alpha_tokens(text: &str) -> Vec<String> {
    ALPHA_PATTERN
        .find_iter(text)
        .filter_map(|m| {
            let word = m.as_str().trim_matches('\'').to_lowercase();
            if word.ends_with("n't") {
                return None;
            }
            let host = CLITIC_SUFFIXES
                .iter()
                .find_map(|suffix| word.strip_suffix(suffix))
                .unwrap_or(&word);
            (!host.is_empty() && host.chars().all(char::is_alphabetic)).then(|| host.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_tokens_keep_apostrophes() {
        assert_eq!(
            word_tokens("I'm NOT going, y'all!! 42x"),
            vec!["i'm", "not", "going", "y'all", "x"]
        );
    }

    #[test]
    fn alpha_tokens_split_on_digits() {
        assert_eq!(alpha_tokens("stop2go Café"), vec!["stop", "go", "café"]);
    }

    #[test]
    fn alpha_tokens_never_emit_contraction_fragments() {
        assert_eq!(
            alpha_tokens("I don't know, can't come, won't call, didn't see"),
            vec!["i", "know", "come", "call", "see"]
        );
        assert_eq!(
            alpha_tokens("Sam's pizza, we'll see, 'cause dogs' o'clock"),
            vec!["sam", "pizza", "we", "see", "cause", "dogs"]
        );
    }

    #[test]
    fn stopwords_ignore_case() {
        let stopwords = Stopwords::new();
        assert!(stopwords.is_stopword("The"));
        assert!(stopwords.is_stopword("the"));
        assert!(stopwords.is_stopword("THE"));
        assert!(!stopwords.is_stopword("theatre"));
    }

    #[test]
    fn content_words_drop_stopwords() {
        let stopwords = Stopwords::new();
        assert_eq!(
            stopwords.content_words("The cat and THE hat, I'm sure"),
            vec!["cat", "hat", "sure"]
        );
    }

    #[test]
    fn extra_stopwords_extend_defaults() {
        let stopwords = Stopwords::with_extra(["LOL"]);
        assert!(stopwords.is_stopword("lol"));
        assert!(stopwords.is_stopword("the"));
    }
}
