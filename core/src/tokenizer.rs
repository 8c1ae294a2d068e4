use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Fixed stop-word list applied after lower-casing.
pub const STOP_WORDS: &[&str] = &["the", "is", "at", "which", "on", "and", "a", "an", "of", "in", "to", "for"];

lazy_static! {
    // Runs of word characters; everything else is a separator.
    static ref WORD: Regex = Regex::new(r"[a-z0-9_]+").expect("valid regex");
    static ref ALPHA: Regex = Regex::new(r"^[a-z]+$").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = STOP_WORDS.iter().copied().collect();
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

fn is_term(fragment: &str) -> bool {
    fragment.len() > 1 && ALPHA.is_match(fragment) && !is_stopword(fragment)
}

/// Tokenize text into terms: lowercase, split on non-word characters, then drop
/// single characters, anything that is not purely alphabetic, and stop words.
/// Order is preserved so repeated terms can be counted.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|fragment| is_term(fragment))
        .map(str::to_owned)
        .collect()
}

/// Same as [`tokenize`], treating missing text as empty.
pub fn tokenize_opt(text: Option<&str>) -> Vec<String> {
    text.map(tokenize).unwrap_or_default()
}
