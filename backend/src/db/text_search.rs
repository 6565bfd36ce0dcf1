//! In-memory full-text matching for the local repository.
//!
//! Follows the behaviour of MongoDB's `$text` operator with the default
//! English language settings, minus stemming:
//!
//! - matching ignores case and diacritics (`gréåsy` finds `Greasy`)
//! - text splits into words at whitespace and punctuation
//! - English stop words never match
//! - plain terms are OR'ed together
//! - `"quoted phrases"` must all appear, and then plain terms are ignored
//! - a term prefixed with `-` excludes documents containing it

use std::collections::HashSet;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over", "own", "same",
    "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Lowercase `text` and strip diacritical marks.
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split `text` into folded words, dropping stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    fold(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty() && !is_stop_word(word))
        .map(str::to_string)
        .collect()
}

/// A parsed `$search` string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextQuery {
    terms: Vec<String>,
    phrases: Vec<String>,
    negated: Vec<String>,
}

impl TextQuery {
    pub fn parse(search: &str) -> Self {
        let mut query = TextQuery::default();
        let mut rest = search;

        while let Some(open) = rest.find('"') {
            query.push_words(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('"') {
                Some(close) => {
                    let phrase = fold(after[..close].trim());
                    if !phrase.is_empty() {
                        query.phrases.push(phrase);
                    }
                    rest = &after[close + 1..];
                }
                // An unterminated quote runs to the end of the string.
                None => {
                    let phrase = fold(after.trim());
                    if !phrase.is_empty() {
                        query.phrases.push(phrase);
                    }
                    rest = "";
                }
            }
        }
        query.push_words(rest);
        query
    }

    fn push_words(&mut self, text: &str) {
        for word in text.split_whitespace() {
            match word.strip_prefix('-') {
                Some(negated) => self.negated.extend(tokenize(negated)),
                None => self.terms.extend(tokenize(word)),
            }
        }
    }

    /// True when the query can never match anything.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.phrases.is_empty()
    }

    /// Check the query against the indexed fields of one document.
    pub fn matches(&self, fields: &[&str]) -> bool {
        if self.is_empty() {
            return false;
        }

        let words: HashSet<String> = fields.iter().flat_map(|f| tokenize(f)).collect();
        if self.negated.iter().any(|w| words.contains(w)) {
            return false;
        }

        if !self.phrases.is_empty() {
            let folded: Vec<String> = fields.iter().map(|f| fold(f)).collect();
            return self
                .phrases
                .iter()
                .all(|phrase| folded.iter().any(|field| field.contains(phrase.as_str())));
        }

        self.terms.iter().any(|t| words.contains(t))
    }
}
