use std::sync::OnceLock;

use regex::Regex;

use crate::text::normalize::normalize;
use crate::text::stopwords::is_stopword;

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\w+").expect("word pattern is valid"))
}

/// Maximal runs of word characters, in order. Does not normalize.
pub fn word_tokens(text: &str) -> Vec<&str> {
    word_pattern().find_iter(text).map(|token| token.as_str()).collect()
}

/// Normalizes `text`, splits it into words and drops stopwords.
///
/// Order and duplicates are preserved.
pub fn preprocess(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    word_tokens(&normalized)
        .into_iter()
        .filter(|token| !is_stopword(token))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{preprocess, word_tokens};

    #[test]
    fn word_tokens_ignore_symbols_between_words() {
        assert_eq!(word_tokens("quero 6 🍰 bolos"), vec!["quero", "6", "bolos"]);
    }

    #[test]
    fn preprocess_normalizes_and_drops_stopwords() {
        assert_eq!(
            preprocess("Quero um Bolo de Maçã, por favor!"),
            vec!["quero", "bolo", "maca", "favor"]
        );
    }

    #[test]
    fn preprocess_keeps_order_and_duplicates() {
        assert_eq!(preprocess("oi oi Olá"), vec!["oi", "oi", "ola"]);
    }

    #[test]
    fn only_stopwords_yields_nothing() {
        assert!(preprocess("de que para com").is_empty());
    }
}
