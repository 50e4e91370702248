use std::sync::OnceLock;

use regex::Regex;

use crate::text::word_tokens;

/// Spelled-out quantities one through twenty, sorted by ascending value.
///
/// The table is scanned in this order and the first word present wins, so
/// "dez ou doze" reads as 10. Compound numbers ("vinte e dois") are not supported.
pub const SPELLED_NUMBERS: &[(&str, u32)] = &[
    ("um", 1),
    ("uma", 1),
    ("dois", 2),
    ("duas", 2),
    ("tres", 3),
    ("quatro", 4),
    ("cinco", 5),
    ("seis", 6),
    ("sete", 7),
    ("oito", 8),
    ("nove", 9),
    ("dez", 10),
    ("onze", 11),
    ("doze", 12),
    ("treze", 13),
    ("quatorze", 14),
    ("catorze", 14),
    ("quinze", 15),
    ("dezesseis", 16),
    ("dezessete", 17),
    ("dezoito", 18),
    ("dezenove", 19),
    ("vinte", 20),
];

fn half_dozen_pattern() -> &'static Regex {
    static HALF_DOZEN: OnceLock<Regex> = OnceLock::new();
    HALF_DOZEN
        .get_or_init(|| Regex::new(r"\bmeia\s+d[uú]zia\b").expect("half dozen pattern is valid"))
}

fn dozen_pattern() -> &'static Regex {
    static DOZEN: OnceLock<Regex> = OnceLock::new();
    DOZEN.get_or_init(|| Regex::new(r"\b(um|uma)\s+d[uú]zia\b").expect("dozen pattern is valid"))
}

fn digits_pattern() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"\b([0-9]{1,2})\b").expect("digits pattern is valid"))
}

/// Finds the requested quantity in already normalized text.
///
/// Checked in order: "meia dúzia" (6), "uma dúzia" (12), the first standalone one or
/// two digit number, then [`SPELLED_NUMBERS`].
pub fn extract_quantity(normalized_text: &str) -> Option<u32> {
    if half_dozen_pattern().is_match(normalized_text) {
        return Some(6);
    }
    if dozen_pattern().is_match(normalized_text) {
        return Some(12);
    }

    if let Some(quantity) = digits_pattern()
        .captures(normalized_text)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse::<u32>().ok())
    {
        return Some(quantity);
    }

    let words = word_tokens(normalized_text);
    SPELLED_NUMBERS
        .iter()
        .find(|(word, _)| words.contains(word))
        .map(|(_, quantity)| *quantity)
}
