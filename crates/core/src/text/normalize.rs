use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical form used for every comparison in the pipeline.
///
/// Lowercases, removes ASCII punctuation, then decomposes to NFD and drops combining
/// marks so that `"Maçã!"` and `"maca"` compare equal.
pub fn normalize(text: &str) -> String {
    // Punctuation is filtered after decomposition: a few code points (U+037E, U+1FEF)
    // decompose into ASCII punctuation.
    text.to_lowercase()
        .nfd()
        .filter(|character| !character.is_ascii_punctuation() && !is_combining_mark(*character))
        .collect()
}
