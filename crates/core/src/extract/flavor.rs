use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::extract::flavor_index::{FlavorIndex, FlavorIndexEntry};
use crate::text::word_tokens;

/// Points per keyword shared between an index entry and the utterance.
const KEYWORD_WEIGHT: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorMatch {
    pub product: String,
    pub flavor: String,
}

/// Picks the catalog entry that best matches already normalized text.
///
/// An entry earns the character length of its phrase when the phrase appears verbatim,
/// plus a fixed weight per shared keyword. Ties keep the earlier catalog entry; a best
/// score of zero means no match.
pub fn extract_flavor(index: &FlavorIndex, normalized_text: &str) -> Option<FlavorMatch> {
    let tokens = word_tokens(normalized_text).into_iter().collect::<HashSet<_>>();

    let mut best: Option<&FlavorIndexEntry> = None;
    let mut best_score = 0usize;
    for entry in index.entries() {
        let score = score_entry(entry, normalized_text, &tokens);
        if score > best_score {
            best_score = score;
            best = Some(entry);
        }
    }

    best.map(|entry| FlavorMatch {
        product: entry.display_name.clone(),
        flavor: entry.phrase.clone(),
    })
}

fn score_entry(entry: &FlavorIndexEntry, normalized_text: &str, tokens: &HashSet<&str>) -> usize {
    let mut score = 0;
    if !entry.phrase.is_empty() && normalized_text.contains(entry.phrase.as_str()) {
        score += entry.phrase.chars().count();
    }
    let shared_keywords =
        entry.keywords.iter().filter(|keyword| tokens.contains(keyword.as_str())).count();
    score + shared_keywords * KEYWORD_WEIGHT
}
