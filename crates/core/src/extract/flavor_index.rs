use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::text::{is_stopword, normalize, word_tokens};

const CAKE_WORDS: [&str; 2] = ["bolo", "bolos"];

fn cake_prefix_pattern() -> &'static Regex {
    static CAKE_PREFIX: OnceLock<Regex> = OnceLock::new();
    CAKE_PREFIX
        .get_or_init(|| Regex::new(r"\bbolos?\s+de\s+(.+)").expect("cake prefix pattern is valid"))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorIndexEntry {
    /// Product name exactly as shown on the menu.
    pub display_name: String,
    /// Normalized flavor phrase, e.g. `doce de leite` for "Bolo de Doce de Leite".
    pub phrase: String,
    /// Words of `phrase` without stopwords or the word "bolo".
    pub keywords: BTreeSet<String>,
}

impl FlavorIndexEntry {
    pub fn from_product(product: &Product) -> Self {
        let normalized_name = normalize(&product.name);
        let phrase = cake_prefix_pattern()
            .captures(&normalized_name)
            .and_then(|captures| captures.get(1))
            .map(|remainder| remainder.as_str().trim().to_string())
            .unwrap_or_else(|| normalized_name.clone());

        let keywords = word_tokens(&phrase)
            .into_iter()
            .filter(|token| !is_stopword(token) && !CAKE_WORDS.contains(token))
            .map(str::to_string)
            .collect();

        Self { display_name: product.name.clone(), phrase, keywords }
    }
}

/// Flavor lookup table derived once from the catalog; entries keep catalog order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorIndex {
    entries: Vec<FlavorIndexEntry>,
}

impl FlavorIndex {
    pub fn build(products: &[Product]) -> Self {
        Self { entries: products.iter().map(FlavorIndexEntry::from_product).collect() }
    }

    pub fn entries(&self) -> &[FlavorIndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rust_decimal::Decimal;

    use super::{FlavorIndex, FlavorIndexEntry};
    use crate::domain::product::Product;

    fn entry_for(name: &str) -> FlavorIndexEntry {
        FlavorIndexEntry::from_product(&Product::new(name, Decimal::new(2500, 2)))
    }

    fn keywords(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|word| word.to_string()).collect()
    }

    #[test]
    fn single_word_flavor_after_cake_prefix() {
        let entry = entry_for("Bolo de Maçã");
        assert_eq!(entry.display_name, "Bolo de Maçã");
        assert_eq!(entry.phrase, "maca");
        assert_eq!(entry.keywords, keywords(&["maca"]));
    }

    #[test]
    fn connector_words_are_kept_in_phrase_but_not_in_keywords() {
        let entry = entry_for("Bolo de Doce de Leite");
        assert_eq!(entry.phrase, "doce de leite");
        assert_eq!(entry.keywords, keywords(&["doce", "leite"]));
    }

    #[test]
    fn plural_prefix_is_recognized() {
        let entry = entry_for("Bolos de Pote Sortidos");
        assert_eq!(entry.phrase, "pote sortidos");
        assert_eq!(entry.keywords, keywords(&["pote", "sortidos"]));
    }

    #[test]
    fn names_without_prefix_fall_back_to_whole_name() {
        let entry = entry_for("Torta Holandesa");
        assert_eq!(entry.phrase, "torta holandesa");
        assert_eq!(entry.keywords, keywords(&["torta", "holandesa"]));
    }

    #[test]
    fn keywords_never_contain_cake_words_or_stopwords() {
        let entry = entry_for("Chocolate com Bolo");
        assert_eq!(entry.phrase, "chocolate com bolo");
        assert_eq!(entry.keywords, keywords(&["chocolate"]));
    }

    #[test]
    fn index_preserves_catalog_order() {
        let products = vec![
            Product::new("Bolo de Cenoura", Decimal::new(2500, 2)),
            Product::new("Bolo de Chocolate", Decimal::new(3000, 2)),
        ];
        let index = FlavorIndex::build(&products);

        let phrases = index.entries().iter().map(|entry| entry.phrase.as_str()).collect::<Vec<_>>();
        assert_eq!(phrases, vec!["cenoura", "chocolate"]);
        assert_eq!(index.len(), 2);
        assert!(!index.is_empty());
        assert!(FlavorIndex::build(&[]).is_empty());
    }
}
