use crate::domain::order::OrderDraft;
use crate::domain::product::Product;
use crate::extract::flavor::extract_flavor;
use crate::extract::flavor_index::FlavorIndex;
use crate::extract::quantity::extract_quantity;
use crate::text::normalize;

/// Turns a free-form utterance into an [`OrderDraft`] using the catalog's flavor index.
#[derive(Clone, Debug, Default)]
pub struct OrderExtractor {
    index: FlavorIndex,
}

impl OrderExtractor {
    pub fn new(index: FlavorIndex) -> Self {
        Self { index }
    }

    pub fn from_products(products: &[Product]) -> Self {
        Self::new(FlavorIndex::build(products))
    }

    pub fn index(&self) -> &FlavorIndex {
        &self.index
    }

    /// Returns `None` when neither a quantity nor a flavor was found.
    pub fn extract_order(&self, text: &str) -> Option<OrderDraft> {
        let normalized = normalize(text);

        let quantity = extract_quantity(&normalized);
        let flavor = extract_flavor(&self.index, &normalized);
        if quantity.is_none() && flavor.is_none() {
            return None;
        }

        let (product, flavor) = match flavor {
            Some(found) => (Some(found.product), Some(found.flavor)),
            None => (None, None),
        };
        Some(OrderDraft { quantity, product, flavor })
    }
}
