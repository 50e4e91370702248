use serde::{Deserialize, Serialize};

/// Partial order extracted from a single utterance. Fields that were not found stay `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
}

impl OrderDraft {
    /// Short confirmation sentence read back to the customer.
    pub fn acknowledgement(&self) -> String {
        let quantity = self.quantity.map(|quantity| format!("{quantity}x ")).unwrap_or_default();
        let product = match (&self.product, &self.flavor) {
            (Some(product), _) => product.clone(),
            (None, Some(flavor)) => format!("bolo de {}", title_case(flavor)),
            (None, None) => "bolo".to_string(),
        };
        format!("Anotei: {quantity}{product}. Confere?")
    }
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::OrderDraft;

    #[test]
    fn acknowledgement_prefers_catalog_product_name() {
        let draft = OrderDraft {
            quantity: Some(6),
            product: Some("Bolo de Chocolate".to_string()),
            flavor: Some("chocolate".to_string()),
        };
        assert_eq!(draft.acknowledgement(), "Anotei: 6x Bolo de Chocolate. Confere?");
    }

    #[test]
    fn acknowledgement_without_product_uses_flavor_or_generic_cake() {
        let flavor_only =
            OrderDraft { flavor: Some("doce de leite".to_string()), ..OrderDraft::default() };
        assert_eq!(flavor_only.acknowledgement(), "Anotei: bolo de Doce De Leite. Confere?");

        let quantity_only = OrderDraft { quantity: Some(12), ..OrderDraft::default() };
        assert_eq!(quantity_only.acknowledgement(), "Anotei: 12x bolo. Confere?");
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let draft = OrderDraft { quantity: Some(3), ..OrderDraft::default() };
        assert_eq!(serde_json::to_string(&draft).expect("serialize"), r#"{"quantity":3}"#);
    }
}
