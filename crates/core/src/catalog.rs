//! Product and intent catalogs, loaded once from JSON at startup.
//!
//! Both loaders fail fast: a missing file, malformed JSON or a record that breaks an
//! invariant aborts loading instead of yielding a partial catalog.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::intent::Intent;
use crate::domain::product::Product;
use crate::errors::CatalogError;

pub const DEFAULT_MENU_HEADER: &str = "🍰 *CARDÁPIO* 🍰";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "produtos", alias = "products")]
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = read_file(path)?;
        Self::from_json(&raw).map_err(|error| error.with_path(path))
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let catalog = serde_json::from_str::<Self>(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Menu block: the header line followed by one `name - R$price` line per product.
    pub fn render_menu(&self, header: &str) -> String {
        let mut lines = Vec::with_capacity(self.products.len() + 1);
        lines.push(header.to_string());
        lines.extend(self.products.iter().map(Product::menu_line));
        lines.join("\n")
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if let Some(position) =
            self.products.iter().position(|product| product.name.trim().is_empty())
        {
            return Err(CatalogError::Validation(format!(
                "product at position {position} has an empty name"
            )));
        }
        if let Some(product) = self.products.iter().find(|product| product.price.is_sign_negative())
        {
            return Err(CatalogError::Validation(format!(
                "product `{}` has a negative price",
                product.name
            )));
        }
        Ok(())
    }
}

/// Ordered intent rules. Order is significant: the first matching intent wins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentCatalog {
    intents: Vec<Intent>,
}

impl IntentCatalog {
    pub fn new(intents: Vec<Intent>) -> Self {
        Self { intents }
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = read_file(path)?;
        Self::from_json(&raw).map_err(|error| error.with_path(path))
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let catalog = serde_json::from_str::<Self>(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    pub fn find(&self, tag: &str) -> Option<&Intent> {
        self.intents.iter().find(|intent| intent.tag == tag)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for (position, intent) in self.intents.iter().enumerate() {
            if intent.tag.trim().is_empty() {
                return Err(CatalogError::Validation(format!(
                    "intent at position {position} has an empty tag"
                )));
            }
            if intent.responses.is_empty() {
                return Err(CatalogError::Validation(format!(
                    "intent `{}` has no responses",
                    intent.tag
                )));
            }
        }
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<String, CatalogError> {
    fs::read_to_string(path)
        .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::{Catalog, IntentCatalog, DEFAULT_MENU_HEADER};
    use crate::domain::product::Product;
    use crate::errors::CatalogError;

    const MENU_JSON: &str = r#"{
        "produtos": [
            {"nome": "Bolo de Cenoura", "preco": 25},
            {"nome": "Bolo de Chocolate", "preco": 30.5}
        ]
    }"#;

    #[test]
    fn menu_lists_products_in_catalog_order_with_two_decimals() {
        let catalog = Catalog::from_json(MENU_JSON).expect("valid menu");
        assert_eq!(
            catalog.render_menu(DEFAULT_MENU_HEADER),
            "🍰 *CARDÁPIO* 🍰\nBolo de Cenoura - R$25.00\nBolo de Chocolate - R$30.50"
        );
    }

    #[test]
    fn empty_catalog_renders_header_only() {
        assert_eq!(Catalog::default().render_menu("MENU"), "MENU");
    }

    #[test]
    fn constructed_catalog_renders_in_insertion_order() {
        let catalog = Catalog::new(vec![
            Product::new("Bolo de Milho", Decimal::new(20, 0)),
            Product::new("Bolo de Fubá", Decimal::new(1850, 2)),
        ]);
        assert_eq!(
            catalog.render_menu("MENU"),
            "MENU\nBolo de Milho - R$20.00\nBolo de Fubá - R$18.50"
        );
    }

    #[test]
    fn missing_products_key_is_fatal() {
        let error = Catalog::from_json(r#"{"itens": []}"#).expect_err("missing key");
        assert!(matches!(error, CatalogError::Parse(_)));
    }

    #[test]
    fn negative_price_is_rejected() {
        let error = Catalog::from_json(r#"{"produtos": [{"nome": "Bolo", "preco": -1}]}"#)
            .expect_err("negative price");
        assert!(error.to_string().contains("negative price"));
    }

    #[test]
    fn load_reports_missing_file_with_path() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("menu.json");

        let error = Catalog::load(&path).expect_err("file does not exist");
        assert!(matches!(error, CatalogError::ReadFile { .. }));
        assert!(error.to_string().contains("menu.json"));
    }

    #[test]
    fn load_reads_intents_in_file_order() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("intents.json");
        fs::write(
            &path,
            r#"{"intents": [
                {"tag": "apresentacao", "patterns": [], "responses": ["Olá! Sou o atendente virtual."]},
                {"tag": "saudacao", "patterns": ["oi", "olá"], "responses": ["Oi!"]},
                {"tag": "sabor", "patterns": ["sabor"], "responses": ["Qual sabor?"],
                 "context_filter": ["comprar"]}
            ]}"#,
        )
        .expect("write intents");

        let catalog = IntentCatalog::load(&path).expect("valid intents");
        let tags = catalog.intents().iter().map(|intent| intent.tag.as_str()).collect::<Vec<_>>();
        assert_eq!(tags, vec!["apresentacao", "saudacao", "sabor"]);
        assert_eq!(
            catalog.find("sabor").map(|intent| intent.context_filter.clone()),
            Some(vec!["comprar".to_string()])
        );
    }

    #[test]
    fn malformed_intent_file_reports_path() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("intents.json");
        fs::write(&path, r#"{"intents": [{"tag": "x"}]}"#).expect("write intents");

        let error = IntentCatalog::load(&path).expect_err("responses are required");
        assert!(matches!(error, CatalogError::ParseFile { .. }));
    }

    #[test]
    fn intent_without_responses_is_rejected() {
        let error =
            IntentCatalog::from_json(r#"{"intents": [{"tag": "x", "patterns": ["a"], "responses": []}]}"#)
                .expect_err("empty responses");
        assert!(error.to_string().contains("`x` has no responses"));
    }
}
