//! Core of the bakery ordering assistant: domain records, the Portuguese text pipeline,
//! the catalog-derived flavor index, order entity extraction and configuration.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod extract;
pub mod text;

pub use catalog::{Catalog, IntentCatalog};
pub use domain::intent::Intent;
pub use domain::order::OrderDraft;
pub use domain::product::Product;
pub use errors::CatalogError;
pub use extract::{extract_flavor, extract_quantity, FlavorIndex, FlavorMatch, OrderExtractor};
pub use text::{normalize, preprocess};
