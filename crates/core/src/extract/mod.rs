//! Entity extraction for orders.
//!
//! Unlike intent matching, which takes the first rule that fires, the extractors here
//! score every candidate and keep the best one. Unrecognized input is ordinary input:
//! every extractor reports "nothing found" through `Option`, never through an error.

pub mod flavor;
pub mod flavor_index;
pub mod order;
pub mod quantity;

pub use flavor::{extract_flavor, FlavorMatch};
pub use flavor_index::{FlavorIndex, FlavorIndexEntry};
pub use order::OrderExtractor;
pub use quantity::{extract_quantity, SPELLED_NUMBERS};
