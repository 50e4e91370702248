use bakebot_core::config::AppConfig;
use bakebot_core::{Catalog, OrderExtractor};

use super::{CommandResult, EXIT_BOOTSTRAP};

/// Prints the order draft found in `text` as JSON, `null` when there is none.
pub fn run(config: &AppConfig, text: &str) -> CommandResult {
    let catalog = match Catalog::load(&config.catalog.menu_path) {
        Ok(catalog) => catalog,
        Err(error) => {
            let message = error.to_string();
            return CommandResult::failure("extract", "catalog_load", message, EXIT_BOOTSTRAP);
        }
    };

    let draft = OrderExtractor::from_products(catalog.products()).extract_order(text);
    match serde_json::to_string(&draft) {
        Ok(json) => CommandResult::plain(json),
        Err(error) => CommandResult::failure("extract", "serialization", error.to_string(), 1),
    }
}
