use bakebot_core::config::AppConfig;
use bakebot_core::Catalog;

use super::{CommandResult, EXIT_BOOTSTRAP};

pub fn run(config: &AppConfig) -> CommandResult {
    match Catalog::load(&config.catalog.menu_path) {
        Ok(catalog) => CommandResult::plain(catalog.render_menu(&config.catalog.menu_header)),
        Err(error) => {
            CommandResult::failure("menu", "catalog_load", error.to_string(), EXIT_BOOTSTRAP)
        }
    }
}
