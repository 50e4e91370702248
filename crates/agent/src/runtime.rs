use std::collections::BTreeMap;

use bakebot_core::config::{AppConfig, ConfigError};
use bakebot_core::{Catalog, CatalogError, IntentCatalog, OrderDraft, OrderExtractor};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::conversation::{DialogueEngine, DialogueError, DialogueSettings, Session};
use crate::selector::RandomSelector;

/// Substitution key under which the rendered menu is exposed to response templates.
pub const MENU_KEY: &str = "menu";

const ORDER_PROMPT: &str =
    "Entendi que você quer comprar. Pode me dizer a **quantidade** e o **sabor**? 🙂";

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Dialogue(#[from] DialogueError),
}

impl ApplicationError {
    /// Stable machine-readable class used in operator output.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_validation",
            Self::Catalog(_) => "catalog_load",
            Self::Dialogue(_) => "dialogue_config",
        }
    }
}

/// Everything a conversation needs, built once at startup and shared read-only by sessions.
#[derive(Debug)]
pub struct AgentRuntime {
    catalog: Catalog,
    menu: String,
    extractor: OrderExtractor,
    engine: DialogueEngine,
    order_flag: String,
    seed: Option<u64>,
}

impl AgentRuntime {
    pub fn bootstrap(config: &AppConfig) -> Result<Self, ApplicationError> {
        info!(
            event_name = "system.bootstrap.start",
            menu_path = %config.catalog.menu_path.display(),
            intents_path = %config.catalog.intents_path.display(),
            "starting assistant bootstrap"
        );
        let catalog = Catalog::load(&config.catalog.menu_path)?;
        let intents = IntentCatalog::load(&config.catalog.intents_path)?;
        info!(
            event_name = "system.bootstrap.catalogs_loaded",
            products = catalog.products().len(),
            intents = intents.intents().len(),
            "catalogs loaded"
        );

        Self::from_parts(catalog, &intents, config)
    }

    pub fn from_parts(
        catalog: Catalog,
        intents: &IntentCatalog,
        config: &AppConfig,
    ) -> Result<Self, ApplicationError> {
        let menu = catalog.render_menu(&config.catalog.menu_header);
        let extractor = OrderExtractor::from_products(catalog.products());
        info!(
            event_name = "system.bootstrap.flavor_index_built",
            entries = extractor.index().len(),
            "flavor index built"
        );
        if extractor.index().is_empty() {
            warn!(
                event_name = "system.bootstrap.flavor_index_empty",
                "catalog has no products; flavors cannot be extracted"
            );
        }

        let data = BTreeMap::from([(MENU_KEY.to_string(), menu.clone())]);
        let settings = DialogueSettings {
            greeting_tag: config.dialogue.greeting_tag.clone(),
            fallback_message: config.dialogue.fallback_message.clone(),
            exit_flag: config.dialogue.exit_flag.clone(),
        };
        let engine = DialogueEngine::new(intents, &data, settings)?;
        info!(event_name = "system.bootstrap.ready", "dialogue engine ready");

        Ok(Self {
            catalog,
            menu,
            extractor,
            engine,
            order_flag: config.dialogue.order_flag.clone(),
            seed: config.dialogue.seed,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn menu(&self) -> &str {
        &self.menu
    }

    pub fn engine(&self) -> &DialogueEngine {
        &self.engine
    }

    pub fn extractor(&self) -> &OrderExtractor {
        &self.extractor
    }

    /// Fresh session; deterministic when a seed is configured.
    pub fn new_session(&self) -> Session {
        match self.seed {
            Some(seed) => Session::seeded(seed),
            None => Session::new(RandomSelector::new()),
        }
    }

    pub fn greet(&self, session: &mut Session) -> Result<String, DialogueError> {
        self.engine.greeting(session)
    }

    /// Bot messages for one user message: the intent reply, followed by an order
    /// acknowledgement when a matched intent leaves the session in the buying state.
    pub fn handle_message(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<Vec<String>, DialogueError> {
        let turn = self.engine.respond_turn(session, text)?;
        let mut messages = vec![turn.reply];

        if turn.intent.is_some() && session.context().is_set(&self.order_flag) {
            messages.push(self.take_order(session, text));
        }
        Ok(messages)
    }

    /// Extracts an order from `text`, stashes it in the session context and reads it
    /// back; asks for quantity and flavor when nothing was recognized.
    pub fn take_order(&self, session: &mut Session, text: &str) -> String {
        let Some(draft) = self.extractor.extract_order(text) else {
            debug!(event_name = "order.not_recognized", "no order entities in message");
            return ORDER_PROMPT.to_string();
        };

        let acknowledgement = draft.acknowledgement();
        debug!(
            event_name = "order.extracted",
            quantity = ?draft.quantity,
            product = ?draft.product,
            "order draft stashed"
        );
        session.context_mut().stash_order(draft);
        acknowledgement
    }

    pub fn extract_order(&self, text: &str) -> Option<OrderDraft> {
        self.extractor.extract_order(text)
    }

    pub fn is_finished(&self, session: &Session) -> bool {
        self.engine.is_finished(session)
    }
}
