use std::collections::{BTreeMap, BTreeSet, HashSet};

use bakebot_core::{preprocess, Intent, IntentCatalog, OrderDraft};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::selector::{RandomSelector, ResponseSelector};
use crate::templates::ResponseTemplates;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DialogueError {
    #[error("greeting intent `{tag}` is missing from the intent catalog")]
    MissingGreetingIntent { tag: String },
    #[error("intent `{tag}` has no responses")]
    NoResponses { tag: String },
    #[error("response template `{template}` failed: {message}")]
    Template { template: String, message: String },
}

/// Live dialogue state: the set of true flags plus the order draft taken in this state.
///
/// There is no merge and no per-flag removal. [`ConversationContext::replace`] swaps the
/// whole state, dropping every other flag and any stashed order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversationContext {
    flags: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    order: Option<OrderDraft>,
}

impl ConversationContext {
    pub fn is_set(&self, flag: &str) -> bool {
        self.flags.get(flag).copied().unwrap_or(false)
    }

    pub fn all_set<'a>(&self, flags: impl IntoIterator<Item = &'a String>) -> bool {
        flags.into_iter().all(|flag| self.is_set(flag))
    }

    pub fn replace<'a>(&mut self, flags: impl IntoIterator<Item = &'a String>) {
        self.flags = flags.into_iter().map(|flag| (flag.clone(), true)).collect();
        self.order = None;
    }

    pub fn active_flags(&self) -> Vec<&str> {
        self.flags.iter().filter(|(_, set)| **set).map(|(flag, _)| flag.as_str()).collect()
    }

    pub fn stash_order(&mut self, order: OrderDraft) {
        self.order = Some(order);
    }

    pub fn order(&self) -> Option<&OrderDraft> {
        self.order.as_ref()
    }
}

/// One conversation: its context and the source of response choices.
pub struct Session {
    context: ConversationContext,
    selector: Box<dyn ResponseSelector + Send>,
}

impl Session {
    pub fn new(selector: impl ResponseSelector + Send + 'static) -> Self {
        Self { context: ConversationContext::default(), selector: Box::new(selector) }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(RandomSelector::seeded(seed))
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ConversationContext {
        &mut self.context
    }

    fn pick(&mut self, candidates: usize) -> usize {
        self.selector.pick(candidates).min(candidates.saturating_sub(1))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(RandomSelector::new())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("context", &self.context).finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogueSettings {
    pub greeting_tag: String,
    pub fallback_message: String,
    pub exit_flag: String,
}

impl Default for DialogueSettings {
    fn default() -> Self {
        Self {
            greeting_tag: "apresentacao".to_string(),
            fallback_message: "Desculpe, não entendi.".to_string(),
            exit_flag: "desligar".to_string(),
        }
    }
}

/// Result of one turn. `intent` is `None` when the fallback message was used.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub intent: Option<String>,
    pub reply: String,
}

#[derive(Clone, Debug)]
struct CompiledIntent {
    /// Catalog position; tags are not unique, so templates are keyed by this.
    position: usize,
    intent: Intent,
    pattern_tokens: BTreeSet<String>,
}

impl CompiledIntent {
    fn new(position: usize, intent: &Intent) -> Self {
        let pattern_tokens = preprocess(&intent.patterns.join(" ")).into_iter().collect();
        Self { position, intent: intent.clone(), pattern_tokens }
    }

    fn matches(&self, input_tokens: &HashSet<String>) -> bool {
        self.pattern_tokens.iter().any(|token| input_tokens.contains(token))
    }
}

/// First-match intent engine gated by context flags.
///
/// Intents are tried in catalog order; the first one whose pattern words overlap the
/// input's words wins. There is no scoring across intents.
#[derive(Debug)]
pub struct DialogueEngine {
    intents: Vec<CompiledIntent>,
    templates: ResponseTemplates,
    settings: DialogueSettings,
}

impl DialogueEngine {
    pub fn new(
        catalog: &IntentCatalog,
        data: &BTreeMap<String, String>,
        settings: DialogueSettings,
    ) -> Result<Self, DialogueError> {
        if catalog.find(&settings.greeting_tag).is_none() {
            return Err(DialogueError::MissingGreetingIntent { tag: settings.greeting_tag });
        }
        if let Some(intent) = catalog.intents().iter().find(|intent| intent.responses.is_empty()) {
            return Err(DialogueError::NoResponses { tag: intent.tag.clone() });
        }

        let templates = ResponseTemplates::compile(catalog.intents(), data)?;
        let intents = catalog
            .intents()
            .iter()
            .enumerate()
            .map(|(position, intent)| CompiledIntent::new(position, intent))
            .collect();

        Ok(Self { intents, templates, settings })
    }

    pub fn settings(&self) -> &DialogueSettings {
        &self.settings
    }

    pub fn intent_count(&self) -> usize {
        self.intents.len()
    }

    /// Opening message of a session, taken from the greeting intent.
    pub fn greeting(&self, session: &mut Session) -> Result<String, DialogueError> {
        let greeting = self
            .intents
            .iter()
            .find(|compiled| compiled.intent.tag == self.settings.greeting_tag)
            .ok_or_else(|| DialogueError::MissingGreetingIntent {
                tag: self.settings.greeting_tag.clone(),
            })?;
        self.render_choice(session, greeting)
    }

    pub fn respond(&self, session: &mut Session, input: &str) -> Result<String, DialogueError> {
        self.respond_turn(session, input).map(|turn| turn.reply)
    }

    pub fn respond_turn(&self, session: &mut Session, input: &str) -> Result<Turn, DialogueError> {
        let input_tokens = preprocess(input).into_iter().collect::<HashSet<_>>();

        for compiled in &self.intents {
            let intent = &compiled.intent;
            if intent.is_gated() && !session.context.all_set(&intent.context_filter) {
                continue;
            }
            if !compiled.matches(&input_tokens) {
                continue;
            }

            let reply = self.render_choice(session, compiled)?;
            if intent.sets_context() {
                session.context.replace(&intent.context_set);
            }
            debug!(
                event_name = "dialogue.intent_matched",
                intent = %intent.tag,
                active_flags = ?session.context.active_flags(),
                "intent matched"
            );
            return Ok(Turn { intent: Some(intent.tag.clone()), reply });
        }

        debug!(
            event_name = "dialogue.fallback",
            token_count = input_tokens.len(),
            "no intent matched"
        );
        Ok(Turn { intent: None, reply: self.settings.fallback_message.clone() })
    }

    /// Whether the session reached the conversation-ending flag.
    pub fn is_finished(&self, session: &Session) -> bool {
        session.context.is_set(&self.settings.exit_flag)
    }

    fn render_choice(
        &self,
        session: &mut Session,
        compiled: &CompiledIntent,
    ) -> Result<String, DialogueError> {
        let responses = &compiled.intent.responses;
        if responses.is_empty() {
            return Err(DialogueError::NoResponses { tag: compiled.intent.tag.clone() });
        }
        let index = session.pick(responses.len());
        self.templates.render(compiled.position, index)
    }
}
