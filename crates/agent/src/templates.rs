use std::borrow::Cow;
use std::collections::BTreeMap;
use std::error::Error as _;
use std::sync::OnceLock;

use bakebot_core::Intent;
use regex::{Captures, Regex};
use tera::{Context, Tera};

use crate::conversation::DialogueError;

/// Compiled response templates for every intent, rendered against shared data such as
/// the menu block. Both `{{ menu }}` and the single-brace `{menu}` form are accepted.
///
/// Templates are keyed by the intent's catalog position, since tags may repeat.
/// Construction renders each template once, so syntax errors and references to keys
/// missing from the shared data surface at startup instead of mid-conversation.
#[derive(Debug)]
pub struct ResponseTemplates {
    tera: Tera,
    context: Context,
    tags: Vec<String>,
}

impl ResponseTemplates {
    pub fn compile(
        intents: &[Intent],
        data: &BTreeMap<String, String>,
    ) -> Result<Self, DialogueError> {
        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());

        let sources = intents
            .iter()
            .enumerate()
            .flat_map(|(position, intent)| {
                intent.responses.iter().enumerate().map(move |(index, response)| {
                    (template_name(position, index), expand_single_braces(response).into_owned())
                })
            })
            .collect::<Vec<_>>();
        tera.add_raw_templates(sources).map_err(|error| DialogueError::Template {
            template: "<catalog>".to_string(),
            message: describe(&error),
        })?;

        let mut context = Context::new();
        for (key, value) in data {
            context.insert(key.as_str(), value);
        }

        let tags = intents.iter().map(|intent| intent.tag.clone()).collect();
        let templates = Self { tera, context, tags };
        for (position, intent) in intents.iter().enumerate() {
            for index in 0..intent.responses.len() {
                templates.render(position, index)?;
            }
        }
        Ok(templates)
    }

    /// Renders response `index` of the intent at catalog `position`.
    pub fn render(&self, position: usize, index: usize) -> Result<String, DialogueError> {
        self.tera.render(&template_name(position, index), &self.context).map_err(|error| {
            DialogueError::Template {
                template: self.label(position, index),
                message: describe(&error),
            }
        })
    }

    fn label(&self, position: usize, index: usize) -> String {
        match self.tags.get(position) {
            Some(tag) => format!("{tag}#{index}"),
            None => format!("<intent {position}>#{index}"),
        }
    }
}

fn template_name(position: usize, index: usize) -> String {
    format!("{position}#{index}")
}

fn placeholder_pattern() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"(?s)\{\{.*?\}\}|\{%.*?%\}|\{#.*?#\}|\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}")
            .expect("placeholder pattern is valid")
    })
}

/// Rewrites `{key}` into `{{ key }}`; existing tera tags are left untouched.
fn expand_single_braces(response: &str) -> Cow<'_, str> {
    placeholder_pattern().replace_all(response, |captures: &Captures<'_>| match captures.get(1) {
        Some(key) => format!("{{{{ {} }}}}", key.as_str()),
        None => captures[0].to_string(),
    })
}

fn describe(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
