use serde::{Deserialize, Serialize};

/// A dialogue rule: trigger phrases, candidate replies and optional context gating.
///
/// An empty `context_filter` or `context_set` behaves exactly like an absent one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub tag: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    pub responses: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_filter: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_set: Vec<String>,
}

impl Intent {
    pub fn new(tag: impl Into<String>, patterns: &[&str], responses: &[&str]) -> Self {
        Self {
            tag: tag.into(),
            patterns: patterns.iter().map(|pattern| pattern.to_string()).collect(),
            responses: responses.iter().map(|response| response.to_string()).collect(),
            context_filter: Vec::new(),
            context_set: Vec::new(),
        }
    }

    pub fn with_context_filter(mut self, flags: &[&str]) -> Self {
        self.context_filter = flags.iter().map(|flag| flag.to_string()).collect();
        self
    }

    pub fn with_context_set(mut self, flags: &[&str]) -> Self {
        self.context_set = flags.iter().map(|flag| flag.to_string()).collect();
        self
    }

    pub fn is_gated(&self) -> bool {
        !self.context_filter.is_empty()
    }

    pub fn sets_context(&self) -> bool {
        !self.context_set.is_empty()
    }
}
