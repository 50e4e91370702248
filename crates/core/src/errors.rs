use std::path::PathBuf;

use thiserror::Error;

/// Failures reading the product catalog or the intent catalog.
///
/// Every variant is fatal at startup: callers must not attempt partial recovery.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: serde_json::Error },
    #[error("could not parse catalog document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog validation failed: {0}")]
    Validation(String),
}

impl CatalogError {
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Parse(source) => Self::ParseFile { path: path.into(), source },
            other => other,
        }
    }
}
