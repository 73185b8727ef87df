use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a feature schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("feature schema not found at {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read feature schema: {0}")]
    Io(#[from] std::io::Error),

    #[error("feature schema is not a JSON array of strings: {0}")]
    InvalidFormat(#[from] serde_json::Error),

    #[error("feature schema is empty")]
    Empty,

    #[error("duplicate feature name '{name}' at index {index}")]
    DuplicateFeature { name: String, index: usize },
}
