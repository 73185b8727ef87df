use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("classifier artifact not found: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to read classifier artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse classifier artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid classifier: {reason}")]
    InvalidModel { reason: String },

    #[error("classifier expects {expected} features, schema has {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    #[error("classifier classes {classes:?} do not include the positive class")]
    PositiveClassMissing { classes: Vec<i64> },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("scoring computation failed: {reason}")]
    ComputationFailed { reason: String },
}
