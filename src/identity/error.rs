use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read identity file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse identity file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("identity lookup failed for {user_id}: {reason}")]
    LookupFailed { user_id: String, reason: String },
}
