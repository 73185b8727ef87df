use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("flash request not found: {id}")]
    RequestNotFound { id: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
