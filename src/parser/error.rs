use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("parsing service returned status {status}")]
    Status { status: u16, payload: Option<Value> },

    #[error("parsing service is unavailable: {0}")]
    Unavailable(String),

    #[error("parsing service returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl ParserError {
    /// HTTP status to surface to clients: the service's own status when it
    /// answered with an error, otherwise 502.
    pub fn status_code(&self) -> u16 {
        match self {
            ParserError::Status { status, .. } => *status,
            ParserError::Unavailable(_) | ParserError::InvalidResponse(_) => 502,
        }
    }
}

impl From<reqwest::Error> for ParserError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ParserError::InvalidResponse(e.to_string())
        } else {
            ParserError::Unavailable(e.to_string())
        }
    }
}
