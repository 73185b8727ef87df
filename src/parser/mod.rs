//! Client for the external free-text parsing service.

pub mod error;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


use async_trait::async_trait;

use crate::record::{SellerProfileRecord, StructuredRecord};

pub use error::ParserError;
pub use http::HttpRecordParser;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockRecordParser;

#[async_trait]
/// Turns free text into structured records.
pub trait RecordParser: Send + Sync {
    /// Parses a flash request.
    async fn parse_request(&self, text: &str) -> Result<StructuredRecord, ParserError>;
    /// Parses a seller bio.
    async fn parse_profile(
        &self,
        text: &str,
        user_id: &str,
    ) -> Result<SellerProfileRecord, ParserError>;
}
