use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::RecordParser;
use super::error::ParserError;
use crate::record::{SellerProfileRecord, StructuredRecord};

/// Canned-response [`RecordParser`]. Unknown inputs fail as if the service
/// were down.
#[derive(Debug, Default)]
pub struct MockRecordParser {
    requests: RwLock<HashMap<String, StructuredRecord>>,
    profiles: RwLock<HashMap<String, SellerProfileRecord>>,
}

impl MockRecordParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request(self, text: impl Into<String>, record: StructuredRecord) -> Self {
        self.requests.write().insert(text.into(), record);
        self
    }

    /// Registers the profile returned for `user_id`, whatever the text.
    pub fn with_profile(self, user_id: impl Into<String>, record: SellerProfileRecord) -> Self {
        self.profiles.write().insert(user_id.into(), record);
        self
    }
}

#[async_trait]
impl RecordParser for MockRecordParser {
    async fn parse_request(&self, text: &str) -> Result<StructuredRecord, ParserError> {
        self.requests
            .read()
            .get(text)
            .cloned()
            .ok_or_else(|| ParserError::Unavailable(format!("no canned request for {text:?}")))
    }

    async fn parse_profile(
        &self,
        _text: &str,
        user_id: &str,
    ) -> Result<SellerProfileRecord, ParserError> {
        self.profiles
            .read()
            .get(user_id)
            .cloned()
            .ok_or_else(|| ParserError::Unavailable(format!("no canned profile for {user_id}")))
    }
}
