use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::RecordParser;
use super::error::ParserError;
use crate::record::{SellerProfileRecord, StructuredRecord};

pub const PARSE_REQUEST_PATH: &str = "/api/parse-request";
pub const PARSE_PROFILE_PATH: &str = "/api/parse-profile";

/// [`RecordParser`] backed by the external parsing service.
#[derive(Debug, Clone)]
pub struct HttpRecordParser {
    client: Client,
    base_url: String,
}

impl HttpRecordParser {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ParserError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ParserError::Unavailable(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ParserError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "Calling parsing service");

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let bytes = response.bytes().await.unwrap_or_default();
            let payload = serde_json::from_slice(&bytes).ok();
            warn!(%url, status = status.as_u16(), "Parsing service returned an error");
            return Err(ParserError::Status {
                status: status.as_u16(),
                payload,
            });
        }

        let value: Value = response.json().await?;
        if !value.is_object() {
            return Err(ParserError::InvalidResponse(format!(
                "expected a JSON object, got {value}"
            )));
        }
        serde_json::from_value(value).map_err(|e| ParserError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl RecordParser for HttpRecordParser {
    async fn parse_request(&self, text: &str) -> Result<StructuredRecord, ParserError> {
        self.call(PARSE_REQUEST_PATH, json!({ "text": text })).await
    }

    async fn parse_profile(
        &self,
        text: &str,
        user_id: &str,
    ) -> Result<SellerProfileRecord, ParserError> {
        self.call(PARSE_PROFILE_PATH, json!({ "text": text, "userId": user_id }))
            .await
    }
}
