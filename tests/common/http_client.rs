//! HTTP client helpers for tests.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    async fn read(resp: reqwest::Response) -> Result<Value, TestClientError> {
        match resp.status().as_u16() {
            200 => Ok(resp.json().await?),
            400 | 422 => Err(TestClientError::BadRequest(resp.text().await?)),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(TestClientError::UnexpectedStatus(status, body))
            }
        }
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/health")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    pub async fn create_request(
        &self,
        text: &str,
        metadata: Option<Value>,
    ) -> Result<Value, TestClientError> {
        let mut body = json!({ "text": text });
        if let Some(metadata) = metadata {
            body["metadata"] = metadata;
        }

        let resp = self
            .client
            .post(self.url("/api/flash-requests"))
            .json(&body)
            .send()
            .await?;
        Self::read(resp).await
    }

    pub async fn get_request(&self, id: &str) -> Result<Value, TestClientError> {
        let resp = self
            .client
            .get(self.url(&format!("/api/flash-requests/{id}")))
            .send()
            .await?;
        Self::read(resp).await
    }

    pub async fn matches(&self, id: &str) -> Result<Value, TestClientError> {
        let resp = self
            .client
            .get(self.url(&format!("/api/flash-requests/{id}/matches")))
            .send()
            .await?;
        Self::read(resp).await
    }

    pub async fn list_profiles(&self) -> Result<Value, TestClientError> {
        let resp = self.client.get(self.url("/api/profiles")).send().await?;
        Self::read(resp).await
    }

    pub async fn seed_profiles(&self, limit: Option<usize>) -> Result<Value, TestClientError> {
        let path = match limit {
            Some(limit) => format!("/api/profiles/seed?limit={limit}"),
            None => "/api/profiles/seed".to_string(),
        };
        let resp = self.client.post(self.url(&path)).send().await?;
        Self::read(resp).await
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: String,
    pub profiles: usize,
    pub requests: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_url_building() {
        let client = TestClient::new("http://localhost:8080");
        assert_eq!(client.url("/health"), "http://localhost:8080/health");
        assert_eq!(client.url("health"), "http://localhost:8080/health");
    }
}
