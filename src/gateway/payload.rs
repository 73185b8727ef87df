use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::{ProfileSource, SellerProfile, SellerProfileRecord, StructuredRecord};

#[derive(Debug, Deserialize)]
pub struct FlashRequestCreate {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub struct SellerProfileCreate {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingMatchesRequest {
    #[serde(default)]
    pub match_ids: Vec<String>,
    #[serde(default)]
    pub broadcast_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: String,
    pub profiles: usize,
    pub requests: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashRequestView {
    pub success: bool,
    pub request_id: String,
    pub request: StructuredRecord,
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PingResponse {
    pub success: bool,
    pub pinged: usize,
    pub broadcast_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCreated {
    pub success: bool,
    pub profile: SellerProfileRecord,
    pub representative_item: Option<StructuredRecord>,
    pub total_profiles: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub user_id: String,
    pub source: ProfileSource,
    pub created_at: DateTime<Utc>,
    pub inferred_major: Option<String>,
    pub dominant_transaction_type: Option<String>,
}

impl From<&SellerProfile> for ProfileSummary {
    fn from(profile: &SellerProfile) -> Self {
        let parsed = &profile.parsed_profile;
        Self {
            user_id: profile.user_id.clone(),
            source: profile.source,
            created_at: profile.created_at,
            inferred_major: parsed.inferred_major().map(str::to_string),
            dominant_transaction_type: parsed
                .overall_dominant_transaction_type()
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileList {
    pub success: bool,
    pub profiles: Vec<ProfileSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedResponse {
    pub success: bool,
    pub loaded: usize,
    pub total_profiles: usize,
}
