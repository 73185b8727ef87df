use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::encoding::ActivatedFeature;
use crate::record::{ProfileSource, SellerProfileRecord, StructuredRecord};

/// Ranked matches for one flash request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub success: bool,
    pub request_id: String,
    pub request: StructuredRecord,
    pub matches: Vec<MatchEntry>,
    pub debug: ResponseDebug,
}

impl MatchResponse {
    /// Response for a stored request whose matching failed: no matches and
    /// the error in the debug block.
    pub fn degraded(
        request_id: impl Into<String>,
        request: StructuredRecord,
        error: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            request_id: request_id.into(),
            request,
            matches: Vec::new(),
            debug: ResponseDebug {
                model: None,
                request_metadata: None,
                generated_at: Utc::now(),
                error: Some(error.into()),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEntry {
    pub user: MatchUser,
    /// Boosted probability as a percentage, one decimal.
    pub likelihood: f64,
    pub distance_min: f64,
    pub shared_traits: Vec<String>,
    pub debug: MatchDebug,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchUser {
    pub id: String,
    pub name: String,
    pub major: String,
    pub dorm: String,
    pub verified: bool,
    pub rating: f64,
    pub trust_score: u32,
    pub past_trades: u32,
    pub badges: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDebug {
    /// Boosted probability.
    pub probability: f64,
    pub model_probability: f64,
    pub activated_features: Vec<ActivatedFeature>,
    pub representative_item: Option<StructuredRecord>,
    pub seller_profile: SellerProfileRecord,
    pub source: ProfileSource,
    pub heuristics: HeuristicsDebug,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeuristicsDebug {
    pub keyword_overlap: usize,
    pub category_match: bool,
    pub tag_overlap: usize,
    pub boost_applied: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDebug {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelDebug>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_metadata: Option<Map<String, Value>>,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDebug {
    #[serde(rename = "type")]
    pub kind: String,
    pub positive_class_index: usize,
    pub feature_count: usize,
    pub artifact: String,
}
