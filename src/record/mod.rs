//! Structured records produced by the parsing service, plus the stored
//! seller-profile and flash-request types built on top of them.
//!
//! Every sub-group is an explicit optional-field struct. Deserialization is
//! lenient (see [`lenient`]): wrong-typed fields become absent and unknown keys
//! are kept in `extra` so a record echoes back unchanged.

pub mod lenient;
pub mod metadata;


pub use metadata::{apply_request_metadata, urgency_from_index};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Category used when the parser fails and the UI supplied none.
pub const FALLBACK_CATEGORY: &str = "Other";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMeta {
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub parsed_item: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::string_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemMeta {
    pub fn parsed_item(&self) -> Option<&str> {
        self.parsed_item.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub type_preferred: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::string_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub type_acceptable: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_max: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Transaction {
    pub fn type_preferred(&self) -> Option<&str> {
        self.type_preferred.as_deref()
    }

    pub fn type_acceptable(&self) -> &[String] {
        self.type_acceptable.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordContext {
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub urgency: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub reason: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecordContext {
    pub fn urgency(&self) -> Option<&str> {
        self.urgency.as_deref()
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn original_text(&self) -> Option<&str> {
        self.original_text.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default, deserialize_with = "lenient::number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub text_input: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_group")]
    pub device_gps: Option<GeoPoint>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Location {
    pub fn text_input(&self) -> Option<&str> {
        self.text_input.as_deref()
    }

    pub fn lat(&self) -> Option<f64> {
        self.device_gps.and_then(|gps| gps.lat)
    }

    pub fn lng(&self) -> Option<f64> {
        self.device_gps.and_then(|gps| gps.lng)
    }
}

/// A parsed flash request or a representative item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredRecord {
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub schema_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::group")]
    pub item_meta: ItemMeta,
    #[serde(default, deserialize_with = "lenient::group")]
    pub transaction: Transaction,
    #[serde(default, deserialize_with = "lenient::group")]
    pub context: RecordContext,
    #[serde(default, deserialize_with = "lenient::group")]
    pub location: Location,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StructuredRecord {
    /// Minimal record used when the parsing service cannot be reached.
    pub fn fallback(category: &str) -> Self {
        Self {
            item_meta: ItemMeta {
                category: Some(category.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn schema_type(&self) -> Option<&str> {
        self.schema_type.as_deref()
    }

    /// The item category with surrounding whitespace removed, if non-empty.
    pub fn trimmed_category(&self) -> Option<&str> {
        self.item_meta
            .category()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesHistoryEntry {
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub item_examples: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_items_sold: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_price_per_item: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub dominant_transaction_type_in_category: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SalesHistoryEntry {
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn item_examples(&self) -> &[String] {
        self.item_examples.as_deref().unwrap_or_default()
    }

    pub fn total_items_sold(&self) -> f64 {
        self.total_items_sold.unwrap_or(0.0)
    }
}

/// A parsed seller bio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SellerProfileRecord {
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub schema_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::group")]
    pub context: RecordContext,
    #[serde(
        default,
        deserialize_with = "lenient::string_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_keywords: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub inferred_major: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::string_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub inferred_location_keywords: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::object_list")]
    pub sales_history_summary: Vec<SalesHistoryEntry>,
    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub overall_dominant_transaction_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::string_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub related_categories_of_interest: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SellerProfileRecord {
    pub fn schema_type(&self) -> Option<&str> {
        self.schema_type.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn inferred_major(&self) -> Option<&str> {
        self.inferred_major.as_deref()
    }

    pub fn overall_dominant_transaction_type(&self) -> Option<&str> {
        self.overall_dominant_transaction_type.as_deref()
    }

    pub fn profile_keywords(&self) -> &[String] {
        self.profile_keywords.as_deref().unwrap_or_default()
    }

    pub fn inferred_location_keywords(&self) -> &[String] {
        self.inferred_location_keywords.as_deref().unwrap_or_default()
    }

    pub fn related_categories_of_interest(&self) -> &[String] {
        self.related_categories_of_interest
            .as_deref()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Where a stored seller profile came from.
pub enum ProfileSource {
    Demo,
    Synthetic,
    Live,
}

impl ProfileSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileSource::Demo => "demo",
            ProfileSource::Synthetic => "synthetic",
            ProfileSource::Live => "live",
        }
    }
}

impl std::fmt::Display for ProfileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A seller profile as held by a [`ProfileStore`](crate::store::ProfileStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerProfile {
    pub user_id: String,
    pub parsed_profile: SellerProfileRecord,
    pub raw_text: Option<String>,
    pub representative_item: Option<StructuredRecord>,
    pub created_at: DateTime<Utc>,
    pub source: ProfileSource,
    pub metadata: Value,
}

impl SellerProfile {
    pub fn new(
        user_id: impl Into<String>,
        parsed_profile: SellerProfileRecord,
        raw_text: Option<String>,
        representative_item: Option<StructuredRecord>,
        source: ProfileSource,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            parsed_profile,
            raw_text,
            representative_item,
            created_at: Utc::now(),
            source,
            metadata: Value::Object(Map::new()),
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Category of the representative item, if any.
    pub fn item_category(&self) -> Option<&str> {
        self.representative_item
            .as_ref()
            .and_then(|item| item.item_meta.category())
    }
}

/// One entry of a flash request's ping log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingLogEntry {
    pub match_ids: Vec<String>,
    pub broadcast_type: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl PingLogEntry {
    pub fn new(match_ids: Vec<String>, broadcast_type: Option<String>) -> Self {
        Self {
            match_ids,
            broadcast_type,
            timestamp: Utc::now(),
        }
    }
}

/// A submitted flash request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashRequest {
    pub id: String,
    pub raw_text: String,
    pub parsed_request: StructuredRecord,
    pub created_at: DateTime<Utc>,
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub pings: Vec<PingLogEntry>,
}

impl FlashRequest {
    /// Creates a request with a fresh UUID v4 identifier.
    pub fn new(
        raw_text: impl Into<String>,
        parsed_request: StructuredRecord,
        metadata: Map<String, Value>,
    ) -> Self {
        Self::with_id(
            uuid::Uuid::new_v4().to_string(),
            raw_text,
            parsed_request,
            metadata,
        )
    }

    pub fn with_id(
        id: impl Into<String>,
        raw_text: impl Into<String>,
        parsed_request: StructuredRecord,
        metadata: Map<String, Value>,
    ) -> Self {
        Self {
            id: id.into(),
            raw_text: raw_text.into(),
            parsed_request,
            created_at: Utc::now(),
            metadata,
            pings: Vec::new(),
        }
    }
}
