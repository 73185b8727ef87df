use std::collections::HashSet;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::schema::FeatureSchema;
use crate::record::{SellerProfileRecord, StructuredRecord};

/// A vector slot the encoder set to a non-zero value.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivatedFeature {
    pub name: String,
    pub value: f32,
}

impl ActivatedFeature {
    pub fn new(name: impl Into<String>, value: f32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Serialized as a `[name, value]` pair.
impl Serialize for ActivatedFeature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.name, self.value).serialize(serializer)
    }
}

/// Output of [`FeatureEncoder::encode`].
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFeatures {
    /// Dense row, `schema.len()` entries in schema order.
    pub vector: Vec<f32>,
    /// Activated features, deduplicated by name in first-occurrence order.
    pub activated: Vec<ActivatedFeature>,
}

/// Encodes (request, seller profile, representative item) triples into the
/// feature row the matching classifier was trained on.
///
/// Encoding never fails: missing groups, wrong types and unseen categories all
/// leave the corresponding slots unset.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: Arc<FeatureSchema>,
}

impl FeatureEncoder {
    pub fn new(schema: Arc<FeatureSchema>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    #[inline]
    pub fn feature_count(&self) -> usize {
        self.schema.len()
    }

    pub fn encode(
        &self,
        request: &StructuredRecord,
        seller_profile: &SellerProfileRecord,
        representative_item: Option<&StructuredRecord>,
    ) -> EncodedFeatures {
        let mut row = RowBuilder::new(&self.schema);

        encode_request(&mut row, request);
        encode_seller_profile(&mut row, seller_profile);

        let empty_item = StructuredRecord::default();
        encode_item(&mut row, representative_item.unwrap_or(&empty_item));

        row.finish()
    }
}

fn encode_request(row: &mut RowBuilder<'_>, request: &StructuredRecord) {
    let meta = &request.item_meta;
    let transaction = &request.transaction;
    let context = &request.context;
    let location = &request.location;

    row.categorical("req_schema_type", request.schema_type());
    row.categorical("req_item_meta_parsed_item", meta.parsed_item());
    row.categorical("req_item_meta_category", meta.category());
    row.multi("req_item_meta_tags", meta.tags());

    row.categorical(
        "req_transaction_type_preferred",
        transaction.type_preferred(),
    );
    row.numeric("req_transaction_price_max", transaction.price_max);

    row.categorical("req_context_urgency", context.urgency());
    row.categorical("req_context_reason", context.reason());
    row.categorical("req_context_original_text", context.original_text());

    row.categorical("req_location_text_input", location.text_input());
    row.numeric("req_location_device_gps_lat", location.lat());
    row.numeric("req_location_device_gps_lng", location.lng());
}

fn encode_seller_profile(row: &mut RowBuilder<'_>, profile: &SellerProfileRecord) {
    row.categorical("sp_schema_type", profile.schema_type());
    row.categorical("sp_user_id", profile.user_id());
    row.categorical("sp_inferred_major", profile.inferred_major());
    row.categorical(
        "sp_overall_dominant_transaction_type",
        profile.overall_dominant_transaction_type(),
    );
    row.categorical("sp_context_original_text", profile.context.original_text());
    row.multi(
        "sp_inferred_location_keywords",
        profile.inferred_location_keywords(),
    );
    row.multi(
        "sp_related_categories_of_interest",
        profile.related_categories_of_interest(),
    );
}

fn encode_item(row: &mut RowBuilder<'_>, item: &StructuredRecord) {
    let meta = &item.item_meta;
    let transaction = &item.transaction;
    let location = &item.location;

    row.categorical("item_schema_type", item.schema_type());
    row.categorical("item_item_meta_parsed_item", meta.parsed_item());
    row.categorical("item_item_meta_category", meta.category());
    row.multi("item_item_meta_tags", meta.tags());

    row.categorical(
        "item_transaction_type_preferred",
        transaction.type_preferred(),
    );
    row.numeric("item_transaction_price_max", transaction.price_max);
    row.numeric("item_transaction_price", transaction.price);

    row.categorical("item_context_original_text", item.context.original_text());

    row.numeric("item_location_device_gps_lat", location.lat());
    row.numeric("item_location_device_gps_lng", location.lng());
    row.categorical("item_location_text_input", location.text_input());
}

struct RowBuilder<'a> {
    schema: &'a FeatureSchema,
    vector: Vec<f32>,
    activated: Vec<ActivatedFeature>,
}

impl<'a> RowBuilder<'a> {
    fn new(schema: &'a FeatureSchema) -> Self {
        Self {
            schema,
            vector: vec![0.0; schema.len()],
            activated: Vec::new(),
        }
    }

    fn set(&mut self, index: usize, value: f32) {
        self.vector[index] = value;
        self.activated
            .push(ActivatedFeature::new(self.schema.names()[index].clone(), value));
    }

    fn numeric(&mut self, name: &str, value: Option<f64>) {
        let Some(index) = self.schema.index_of(name) else {
            return;
        };
        let Some(value) = value.map(|v| v as f32).filter(|v| v.is_finite()) else {
            return;
        };
        self.set(index, value);
    }

    fn categorical(&mut self, prefix: &str, value: Option<&str>) {
        if !self.schema.has_prefix(prefix) {
            return;
        }

        let cleaned = value.map(str::trim).unwrap_or_default();
        if !cleaned.is_empty()
            && let Some(index) = self.schema.index_of(&format!("{prefix}_{cleaned}"))
        {
            self.set(index, 1.0);
            return;
        }

        self.nan_bucket(prefix);
    }

    fn multi(&mut self, prefix: &str, values: &[String]) {
        if !self.schema.has_prefix(prefix) {
            return;
        }

        let items: Vec<&str> = values
            .iter()
            .map(String::as_str)
            .filter(|item| !item.trim().is_empty())
            .collect();

        if items.is_empty() {
            self.nan_bucket(prefix);
            return;
        }

        for item in items {
            self.categorical(prefix, Some(item));
        }
    }

    fn nan_bucket(&mut self, prefix: &str) {
        if let Some(index) = self.schema.nan_index(prefix) {
            self.set(index, 1.0);
        }
    }

    fn finish(self) -> EncodedFeatures {
        let mut seen = HashSet::with_capacity(self.activated.len());
        let activated = self
            .activated
            .into_iter()
            .filter(|feature| seen.insert(feature.name.clone()))
            .collect();

        EncodedFeatures {
            vector: self.vector,
            activated,
        }
    }
}
