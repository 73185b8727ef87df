//! UI wizard metadata applied on top of a parsed flash request.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::StructuredRecord;
use super::lenient::{as_number, is_truthy};

/// Maps the wizard's urgency slider index to the parser's urgency labels.
pub fn urgency_from_index(index: i64) -> Option<&'static str> {
    match index {
        0 => Some("immediate"),
        1 => Some("high"),
        2 => Some("medium"),
        3 => Some("low"),
        _ => None,
    }
}

/// Overrides parsed fields with explicit wizard choices.
///
/// Recognised keys: `detectedCategory` (or `category`), `quantity`, `when`,
/// `location`, `urgency` (slider index) and `priceMax`. Unusable values are
/// ignored.
pub fn apply_request_metadata(
    mut parsed: StructuredRecord,
    metadata: &Map<String, Value>,
) -> StructuredRecord {
    if metadata.is_empty() {
        return parsed;
    }

    let category =
        truthy_str(metadata, "detectedCategory").or_else(|| truthy_str(metadata, "category"));
    if let Some(category) = category {
        parsed.item_meta.category = Some(category.to_string());
    }

    if let Some(quantity) = metadata.get("quantity").filter(|v| is_truthy(v)) {
        let quantity = match quantity {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let mut tags: BTreeSet<String> = parsed.item_meta.tags().iter().cloned().collect();
        tags.insert(format!("quantity:{quantity}"));
        parsed.item_meta.tags = Some(tags.into_iter().collect());
    }

    if let Some(when) = truthy_str(metadata, "when") {
        parsed.context.reason = Some(when.to_string());
    }

    if let Some(location) = truthy_str(metadata, "location") {
        parsed.location.text_input = Some(location.to_string());
    }

    if let Some(label) = metadata
        .get("urgency")
        .and_then(urgency_index)
        .and_then(urgency_from_index)
    {
        parsed.context.urgency = Some(label.to_string());
    }

    if let Some(price_max) = metadata.get("priceMax").and_then(as_number) {
        parsed.transaction.price_max = Some(price_max);
    }

    parsed
}

fn truthy_str<'a>(metadata: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    metadata
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn urgency_index(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
