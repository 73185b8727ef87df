use crate::record::{
    ItemMeta, Location, RecordContext, SellerProfileRecord, StructuredRecord, Transaction,
};

pub const REPRESENTATIVE_SCHEMA_TYPE: &str = "FLASH_REQUEST";
pub const DERIVED_REASON: &str = "Derived from seller profile history";
pub const DERIVED_URGENCY: &str = "medium";

const TRANSACTION_TYPES: [&str; 3] = ["sell", "lend", "buy"];
const DEFAULT_TRANSACTION_TYPE: &str = "sell";

/// Synthesizes the item a seller would most plausibly offer, from their
/// best-selling history entry.
///
/// Returns `None` when the profile has no sales history.
pub fn build_representative_item(profile: &SellerProfileRecord) -> Option<StructuredRecord> {
    let history = &profile.sales_history_summary;

    // First entry wins ties.
    let best = history.iter().reduce(|best, entry| {
        if entry.total_items_sold() > best.total_items_sold() {
            entry
        } else {
            best
        }
    })?;

    let category = best.category().unwrap_or_default().to_string();
    let examples = best.item_examples();

    let parsed_item = examples
        .iter()
        .find(|example| !example.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| category.clone());

    let location = profile
        .inferred_location_keywords()
        .iter()
        .find(|keyword| !keyword.trim().is_empty())
        .cloned();

    let dominant = profile
        .overall_dominant_transaction_type()
        .filter(|t| TRANSACTION_TYPES.contains(t))
        .unwrap_or(DEFAULT_TRANSACTION_TYPE)
        .to_string();

    let summary = examples
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("; ");
    let original_text = if summary.is_empty() {
        category.clone()
    } else {
        summary
    };

    let avg_price = best.avg_price_per_item;

    Some(StructuredRecord {
        schema_type: Some(REPRESENTATIVE_SCHEMA_TYPE.to_string()),
        item_meta: ItemMeta {
            parsed_item: Some(parsed_item),
            category: Some(category),
            tags: Some(examples.iter().skip(1).take(3).cloned().collect()),
            ..Default::default()
        },
        transaction: Transaction {
            type_preferred: Some(dominant.clone()),
            type_acceptable: Some(vec![dominant]),
            price: avg_price,
            price_max: avg_price,
            ..Default::default()
        },
        context: RecordContext {
            urgency: Some(DERIVED_URGENCY.to_string()),
            reason: Some(DERIVED_REASON.to_string()),
            original_text: Some(original_text),
            ..Default::default()
        },
        location: Location {
            text_input: location,
            device_gps: None,
            ..Default::default()
        },
        ..Default::default()
    })
}
