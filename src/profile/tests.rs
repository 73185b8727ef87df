use std::fs;

use serde_json::{Value, json};

use super::*;
use crate::record::{ProfileSource, SellerProfileRecord};
use crate::store::{InMemoryProfileStore, ProfileStore};

fn profile_record(value: Value) -> SellerProfileRecord {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_representative_item_from_best_history_entry() {
    let profile = profile_record(json!({
        "user_id": "aisha",
        "inferred_location_keywords": ["  ", "Austin"],
        "overall_dominant_transaction_type": "lend",
        "sales_history_summary": [
            {"category": "Accessories", "item_examples": ["belt"], "total_items_sold": 64},
            {
                "category": "Apparel",
                "item_examples": ["denim jacket", "tote bag", "scarf", "beanie", "gloves"],
                "total_items_sold": 142,
                "avg_price_per_item": 35.7
            }
        ]
    }));

    let item = build_representative_item(&profile).unwrap();

    assert_eq!(item.schema_type(), Some("FLASH_REQUEST"));
    assert_eq!(item.item_meta.parsed_item(), Some("denim jacket"));
    assert_eq!(item.item_meta.category(), Some("Apparel"));
    assert_eq!(item.item_meta.tags(), ["tote bag", "scarf", "beanie"]);
    assert_eq!(item.transaction.type_preferred(), Some("lend"));
    assert_eq!(item.transaction.type_acceptable(), ["lend"]);
    assert_eq!(item.transaction.price, Some(35.7));
    assert_eq!(item.transaction.price_max, Some(35.7));
    assert_eq!(item.context.urgency(), Some("medium"));
    assert_eq!(item.context.reason(), Some("Derived from seller profile history"));
    assert_eq!(item.context.original_text(), Some("denim jacket; tote bag; scarf"));
    assert_eq!(item.location.text_input(), Some("Austin"));
}

#[test]
fn test_representative_item_tie_keeps_first_entry() {
    let profile = profile_record(json!({
        "sales_history_summary": [
            {"category": "Books", "item_examples": ["novel"], "total_items_sold": 5},
            {"category": "Games", "item_examples": ["chess set"], "total_items_sold": 5}
        ]
    }));

    let item = build_representative_item(&profile).unwrap();
    assert_eq!(item.item_meta.category(), Some("Books"));
}

#[test]
fn test_representative_item_fallbacks() {
    let profile = profile_record(json!({
        "overall_dominant_transaction_type": "swap",
        "sales_history_summary": [
            {"category": "Tickets", "item_examples": ["   "]}
        ]
    }));

    let item = build_representative_item(&profile).unwrap();

    assert_eq!(item.item_meta.parsed_item(), Some("Tickets"));
    assert_eq!(item.transaction.type_preferred(), Some("sell"));
    assert_eq!(item.transaction.price, None);
    assert_eq!(item.context.original_text(), Some("   "));
    assert_eq!(item.location.text_input(), None);
}

#[test]
fn test_representative_item_without_examples_uses_category_text() {
    let profile = profile_record(json!({
        "sales_history_summary": [{"category": "Tickets"}]
    }));

    let item = build_representative_item(&profile).unwrap();

    assert_eq!(item.context.original_text(), Some("Tickets"));
    assert!(item.item_meta.tags().is_empty());
}

#[test]
fn test_representative_item_requires_history() {
    assert!(build_representative_item(&profile_record(json!({"user_id": "x"}))).is_none());
}

#[tokio::test]
async fn test_load_demo_profiles_replaces_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.json");
    fs::write(
        &path,
        json!([
            {
                "user_id": "aisha",
                "raw_text": "eco fashion",
                "parsed_profile": {"user_id": "aisha", "inferred_major": "Design"},
                "representative_item": {"item_meta": {"category": "Apparel"}}
            },
            {"user_id": "ben", "parsed_profile": "not an object"},
            {"user_id": "aisha", "raw_text": "duplicate"}
        ])
        .to_string(),
    )
    .unwrap();

    let store = InMemoryProfileStore::new();
    store
        .put(crate::record::SellerProfile::new(
            "stale",
            SellerProfileRecord::default(),
            None,
            None,
            ProfileSource::Live,
        ))
        .await
        .unwrap();

    let loaded = load_demo_profiles(&store, &path).await.unwrap();

    assert_eq!(loaded, 2);
    assert!(!store.contains("stale").await.unwrap());
    let aisha = store.get("aisha").await.unwrap().unwrap();
    assert_eq!(aisha.source, ProfileSource::Demo);
    assert_eq!(aisha.raw_text.as_deref(), Some("eco fashion"));
    assert_eq!(aisha.item_category(), Some("Apparel"));
    assert_eq!(aisha.metadata, json!({"note": "demo_profile"}));
}

#[tokio::test]
async fn test_load_demo_profiles_missing_file() {
    let store = InMemoryProfileStore::new();
    let result = load_demo_profiles(&store, std::path::Path::new("/nonexistent/demo.json")).await;
    assert!(matches!(result, Err(SeedError::NotFound { .. })));
}

#[tokio::test]
async fn test_builtin_demo_profiles_load() {
    let store = InMemoryProfileStore::new();

    let loaded = load_builtin_demo_profiles(&store).await.unwrap();

    assert_eq!(loaded, 10);
    let listed = store.list().await.unwrap();
    assert_eq!(listed[0].user_id, "sustainable_style_aisha");
    assert!(listed.iter().all(|p| p.source == ProfileSource::Demo));
    assert!(listed.iter().all(|p| p.representative_item.is_some()));

    let mateo = store.get("miami_refurb_mateo").await.unwrap().unwrap();
    assert!(mateo.item_category().is_some());
    assert!(!mateo.parsed_profile.sales_history_summary.is_empty());
}

fn write_sample(dir: &std::path::Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

fn sample(user_id: &str) -> String {
    json!({
        "seller_profile": {
            "user_id": user_id,
            "context": {"original_text": format!("bio of {user_id}")}
        },
        "actual_item": {"item_meta": {"category": "Books"}}
    })
    .to_string()
}

#[tokio::test]
async fn test_seed_synthetic_profiles() {
    let dir = tempfile::tempdir().unwrap();
    write_sample(dir.path(), "003.json", &sample("carol"));
    write_sample(dir.path(), "001.json", &sample("alice"));
    write_sample(dir.path(), "002.json", "{ not json");
    write_sample(dir.path(), "004.json", &json!({"seller_profile": {"user_id": ""}}).to_string());
    write_sample(dir.path(), "005.json", &sample("alice"));
    write_sample(dir.path(), "006.txt", &sample("dave"));

    let store = InMemoryProfileStore::new();
    let loaded = seed_synthetic_profiles(&store, dir.path(), 0).await.unwrap();

    assert_eq!(loaded, 2);
    let ids: Vec<String> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.user_id)
        .collect();
    assert_eq!(ids, vec!["alice", "carol"]);

    let alice = store.get("alice").await.unwrap().unwrap();
    assert_eq!(alice.source, ProfileSource::Synthetic);
    assert_eq!(alice.raw_text.as_deref(), Some("bio of alice"));
    assert_eq!(alice.item_category(), Some("Books"));
    assert!(alice.metadata["seed_path"].as_str().unwrap().ends_with("001.json"));
}

#[tokio::test]
async fn test_seed_synthetic_profiles_limit_and_existing() {
    let dir = tempfile::tempdir().unwrap();
    for (i, user) in ["a", "b", "c", "d"].iter().enumerate() {
        write_sample(dir.path(), &format!("{i:03}.json"), &sample(user));
    }

    let store = InMemoryProfileStore::new();
    assert_eq!(seed_synthetic_profiles(&store, dir.path(), 2).await.unwrap(), 2);
    assert_eq!(seed_synthetic_profiles(&store, dir.path(), 2).await.unwrap(), 2);
    assert_eq!(seed_synthetic_profiles(&store, dir.path(), 2).await.unwrap(), 0);
    assert_eq!(store.len().await.unwrap(), 4);
}

#[tokio::test]
async fn test_seed_synthetic_missing_directory() {
    let store = InMemoryProfileStore::new();
    let loaded = seed_synthetic_profiles(&store, std::path::Path::new("/nonexistent/dir"), 10)
        .await
        .unwrap();
    assert_eq!(loaded, 0);
}
