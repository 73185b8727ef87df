//! On-disk artifacts shared by the integration tests.

use std::path::PathBuf;

use serde_json::{Value, json};
use tempfile::TempDir;

use flashmatch::record::StructuredRecord;

pub const CALCULATOR_REQUEST: &str = "need a graphing calculator for my exam";

pub const SCHEMA: [&str; 3] = [
    "req_item_meta_category_Electronics",
    "item_item_meta_category_Electronics",
    "item_item_meta_category_nan",
];

/// Paths to a complete set of artifacts inside a temp dir.
pub struct Artifacts {
    pub dir: TempDir,
    pub schema_path: PathBuf,
    pub model_path: PathBuf,
    pub demo_profiles_path: PathBuf,
    pub identity_path: PathBuf,
    pub synthetic_dir: PathBuf,
}

/// One tree splitting on the seller's item being Electronics:
/// 0.75 positive when it is, 0.25 otherwise.
pub fn forest_json() -> Value {
    json!({
        "kind": "RandomForestClassifier",
        "classes": [0, 1],
        "n_features": SCHEMA.len(),
        "trees": [{
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [1, -2, -2],
            "threshold": [0.5, -2.0, -2.0],
            "value": [[4.0, 4.0], [3.0, 1.0], [1.0, 3.0]]
        }]
    })
}

pub fn demo_profiles_json() -> Value {
    json!([
        {
            "user_id": "maya_patel",
            "raw_text": "TI-84 graphing calculator and laptop chargers",
            "parsed_profile": {
                "user_id": "maya_patel",
                "inferred_major": "Computer Science",
                "inferred_location_keywords": ["North Campus"]
            },
            "representative_item": {"item_meta": {"parsed_item": "calculator", "category": "Electronics"}}
        },
        {
            "user_id": "leo_chen",
            "raw_text": "phone chargers and cables",
            "parsed_profile": {"user_id": "leo_chen"},
            "representative_item": {"item_meta": {"category": "Electronics"}}
        },
        {
            "user_id": "sara_lee",
            "raw_text": "organic chemistry textbook",
            "parsed_profile": {"user_id": "sara_lee", "inferred_major": "Chemistry"},
            "representative_item": {"item_meta": {"category": "Books"}}
        }
    ])
}

pub fn parsed_calculator_request() -> StructuredRecord {
    serde_json::from_value(json!({
        "item_meta": {"parsed_item": "graphing calculator", "category": "Electronics"}
    }))
    .expect("valid request record")
}

pub fn write_artifacts() -> Artifacts {
    let dir = TempDir::new().expect("temp dir");
    let root = dir.path();

    let schema_path = root.join("model_columns.json");
    let model_path = root.join("matchmaker_model.json");
    let demo_profiles_path = root.join("demo_profiles.json");
    let identity_path = root.join("users.json");
    let synthetic_dir = root.join("synthetic");

    std::fs::write(&schema_path, json!(SCHEMA).to_string()).expect("write schema");
    std::fs::write(&model_path, forest_json().to_string()).expect("write model");
    std::fs::write(&demo_profiles_path, demo_profiles_json().to_string())
        .expect("write demo profiles");
    std::fs::write(
        &identity_path,
        json!([{"id": "maya_patel", "name": "Maya P."}]).to_string(),
    )
    .expect("write identities");

    std::fs::create_dir(&synthetic_dir).expect("synthetic dir");
    for (file, user_id, category) in [
        ("sample_001.json", "syn_ava", "Furniture"),
        ("sample_002.json", "syn_ben", "Clothing"),
        ("sample_003.json", "maya_patel", "Electronics"),
    ] {
        let sample = json!({
            "seller_profile": {"user_id": user_id},
            "actual_item": {"item_meta": {"category": category}}
        });
        std::fs::write(synthetic_dir.join(file), sample.to_string()).expect("write sample");
    }
    std::fs::write(synthetic_dir.join("broken.json"), "{not json").expect("write broken");

    Artifacts {
        dir,
        schema_path,
        model_path,
        demo_profiles_path,
        identity_path,
        synthetic_dir,
    }
}
