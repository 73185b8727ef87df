use std::io::Write;
use std::sync::Arc;

use serde_json::{Map, json};

use super::*;
use crate::encoding::{FeatureEncoder, FeatureSchema};
use crate::lexical::LexicalIndex;
use crate::record::{FlashRequest, ProfileSource, SellerProfile, StructuredRecord};

fn split_tree() -> DecisionTree {
    DecisionTree::new(
        vec![1, -1, -1],
        vec![2, -1, -1],
        vec![0, -2, -2],
        vec![0.5, -2.0, -2.0],
        vec![vec![4.0, 4.0], vec![3.0, 1.0], vec![1.0, 3.0]],
    )
}

fn stump() -> DecisionTree {
    DecisionTree::new(vec![-1], vec![-1], vec![-2], vec![-2.0], vec![vec![1.0, 1.0]])
}

fn forest() -> ForestClassifier {
    ForestClassifier::new(vec![split_tree(), stump()], Some(vec![0, 1]), 2).unwrap()
}

fn encoder(names: &[&str]) -> FeatureEncoder {
    let schema = FeatureSchema::from_names(names.iter().map(|n| n.to_string()).collect()).unwrap();
    FeatureEncoder::new(Arc::new(schema))
}

fn seller(user_id: &str, category: &str, tags: &[&str], bio: &str) -> SellerProfile {
    let parsed = serde_json::from_value(json!({"user_id": user_id})).unwrap();
    let item: StructuredRecord = serde_json::from_value(json!({
        "item_meta": {"parsed_item": "calculator", "category": category, "tags": tags}
    }))
    .unwrap();
    SellerProfile::new(
        user_id,
        parsed,
        Some(bio.to_string()),
        Some(item),
        ProfileSource::Demo,
    )
}

fn flash_request(text: &str, category: Option<&str>, tags: &[&str]) -> FlashRequest {
    let parsed: StructuredRecord = serde_json::from_value(json!({
        "item_meta": {"category": category, "tags": tags}
    }))
    .unwrap();
    FlashRequest::new(text, parsed, Map::new())
}

#[test]
fn test_forest_averages_normalized_leaves() {
    let forest = forest();
    let rows = forest
        .predict_proba(&[vec![1.0, 0.0], vec![0.0, 0.0]])
        .unwrap();

    assert_eq!(rows[0], vec![0.375, 0.625]);
    assert_eq!(rows[1], vec![0.625, 0.375]);
}

#[test]
fn test_forest_threshold_is_inclusive_on_left() {
    let forest = ForestClassifier::new(vec![split_tree()], None, 2).unwrap();
    let rows = forest.predict_proba(&[vec![0.5, 0.0]]).unwrap();

    assert_eq!(rows[0], vec![0.75, 0.25]);
}

#[test]
fn test_forest_rejects_wrong_row_width() {
    let err = forest().predict_proba(&[vec![1.0]]).unwrap_err();
    assert!(matches!(err, ScoringError::InvalidInput { .. }));
}

#[test]
fn test_forest_from_json() {
    let raw = json!({
        "classes": [0, 1],
        "n_features": 2,
        "trees": [{
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [1, -2, -2],
            "threshold": [0.0, -2.0, -2.0],
            "value": [[2, 2], [2, 0], [0, 2]]
        }]
    })
    .to_string();

    let forest = ForestClassifier::from_json(&raw).unwrap();

    assert_eq!(forest.kind(), "RandomForestClassifier");
    assert_eq!(forest.classes(), Some(&[0, 1][..]));
    assert_eq!(forest.n_features(), Some(2));
    assert_eq!(forest.tree_count(), 1);
    assert_eq!(forest.predict_proba(&[vec![0.0, 1.0]]).unwrap()[0], vec![0.0, 1.0]);
}

#[test]
fn test_forest_validation() {
    let cases = [
        (vec![], Some(vec![0, 1]), 2),
        (vec![stump()], Some(vec![]), 2),
        (vec![stump()], Some(vec![0, 1, 2]), 2),
        (vec![split_tree()], Some(vec![0, 1]), 0),
        (
            vec![DecisionTree::new(
                vec![1, -1, -1],
                vec![2, -1, -1],
                vec![3, -2, -2],
                vec![0.5, -2.0, -2.0],
                vec![vec![1.0, 1.0]; 3],
            )],
            None,
            2,
        ),
        (
            vec![DecisionTree::new(
                vec![0, -1],
                vec![1, -1],
                vec![0, -2],
                vec![0.5, -2.0],
                vec![vec![1.0, 1.0]; 2],
            )],
            None,
            2,
        ),
        (
            vec![DecisionTree::new(
                vec![1, -1],
                vec![-1, -1],
                vec![0, -2],
                vec![0.5, -2.0],
                vec![vec![1.0, 1.0]; 2],
            )],
            None,
            2,
        ),
        (
            vec![DecisionTree::new(vec![-1], vec![-1], vec![-2], vec![-2.0], vec![vec![0.0, 0.0]])],
            None,
            2,
        ),
        (
            vec![DecisionTree::new(vec![-1, -1], vec![-1], vec![-2], vec![-2.0], vec![vec![1.0, 1.0]])],
            None,
            2,
        ),
    ];

    for (index, (trees, classes, n_features)) in cases.into_iter().enumerate() {
        let result = ForestClassifier::new(trees, classes, n_features);
        assert!(
            matches!(result, Err(ScoringError::InvalidModel { .. })),
            "case {index} should be rejected"
        );
    }
}

#[test]
fn test_forest_load() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "{}",
        json!({
            "kind": "ExtraTrees",
            "n_features": 1,
            "trees": [{
                "children_left": [-1],
                "children_right": [-1],
                "feature": [-2],
                "threshold": [-2.0],
                "value": [[1, 3]]
            }]
        })
    )
    .unwrap();

    let forest = ForestClassifier::load(file.path()).unwrap();
    assert_eq!(forest.kind(), "ExtraTrees");
    assert_eq!(forest.classes(), None);
    assert_eq!(forest.predict_proba(&[vec![9.0]]).unwrap()[0], vec![0.25, 0.75]);

    let missing = ForestClassifier::load(std::path::Path::new("/nonexistent/model.json"));
    assert!(matches!(missing, Err(ScoringError::ModelNotFound { .. })));
}

#[test]
fn test_forest_load_rejects_malformed_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{\"trees\": 3}}").unwrap();

    let result = ForestClassifier::load(file.path());
    assert!(matches!(result, Err(ScoringError::Parse(_))));
}

#[test]
fn test_resolve_positive_class() {
    assert_eq!(resolve_positive_class(Some(&[0, 1])).unwrap(), 1);
    assert_eq!(resolve_positive_class(Some(&[1, 0])).unwrap(), 0);
    assert_eq!(resolve_positive_class(None).unwrap(), 1);
    assert!(matches!(
        resolve_positive_class(Some(&[0, 2])),
        Err(ScoringError::PositiveClassMissing { .. })
    ));
}

#[test]
fn test_scorer_rejects_feature_count_mismatch() {
    let classifier = Arc::new(ConstantClassifier::new(0.5).with_n_features(3));
    let result = MatchScorer::new(encoder(&["a_x", "b_y"]), classifier);

    assert!(matches!(
        result,
        Err(ScoringError::FeatureCountMismatch {
            expected: 3,
            actual: 2
        })
    ));
}

#[test]
fn test_scorer_reads_positive_column_by_label() {
    let classifier = Arc::new(ConstantClassifier::new(0.3).with_classes(Some(vec![1, 0])));
    let scorer = MatchScorer::new(encoder(&["req_context_urgency_high"]), classifier).unwrap();
    assert_eq!(scorer.positive_class_index(), 0);

    let request = flash_request("calculator", None, &[]);
    let score = scorer
        .score(
            &request.parsed_request,
            &seller("s1", "Electronics", &[], ""),
            HeuristicBoost::default(),
        )
        .unwrap();

    assert_eq!(score.model_probability, 0.3);
    assert_eq!(score.boosted_probability, 0.3);
    assert_eq!(score.boost_applied(), 0.0);
}

#[test]
fn test_scorer_defaults_to_second_column_without_classes() {
    let classifier = Arc::new(ConstantClassifier::new(0.3).with_classes(None));
    let scorer = MatchScorer::new(encoder(&["x_y"]), classifier).unwrap();
    assert_eq!(scorer.positive_class_index(), 1);

    let request = flash_request("anything", None, &[]);
    let score = scorer
        .score(
            &request.parsed_request,
            &seller("s1", "Books", &[], ""),
            HeuristicBoost::default(),
        )
        .unwrap();
    assert_eq!(score.model_probability, 0.3);
}

#[test]
fn test_scorer_reports_activated_features() {
    let classifier = Arc::new(forest_for_schema());
    let scorer = MatchScorer::new(
        encoder(&["req_item_meta_category_Electronics", "item_item_meta_category_Electronics"]),
        classifier,
    )
    .unwrap();

    let request = flash_request("calculator", Some("Electronics"), &[]);
    let score = scorer
        .score(
            &request.parsed_request,
            &seller("s1", "Electronics", &[], ""),
            HeuristicBoost::default(),
        )
        .unwrap();

    let names: Vec<&str> = score.activated.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["req_item_meta_category_Electronics", "item_item_meta_category_Electronics"]
    );
    assert_eq!(score.model_probability, 0.75);
}

fn forest_for_schema() -> ForestClassifier {
    ForestClassifier::new(vec![split_tree()], Some(vec![0, 1]), 2).unwrap()
}

#[test]
fn test_boost_terms_are_capped() {
    let boost = HeuristicBoost {
        keyword_overlap: 7,
        category_match: true,
        tag_overlap: 9,
    };

    assert_eq!(boost.keyword_boost(), 0.25);
    assert_eq!(boost.category_boost(), 0.15);
    assert_eq!(boost.tag_boost(), 0.12);
    assert_eq!(boost.apply(0.9), 0.999);
}

#[test]
fn test_boosted_probability_bounds() {
    let boost = HeuristicBoost {
        keyword_overlap: 2,
        category_match: false,
        tag_overlap: 1,
    };
    let score = MatchScore::new(0.5, boost, Vec::new());

    assert!((score.boosted_probability - 0.64).abs() < 1e-12);
    assert_eq!(score.boost_applied(), 0.14);
    assert_eq!(score.likelihood(), 64.0);

    let capped = MatchScore::new(0.9, boost, Vec::new());
    assert_eq!(capped.boosted_probability, 0.999);
    assert_eq!(capped.boost_applied(), 0.099);
}

#[test]
fn test_boost_for_measures_overlap() {
    let sellers = [
        seller("s1", "electronics ", &["graphing calculator"], "selling a graphing calculator"),
        seller("s2", "Books", &["novel"], "paperback novels"),
    ];
    let index = LexicalIndex::build(&sellers);
    let request = flash_request("need graphing calculator", Some(" Electronics"), &["Graphing"]);
    let signals = RequestSignals::from_request(&request);

    let boost = signals.boost_for(&sellers[0], &index);
    assert_eq!(
        boost,
        HeuristicBoost {
            keyword_overlap: 2,
            category_match: true,
            tag_overlap: 1,
        }
    );

    // Only the shared "calculator" item name overlaps.
    let other = signals.boost_for(&sellers[1], &index);
    assert_eq!(
        other,
        HeuristicBoost {
            keyword_overlap: 1,
            category_match: false,
            tag_overlap: 0,
        }
    );
}

#[test]
fn test_signals_category_override() {
    let request = flash_request("need a lamp", None, &[]);
    let mut signals = RequestSignals::from_request(&request);
    assert_eq!(signals.category(), None);

    signals.set_category(" Furniture ");
    assert_eq!(signals.category(), Some("furniture"));

    signals.set_category("   ");
    assert_eq!(signals.category(), None);
}
