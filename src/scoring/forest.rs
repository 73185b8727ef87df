use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::classifier::Classifier;
use super::error::ScoringError;

/// Child index marking a leaf node.
pub const LEAF: i64 = -1;

const DEFAULT_KIND: &str = "RandomForestClassifier";

fn default_kind() -> String {
    DEFAULT_KIND.to_string()
}

/// One fitted decision tree in array form.
///
/// Node `i` is a leaf when `children_left[i] == children_right[i] == -1`;
/// otherwise rows with `x[feature[i]] <= threshold[i]` go left.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<Vec<f64>>,
}

impl DecisionTree {
    pub fn new(
        children_left: Vec<i64>,
        children_right: Vec<i64>,
        feature: Vec<i64>,
        threshold: Vec<f64>,
        value: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            children_left,
            children_right,
            feature,
            threshold,
            value,
        }
    }

    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn validate(&self, tree: usize, n_features: usize, n_classes: usize) -> Result<(), ScoringError> {
        let invalid = |reason: String| ScoringError::InvalidModel {
            reason: format!("tree {tree}: {reason}"),
        };

        let nodes = self.node_count();
        if nodes == 0 {
            return Err(invalid("no nodes".into()));
        }
        if self.children_right.len() != nodes
            || self.feature.len() != nodes
            || self.threshold.len() != nodes
            || self.value.len() != nodes
        {
            return Err(invalid("node arrays differ in length".into()));
        }

        for node in 0..nodes {
            let (left, right) = (self.children_left[node], self.children_right[node]);

            if left == LEAF || right == LEAF {
                if left != right {
                    return Err(invalid(format!("node {node} has a single child")));
                }
                let distribution = &self.value[node];
                if distribution.len() != n_classes {
                    return Err(invalid(format!(
                        "leaf {node} has {} class weights, expected {n_classes}",
                        distribution.len()
                    )));
                }
                if distribution.iter().any(|w| !w.is_finite() || *w < 0.0)
                    || distribution.iter().sum::<f64>() <= 0.0
                {
                    return Err(invalid(format!("leaf {node} has no usable class weights")));
                }
                continue;
            }

            // Children always follow their parent, which also rules out cycles.
            for child in [left, right] {
                let valid = usize::try_from(child).is_ok_and(|c| c > node && c < nodes);
                if !valid {
                    return Err(invalid(format!("node {node} has invalid child {child}")));
                }
            }
            if !usize::try_from(self.feature[node]).is_ok_and(|f| f < n_features) {
                return Err(invalid(format!(
                    "node {node} splits on unknown feature {}",
                    self.feature[node]
                )));
            }
            if self.threshold[node].is_nan() {
                return Err(invalid(format!("node {node} has a NaN threshold")));
            }
        }

        Ok(())
    }

    /// Normalized class distribution of the leaf `row` falls into.
    fn leaf_distribution(&self, row: &[f32]) -> Vec<f64> {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            // Indices were range-checked in `validate`.
            let feature = self.feature[node] as usize;
            let next = if f64::from(row[feature]) <= self.threshold[node] {
                self.children_left[node]
            } else {
                self.children_right[node]
            };
            node = next as usize;
        }

        let weights = &self.value[node];
        let total: f64 = weights.iter().sum();
        weights.iter().map(|w| w / total).collect()
    }
}

#[derive(Debug, Deserialize)]
struct ForestArtifact {
    #[serde(default = "default_kind")]
    kind: String,
    #[serde(default)]
    classes: Option<Vec<i64>>,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

/// Random-forest classifier loaded from a JSON export of fitted trees.
///
/// Probabilities are the mean of each tree's normalized leaf distribution.
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    kind: String,
    classes: Option<Vec<i64>>,
    n_features: usize,
    n_classes: usize,
    trees: Vec<DecisionTree>,
}

impl ForestClassifier {
    pub fn new(
        trees: Vec<DecisionTree>,
        classes: Option<Vec<i64>>,
        n_features: usize,
    ) -> Result<Self, ScoringError> {
        Self::from_parts(default_kind(), trees, classes, n_features)
    }

    fn from_parts(
        kind: String,
        trees: Vec<DecisionTree>,
        classes: Option<Vec<i64>>,
        n_features: usize,
    ) -> Result<Self, ScoringError> {
        if trees.is_empty() {
            return Err(ScoringError::InvalidModel {
                reason: "forest has no trees".into(),
            });
        }
        if n_features == 0 {
            return Err(ScoringError::InvalidModel {
                reason: "n_features must be positive".into(),
            });
        }

        let n_classes = match &classes {
            Some(classes) if classes.is_empty() => {
                return Err(ScoringError::InvalidModel {
                    reason: "class list is empty".into(),
                });
            }
            Some(classes) => classes.len(),
            None => trees[0].value.first().map(Vec::len).unwrap_or_default(),
        };
        if n_classes == 0 {
            return Err(ScoringError::InvalidModel {
                reason: "cannot determine class count".into(),
            });
        }

        for (index, tree) in trees.iter().enumerate() {
            tree.validate(index, n_features, n_classes)?;
        }

        Ok(Self {
            kind,
            classes,
            n_features,
            n_classes,
            trees,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, ScoringError> {
        let artifact: ForestArtifact = serde_json::from_str(raw)?;
        Self::from_parts(
            artifact.kind,
            artifact.trees,
            artifact.classes,
            artifact.n_features,
        )
    }

    pub fn load(path: &Path) -> Result<Self, ScoringError> {
        if !path.exists() {
            return Err(ScoringError::ModelNotFound {
                path: path.to_path_buf(),
            });
        }

        let raw = std::fs::read_to_string(path)?;
        let forest = Self::from_json(&raw)?;

        info!(
            path = %path.display(),
            trees = forest.tree_count(),
            n_features = forest.n_features,
            n_classes = forest.n_classes,
            "Loaded forest classifier"
        );
        Ok(forest)
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    fn predict_row(&self, row: &[f32]) -> Vec<f64> {
        let mut totals = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (total, p) in totals.iter_mut().zip(tree.leaf_distribution(row)) {
                *total += p;
            }
        }

        let count = self.trees.len() as f64;
        totals.iter().map(|total| total / count).collect()
    }
}

impl Classifier for ForestClassifier {
    fn predict_proba(&self, rows: &[Vec<f32>]) -> Result<Vec<Vec<f64>>, ScoringError> {
        rows.iter()
            .map(|row| {
                if row.len() != self.n_features {
                    return Err(ScoringError::InvalidInput {
                        reason: format!(
                            "row has {} features, classifier expects {}",
                            row.len(),
                            self.n_features
                        ),
                    });
                }
                Ok(self.predict_row(row))
            })
            .collect()
    }

    fn classes(&self) -> Option<&[i64]> {
        self.classes.as_deref()
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }
}
