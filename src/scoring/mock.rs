use super::classifier::Classifier;
use super::error::ScoringError;

/// Classifier that assigns the same positive-class probability to every row.
#[derive(Debug, Clone)]
pub struct ConstantClassifier {
    probability: f64,
    classes: Option<Vec<i64>>,
    n_features: Option<usize>,
}

impl ConstantClassifier {
    /// Binary classifier with classes `[0, 1]`.
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            classes: Some(vec![0, 1]),
            n_features: None,
        }
    }

    pub fn with_classes(mut self, classes: Option<Vec<i64>>) -> Self {
        self.classes = classes;
        self
    }

    pub fn with_n_features(mut self, n_features: usize) -> Self {
        self.n_features = Some(n_features);
        self
    }
}

impl Classifier for ConstantClassifier {
    fn predict_proba(&self, rows: &[Vec<f32>]) -> Result<Vec<Vec<f64>>, ScoringError> {
        let width = self.classes.as_ref().map_or(2, Vec::len);
        let positive = self
            .classes
            .as_ref()
            .and_then(|classes| classes.iter().position(|c| *c == 1))
            .unwrap_or(1);

        Ok(rows
            .iter()
            .map(|_| {
                let mut row = vec![0.0; width];
                if width == 1 {
                    row[0] = self.probability;
                    return row;
                }
                let rest = (1.0 - self.probability) / (width - 1) as f64;
                for (index, slot) in row.iter_mut().enumerate() {
                    *slot = if index == positive { self.probability } else { rest };
                }
                row
            })
            .collect())
    }

    fn classes(&self) -> Option<&[i64]> {
        self.classes.as_deref()
    }

    fn kind(&self) -> &str {
        "ConstantClassifier"
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }
}
