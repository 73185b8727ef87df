/// A fitted probabilistic classifier over encoded feature rows.
pub trait Classifier: Send + Sync {
    /// One probability row per input row, ordered like [`classes`](Self::classes).
    fn predict_proba(&self, rows: &[Vec<f32>]) -> Result<Vec<Vec<f64>>, super::ScoringError>;

    /// Class labels in output order, when the model records them.
    fn classes(&self) -> Option<&[i64]>;

    /// Short model family name reported in debug payloads.
    fn kind(&self) -> &str;

    /// Expected input width, when the model records it.
    fn n_features(&self) -> Option<usize>;
}
