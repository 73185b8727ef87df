use std::collections::HashMap;
use std::path::Path;

use parking_lot::RwLock;
use tracing::info;

use super::error::SchemaError;

/// Suffix of the fallback bucket for a categorical prefix.
pub const NAN_SUFFIX: &str = "nan";

/// Ordered, immutable list of feature names the classifier was trained on.
///
/// Entry `i` of every encoded vector corresponds to `names()[i]`.
#[derive(Debug)]
pub struct FeatureSchema {
    names: Vec<String>,
    index_by_name: HashMap<String, usize>,
    prefix_cache: RwLock<HashMap<String, bool>>,
}

impl FeatureSchema {
    /// Builds a schema from an ordered list of unique names.
    pub fn from_names(names: Vec<String>) -> Result<Self, SchemaError> {
        if names.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut index_by_name = HashMap::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            if index_by_name.insert(name.clone(), index).is_some() {
                return Err(SchemaError::DuplicateFeature {
                    name: name.clone(),
                    index,
                });
            }
        }

        Ok(Self {
            names,
            index_by_name,
            prefix_cache: RwLock::new(HashMap::new()),
        })
    }

    /// Loads a schema from a JSON array of strings.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        if !path.exists() {
            return Err(SchemaError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let raw = std::fs::read_to_string(path)?;
        let names: Vec<String> = serde_json::from_str(&raw)?;
        let schema = Self::from_names(names)?;

        info!(
            path = %path.display(),
            features = schema.len(),
            "Loaded feature schema"
        );
        Ok(schema)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(name).copied()
    }

    /// Returns `true` if any feature name starts with `"{prefix}_"`.
    ///
    /// Memoized per prefix; the schema never changes after construction.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        if let Some(&known) = self.prefix_cache.read().get(prefix) {
            return known;
        }

        let target = format!("{prefix}_");
        let exists = self.names.iter().any(|name| name.starts_with(&target));
        self.prefix_cache.write().insert(prefix.to_string(), exists);
        exists
    }

    /// Index of the `"{prefix}_nan"` bucket, if the schema has one.
    pub fn nan_index(&self, prefix: &str) -> Option<usize> {
        self.index_of(&format!("{prefix}_{NAN_SUFFIX}"))
    }
}
