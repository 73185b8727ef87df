use std::path::Path;

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::IdentityError;

/// A user id and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: String,
    pub name: String,
}

#[async_trait]
/// Source of user display names.
pub trait IdentityStore: Send + Sync {
    /// Display name of `user_id`, or `None` if the user is unknown.
    async fn lookup_name(&self, user_id: &str) -> Result<Option<String>, IdentityError>;
    /// Up to `limit` known users.
    async fn list_names(&self, limit: usize) -> Result<Vec<IdentityRecord>, IdentityError>;
}

/// Process-local [`IdentityStore`], optionally loaded from a JSON array of
/// `{id, name}` objects.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    names: RwLock<IndexMap<String, String>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = IdentityRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.insert(record.id, record.name);
        }
        store
    }

    pub fn load(path: &Path) -> Result<Self, IdentityError> {
        if !path.exists() {
            return Err(IdentityError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let raw = std::fs::read_to_string(path)?;
        let records: Vec<IdentityRecord> = serde_json::from_str(&raw)?;
        let store = Self::with_records(records);

        info!(path = %path.display(), users = store.len(), "Loaded identity records");
        Ok(store)
    }

    /// Records a name; blank names are ignored.
    pub fn insert(&self, id: impl Into<String>, name: impl Into<String>) {
        let name = name.into();
        if name.trim().is_empty() {
            return;
        }
        self.names.write().insert(id.into(), name.trim().to_string());
    }

    pub fn len(&self) -> usize {
        self.names.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.read().is_empty()
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn lookup_name(&self, user_id: &str) -> Result<Option<String>, IdentityError> {
        Ok(self.names.read().get(user_id).cloned())
    }

    async fn list_names(&self, limit: usize) -> Result<Vec<IdentityRecord>, IdentityError> {
        Ok(self
            .names
            .read()
            .iter()
            .take(limit)
            .map(|(id, name)| IdentityRecord {
                id: id.clone(),
                name: name.clone(),
            })
            .collect())
    }
}
