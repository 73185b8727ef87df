use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::join_all;
use moka::sync::Cache;
use tracing::{debug, info, warn};

use super::error::IdentityError;
use super::store::IdentityStore;

pub const UNKNOWN_SELLER: &str = "Unknown Seller";

/// Display name derived from a user id: `_` and `-` become spaces and each
/// word is capitalized.
pub fn format_display_name(user_id: &str) -> String {
    let formatted = user_id
        .replace(['_', '-'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    if formatted.is_empty() {
        UNKNOWN_SELLER.to_string()
    } else {
        formatted
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Read-through cache of display names in front of an [`IdentityStore`].
///
/// Entries never expire. Lookups that fail or miss leave no entry, so the
/// next prefetch retries them.
pub struct NameCache {
    names: Cache<String, String>,
    store: Arc<dyn IdentityStore>,
}

impl std::fmt::Debug for NameCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameCache")
            .field("entries", &self.names.entry_count())
            .finish()
    }
}

impl NameCache {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self {
            names: Cache::builder().build(),
            store,
        }
    }

    /// Loads up to `limit` names from the store.
    pub async fn prewarm(&self, limit: usize) -> Result<usize, IdentityError> {
        let records = self.store.list_names(limit).await?;
        let count = records.len();
        for record in records {
            self.names.insert(record.id, record.name);
        }

        info!(names = count, "Pre-warmed display name cache");
        Ok(count)
    }

    /// Looks up every uncached id concurrently and returns how many resolved.
    ///
    /// A failed lookup is logged and treated as a miss.
    pub async fn prefetch<S: AsRef<str>>(&self, user_ids: &[S]) -> usize {
        let mut seen = HashSet::new();
        let pending: Vec<&str> = user_ids
            .iter()
            .map(AsRef::as_ref)
            .filter(|id| !id.is_empty() && !self.names.contains_key(*id))
            .filter(|id| seen.insert(*id))
            .collect();

        if pending.is_empty() {
            return 0;
        }

        let lookups = pending.iter().map(|id| async move {
            let result = self.store.lookup_name(id).await;
            (*id, result)
        });

        let mut resolved = 0;
        for (user_id, result) in join_all(lookups).await {
            match result {
                Ok(Some(name)) => {
                    self.names.insert(user_id.to_string(), name);
                    resolved += 1;
                }
                Ok(None) => {}
                Err(e) => warn!(user_id, error = %e, "Display name lookup failed"),
            }
        }

        debug!(requested = pending.len(), resolved, "Prefetched display names");
        resolved
    }

    /// Cached name, else the formatted id.
    pub fn display_name(&self, user_id: &str) -> String {
        if user_id.is_empty() {
            return UNKNOWN_SELLER.to_string();
        }
        self.names
            .get(user_id)
            .unwrap_or_else(|| format_display_name(user_id))
    }

    pub fn insert(&self, user_id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(user_id.into(), name.into());
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.names.contains_key(user_id)
    }
}
