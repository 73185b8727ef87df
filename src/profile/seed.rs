use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use super::error::SeedError;
use crate::record::{ProfileSource, SellerProfile, SellerProfileRecord, StructuredRecord, lenient};
use crate::store::ProfileStore;

/// One entry of the demo profile file.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoProfile {
    pub user_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub raw_text: Option<String>,
    #[serde(default, deserialize_with = "lenient::group")]
    pub parsed_profile: SellerProfileRecord,
    #[serde(default, deserialize_with = "lenient::optional_group")]
    pub representative_item: Option<StructuredRecord>,
}

impl DemoProfile {
    pub fn into_profile(self) -> SellerProfile {
        SellerProfile::new(
            self.user_id,
            self.parsed_profile,
            self.raw_text,
            self.representative_item,
            ProfileSource::Demo,
        )
        .with_metadata(json!({ "note": "demo_profile" }))
    }
}

/// A generated training sample: a seller and the item they actually offered.
#[derive(Debug, Deserialize)]
struct SyntheticSample {
    #[serde(default, deserialize_with = "lenient::optional_group")]
    seller_profile: Option<SellerProfileRecord>,
    #[serde(default, deserialize_with = "lenient::optional_group")]
    actual_item: Option<StructuredRecord>,
}

/// Demo seller profiles bundled into the binary, used when no demo file is
/// configured.
pub const BUILTIN_DEMO_PROFILES: &str = include_str!("../../data/demo_profiles.json");

/// Replaces the store's contents with the demo profiles in `path`.
///
/// Later duplicates of a user id are ignored. Returns the number stored.
pub async fn load_demo_profiles(store: &dyn ProfileStore, path: &Path) -> Result<usize, SeedError> {
    if !path.exists() {
        return Err(SeedError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let raw = tokio::fs::read_to_string(path).await?;
    let inserted = replace_with_demo_profiles(store, &raw).await?;

    info!(path = %path.display(), profiles = inserted, "Loaded demo profiles");
    Ok(inserted)
}

/// Replaces the store's contents with [`BUILTIN_DEMO_PROFILES`].
pub async fn load_builtin_demo_profiles(store: &dyn ProfileStore) -> Result<usize, SeedError> {
    let inserted = replace_with_demo_profiles(store, BUILTIN_DEMO_PROFILES).await?;
    info!(profiles = inserted, "Loaded built-in demo profiles");
    Ok(inserted)
}

async fn replace_with_demo_profiles(store: &dyn ProfileStore, raw: &str) -> Result<usize, SeedError> {
    let entries: Vec<DemoProfile> = serde_json::from_str(raw)?;

    store.clear().await?;

    let mut seen = HashSet::new();
    let mut inserted = 0;
    for entry in entries {
        if !seen.insert(entry.user_id.clone()) {
            continue;
        }
        store.put(entry.into_profile()).await?;
        inserted += 1;
    }

    Ok(inserted)
}

async fn sample_paths(dir: &Path) -> Result<Vec<PathBuf>, SeedError> {
    let mut paths = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Adds synthetic profiles from the `*.json` samples in `dir`, in file-name
/// order.
///
/// Unreadable files, samples without a seller user id and ids already in the
/// store are skipped. Stops after `limit` profiles; `0` means no limit. A
/// missing directory loads nothing.
pub async fn seed_synthetic_profiles(
    store: &dyn ProfileStore,
    dir: &Path,
    limit: usize,
) -> Result<usize, SeedError> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "Synthetic profile directory not found");
        return Ok(0);
    }

    let mut loaded = 0;
    for path in sample_paths(dir).await? {
        let sample: SyntheticSample = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(sample) => sample,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Skipping malformed sample");
                    continue;
                }
            },
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Skipping unreadable sample");
                continue;
            }
        };

        let Some(parsed) = sample.seller_profile else {
            continue;
        };
        let Some(user_id) = parsed.user_id().filter(|id| !id.is_empty()).map(str::to_string)
        else {
            continue;
        };
        if store.contains(&user_id).await? {
            continue;
        }

        let raw_text = parsed.context.original_text().map(str::to_string);
        let profile = SellerProfile::new(
            user_id,
            parsed,
            raw_text,
            sample.actual_item,
            ProfileSource::Synthetic,
        )
        .with_metadata(json!({ "seed_path": path.display().to_string() }));
        store.put(profile).await?;

        loaded += 1;
        if limit > 0 && loaded >= limit {
            break;
        }
    }

    info!(dir = %dir.display(), loaded, "Seeded synthetic profiles");
    Ok(loaded)
}
