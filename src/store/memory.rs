use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;

use super::error::StoreError;
use super::{ProfileStore, RequestStore};
use crate::record::{FlashRequest, PingLogEntry, SellerProfile};

/// Process-local [`ProfileStore`].
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<IndexMap<String, SellerProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: impl IntoIterator<Item = SellerProfile>) -> Self {
        let store = Self::new();
        {
            let mut map = store.profiles.write();
            for profile in profiles {
                map.insert(profile.user_id.clone(), profile);
            }
        }
        store
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, user_id: &str) -> Result<Option<SellerProfile>, StoreError> {
        Ok(self.profiles.read().get(user_id).cloned())
    }

    async fn put(&self, profile: SellerProfile) -> Result<(), StoreError> {
        self.profiles
            .write()
            .insert(profile.user_id.clone(), profile);
        Ok(())
    }

    async fn contains(&self, user_id: &str) -> Result<bool, StoreError> {
        Ok(self.profiles.read().contains_key(user_id))
    }

    async fn list(&self) -> Result<Vec<SellerProfile>, StoreError> {
        Ok(self.profiles.read().values().cloned().collect())
    }

    async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.profiles.read().len())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.profiles.write().clear();
        Ok(())
    }
}

/// Process-local [`RequestStore`].
#[derive(Debug, Default)]
pub struct InMemoryRequestStore {
    requests: RwLock<IndexMap<String, FlashRequest>>,
}

impl InMemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    async fn get(&self, id: &str) -> Result<Option<FlashRequest>, StoreError> {
        Ok(self.requests.read().get(id).cloned())
    }

    async fn put(&self, request: FlashRequest) -> Result<(), StoreError> {
        self.requests.write().insert(request.id.clone(), request);
        Ok(())
    }

    async fn append_ping(&self, id: &str, ping: PingLogEntry) -> Result<usize, StoreError> {
        let mut requests = self.requests.write();
        let request = requests
            .get_mut(id)
            .ok_or_else(|| StoreError::RequestNotFound { id: id.to_string() })?;
        request.pings.push(ping);
        Ok(request.pings.len())
    }

    async fn set_category(&self, id: &str, category: &str) -> Result<bool, StoreError> {
        let mut requests = self.requests.write();
        let Some(request) = requests.get_mut(id) else {
            return Ok(false);
        };
        request.parsed_request.item_meta.category = Some(category.to_string());
        Ok(true)
    }

    async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.requests.read().len())
    }
}
