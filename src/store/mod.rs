//! Seller-profile and flash-request stores.
//!
//! The matching pipeline and gateway only see the [`ProfileStore`] and
//! [`RequestStore`] traits. The in-memory implementations keep insertion
//! order, which is the order profiles are scored in.

pub mod error;
pub mod memory;


use async_trait::async_trait;

use crate::record::{FlashRequest, PingLogEntry, SellerProfile};

pub use error::StoreError;
pub use memory::{InMemoryProfileStore, InMemoryRequestStore};

#[async_trait]
/// Keyed storage for seller profiles.
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<SellerProfile>, StoreError>;
    /// Inserts or replaces the profile for `profile.user_id`.
    async fn put(&self, profile: SellerProfile) -> Result<(), StoreError>;
    async fn contains(&self, user_id: &str) -> Result<bool, StoreError>;
    /// All profiles in insertion order.
    async fn list(&self) -> Result<Vec<SellerProfile>, StoreError>;
    async fn len(&self) -> Result<usize, StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

#[async_trait]
/// Keyed storage for flash requests and their ping logs.
pub trait RequestStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<FlashRequest>, StoreError>;
    /// Inserts or replaces the request for `request.id`.
    async fn put(&self, request: FlashRequest) -> Result<(), StoreError>;
    /// Appends to the request's ping log and returns the new log length.
    async fn append_ping(&self, id: &str, ping: PingLogEntry) -> Result<usize, StoreError>;
    /// Sets only the parsed request's item category, leaving the ping log
    /// and metadata as stored. Returns `false` if the id is unknown.
    async fn set_category(&self, id: &str, category: &str) -> Result<bool, StoreError>;
    async fn len(&self) -> Result<usize, StoreError>;
}
