//! Display-name resolution for seller ids.

pub mod cache;
pub mod error;
pub mod store;


pub use cache::{NameCache, UNKNOWN_SELLER, format_display_name};
pub use error::IdentityError;
pub use store::{IdentityRecord, IdentityStore, InMemoryIdentityStore};
