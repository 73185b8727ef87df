//! Seller profile ingestion: representative items and seeding.

pub mod error;
pub mod representative;
pub mod seed;

#[cfg(test)]
mod tests;

pub use error::SeedError;
pub use representative::build_representative_item;
pub use seed::{
    BUILTIN_DEMO_PROFILES, DemoProfile, load_builtin_demo_profiles, load_demo_profiles,
    seed_synthetic_profiles,
};
