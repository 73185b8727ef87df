//! Flash-request matching library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`FeatureEncoder`], [`FeatureSchema`] - Request/profile/item feature rows
//! - [`LexicalIndex`] - Keyword overlap and category inference
//! - [`MatchScorer`], [`ForestClassifier`] - Classifier probability plus heuristic boosts
//! - [`diversify`], [`RankingConfig`] - Category-diverse ordering
//! - [`MatchEngine`] - Match payload assembly
//!
//! ## Collaborators
//! - [`ProfileStore`], [`RequestStore`] - Profile and request storage
//! - [`RecordParser`], [`HttpRecordParser`] - External free-text parsing service
//! - [`IdentityStore`], [`NameCache`] - Seller display names
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod encoding;
pub mod gateway;
pub mod hashing;
pub mod identity;
pub mod lexical;
pub mod matching;
pub mod parser;
pub mod profile;
pub mod ranking;
pub mod record;
pub mod scoring;
pub mod store;

pub use config::{Config, ConfigError};
pub use encoding::{ActivatedFeature, EncodedFeatures, FeatureEncoder, FeatureSchema, SchemaError};
pub use gateway::{GatewayError, HandlerState, cors_layer, create_router_with_state};
pub use hashing::{hash_to_u64, match_seed};
pub use identity::{IdentityError, IdentityStore, InMemoryIdentityStore, NameCache};
pub use lexical::{LexicalIndex, TokenSet, tokenize};
pub use matching::{MatchEngine, MatchError, MatchResponse, SyntheticStats};
#[cfg(any(test, feature = "mock"))]
pub use parser::MockRecordParser;
pub use parser::{HttpRecordParser, ParserError, RecordParser};
pub use profile::{
    SeedError, build_representative_item, load_builtin_demo_profiles, load_demo_profiles,
    seed_synthetic_profiles,
};
pub use ranking::{RankingConfig, Rankable, diversify};
pub use record::{
    FlashRequest, PingLogEntry, ProfileSource, SellerProfile, SellerProfileRecord,
    StructuredRecord, apply_request_metadata,
};
#[cfg(any(test, feature = "mock"))]
pub use scoring::ConstantClassifier;
pub use scoring::{
    Classifier, ForestClassifier, HeuristicBoost, MatchScore, MatchScorer, ScoringError,
};
pub use store::{InMemoryProfileStore, InMemoryRequestStore, ProfileStore, RequestStore, StoreError};
