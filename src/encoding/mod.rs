//! Feature encoding for the matching classifier.
//!
//! A [`FeatureSchema`] is loaded once from the artifact shipped with the model
//! and fixes the width and order of every row. [`FeatureEncoder`] fills that row
//! from three namespaces:
//!
//! - `req_*`: the flash request
//! - `sp_*`: the seller profile
//! - `item_*`: the seller's representative item
//!
//! Categorical values are one-hot encoded as `"{prefix}_{value}"`, verbatim and
//! case-sensitive. Unseen or empty values fall back to `"{prefix}_nan"` when the
//! schema has that bucket, and prefixes the model was never trained on are
//! skipped entirely.

pub mod encoder;
pub mod error;
pub mod schema;


pub use encoder::{ActivatedFeature, EncodedFeatures, FeatureEncoder};
pub use error::SchemaError;
pub use schema::{FeatureSchema, NAN_SUFFIX};
