//! Match scoring: classifier probability plus a capped lexical boost.
//!
//! [`MatchScorer`] encodes a (request, seller) pair with the
//! [`FeatureEncoder`](crate::encoding::FeatureEncoder), reads the positive
//! class column from a [`Classifier`], and adds the [`HeuristicBoost`]
//! measured by [`RequestSignals::boost_for`].
//!
//! The positive column is resolved once at construction, so a classifier
//! whose labels are ordered `[1, 0]` still scores correctly.

pub mod classifier;
pub mod error;
pub mod forest;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod scorer;
pub mod types;

#[cfg(test)]
mod tests;

pub use classifier::Classifier;
pub use error::ScoringError;
pub use forest::{DecisionTree, ForestClassifier};
#[cfg(any(test, feature = "mock"))]
pub use mock::ConstantClassifier;
pub use scorer::{MatchScorer, RequestSignals, resolve_positive_class};
pub use types::{HeuristicBoost, MatchScore};
