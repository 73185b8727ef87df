//! Match payload assembly: scoring every seller, ranking, and decorating the
//! results for display.

pub mod engine;
pub mod error;
pub mod stats;
pub mod traits;
pub mod types;


pub use engine::MatchEngine;
pub use error::MatchError;
pub use stats::SyntheticStats;
pub use traits::shared_traits;
pub use types::{
    HeuristicsDebug, MatchDebug, MatchEntry, MatchResponse, MatchUser, ModelDebug, ResponseDebug,
};
