//! Cross-cutting, shared constants.
//!
//! The boost weights and synthetic stat ranges are part of the match payload
//! contract; changing them changes every ranked response.

pub const KEYWORD_BOOST_PER_TOKEN: f64 = 0.05;
pub const KEYWORD_BOOST_CAP: f64 = 0.25;

pub const CATEGORY_MATCH_BOOST: f64 = 0.15;

pub const TAG_BOOST_PER_TOKEN: f64 = 0.04;
pub const TAG_BOOST_CAP: f64 = 0.12;

/// Upper bound on a boosted probability.
pub const MAX_BOOSTED_PROBABILITY: f64 = 0.999;

/// Class label treated as "good match".
pub const POSITIVE_CLASS_LABEL: i64 = 1;

/// Positive column used when the classifier carries no class list.
pub const DEFAULT_POSITIVE_CLASS_INDEX: usize = 1;

pub const DEFAULT_DEBUG_FEATURE_LIMIT: usize = 40;

/// Names loaded into the display-name cache at startup.
pub const NAME_PREWARM_LIMIT: usize = 1000;

pub const DEFAULT_SEED_LIMIT: usize = 150;

pub const DEFAULT_PARSER_TIMEOUT_SECS: u64 = 60;

pub const RATING_RANGE: (f64, f64) = (4.2, 4.95);
pub const TRUST_SCORE_RANGE: (f64, f64) = (78.0, 98.0);
pub const PAST_TRADES_RANGE: (f64, f64) = (8.0, 45.0);
pub const DISTANCE_MINUTES_RANGE: (f64, f64) = (0.2, 3.5);

/// Trust scores above this earn the "Top Helper" badge.
pub const TOP_HELPER_TRUST_THRESHOLD: u32 = 90;

/// A draw above this earns the "Verified Student" badge.
pub const VERIFIED_STUDENT_DRAW_THRESHOLD: f64 = 0.3;

pub const TOP_HELPER_BADGE: &str = "Top Helper";
pub const VERIFIED_STUDENT_BADGE: &str = "Verified Student";

/// Rounds `value` to `places` decimal places, half away from zero.
#[inline]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
