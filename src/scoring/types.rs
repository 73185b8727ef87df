use serde::Serialize;

use crate::constants::{
    CATEGORY_MATCH_BOOST, KEYWORD_BOOST_CAP, KEYWORD_BOOST_PER_TOKEN, MAX_BOOSTED_PROBABILITY,
    TAG_BOOST_CAP, TAG_BOOST_PER_TOKEN, round_to,
};
use crate::encoding::ActivatedFeature;

/// Lexical evidence behind the heuristic boost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeuristicBoost {
    /// Request tokens shared with the seller's token set.
    pub keyword_overlap: usize,
    /// Request and representative item share a category.
    pub category_match: bool,
    /// Request tag tokens shared with the item's tag tokens.
    pub tag_overlap: usize,
}

impl HeuristicBoost {
    pub fn keyword_boost(&self) -> f64 {
        (self.keyword_overlap as f64 * KEYWORD_BOOST_PER_TOKEN).min(KEYWORD_BOOST_CAP)
    }

    pub fn category_boost(&self) -> f64 {
        if self.category_match {
            CATEGORY_MATCH_BOOST
        } else {
            0.0
        }
    }

    pub fn tag_boost(&self) -> f64 {
        (self.tag_overlap as f64 * TAG_BOOST_PER_TOKEN).min(TAG_BOOST_CAP)
    }

    pub fn total(&self) -> f64 {
        self.keyword_boost() + self.category_boost() + self.tag_boost()
    }

    /// `min(probability + total, 0.999)`.
    pub fn apply(&self, probability: f64) -> f64 {
        (probability + self.total()).min(MAX_BOOSTED_PROBABILITY)
    }
}

/// Score of one seller against one request.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchScore {
    pub model_probability: f64,
    pub boosted_probability: f64,
    pub boost: HeuristicBoost,
    pub activated: Vec<ActivatedFeature>,
}

impl MatchScore {
    pub fn new(model_probability: f64, boost: HeuristicBoost, activated: Vec<ActivatedFeature>) -> Self {
        Self {
            model_probability,
            boosted_probability: boost.apply(model_probability),
            boost,
            activated,
        }
    }

    /// Boost actually applied after the cap, rounded to 4 places.
    pub fn boost_applied(&self) -> f64 {
        round_to((self.boosted_probability - self.model_probability).max(0.0), 4)
    }

    /// Boosted probability as a percentage with one decimal.
    pub fn likelihood(&self) -> f64 {
        round_to(self.boosted_probability * 100.0, 1)
    }
}
