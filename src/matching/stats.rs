use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{
    DISTANCE_MINUTES_RANGE, PAST_TRADES_RANGE, RATING_RANGE, TOP_HELPER_BADGE,
    TOP_HELPER_TRUST_THRESHOLD, TRUST_SCORE_RANGE, VERIFIED_STUDENT_BADGE,
    VERIFIED_STUDENT_DRAW_THRESHOLD, round_to,
};
use crate::hashing::match_seed;

/// Presentation-only seller stats, stable for a (request, seller) pair.
///
/// Never fed back into ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticStats {
    pub rating: f64,
    pub trust_score: u32,
    pub past_trades: u32,
    pub badges: Vec<String>,
    pub distance_min: f64,
}

impl SyntheticStats {
    pub fn generate(request_id: &str, seller_id: &str) -> Self {
        let mut rng = StdRng::seed_from_u64(match_seed(request_id, seller_id));

        let rating = round_to(uniform(&mut rng, RATING_RANGE), 2);
        let trust_score = uniform(&mut rng, TRUST_SCORE_RANGE).floor() as u32;
        let past_trades = uniform(&mut rng, PAST_TRADES_RANGE).floor() as u32;

        let mut badges = Vec::new();
        if trust_score > TOP_HELPER_TRUST_THRESHOLD {
            badges.push(TOP_HELPER_BADGE.to_string());
        }
        if rng.r#gen::<f64>() > VERIFIED_STUDENT_DRAW_THRESHOLD {
            badges.push(VERIFIED_STUDENT_BADGE.to_string());
        }

        let distance_min = round_to(uniform(&mut rng, DISTANCE_MINUTES_RANGE), 2);

        Self {
            rating,
            trust_score,
            past_trades,
            badges,
            distance_min,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.badges.iter().any(|b| b == VERIFIED_STUDENT_BADGE)
    }
}

fn uniform(rng: &mut StdRng, (low, high): (f64, f64)) -> f64 {
    rng.gen_range(low..high)
}
