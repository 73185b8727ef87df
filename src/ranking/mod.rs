//! Category-diversified ranking of scored candidates.


use std::collections::HashSet;

/// Default number of candidates the diversity pass may admit.
pub const DEFAULT_DIVERSITY_CAP: usize = 10;

/// Default maximum number of ranked results.
pub const DEFAULT_RESULT_CAP: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingConfig {
    pub diversity_cap: usize,
    pub result_cap: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            diversity_cap: DEFAULT_DIVERSITY_CAP,
            result_cap: DEFAULT_RESULT_CAP,
        }
    }
}

impl RankingConfig {
    pub fn new(diversity_cap: usize, result_cap: usize) -> Self {
        Self {
            diversity_cap,
            result_cap,
        }
    }

    /// Size limit of the first, category-unique pass.
    #[inline]
    pub fn first_pass_cap(&self) -> usize {
        self.diversity_cap.min(self.result_cap)
    }
}

/// Anything the ranker can order and bucket by category.
pub trait Rankable {
    fn rank_score(&self) -> f64;
    fn rank_category(&self) -> Option<&str>;
}

/// Orders candidates by score and spreads the head of the list across
/// categories.
///
/// The first pass walks the sorted list and keeps candidates whose
/// lower-cased category has not been seen yet, up to the first-pass cap.
/// Candidates without a category are always admitted and never mark one.
/// Backfill then adds the skipped candidates in sorted order until
/// `min(len, result_cap)` are selected. The output is not re-sorted.
pub fn diversify<T: Rankable>(mut candidates: Vec<T>, config: &RankingConfig) -> Vec<T> {
    // sort_by is stable: equal scores keep input order.
    candidates.sort_by(|a, b| b.rank_score().total_cmp(&a.rank_score()));

    let target = candidates.len().min(config.result_cap);
    let first_pass_cap = config.first_pass_cap();

    let mut seen = HashSet::new();
    let mut picked = vec![false; candidates.len()];
    let mut order = Vec::with_capacity(target);

    for (position, candidate) in candidates.iter().enumerate() {
        if order.len() >= first_pass_cap {
            break;
        }
        let admissible = match candidate.rank_category().map(str::trim) {
            Some(category) if !category.is_empty() => seen.insert(category.to_lowercase()),
            _ => true,
        };
        if admissible {
            picked[position] = true;
            order.push(position);
        }
    }

    for (position, taken) in picked.iter().enumerate() {
        if order.len() >= target {
            break;
        }
        if !taken {
            order.push(position);
        }
    }

    let mut slots: Vec<Option<T>> = candidates.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|position| slots[position].take())
        .collect()
}
