use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};

use super::error::MatchError;
use super::stats::SyntheticStats;
use super::traits::{first_location, shared_traits};
use super::types::{
    HeuristicsDebug, MatchDebug, MatchEntry, MatchResponse, MatchUser, ModelDebug, ResponseDebug,
};
use crate::constants::DEFAULT_DEBUG_FEATURE_LIMIT;
use crate::identity::NameCache;
use crate::lexical::LexicalIndex;
use crate::ranking::{Rankable, RankingConfig, diversify};
use crate::record::{FlashRequest, SellerProfile};
use crate::scoring::{MatchScore, MatchScorer, RequestSignals};
use crate::store::{ProfileStore, RequestStore};

pub const UNDECLARED_MAJOR: &str = "Undeclared";
pub const DEFAULT_DORM: &str = "On campus";

struct ScoredCandidate {
    profile: SellerProfile,
    score: MatchScore,
}

impl Rankable for ScoredCandidate {
    fn rank_score(&self) -> f64 {
        self.score.boosted_probability
    }

    fn rank_category(&self) -> Option<&str> {
        self.profile.item_category()
    }
}

/// Scores every known seller against a flash request and assembles the
/// ranked response.
pub struct MatchEngine {
    scorer: Arc<MatchScorer>,
    profiles: Arc<dyn ProfileStore>,
    requests: Arc<dyn RequestStore>,
    names: Arc<NameCache>,
    ranking: RankingConfig,
    debug_feature_limit: usize,
    artifact: String,
}

impl std::fmt::Debug for MatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEngine")
            .field("scorer", &self.scorer)
            .field("ranking", &self.ranking)
            .field("debug_feature_limit", &self.debug_feature_limit)
            .field("artifact", &self.artifact)
            .finish()
    }
}

impl MatchEngine {
    pub fn new(
        scorer: Arc<MatchScorer>,
        profiles: Arc<dyn ProfileStore>,
        requests: Arc<dyn RequestStore>,
        names: Arc<NameCache>,
    ) -> Self {
        Self {
            scorer,
            profiles,
            requests,
            names,
            ranking: RankingConfig::default(),
            debug_feature_limit: DEFAULT_DEBUG_FEATURE_LIMIT,
            artifact: String::new(),
        }
    }

    pub fn with_ranking(mut self, ranking: RankingConfig) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn with_debug_feature_limit(mut self, limit: usize) -> Self {
        self.debug_feature_limit = limit;
        self
    }

    /// File name of the classifier artifact, echoed in debug payloads.
    pub fn with_artifact(mut self, artifact: impl Into<String>) -> Self {
        self.artifact = artifact.into();
        self
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    /// Recomputes matches for a stored request. `None` if the id is unknown.
    pub async fn matches_for(&self, request_id: &str) -> Result<Option<MatchResponse>, MatchError> {
        match self.requests.get(request_id).await? {
            Some(request) => self.build_match_payload(request).await.map(Some),
            None => Ok(None),
        }
    }

    /// Scores, ranks and decorates every stored seller for `request`.
    ///
    /// A request without a category gets one inferred from the lexical index;
    /// the inferred category is written back to the request store.
    #[instrument(skip(self, request), fields(request_id = %request.id))]
    pub async fn build_match_payload(
        &self,
        mut request: FlashRequest,
    ) -> Result<MatchResponse, MatchError> {
        let profiles = self.profiles.list().await?;
        let index = LexicalIndex::build(&profiles);
        let mut signals = RequestSignals::from_request(&request);

        if request.parsed_request.trimmed_category().is_none()
            && let Some(category) = index.infer_category(&signals.tokens)
        {
            let category = category.to_string();
            info!(%category, "Inferred request category");
            signals.set_category(&category);
            self.requests.set_category(&request.id, &category).await?;
            request.parsed_request.item_meta.category = Some(category);
        }

        let ids: Vec<&str> = profiles.iter().map(|p| p.user_id.as_str()).collect();
        self.names.prefetch(&ids[..]).await;

        let mut candidates = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let boost = signals.boost_for(&profile, &index);
            let score = self.scorer.score(&request.parsed_request, &profile, boost)?;
            candidates.push(ScoredCandidate { profile, score });
        }

        let total = candidates.len();
        let ranked = diversify(candidates, &self.ranking);
        debug!(candidates = total, returned = ranked.len(), "Ranked candidates");

        let matches = ranked
            .into_iter()
            .map(|candidate| self.entry(&request.id, candidate))
            .collect();

        Ok(MatchResponse {
            success: true,
            request_id: request.id,
            request: request.parsed_request,
            matches,
            debug: ResponseDebug {
                model: Some(self.model_debug()),
                request_metadata: Some(request.metadata),
                generated_at: Utc::now(),
                error: None,
            },
        })
    }

    fn model_debug(&self) -> ModelDebug {
        ModelDebug {
            kind: self.scorer.classifier_kind().to_string(),
            positive_class_index: self.scorer.positive_class_index(),
            feature_count: self.scorer.feature_count(),
            artifact: self.artifact.clone(),
        }
    }

    fn entry(&self, request_id: &str, candidate: ScoredCandidate) -> MatchEntry {
        let ScoredCandidate { profile, mut score } = candidate;
        let parsed = &profile.parsed_profile;
        let stats = SyntheticStats::generate(request_id, &profile.user_id);

        let heuristics = HeuristicsDebug {
            keyword_overlap: score.boost.keyword_overlap,
            category_match: score.boost.category_match,
            tag_overlap: score.boost.tag_overlap,
            boost_applied: score.boost_applied(),
        };
        let shared_traits = shared_traits(parsed, score.boost.category_match);
        let likelihood = score.likelihood();
        score.activated.truncate(self.debug_feature_limit);

        let user = MatchUser {
            id: profile.user_id.clone(),
            name: self.names.display_name(&profile.user_id),
            major: parsed
                .inferred_major()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(UNDECLARED_MAJOR)
                .to_string(),
            dorm: first_location(parsed).unwrap_or(DEFAULT_DORM).to_string(),
            verified: stats.is_verified(),
            rating: stats.rating,
            trust_score: stats.trust_score,
            past_trades: stats.past_trades,
            badges: stats.badges,
        };

        MatchEntry {
            user,
            likelihood,
            distance_min: stats.distance_min,
            shared_traits,
            debug: MatchDebug {
                probability: score.boosted_probability,
                model_probability: score.model_probability,
                activated_features: score.activated,
                representative_item: profile.representative_item,
                seller_profile: profile.parsed_profile,
                source: profile.source,
                heuristics,
            },
        }
    }
}
