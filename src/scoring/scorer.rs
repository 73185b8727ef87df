use std::sync::Arc;

use tracing::{debug, info};

use crate::constants::{DEFAULT_POSITIVE_CLASS_INDEX, POSITIVE_CLASS_LABEL};
use crate::encoding::FeatureEncoder;
use crate::lexical::{LexicalIndex, TokenSet, request_tokens, tag_tokens};
use crate::record::{FlashRequest, SellerProfile, StructuredRecord};

use super::classifier::Classifier;
use super::error::ScoringError;
use super::types::{HeuristicBoost, MatchScore};

/// Column of the positive class in the classifier's probability rows.
///
/// The position of label `1` in `classes`, or `1` when the classifier has no
/// class list.
pub fn resolve_positive_class(classes: Option<&[i64]>) -> Result<usize, ScoringError> {
    match classes {
        None => Ok(DEFAULT_POSITIVE_CLASS_INDEX),
        Some(classes) => classes
            .iter()
            .position(|label| *label == POSITIVE_CLASS_LABEL)
            .ok_or_else(|| ScoringError::PositiveClassMissing {
                classes: classes.to_vec(),
            }),
    }
}

/// Request-side inputs to the heuristic boost, computed once per request.
#[derive(Debug, Clone, Default)]
pub struct RequestSignals {
    pub tokens: TokenSet,
    pub tag_tokens: TokenSet,
    category: Option<String>,
}

impl RequestSignals {
    pub fn from_request(request: &FlashRequest) -> Self {
        let record = &request.parsed_request;
        Self {
            tokens: request_tokens(request),
            tag_tokens: tag_tokens(record.item_meta.tags()),
            category: record.trimmed_category().map(str::to_lowercase),
        }
    }

    /// Lower-cased, trimmed request category.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn set_category(&mut self, category: &str) {
        let trimmed = category.trim();
        self.category = (!trimmed.is_empty()).then(|| trimmed.to_lowercase());
    }

    /// Lexical evidence linking this request to `profile`.
    pub fn boost_for(&self, profile: &SellerProfile, index: &LexicalIndex) -> HeuristicBoost {
        let item = profile.representative_item.as_ref();

        let category_match = match (self.category(), profile.item_category().map(str::trim)) {
            (Some(request), Some(item)) if !item.is_empty() => request == item.to_lowercase(),
            _ => false,
        };
        let tag_overlap = item
            .map(|item| {
                tag_tokens(item.item_meta.tags())
                    .intersection(&self.tag_tokens)
                    .count()
            })
            .unwrap_or(0);

        HeuristicBoost {
            keyword_overlap: index.keyword_overlap(&self.tokens, &profile.user_id),
            category_match,
            tag_overlap,
        }
    }
}

/// Turns encoded (request, seller) pairs into match probabilities.
pub struct MatchScorer {
    encoder: FeatureEncoder,
    classifier: Arc<dyn Classifier>,
    positive_class_index: usize,
}

impl std::fmt::Debug for MatchScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchScorer")
            .field("kind", &self.classifier.kind())
            .field("feature_count", &self.encoder.feature_count())
            .field("positive_class_index", &self.positive_class_index)
            .finish()
    }
}

impl MatchScorer {
    /// Pairs an encoder with a classifier.
    ///
    /// Fails when the classifier's recorded width differs from the schema or
    /// its class list lacks the positive label.
    pub fn new(encoder: FeatureEncoder, classifier: Arc<dyn Classifier>) -> Result<Self, ScoringError> {
        if let Some(expected) = classifier.n_features()
            && expected != encoder.feature_count()
        {
            return Err(ScoringError::FeatureCountMismatch {
                expected,
                actual: encoder.feature_count(),
            });
        }

        let positive_class_index = resolve_positive_class(classifier.classes())?;

        info!(
            kind = classifier.kind(),
            features = encoder.feature_count(),
            positive_class_index,
            "Match scorer ready"
        );

        Ok(Self {
            encoder,
            classifier,
            positive_class_index,
        })
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn classifier_kind(&self) -> &str {
        self.classifier.kind()
    }

    pub fn positive_class_index(&self) -> usize {
        self.positive_class_index
    }

    pub fn feature_count(&self) -> usize {
        self.encoder.feature_count()
    }

    /// Encodes the pair and scores it, then applies `boost`.
    pub fn score(
        &self,
        request: &StructuredRecord,
        profile: &SellerProfile,
        boost: HeuristicBoost,
    ) -> Result<MatchScore, ScoringError> {
        let encoded = self.encoder.encode(
            request,
            &profile.parsed_profile,
            profile.representative_item.as_ref(),
        );

        let probabilities = self
            .classifier
            .predict_proba(std::slice::from_ref(&encoded.vector))?;
        let row = probabilities
            .first()
            .ok_or_else(|| ScoringError::ComputationFailed {
                reason: "classifier returned no rows".into(),
            })?;
        let model_probability = row.get(self.positive_class_index).copied().ok_or_else(|| {
            ScoringError::ComputationFailed {
                reason: format!(
                    "positive class index {} out of range for {} classes",
                    self.positive_class_index,
                    row.len()
                ),
            }
        })?;

        let score = MatchScore::new(model_probability, boost, encoded.activated);

        debug!(
            seller = %profile.user_id,
            model_probability,
            boosted = score.boosted_probability,
            "Scored candidate"
        );

        Ok(score)
    }
}
