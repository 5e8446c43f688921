//! Scoring algorithms for food suggestions

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::features::FeatureExtractor;
use super::profile::PreferenceProfile;
use super::types::*;
use crate::domain::food::{FoodRecord, FoodSource};

pub const DEFAULT_REASON: &str = "Recommended for expanding food preferences";

/// Weights for scoring components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Weight for category affinity (default: 0.40)
    pub category: f64,
    /// Flat bonus for a shared food source (default: 0.20)
    pub source: f64,
    /// Weight for tag overlap (default: 0.30)
    pub tags: f64,
    /// Flat bonus for an unseen category (default: 0.10)
    pub novelty: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// Score calculator for food suggestions
#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    weights: ScoringWeights,
    extractor: FeatureExtractor,
}

impl ScoreCalculator {
    /// Create a new score calculator with default weights and vocabulary
    pub fn new() -> Self {
        Self { weights: ScoringWeights::default(), extractor: FeatureExtractor::default() }
    }

    pub fn with_parts(weights: ScoringWeights, extractor: FeatureExtractor) -> Self {
        Self { weights, extractor }
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Score one candidate against the profile. Never fails; unknown data scores low.
    pub fn score(
        &self,
        candidate: &FoodRecord,
        profile: &PreferenceProfile,
        liked_count: usize,
    ) -> Suggestion {
        let mut components = ComponentScores::default();
        let mut reasons = Vec::new();

        let known_category =
            candidate.category.as_deref().map(|category| profile.category_count(category));

        match known_category {
            Some(Some(count)) => {
                if liked_count > 0 {
                    components.category =
                        self.weights.category * (f64::from(count) / liked_count as f64);
                }
                reasons.push(ScoreReason::SameCategory);
            }
            Some(None) => {
                components.novelty = self.weights.novelty;
            }
            None => {}
        }

        let source = self.extractor.source(candidate);
        if source != FoodSource::Unclassified && profile.source_counts.get(source) > 0 {
            components.source = self.weights.source;
            reasons.push(ScoreReason::SharedSource(source));
        }

        let tags = self.extractor.extract(candidate);
        if !tags.is_empty() {
            let matching = tags.overlap(&profile.preferred_tags);
            components.tags = self.weights.tags * (matching as f64 / tags.len() as f64);
            if matching > 0 {
                reasons.push(ScoreReason::SimilarTasteAndTexture);
            }
        }

        // Novelty is reported last so the reason reads in term order.
        if components.novelty > 0.0 {
            reasons.push(ScoreReason::AddsVariety);
        }

        Suggestion {
            food_id: candidate.id,
            food_name: candidate.name.clone(),
            image_url: candidate.image_url.clone(),
            tags,
            reason: self.generate_reasoning(&reasons),
            confidence: components.sum().min(1.0),
            based_on: profile.liked_ids.clone(),
            component_scores: components,
            created_at: Utc::now(),
        }
    }

    /// Generate human-readable reasoning
    pub fn generate_reasoning(&self, reasons: &[ScoreReason]) -> String {
        if reasons.is_empty() {
            return DEFAULT_REASON.to_string();
        }

        let fragments: Vec<_> = reasons.iter().map(ScoreReason::fragment).collect();
        format!("Great choice because it has {}", fragments.join(", "))
    }
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new()
    }
}
