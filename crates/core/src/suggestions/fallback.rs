//! Cold-start suggestions for children with no recorded preferences

use chrono::Utc;

use super::features::FeatureExtractor;
use super::types::{ComponentScores, Suggestion};
use crate::domain::food::FoodRecord;

pub const POPULAR_REASON: &str = "Popular choice for children - mild flavor and familiar texture";

/// Rule-based list: kid-friendly foods in catalog order, fixed confidence, no scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColdStartPolicy {
    confidence: f64,
}

impl ColdStartPolicy {
    pub fn new(confidence: f64) -> Self {
        Self { confidence }
    }

    pub fn popular_suggestions(
        &self,
        extractor: &FeatureExtractor,
        catalog: &[FoodRecord],
        max_results: usize,
    ) -> Vec<Suggestion> {
        let created_at = Utc::now();

        catalog
            .iter()
            .filter(|food| extractor.is_kid_friendly(food))
            .take(max_results)
            .map(|food| Suggestion {
                food_id: food.id,
                food_name: food.name.clone(),
                image_url: food.image_url.clone(),
                tags: extractor.extract(food),
                reason: POPULAR_REASON.to_string(),
                confidence: self.confidence,
                based_on: Vec::new(),
                component_scores: ComponentScores::default(),
                created_at,
            })
            .collect()
    }
}

impl Default for ColdStartPolicy {
    fn default() -> Self {
        Self::new(super::POPULAR_CONFIDENCE)
    }
}
