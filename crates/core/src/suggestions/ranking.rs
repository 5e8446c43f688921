//! Ranking: threshold filtering, ordering and truncation of scored candidates

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::profile::PreferenceProfile;
use super::scoring::ScoreCalculator;
use super::types::Suggestion;
use crate::domain::food::{FoodId, FoodRecord};

/// Ordering among suggestions with equal confidence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep catalog iteration order
    #[default]
    CatalogOrder,
    /// Ascending food id
    FoodId,
}

impl std::str::FromStr for TieBreak {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "catalog_order" => Ok(Self::CatalogOrder),
            "food_id" => Ok(Self::FoodId),
            other => Err(format!("unsupported tie break `{other}` (expected catalog_order|food_id)")),
        }
    }
}

/// Scores within this distance of the floor count as on it.
const FLOOR_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuggestionRanker {
    /// Suggestions must score strictly above this
    min_confidence: f64,
    tie_break: TieBreak,
}

impl SuggestionRanker {
    pub fn new(min_confidence: f64, tie_break: TieBreak) -> Self {
        Self { min_confidence, tie_break }
    }

    pub fn passes(&self, suggestion: &Suggestion) -> bool {
        suggestion.confidence > self.min_confidence + FLOOR_TOLERANCE
    }

    /// Score every candidate not already liked, then keep the best `max_results`.
    pub fn rank(
        &self,
        calculator: &ScoreCalculator,
        candidates: &[FoodRecord],
        profile: &PreferenceProfile,
        liked_ids: &HashSet<FoodId>,
        liked_count: usize,
        max_results: usize,
    ) -> Vec<Suggestion> {
        if max_results == 0 {
            return Vec::new();
        }

        let scored = candidates
            .iter()
            .filter(|candidate| !liked_ids.contains(&candidate.id))
            .map(|candidate| calculator.score(candidate, profile, liked_count))
            .collect();

        self.select(scored, max_results)
    }

    /// Filter by confidence, sort descending (stable), truncate
    pub fn select(&self, mut suggestions: Vec<Suggestion>, max_results: usize) -> Vec<Suggestion> {
        suggestions.retain(|suggestion| self.passes(suggestion));

        suggestions.sort_by(|a, b| {
            let by_score = b.confidence.partial_cmp(&a.confidence).unwrap_or(Ordering::Equal);
            match self.tie_break {
                TieBreak::CatalogOrder => by_score,
                TieBreak::FoodId => by_score.then_with(|| a.food_id.cmp(&b.food_id)),
            }
        });

        suggestions.truncate(max_results);
        suggestions
    }
}

impl Default for SuggestionRanker {
    fn default() -> Self {
        Self::new(super::MIN_SUGGESTION_SCORE, TieBreak::default())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::food::ClassificationKind;
    use crate::suggestions::types::{ComponentScores, FeatureSet};

    fn suggestion(id: u32, confidence: f64) -> Suggestion {
        Suggestion {
            food_id: FoodId(id),
            food_name: format!("Food {id}"),
            image_url: None,
            tags: FeatureSet::default(),
            reason: String::new(),
            confidence,
            based_on: Vec::new(),
            component_scores: ComponentScores::default(),
            created_at: Utc::now(),
        }
    }

    fn ids(suggestions: &[Suggestion]) -> Vec<u32> {
        suggestions.iter().map(|s| s.food_id.0).collect()
    }

    #[test]
    fn threshold_is_strict() {
        let ranker = SuggestionRanker::default();
        let selected =
            ranker.select(vec![suggestion(1, 0.3), suggestion(2, 0.30001), suggestion(3, 0.1)], 10);

        assert_eq!(ids(&selected), vec![2]);
    }

    #[test]
    fn sorts_descending_and_truncates() {
        let ranker = SuggestionRanker::default();
        let selected = ranker.select(
            vec![suggestion(1, 0.5), suggestion(2, 0.9), suggestion(3, 0.7), suggestion(4, 0.6)],
            3,
        );

        assert_eq!(ids(&selected), vec![2, 3, 4]);
    }

    #[test]
    fn ties_keep_catalog_order_by_default() {
        let ranker = SuggestionRanker::default();
        let selected =
            ranker.select(vec![suggestion(9, 0.5), suggestion(3, 0.5), suggestion(5, 0.8)], 10);

        assert_eq!(ids(&selected), vec![5, 9, 3]);
    }

    #[test]
    fn ties_break_by_food_id_when_configured() {
        let ranker = SuggestionRanker::new(0.3, TieBreak::FoodId);
        let selected =
            ranker.select(vec![suggestion(9, 0.5), suggestion(3, 0.5), suggestion(5, 0.8)], 10);

        assert_eq!(ids(&selected), vec![5, 3, 9]);
    }

    #[test]
    fn fewer_qualifying_than_requested_returns_all_qualifying() {
        let ranker = SuggestionRanker::default();
        let selected = ranker.select(vec![suggestion(1, 0.6), suggestion(2, 0.2)], 5);

        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn rank_excludes_liked_and_exact_threshold_candidates() {
        let calculator = ScoreCalculator::new();
        let apple = FoodRecord::new(1, "Apple", "en")
            .with_category("Fruits")
            .with_classification(ClassificationKind::FoodSource, "Plant");
        let profile = PreferenceProfile::build(&[apple.clone()], calculator.extractor());
        // Only the tag term fires: 0.3 * (1 / 1), exactly at the floor.
        let apple_juice = FoodRecord::new(2, "Apple juice", "en");
        let pear = FoodRecord::new(3, "Pear", "en")
            .with_category("Fruits")
            .with_classification(ClassificationKind::FoodSource, "Plant");
        let liked_ids: HashSet<FoodId> = [FoodId(1)].into_iter().collect();

        let ranked = SuggestionRanker::default().rank(
            &calculator,
            &[apple, apple_juice, pear],
            &profile,
            &liked_ids,
            1,
            10,
        );

        assert_eq!(ids(&ranked), vec![3]);
    }

    #[test]
    fn category_share_landing_on_the_floor_is_excluded() {
        let calculator = ScoreCalculator::new();
        let liked = vec![
            FoodRecord::new(1, "Almond", "en").with_category("Nuts"),
            FoodRecord::new(2, "Walnut", "en").with_category("Nuts"),
            FoodRecord::new(3, "Hazelnut", "en").with_category("Nuts"),
            FoodRecord::new(4, "Salt", "en"),
        ];
        let profile = PreferenceProfile::build(&liked, calculator.extractor());
        // 0.4 * 3 / 4 sums to 0.30000000000000004 in f64.
        let cashew = FoodRecord::new(5, "Cashew", "en").with_category("Nuts");
        let scored = calculator.score(&cashew, &profile, liked.len());
        assert!(scored.confidence > 0.3);

        let liked_ids: HashSet<FoodId> = liked.iter().map(|food| food.id).collect();
        let ranked = SuggestionRanker::default().rank(
            &calculator,
            &[cashew],
            &profile,
            &liked_ids,
            liked.len(),
            10,
        );

        assert!(ranked.is_empty());
    }

    #[test]
    fn rank_with_zero_max_is_empty() {
        let calculator = ScoreCalculator::new();
        let pear = FoodRecord::new(3, "Pear", "en").with_category("Fruits");
        let profile = PreferenceProfile::build(&[pear.clone()], calculator.extractor());

        let ranked = SuggestionRanker::default().rank(
            &calculator,
            &[pear],
            &profile,
            &HashSet::new(),
            1,
            0,
        );

        assert!(ranked.is_empty());
    }
}
