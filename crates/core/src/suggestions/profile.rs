//! Preference profile aggregated from a child's liked foods

use std::collections::BTreeMap;

use super::features::FeatureExtractor;
use super::types::FeatureSet;
use crate::domain::food::{FoodId, FoodRecord, FoodSource};

/// Liked-food counts per food source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceCounts {
    pub plant: u32,
    pub animal: u32,
}

impl SourceCounts {
    pub fn get(&self, source: FoodSource) -> u32 {
        match source {
            FoodSource::Plant => self.plant,
            FoodSource::Animal => self.animal,
            FoodSource::Unclassified => 0,
        }
    }

    fn record(&mut self, source: FoodSource) {
        match source {
            FoodSource::Plant => self.plant += 1,
            FoodSource::Animal => self.animal += 1,
            FoodSource::Unclassified => {}
        }
    }
}

/// Aggregated signal built from liked foods. An empty profile means "no signal".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceProfile {
    pub category_counts: BTreeMap<String, u32>,
    pub source_counts: SourceCounts,
    pub preferred_tags: FeatureSet,
    /// Distinct liked foods, first occurrence order
    pub liked_ids: Vec<FoodId>,
}

impl PreferenceProfile {
    pub fn build(liked_foods: &[FoodRecord], extractor: &FeatureExtractor) -> Self {
        let mut profile = Self::default();

        for food in liked_foods {
            if let Some(category) = &food.category {
                *profile.category_counts.entry(category.clone()).or_insert(0) += 1;
            }

            profile.source_counts.record(extractor.source(food));
            profile.preferred_tags.union_with(&extractor.extract(food));

            if !profile.liked_ids.contains(&food.id) {
                profile.liked_ids.push(food.id);
            }
        }

        profile
    }

    pub fn is_empty(&self) -> bool {
        self.liked_ids.is_empty()
    }

    pub fn category_count(&self, category: &str) -> Option<u32> {
        self.category_counts.get(category).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::food::ClassificationKind;
    use crate::suggestions::types::FoodTag;

    fn liked(id: u32, name: &str, category: Option<&str>, source: Option<&str>) -> FoodRecord {
        let mut food = FoodRecord::new(id, name, "en");
        food.category = category.map(str::to_string);
        if let Some(source) = source {
            food = food.with_classification(ClassificationKind::FoodSource, source);
        }
        food
    }

    #[test]
    fn counts_categories_sources_and_tags() {
        let extractor = FeatureExtractor::default();
        let foods = vec![
            liked(1, "Apple", Some("Fruits"), Some("Fruit plant")),
            liked(2, "Banana", Some("Fruits"), Some("Plant")),
            liked(3, "Chicken breast", Some("Meat"), Some("Animal, poultry")),
        ];

        let profile = PreferenceProfile::build(&foods, &extractor);

        assert_eq!(profile.category_count("Fruits"), Some(2));
        assert_eq!(profile.category_count("Meat"), Some(1));
        assert_eq!(profile.source_counts, SourceCounts { plant: 2, animal: 1 });
        assert!(profile.preferred_tags.contains(FoodTag::Sweet));
        assert!(profile.preferred_tags.contains(FoodTag::Protein));
        assert!(profile.preferred_tags.contains(FoodTag::ProteinRich));
        assert_eq!(profile.liked_ids, vec![FoodId(1), FoodId(2), FoodId(3)]);
    }

    #[test]
    fn category_total_matches_foods_with_category() {
        let extractor = FeatureExtractor::default();
        let foods = vec![
            liked(1, "Apple", Some("Fruits"), None),
            liked(2, "Mystery stew", None, None),
            liked(3, "Rice", Some("Grains"), None),
        ];

        let profile = PreferenceProfile::build(&foods, &extractor);
        let total: u32 = profile.category_counts.values().sum();

        assert_eq!(total, 2);
        assert_eq!(profile.source_counts, SourceCounts::default());
    }

    #[test]
    fn empty_input_yields_empty_profile() {
        let profile = PreferenceProfile::build(&[], &FeatureExtractor::default());

        assert!(profile.is_empty());
        assert!(profile.category_counts.is_empty());
        assert!(profile.preferred_tags.is_empty());
        assert_eq!(profile.source_counts, SourceCounts::default());
    }
}
