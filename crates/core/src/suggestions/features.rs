//! Feature extraction: derives tags and source classification from food records.

use serde::{Deserialize, Serialize};

use super::types::{FeatureSet, FoodTag};
use crate::domain::food::{FoodRecord, FoodSource};

/// Maps a category keyword to the tag it implies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTagRule {
    pub keyword: String,
    pub tag: FoodTag,
}

impl CategoryTagRule {
    pub fn new(keyword: impl Into<String>, tag: FoodTag) -> Self {
        Self { keyword: keyword.into(), tag }
    }
}

/// Keyword lists driving feature extraction. All matching is case-insensitive substring matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Name tokens that mark a food as kid-friendly
    pub kid_friendly_names: Vec<String>,
    /// Category keywords that mark a food as kid-friendly
    pub kid_friendly_categories: Vec<String>,
    /// Cereal category keyword; cereals are kid-friendly unless the name has `cereal_excluded_name`
    pub cereal_category: String,
    pub cereal_excluded_name: String,
    pub category_tags: Vec<CategoryTagRule>,
    pub plant_sources: Vec<String>,
    pub animal_sources: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            kid_friendly_names: to_strings(&[
                "apple", "banana", "pasta", "rice", "chicken", "cheese", "bread", "yogurt", "milk",
            ]),
            kid_friendly_categories: to_strings(&["fruit", "dairy"]),
            cereal_category: "cereal".to_string(),
            cereal_excluded_name: "spice".to_string(),
            category_tags: vec![
                CategoryTagRule::new("fruit", FoodTag::Sweet),
                CategoryTagRule::new("vegetable", FoodTag::Healthy),
                CategoryTagRule::new("dairy", FoodTag::Creamy),
                CategoryTagRule::new("grain", FoodTag::Mild),
                CategoryTagRule::new("meat", FoodTag::Protein),
            ],
            plant_sources: to_strings(&["plant", "vegetable", "fruit", "grain"]),
            animal_sources: to_strings(&["cattle", "swine", "animal"]),
        }
    }
}

impl Vocabulary {
    /// Every keyword, for validation
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.kid_friendly_names
            .iter()
            .chain(&self.kid_friendly_categories)
            .chain(std::iter::once(&self.cereal_category))
            .chain(std::iter::once(&self.cereal_excluded_name))
            .chain(self.category_tags.iter().map(|rule| &rule.keyword))
            .chain(&self.plant_sources)
            .chain(&self.animal_sources)
            .map(String::as_str)
    }

    fn lowercased(&self) -> Self {
        let lower = |values: &[String]| -> Vec<String> {
            values.iter().map(|value| value.to_lowercase()).collect()
        };
        Self {
            kid_friendly_names: lower(&self.kid_friendly_names),
            kid_friendly_categories: lower(&self.kid_friendly_categories),
            cereal_category: self.cereal_category.to_lowercase(),
            cereal_excluded_name: self.cereal_excluded_name.to_lowercase(),
            category_tags: self
                .category_tags
                .iter()
                .map(|rule| CategoryTagRule::new(rule.keyword.to_lowercase(), rule.tag))
                .collect(),
            plant_sources: lower(&self.plant_sources),
            animal_sources: lower(&self.animal_sources),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}

/// Stateless tag extraction over an injected vocabulary
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    vocabulary: Vocabulary,
}

impl FeatureExtractor {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary: vocabulary.lowercased() }
    }

    /// Classify the food source. Plant keywords win when both lists match.
    pub fn source(&self, food: &FoodRecord) -> FoodSource {
        let Some(name) = food.food_source_name() else {
            return FoodSource::Unclassified;
        };
        let name = name.to_lowercase();

        if contains_any(&name, &self.vocabulary.plant_sources) {
            FoodSource::Plant
        } else if contains_any(&name, &self.vocabulary.animal_sources) {
            FoodSource::Animal
        } else {
            FoodSource::Unclassified
        }
    }

    pub fn is_kid_friendly(&self, food: &FoodRecord) -> bool {
        let name = food.name.to_lowercase();
        let category = food.category.as_deref().map(str::to_lowercase).unwrap_or_default();
        let vocabulary = &self.vocabulary;

        contains_any(&name, &vocabulary.kid_friendly_names)
            || contains_any(&category, &vocabulary.kid_friendly_categories)
            || (category.contains(vocabulary.cereal_category.as_str())
                && !name.contains(vocabulary.cereal_excluded_name.as_str()))
    }

    pub fn extract(&self, food: &FoodRecord) -> FeatureSet {
        let mut tags = FeatureSet::default();

        if let Some(category) = food.category.as_deref() {
            let category = category.to_lowercase();
            for rule in &self.vocabulary.category_tags {
                if category.contains(rule.keyword.as_str()) {
                    tags.insert(rule.tag);
                }
            }
        }

        match self.source(food) {
            FoodSource::Plant => {
                tags.insert(FoodTag::PlantBased);
            }
            FoodSource::Animal => {
                tags.insert(FoodTag::ProteinRich);
            }
            FoodSource::Unclassified => {}
        }

        if self.is_kid_friendly(food) {
            tags.insert(FoodTag::KidFriendly);
        }

        tags
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(Vocabulary::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::food::ClassificationKind;

    fn food(name: &str, category: Option<&str>, source: Option<&str>) -> FoodRecord {
        let mut food = FoodRecord::new(1, name, "en");
        food.category = category.map(str::to_string);
        if let Some(source) = source {
            food = food.with_classification(ClassificationKind::FoodSource, source);
        }
        food
    }

    #[test]
    fn fruit_from_plant_source_gets_sweet_plant_and_kid_tags() {
        let extractor = FeatureExtractor::default();
        let tags = extractor.extract(&food("Pear", Some("Fruits"), Some("Fruit plant")));

        let expected: FeatureSet =
            [FoodTag::Sweet, FoodTag::PlantBased, FoodTag::KidFriendly].into_iter().collect();
        assert_eq!(tags, expected);
    }

    #[test]
    fn multiple_category_keywords_all_apply() {
        let extractor = FeatureExtractor::default();
        let tags = extractor.extract(&food("Fruit yogurt", Some("Dairy and fruit"), None));

        assert!(tags.contains(FoodTag::Sweet));
        assert!(tags.contains(FoodTag::Creamy));
        assert!(tags.contains(FoodTag::KidFriendly));
        assert!(!tags.contains(FoodTag::PlantBased));
    }

    #[test]
    fn animal_source_gets_protein_rich() {
        let extractor = FeatureExtractor::default();
        let beef = food("Beef steak", Some("Meat"), Some("Cattle"));

        assert_eq!(extractor.source(&beef), FoodSource::Animal);
        let tags = extractor.extract(&beef);
        assert!(tags.contains(FoodTag::Protein));
        assert!(tags.contains(FoodTag::ProteinRich));
        assert!(!tags.contains(FoodTag::KidFriendly));
    }

    #[test]
    fn source_matching_both_lists_is_plant() {
        let extractor = FeatureExtractor::default();
        let oil = food("Oil", None, Some("Animal feed grain"));

        assert_eq!(extractor.source(&oil), FoodSource::Plant);
        let tags = extractor.extract(&oil);
        assert!(tags.contains(FoodTag::PlantBased));
        assert!(!tags.contains(FoodTag::ProteinRich));
    }

    #[test]
    fn cereal_is_kid_friendly_unless_spiced() {
        let extractor = FeatureExtractor::default();

        assert!(extractor.is_kid_friendly(&food("Oat porridge", Some("Cereal products"), None)));
        assert!(!extractor.is_kid_friendly(&food("Spice mix", Some("Cereal products"), None)));
    }

    #[test]
    fn kid_friendly_name_token_is_case_insensitive() {
        let extractor = FeatureExtractor::default();

        assert!(extractor.is_kid_friendly(&food("BANANA, raw", None, None)));
        assert!(!extractor.is_kid_friendly(&food("Liver pate", Some("Offal"), None)));
    }

    #[test]
    fn absent_fields_yield_no_tags() {
        let extractor = FeatureExtractor::default();
        assert!(extractor.extract(&food("Water", None, None)).is_empty());
    }

    #[test]
    fn alternate_vocabulary_is_honoured() {
        let vocabulary = Vocabulary {
            kid_friendly_names: vec!["Pancake".to_string()],
            kid_friendly_categories: Vec::new(),
            category_tags: vec![CategoryTagRule::new("BERRY", FoodTag::Sweet)],
            ..Vocabulary::default()
        };
        let extractor = FeatureExtractor::new(vocabulary);

        let pancake = extractor.extract(&food("Pancakes", Some("Baked goods"), None));
        assert!(pancake.contains(FoodTag::KidFriendly));

        let berry = extractor.extract(&food("Blueberry", Some("Berry fruits"), None));
        assert!(berry.contains(FoodTag::Sweet));
        assert!(!berry.contains(FoodTag::KidFriendly));

        let apple = extractor.extract(&food("Apple", Some("Fruits"), None));
        assert!(apple.is_empty());
    }
}
