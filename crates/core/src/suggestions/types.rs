//! Types for the Suggestion Engine

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::food::{FoodId, FoodSource};

/// Request for food suggestions
#[derive(Debug, Clone)]
pub struct SuggestionRequest {
    /// Foods the child already likes
    pub liked_food_ids: Vec<FoodId>,
    /// Maximum number of suggestions to return
    pub max_suggestions: usize,
}

impl SuggestionRequest {
    /// Create a new suggestion request
    pub fn new(liked_food_ids: Vec<FoodId>) -> Self {
        Self { liked_food_ids, max_suggestions: super::DEFAULT_MAX_SUGGESTIONS }
    }

    /// Set max suggestions
    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }
}

/// Flavor, texture and role labels derived from a food record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FoodTag {
    Sweet,
    Healthy,
    Creamy,
    Mild,
    Protein,
    #[serde(rename = "Plant-based")]
    PlantBased,
    #[serde(rename = "Protein-rich")]
    ProteinRich,
    #[serde(rename = "Kid-friendly")]
    KidFriendly,
}

impl FoodTag {
    pub fn label(&self) -> &'static str {
        match self {
            FoodTag::Sweet => "Sweet",
            FoodTag::Healthy => "Healthy",
            FoodTag::Creamy => "Creamy",
            FoodTag::Mild => "Mild",
            FoodTag::Protein => "Protein",
            FoodTag::PlantBased => "Plant-based",
            FoodTag::ProteinRich => "Protein-rich",
            FoodTag::KidFriendly => "Kid-friendly",
        }
    }
}

impl fmt::Display for FoodTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// De-duplicated tags of one food. Order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(BTreeSet<FoodTag>);

impl FeatureSet {
    pub fn insert(&mut self, tag: FoodTag) -> bool {
        self.0.insert(tag)
    }

    pub fn contains(&self, tag: FoodTag) -> bool {
        self.0.contains(&tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = FoodTag> + '_ {
        self.0.iter().copied()
    }

    /// Number of tags present in both sets
    pub fn overlap(&self, other: &FeatureSet) -> usize {
        self.0.intersection(&other.0).count()
    }

    pub fn union_with(&mut self, other: &FeatureSet) {
        self.0.extend(other.iter());
    }
}

impl FromIterator<FoodTag> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = FoodTag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A food suggestion with scoring and reasoning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Suggested food
    pub food_id: FoodId,
    /// Display name of the suggested food
    pub food_name: String,
    /// Relative image path, when the catalog has one
    pub image_url: Option<String>,
    /// Tags of the suggested food
    pub tags: FeatureSet,
    /// Human-readable reasoning
    pub reason: String,
    /// Total score (0.0 - 1.0)
    pub confidence: f64,
    /// Liked foods this suggestion was derived from
    pub based_on: Vec<FoodId>,
    /// Individual component scores
    pub component_scores: ComponentScores,
    pub created_at: DateTime<Utc>,
}

impl Suggestion {
    /// Get display percentage
    pub fn display_percentage(&self) -> String {
        format!("{:.0}% match", self.confidence * 100.0)
    }
}

/// Weighted contribution of each scoring term
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct ComponentScores {
    pub category: f64,
    pub source: f64,
    pub tags: f64,
    pub novelty: f64,
}

impl ComponentScores {
    pub fn sum(&self) -> f64 {
        self.category + self.source + self.tags + self.novelty
    }
}

/// Reason fragment recorded when a scoring term fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreReason {
    SameCategory,
    SharedSource(FoodSource),
    SimilarTasteAndTexture,
    AddsVariety,
}

impl ScoreReason {
    pub fn fragment(&self) -> &'static str {
        match self {
            ScoreReason::SameCategory => "same food category",
            ScoreReason::SharedSource(FoodSource::Plant) => "plant-based like your other favorites",
            ScoreReason::SharedSource(_) => "similar protein source",
            ScoreReason::SimilarTasteAndTexture => "similar texture and taste",
            ScoreReason::AddsVariety => "introduces variety to your child's diet",
        }
    }
}
