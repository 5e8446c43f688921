//! Food Suggestion Engine
//!
//! Suggests new foods to try from the foods a child already likes, by
//! comparing categories, food sources and derived taste tags. Children with
//! no usable preference signal get a rule-based list of popular foods.

mod engine;
mod fallback;
mod features;
mod profile;
mod ranking;
mod scoring;
mod types;

pub use engine::SuggestionEngine;
pub use fallback::{ColdStartPolicy, POPULAR_REASON};
pub use features::{CategoryTagRule, FeatureExtractor, Vocabulary};
pub use profile::{PreferenceProfile, SourceCounts};
pub use ranking::{SuggestionRanker, TieBreak};
pub use scoring::{ScoreCalculator, ScoringWeights, DEFAULT_REASON};
pub use types::*;

use crate::errors::ApplicationError;

/// Result type for suggestion operations
pub type SuggestionResult<T> = Result<T, ApplicationError>;

/// Default scoring weights
pub const DEFAULT_WEIGHTS: ScoringWeights =
    ScoringWeights { category: 0.40, source: 0.20, tags: 0.30, novelty: 0.10 };

/// Suggestions must score strictly above this
pub const MIN_SUGGESTION_SCORE: f64 = 0.30;

/// Maximum suggestions to return
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Maximum popular suggestions to return
pub const DEFAULT_POPULAR_SUGGESTIONS: usize = 6;

/// Fixed confidence reported for every popular suggestion
pub const POPULAR_CONFIDENCE: f64 = 0.8;

/// Locale candidates are drawn from
pub const DEFAULT_LOCALE: &str = "en";
