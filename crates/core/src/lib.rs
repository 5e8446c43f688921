pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod suggestions;

pub use catalog::{CatalogError, FoodCatalog, InMemoryFoodCatalog};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::food::{
    Classification, ClassificationKind, Classifications, FoodId, FoodRecord, FoodSource,
};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use suggestions::{
    FeatureExtractor, FeatureSet, FoodTag, PreferenceProfile, ScoreCalculator, Suggestion,
    SuggestionEngine, SuggestionRequest, SuggestionResult,
};
