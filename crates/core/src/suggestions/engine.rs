//! Suggestion Engine implementation

use std::collections::HashSet;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::fallback::ColdStartPolicy;
use super::features::FeatureExtractor;
use super::profile::PreferenceProfile;
use super::ranking::SuggestionRanker;
use super::scoring::ScoreCalculator;
use super::types::*;
use super::SuggestionResult;
use crate::catalog::{CatalogError, FoodCatalog};
use crate::config::AppConfig;
use crate::domain::food::FoodId;
use crate::errors::ApplicationError;

/// The main suggestion engine
pub struct SuggestionEngine<C> {
    catalog: C,
    /// Locale candidates and popular foods are drawn from
    locale: String,
    calculator: ScoreCalculator,
    ranker: SuggestionRanker,
    cold_start: ColdStartPolicy,
}

impl<C: FoodCatalog> SuggestionEngine<C> {
    /// Create an engine with default weights, vocabulary and thresholds
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            locale: super::DEFAULT_LOCALE.to_string(),
            calculator: ScoreCalculator::new(),
            ranker: SuggestionRanker::default(),
            cold_start: ColdStartPolicy::default(),
        }
    }

    pub fn from_config(catalog: C, config: &AppConfig) -> Self {
        let extractor = FeatureExtractor::new(config.vocabulary.clone());
        Self {
            catalog,
            locale: config.catalog.locale.clone(),
            calculator: ScoreCalculator::with_parts(config.scoring, extractor),
            ranker: SuggestionRanker::new(
                config.suggestions.min_confidence,
                config.suggestions.tie_break,
            ),
            cold_start: ColdStartPolicy::new(config.suggestions.popular_confidence),
        }
    }

    /// Suggest foods similar to the ones the child already likes.
    ///
    /// Falls back to the popular list when no liked id is given or none of
    /// them resolve. Liked foods never come back as suggestions.
    pub async fn generate_suggestions(
        &self,
        request: SuggestionRequest,
    ) -> SuggestionResult<Vec<Suggestion>> {
        let correlation_id = Uuid::new_v4().to_string();
        info!(
            event_name = "suggestions.generate.start",
            correlation_id = %correlation_id,
            liked_count = request.liked_food_ids.len(),
            max_suggestions = request.max_suggestions,
            "generating food suggestions"
        );

        if request.max_suggestions == 0 {
            return Ok(Vec::new());
        }

        if request.liked_food_ids.is_empty() {
            info!(
                event_name = "suggestions.generate.cold_start",
                correlation_id = %correlation_id,
                reason = "no_liked_ids",
                "routing to popular suggestions"
            );
            return self.popular(&correlation_id, request.max_suggestions).await;
        }

        let liked_foods = self
            .catalog
            .lookup_by_ids(&request.liked_food_ids)
            .await
            .map_err(|error| catalog_failure(&correlation_id, "lookup_by_ids", error))?;

        if liked_foods.is_empty() {
            info!(
                event_name = "suggestions.generate.cold_start",
                correlation_id = %correlation_id,
                reason = "no_liked_ids_resolved",
                "routing to popular suggestions"
            );
            return self.popular(&correlation_id, request.max_suggestions).await;
        }

        let profile = PreferenceProfile::build(&liked_foods, self.calculator.extractor());
        debug!(
            event_name = "suggestions.generate.profile_built",
            correlation_id = %correlation_id,
            resolved_count = liked_foods.len(),
            categories = profile.category_counts.len(),
            preferred_tags = profile.preferred_tags.len(),
            "preference profile built"
        );

        let candidates = self
            .catalog
            .list_by_locale(&self.locale)
            .await
            .map_err(|error| catalog_failure(&correlation_id, "list_by_locale", error))?;

        let liked_ids: HashSet<FoodId> = request.liked_food_ids.iter().copied().collect();
        let suggestions = self.ranker.rank(
            &self.calculator,
            &candidates,
            &profile,
            &liked_ids,
            liked_foods.len(),
            request.max_suggestions,
        );

        info!(
            event_name = "suggestions.generate.completed",
            correlation_id = %correlation_id,
            candidate_count = candidates.len(),
            suggestion_count = suggestions.len(),
            "food suggestions generated"
        );

        Ok(suggestions)
    }

    /// Kid-friendly foods of the configured locale, in catalog order.
    pub async fn popular_suggestions(
        &self,
        max_suggestions: usize,
    ) -> SuggestionResult<Vec<Suggestion>> {
        let correlation_id = Uuid::new_v4().to_string();
        info!(
            event_name = "suggestions.popular.start",
            correlation_id = %correlation_id,
            max_suggestions,
            "listing popular suggestions"
        );

        self.popular(&correlation_id, max_suggestions).await
    }

    async fn popular(
        &self,
        correlation_id: &str,
        max_suggestions: usize,
    ) -> SuggestionResult<Vec<Suggestion>> {
        if max_suggestions == 0 {
            return Ok(Vec::new());
        }

        let foods = self
            .catalog
            .list_by_locale(&self.locale)
            .await
            .map_err(|error| catalog_failure(correlation_id, "list_by_locale", error))?;

        let suggestions =
            self.cold_start.popular_suggestions(self.calculator.extractor(), &foods, max_suggestions);

        info!(
            event_name = "suggestions.popular.completed",
            correlation_id = %correlation_id,
            catalog_count = foods.len(),
            suggestion_count = suggestions.len(),
            "popular suggestions listed"
        );

        Ok(suggestions)
    }
}

fn catalog_failure(correlation_id: &str, operation: &str, error: CatalogError) -> ApplicationError {
    warn!(
        event_name = "suggestions.catalog.failed",
        correlation_id = %correlation_id,
        operation,
        error = %error,
        "food catalog request failed"
    );
    ApplicationError::from(error)
}
