use std::path::PathBuf;

use sprout_core::domain::food::FoodId;
use sprout_core::errors::{ApplicationError, DomainError};
use sprout_core::suggestions::{SuggestionEngine, SuggestionRequest};

use crate::commands::{
    application_failure, block_on, load_config, render_suggestions, requested_max, CommandResult,
};
use crate::snapshot::SnapshotCatalog;

const COMMAND: &str = "suggest";

pub fn run(liked: &str, max: Option<i64>, catalog: Option<PathBuf>, json_output: bool) -> CommandResult {
    let liked_food_ids = match parse_liked_ids(liked) {
        Ok(ids) => ids,
        Err(error) => return application_failure(COMMAND, error.into()),
    };

    let config = match load_config(COMMAND, catalog) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let max_suggestions = requested_max(max, config.suggestions.default_max);
    if max_suggestions == 0 {
        return render_suggestions(COMMAND, &[], json_output);
    }
    let request = SuggestionRequest::new(liked_food_ids).with_max_suggestions(max_suggestions);

    let outcome = block_on(COMMAND, async {
        let catalog = SnapshotCatalog::load(&config.catalog.snapshot_path)
            .await
            .map_err(ApplicationError::from)?;
        let engine = SuggestionEngine::from_config(catalog, &config);
        engine.generate_suggestions(request).await
    });

    match outcome {
        Ok(Ok(suggestions)) => render_suggestions(COMMAND, &suggestions, json_output),
        Ok(Err(error)) => application_failure(COMMAND, error),
        Err(result) => result,
    }
}

/// Comma-separated food numbers. Blank entries are skipped; anything else must be a number.
pub fn parse_liked_ids(raw: &str) -> Result<Vec<FoodId>, DomainError> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            value.parse::<FoodId>().map_err(|_| DomainError::InvalidFoodId(value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use sprout_core::domain::food::FoodId;
    use sprout_core::errors::DomainError;

    use super::parse_liked_ids;

    #[test]
    fn parses_comma_separated_ids() {
        assert_eq!(parse_liked_ids("1, 2,,3"), Ok(vec![FoodId(1), FoodId(2), FoodId(3)]));
        assert_eq!(parse_liked_ids(""), Ok(Vec::new()));
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let error = parse_liked_ids("1,apple").expect_err("apple is not an id");
        assert_eq!(error, DomainError::InvalidFoodId("apple".to_string()));
    }
}
