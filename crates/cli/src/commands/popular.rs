use std::path::PathBuf;

use sprout_core::errors::ApplicationError;
use sprout_core::suggestions::SuggestionEngine;

use crate::commands::{
    application_failure, block_on, load_config, render_suggestions, requested_max, CommandResult,
};
use crate::snapshot::SnapshotCatalog;

const COMMAND: &str = "popular";

pub fn run(max: Option<i64>, catalog: Option<PathBuf>, json_output: bool) -> CommandResult {
    let config = match load_config(COMMAND, catalog) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let max_suggestions = requested_max(max, config.suggestions.popular_default_max);
    if max_suggestions == 0 {
        return render_suggestions(COMMAND, &[], json_output);
    }

    let outcome = block_on(COMMAND, async {
        let catalog = SnapshotCatalog::load(&config.catalog.snapshot_path)
            .await
            .map_err(ApplicationError::from)?;
        let engine = SuggestionEngine::from_config(catalog, &config);
        engine.popular_suggestions(max_suggestions).await
    });

    match outcome {
        Ok(Ok(suggestions)) => render_suggestions(COMMAND, &suggestions, json_output),
        Ok(Err(error)) => application_failure(COMMAND, error),
        Err(result) => result,
    }
}
