use std::env;
use std::fs;
use std::path::Path;

use sprout_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::text(EXIT_CONFIG, format!("config validation failed: {error}"))
        }
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "catalog.locale",
        &config.catalog.locale,
        source("catalog.locale", &["SPROUT_CATALOG_LOCALE"]),
    ));
    lines.push(render_line(
        "catalog.snapshot_path",
        &config.catalog.snapshot_path.display().to_string(),
        source("catalog.snapshot_path", &["SPROUT_CATALOG_SNAPSHOT_PATH"]),
    ));

    let suggestions = &config.suggestions;
    lines.push(render_line(
        "suggestions.min_confidence",
        &suggestions.min_confidence.to_string(),
        source("suggestions.min_confidence", &["SPROUT_SUGGESTIONS_MIN_CONFIDENCE"]),
    ));
    lines.push(render_line(
        "suggestions.default_max",
        &suggestions.default_max.to_string(),
        source("suggestions.default_max", &["SPROUT_SUGGESTIONS_DEFAULT_MAX"]),
    ));
    lines.push(render_line(
        "suggestions.popular_default_max",
        &suggestions.popular_default_max.to_string(),
        source("suggestions.popular_default_max", &["SPROUT_SUGGESTIONS_POPULAR_DEFAULT_MAX"]),
    ));
    lines.push(render_line(
        "suggestions.popular_confidence",
        &suggestions.popular_confidence.to_string(),
        source("suggestions.popular_confidence", &[]),
    ));
    lines.push(render_line(
        "suggestions.tie_break",
        &format!("{:?}", suggestions.tie_break),
        source("suggestions.tie_break", &["SPROUT_SUGGESTIONS_TIE_BREAK"]),
    ));

    for (key, weight) in [
        ("scoring.category", config.scoring.category),
        ("scoring.source", config.scoring.source),
        ("scoring.tags", config.scoring.tags),
        ("scoring.novelty", config.scoring.novelty),
    ] {
        lines.push(render_line(key, &weight.to_string(), source(key, &[])));
    }

    lines.push(render_line(
        "vocabulary",
        &format!(
            "{} kid-friendly names, {} category tag rules",
            config.vocabulary.kid_friendly_names.len(),
            config.vocabulary.category_tags.len()
        ),
        source("vocabulary", &[]),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["SPROUT_LOGGING_LEVEL", "SPROUT_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["SPROUT_LOGGING_FORMAT", "SPROUT_LOG_FORMAT"]),
    ));

    CommandResult::text(0, lines.join("\n"))
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
