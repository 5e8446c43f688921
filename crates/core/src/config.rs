use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::suggestions::{
    CategoryTagRule, ScoringWeights, TieBreak, Vocabulary, DEFAULT_LOCALE,
    DEFAULT_MAX_SUGGESTIONS, DEFAULT_POPULAR_SUGGESTIONS, MIN_SUGGESTION_SCORE,
    POPULAR_CONFIDENCE,
};

pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["sprout.toml", "config/sprout.toml"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub suggestions: SuggestionsConfig,
    pub scoring: ScoringWeights,
    pub vocabulary: Vocabulary,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub locale: String,
    pub snapshot_path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct SuggestionsConfig {
    pub min_confidence: f64,
    pub default_max: usize,
    pub popular_default_max: usize,
    pub popular_confidence: f64,
    pub tie_break: TieBreak,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub locale: Option<String>,
    pub snapshot_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                locale: DEFAULT_LOCALE.to_string(),
                snapshot_path: PathBuf::from("catalog.json"),
            },
            suggestions: SuggestionsConfig {
                min_confidence: MIN_SUGGESTION_SCORE,
                default_max: DEFAULT_MAX_SUGGESTIONS,
                popular_default_max: DEFAULT_POPULAR_SUGGESTIONS,
                popular_confidence: POPULAR_CONFIDENCE,
                tie_break: TieBreak::default(),
            },
            scoring: ScoringWeights::default(),
            vocabulary: Vocabulary::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILES[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(catalog) = patch.catalog {
            if let Some(locale) = catalog.locale {
                self.catalog.locale = locale;
            }
            if let Some(snapshot_path) = catalog.snapshot_path {
                self.catalog.snapshot_path = snapshot_path;
            }
        }

        if let Some(suggestions) = patch.suggestions {
            if let Some(min_confidence) = suggestions.min_confidence {
                self.suggestions.min_confidence = min_confidence;
            }
            if let Some(default_max) = suggestions.default_max {
                self.suggestions.default_max = default_max;
            }
            if let Some(popular_default_max) = suggestions.popular_default_max {
                self.suggestions.popular_default_max = popular_default_max;
            }
            if let Some(popular_confidence) = suggestions.popular_confidence {
                self.suggestions.popular_confidence = popular_confidence;
            }
            if let Some(tie_break) = suggestions.tie_break {
                self.suggestions.tie_break = tie_break;
            }
        }

        if let Some(scoring) = patch.scoring {
            if let Some(category) = scoring.category {
                self.scoring.category = category;
            }
            if let Some(source) = scoring.source {
                self.scoring.source = source;
            }
            if let Some(tags) = scoring.tags {
                self.scoring.tags = tags;
            }
            if let Some(novelty) = scoring.novelty {
                self.scoring.novelty = novelty;
            }
        }

        if let Some(vocabulary) = patch.vocabulary {
            if let Some(kid_friendly_names) = vocabulary.kid_friendly_names {
                self.vocabulary.kid_friendly_names = kid_friendly_names;
            }
            if let Some(kid_friendly_categories) = vocabulary.kid_friendly_categories {
                self.vocabulary.kid_friendly_categories = kid_friendly_categories;
            }
            if let Some(cereal_category) = vocabulary.cereal_category {
                self.vocabulary.cereal_category = cereal_category;
            }
            if let Some(cereal_excluded_name) = vocabulary.cereal_excluded_name {
                self.vocabulary.cereal_excluded_name = cereal_excluded_name;
            }
            if let Some(category_tags) = vocabulary.category_tags {
                self.vocabulary.category_tags = category_tags;
            }
            if let Some(plant_sources) = vocabulary.plant_sources {
                self.vocabulary.plant_sources = plant_sources;
            }
            if let Some(animal_sources) = vocabulary.animal_sources {
                self.vocabulary.animal_sources = animal_sources;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SPROUT_CATALOG_LOCALE") {
            self.catalog.locale = value;
        }
        if let Some(value) = read_env("SPROUT_CATALOG_SNAPSHOT_PATH") {
            self.catalog.snapshot_path = PathBuf::from(value);
        }

        if let Some(value) = read_env("SPROUT_SUGGESTIONS_MIN_CONFIDENCE") {
            self.suggestions.min_confidence =
                parse_f64("SPROUT_SUGGESTIONS_MIN_CONFIDENCE", &value)?;
        }
        if let Some(value) = read_env("SPROUT_SUGGESTIONS_DEFAULT_MAX") {
            self.suggestions.default_max = parse_usize("SPROUT_SUGGESTIONS_DEFAULT_MAX", &value)?;
        }
        if let Some(value) = read_env("SPROUT_SUGGESTIONS_POPULAR_DEFAULT_MAX") {
            self.suggestions.popular_default_max =
                parse_usize("SPROUT_SUGGESTIONS_POPULAR_DEFAULT_MAX", &value)?;
        }
        if let Some(value) = read_env("SPROUT_SUGGESTIONS_TIE_BREAK") {
            self.suggestions.tie_break =
                value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "SPROUT_SUGGESTIONS_TIE_BREAK".to_string(),
                    value: value.clone(),
                })?;
        }

        let log_level = read_env("SPROUT_LOGGING_LEVEL").or_else(|| read_env("SPROUT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SPROUT_LOGGING_FORMAT").or_else(|| read_env("SPROUT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(locale) = overrides.locale {
            self.catalog.locale = locale;
        }
        if let Some(snapshot_path) = overrides.snapshot_path {
            self.catalog.snapshot_path = snapshot_path;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_catalog(&self.catalog)?;
        validate_suggestions(&self.suggestions)?;
        validate_scoring(&self.scoring)?;
        validate_vocabulary(&self.vocabulary)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// The config file `load` would read for `explicit_path`, if any exists.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    DEFAULT_CONFIG_FILES.into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.locale.trim().is_empty() {
        return Err(ConfigError::Validation(
            "catalog.locale must not be empty (for example `en`)".to_string(),
        ));
    }

    Ok(())
}

fn validate_suggestions(suggestions: &SuggestionsConfig) -> Result<(), ConfigError> {
    ensure_unit_interval("suggestions.min_confidence", suggestions.min_confidence)?;
    ensure_unit_interval("suggestions.popular_confidence", suggestions.popular_confidence)?;

    if suggestions.default_max == 0 {
        return Err(ConfigError::Validation(
            "suggestions.default_max must be greater than zero".to_string(),
        ));
    }

    if suggestions.popular_default_max == 0 {
        return Err(ConfigError::Validation(
            "suggestions.popular_default_max must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_scoring(scoring: &ScoringWeights) -> Result<(), ConfigError> {
    ensure_unit_interval("scoring.category", scoring.category)?;
    ensure_unit_interval("scoring.source", scoring.source)?;
    ensure_unit_interval("scoring.tags", scoring.tags)?;
    ensure_unit_interval("scoring.novelty", scoring.novelty)?;
    Ok(())
}

fn validate_vocabulary(vocabulary: &Vocabulary) -> Result<(), ConfigError> {
    if vocabulary.keywords().any(|keyword| keyword.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "vocabulary keywords must not be empty; remove blank entries from [vocabulary]"
                .to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn ensure_unit_interval(key: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!("{key} must be in range 0.0..=1.0 (got {value})")))
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    suggestions: Option<SuggestionsPatch>,
    scoring: Option<ScoringPatch>,
    vocabulary: Option<VocabularyPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    locale: Option<String>,
    snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct SuggestionsPatch {
    min_confidence: Option<f64>,
    default_max: Option<usize>,
    popular_default_max: Option<usize>,
    popular_confidence: Option<f64>,
    tie_break: Option<TieBreak>,
}

#[derive(Debug, Default, Deserialize)]
struct ScoringPatch {
    category: Option<f64>,
    source: Option<f64>,
    tags: Option<f64>,
    novelty: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct VocabularyPatch {
    kid_friendly_names: Option<Vec<String>>,
    kid_friendly_categories: Option<Vec<String>>,
    cereal_category: Option<String>,
    cereal_excluded_name: Option<String>,
    category_tags: Option<Vec<CategoryTagRule>>,
    plant_sources: Option<Vec<String>>,
    animal_sources: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
