pub mod config;
pub mod doctor;
pub mod popular;
pub mod suggest;

use std::future::Future;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use sprout_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use sprout_core::errors::{ApplicationError, InterfaceError};
use sprout_core::suggestions::Suggestion;
use tracing::warn;
use uuid::Uuid;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_CATALOG: u8 = 3;
pub const EXIT_INVALID_INPUT: u8 = 4;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success_with_data(command: &str, message: impl Into<String>, data: Option<Value>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            correlation_id: None,
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            correlation_id: None,
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Plain text output for humans, keeping the exit code contract.
    pub fn text(exit_code: u8, output: impl Into<String>) -> Self {
        Self { exit_code, output: output.into() }
    }

    fn interface_failure(command: &str, error: InterfaceError) -> Self {
        let (error_class, exit_code) = match &error {
            InterfaceError::BadRequest { .. } => ("invalid_input", EXIT_INVALID_INPUT),
            InterfaceError::ServiceUnavailable { .. } => ("catalog_unavailable", EXIT_CATALOG),
            InterfaceError::Internal { .. } => ("config_validation", EXIT_CONFIG),
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: format!("{} ({error})", error.user_message()),
            correlation_id: Some(error.correlation_id().to_string()),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Load config with an optional `--catalog` override of the snapshot path.
pub(crate) fn load_config(command: &str, catalog: Option<PathBuf>) -> Result<AppConfig, CommandResult> {
    let options = LoadOptions {
        overrides: ConfigOverrides { snapshot_path: catalog, ..ConfigOverrides::default() },
        ..LoadOptions::default()
    };

    AppConfig::load(options).map_err(|error| application_failure(command, error.into()))
}

/// Drive an async engine call to completion on a private runtime.
pub(crate) fn block_on<F: Future>(command: &str, future: F) -> Result<F::Output, CommandResult> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(
        |error| {
            CommandResult::failure(
                command,
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                1,
            )
        },
    )?;

    Ok(runtime.block_on(future))
}

pub(crate) fn application_failure(command: &str, error: ApplicationError) -> CommandResult {
    let correlation_id = Uuid::new_v4().to_string();
    warn!(
        event_name = "cli.command.failed",
        correlation_id = %correlation_id,
        command,
        error = %error,
        "command failed"
    );
    CommandResult::interface_failure(command, error.into_interface(correlation_id))
}

/// Negative or zero `--max` values ask for nothing.
pub(crate) fn requested_max(max: Option<i64>, default_max: usize) -> usize {
    match max {
        Some(value) => usize::try_from(value).unwrap_or(0),
        None => default_max,
    }
}

pub(crate) fn render_suggestions(
    command: &str,
    suggestions: &[Suggestion],
    json_output: bool,
) -> CommandResult {
    let summary = format!("{command}: {} suggestion(s)", suggestions.len());

    if json_output {
        return match serde_json::to_value(suggestions) {
            Ok(data) => CommandResult::success_with_data(command, summary, Some(data)),
            Err(error) => CommandResult::failure(command, "serialization", error.to_string(), 1),
        };
    }

    let mut lines = vec![summary];
    for (rank, suggestion) in suggestions.iter().enumerate() {
        let tags: Vec<&str> = suggestion.tags.iter().map(|tag| tag.label()).collect();
        lines.push(format!(
            "{}. {} (#{}, {}) [{}]",
            rank + 1,
            suggestion.food_name,
            suggestion.food_id,
            suggestion.display_percentage(),
            tags.join(", ")
        ));
        lines.push(format!("   {}", suggestion.reason));
    }

    CommandResult::text(0, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::requested_max;

    #[test]
    fn requested_max_clamps_negative_values() {
        assert_eq!(requested_max(Some(-3), 5), 0);
        assert_eq!(requested_max(Some(0), 5), 0);
        assert_eq!(requested_max(Some(7), 5), 7);
        assert_eq!(requested_max(None, 5), 5);
    }
}
