use serde::Serialize;
use sprout_core::catalog::{CatalogError, FoodCatalog};
use sprout_core::config::{AppConfig, LoadOptions};
use sprout_core::suggestions::FeatureExtractor;

use crate::commands::{block_on, CommandResult, EXIT_CATALOG, EXIT_CONFIG};
use crate::snapshot::SnapshotCatalog;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = exit_code_for(&report);

    if json_output {
        let output = serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
        return CommandResult::text(exit_code, output);
    }

    CommandResult::text(exit_code, render_human(&report))
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.extend(check_catalog(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(skipped("snapshot_readable"));
            checks.push(skipped("catalog_locale_populated"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_catalog(config: &AppConfig) -> Vec<DoctorCheck> {
    let locale = config.catalog.locale.clone();
    let extractor = FeatureExtractor::new(config.vocabulary.clone());

    let outcome = block_on("doctor", async {
        let catalog = SnapshotCatalog::load(&config.catalog.snapshot_path).await?;
        let foods = catalog.list_by_locale(&locale).await?;
        Ok::<_, CatalogError>((catalog.path().display().to_string(), foods))
    });

    let (path, foods) = match outcome {
        Ok(Ok(loaded)) => loaded,
        Ok(Err(error)) => {
            return vec![
                DoctorCheck {
                    name: "snapshot_readable",
                    status: CheckStatus::Fail,
                    details: error.to_string(),
                },
                skipped("catalog_locale_populated"),
            ];
        }
        Err(_) => {
            return vec![
                DoctorCheck {
                    name: "snapshot_readable",
                    status: CheckStatus::Fail,
                    details: "failed to initialize async runtime".to_string(),
                },
                skipped("catalog_locale_populated"),
            ];
        }
    };

    let readable = DoctorCheck {
        name: "snapshot_readable",
        status: CheckStatus::Pass,
        details: format!("read catalog snapshot `{path}`"),
    };

    let populated = if foods.is_empty() {
        DoctorCheck {
            name: "catalog_locale_populated",
            status: CheckStatus::Fail,
            details: format!("no foods found for locale `{locale}`"),
        }
    } else {
        let kid_friendly = foods.iter().filter(|food| extractor.is_kid_friendly(food)).count();
        let unclassified = foods.iter().filter(|food| food.food_source_name().is_none()).count();
        DoctorCheck {
            name: "catalog_locale_populated",
            status: CheckStatus::Pass,
            details: format!(
                "{} foods for locale `{locale}` ({kid_friendly} kid-friendly, {unclassified} without a food source)",
                foods.len()
            ),
        }
    };

    vec![readable, populated]
}

fn exit_code_for(report: &DoctorReport) -> u8 {
    let failed = |name: &str| {
        report.checks.iter().any(|check| check.name == name && check.status == CheckStatus::Fail)
    };

    if failed("config_validation") {
        EXIT_CONFIG
    } else if report.overall_status == CheckStatus::Fail {
        EXIT_CATALOG
    } else {
        0
    }
}

fn skipped(name: &'static str) -> DoctorCheck {
    DoctorCheck {
        name,
        status: CheckStatus::Skipped,
        details: "skipped because an earlier check failed".to_string(),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
