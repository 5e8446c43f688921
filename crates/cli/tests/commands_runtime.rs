use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use sprout_cli::commands::{config, doctor, popular, suggest};
use tempfile::TempDir;

const SNAPSHOT: &str = r#"[
    {"id": 1, "name": "Apple", "locale": "en", "category": "Fruits",
     "classifications": {"food_source": {"name": "Fruit plant"}}},
    {"id": 2, "name": "Pear", "locale": "en", "category": "Fruits", "image_url": "img/pear.png",
     "classifications": {"food_source": {"name": "Fruit plant"}}},
    {"id": 3, "name": "Cheddar cheese", "locale": "en", "category": "Dairy",
     "classifications": {"food_source": {"name": "Cattle"}}},
    {"id": 4, "name": "Carrot", "locale": "en", "category": "Vegetables",
     "classifications": {"food_source": {"name": "Vegetable plant"}}},
    {"id": 5, "name": "Chili spice", "locale": "en", "category": "Cereal products"},
    {"id": 6, "name": "Banana", "locale": "en", "category": "Fruits",
     "classifications": {"foodSource": {"name": "Fruit plant"}}},
    {"id": 7, "name": "Salt", "locale": "en"},
    {"id": 2, "name": "Päron", "locale": "sv", "category": "Frukt"}
]"#;

#[test]
fn suggest_returns_ranked_json_payload() {
    with_snapshot(&[], |snapshot| {
        let result = suggest::run("1", Some(3), Some(snapshot.to_path_buf()), true);
        assert_eq!(result.exit_code, 0, "expected successful suggest run: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "suggest");
        assert_eq!(payload["status"], "ok");

        let suggestions = payload["data"].as_array().expect("suggestions array");
        assert!(!suggestions.is_empty() && suggestions.len() <= 3);
        assert_eq!(suggestions[0]["food_id"], 2);
        assert_eq!(suggestions[0]["image_url"], "img/pear.png");
        assert_eq!(suggestions[0]["based_on"], serde_json::json!([1]));
        assert!(suggestions.iter().all(|suggestion| suggestion["food_id"] != 1));

        let confidences: Vec<f64> =
            suggestions.iter().filter_map(|suggestion| suggestion["confidence"].as_f64()).collect();
        assert!(confidences.windows(2).all(|pair| pair[0] >= pair[1]));
        assert!(confidences.iter().all(|confidence| *confidence > 0.3 && *confidence <= 1.0));
    });
}

#[test]
fn suggest_human_output_lists_reasons() {
    with_snapshot(&[], |snapshot| {
        let result = suggest::run("1", None, Some(snapshot.to_path_buf()), false);
        assert_eq!(result.exit_code, 0);

        let first_line = result.output.lines().next().unwrap_or_default();
        assert!(first_line.starts_with("suggest: "));
        assert!(result.output.contains("1. Pear (#2, 90% match)"));
        assert!(result.output.contains("Great choice because it has same food category"));
    });
}

#[test]
fn suggest_with_non_positive_max_returns_empty_list() {
    with_snapshot(&[], |snapshot| {
        for max in [0, -4] {
            let result = suggest::run("1", Some(max), Some(snapshot.to_path_buf()), true);
            assert_eq!(result.exit_code, 0);

            let payload = parse_payload(&result.output);
            assert_eq!(payload["data"], serde_json::json!([]));
        }
    });
}

#[test]
fn non_positive_max_skips_unreadable_snapshot() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let absent = dir.path().join("absent.json");

        for max in [0, -2] {
            let suggested = suggest::run("1", Some(max), Some(absent.clone()), true);
            assert_eq!(suggested.exit_code, 0, "suggest: {}", suggested.output);
            assert_eq!(parse_payload(&suggested.output)["data"], serde_json::json!([]));

            let popular = popular::run(Some(max), Some(absent.clone()), true);
            assert_eq!(popular.exit_code, 0, "popular: {}", popular.output);
            assert_eq!(parse_payload(&popular.output)["data"], serde_json::json!([]));
        }
    });
}

#[test]
fn suggest_without_liked_foods_matches_popular() {
    with_snapshot(&[], |snapshot| {
        let cold = suggest::run("", Some(4), Some(snapshot.to_path_buf()), true);
        let unknown = suggest::run("900,901", Some(4), Some(snapshot.to_path_buf()), true);
        let popular = popular::run(Some(4), Some(snapshot.to_path_buf()), true);

        let ids = |output: &str| -> Vec<Value> {
            parse_payload(output)["data"]
                .as_array()
                .map(|items| items.iter().map(|item| item["food_id"].clone()).collect())
                .unwrap_or_default()
        };

        assert_eq!(ids(&cold.output), ids(&popular.output));
        assert_eq!(ids(&unknown.output), ids(&popular.output));
    });
}

#[test]
fn suggest_rejects_non_numeric_ids() {
    with_snapshot(&[], |snapshot| {
        let result = suggest::run("1,apple", None, Some(snapshot.to_path_buf()), true);
        assert_eq!(result.exit_code, 4, "expected invalid input exit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "invalid_input");
    });
}

#[test]
fn suggest_reports_missing_snapshot_as_catalog_failure() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let result = suggest::run("1", None, Some(dir.path().join("absent.json")), true);
        assert_eq!(result.exit_code, 3, "expected catalog failure exit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "catalog_unavailable");
        assert!(payload["correlation_id"].as_str().is_some_and(|id| !id.is_empty()));
    });
}

#[test]
fn suggest_returns_config_failure_for_invalid_env() {
    with_snapshot(&[("SPROUT_SUGGESTIONS_MIN_CONFIDENCE", "2.0")], |snapshot| {
        let result = suggest::run("1", None, Some(snapshot.to_path_buf()), true);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "suggest");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn popular_returns_kid_friendly_foods_in_catalog_order() {
    with_snapshot(&[], |snapshot| {
        let result = popular::run(None, Some(snapshot.to_path_buf()), true);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let data = payload["data"].as_array().expect("suggestions array");
        let ids: Vec<u64> = data.iter().filter_map(|item| item["food_id"].as_u64()).collect();
        assert_eq!(ids, vec![1, 2, 3, 6]);
        assert!(data.iter().all(|item| item["confidence"] == 0.8));
        assert!(data.iter().all(|item| item["based_on"] == serde_json::json!([])));
    });
}

#[test]
fn popular_uses_locale_from_env() {
    with_snapshot(&[("SPROUT_CATALOG_LOCALE", "sv")], |snapshot| {
        let result = popular::run(None, Some(snapshot.to_path_buf()), true);
        assert_eq!(result.exit_code, 0);

        // "Päron" in "Frukt" matches no kid-friendly keyword.
        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"], serde_json::json!([]));
    });
}

#[test]
fn doctor_passes_with_readable_snapshot() {
    with_snapshot(&[], |snapshot| {
        env::set_var("SPROUT_CATALOG_SNAPSHOT_PATH", snapshot);
        let result = doctor::run(true);
        env::remove_var("SPROUT_CATALOG_SNAPSHOT_PATH");

        assert_eq!(result.exit_code, 0, "doctor should pass: {}", result.output);
        let report = parse_payload(&result.output);
        assert_eq!(report["overall_status"], "pass");
        let checks = report["checks"].as_array().expect("checks");
        assert_eq!(checks.len(), 3);
    });
}

#[test]
fn doctor_fails_when_snapshot_is_missing() {
    with_env(&[("SPROUT_CATALOG_SNAPSHOT_PATH", "/nonexistent/sprout/catalog.json")], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 3);

        let report = parse_payload(&result.output);
        assert_eq!(report["overall_status"], "fail");
        assert_eq!(report["checks"][1]["name"], "snapshot_readable");
        assert_eq!(report["checks"][1]["status"], "fail");
        assert_eq!(report["checks"][2]["status"], "skipped");
    });
}

#[test]
fn config_attributes_env_sources() {
    with_env(&[("SPROUT_LOG_LEVEL", "debug")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0);
        assert!(result
            .output
            .contains("- logging.level = debug (source: env (SPROUT_LOG_LEVEL))"));
        assert!(result.output.contains("- catalog.locale = en (source: default)"));
        assert!(result.output.contains("- scoring.category = 0.4 (source: default)"));
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_snapshot(vars: &[(&str, &str)], test_fn: impl FnOnce(&Path)) {
    with_env(vars, || {
        let dir = TempDir::new().expect("tempdir");
        let path: PathBuf = dir.path().join("catalog.json");
        fs::write(&path, SNAPSHOT).expect("write snapshot");
        test_fn(&path);
    });
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "SPROUT_CATALOG_LOCALE",
        "SPROUT_CATALOG_SNAPSHOT_PATH",
        "SPROUT_SUGGESTIONS_MIN_CONFIDENCE",
        "SPROUT_SUGGESTIONS_DEFAULT_MAX",
        "SPROUT_SUGGESTIONS_POPULAR_DEFAULT_MAX",
        "SPROUT_SUGGESTIONS_TIE_BREAK",
        "SPROUT_LOGGING_LEVEL",
        "SPROUT_LOGGING_FORMAT",
        "SPROUT_LOG_LEVEL",
        "SPROUT_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        match value {
            Some(value) => env::set_var(key, value),
            None => env::remove_var(key),
        }
    }
}
