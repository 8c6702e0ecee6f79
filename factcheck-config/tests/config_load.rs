use factcheck_common::observability::LogFormat;
use factcheck_config::FactcheckConfigLoader;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();
    let file_yaml = r#"
version: "0.1"
gateway:
  endpoint: "https://gateway.example.com/v1/chat/completions"
  api_key: "${FC_TEST_GATEWAY_KEY}"
  timeout_secs: 45
verification:
  model: "gpt-4o-mini"
  credibility_min: 0.65
  recency_window_months: 6
  max_concurrent_assessments: 2
  run_deadline_secs: 120
logging:
  format: json
  filter: "factcheck=debug"
"#;
    let p = write_yaml(&tmp, "factcheck.yaml", file_yaml);

    let config = temp_env::with_var("FC_TEST_GATEWAY_KEY", Some("sk-from-env"), || {
        FactcheckConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config")
    });

    assert_eq!(config.version.as_deref(), Some("0.1"));
    assert_eq!(
        config.gateway.endpoint,
        "https://gateway.example.com/v1/chat/completions"
    );
    assert_eq!(config.gateway.api_key.as_deref(), Some("sk-from-env"));
    assert_eq!(config.gateway.timeout_secs, 45);
    assert_eq!(config.verification.model, "gpt-4o-mini");
    assert_eq!(config.verification.credibility_min, 0.65);
    assert_eq!(config.verification.semantic_confidence_min, 0.8);
    assert_eq!(config.verification.recency_window_months, 6);
    assert_eq!(config.verification.max_concurrent_assessments, 2);
    assert_eq!(config.verification.run_deadline_secs, Some(120));
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.logging.filter, "factcheck=debug");
}

#[test]
#[serial]
fn environment_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "factcheck.yaml",
        "verification:\n  model: from-file\n  recency_window_months: 3\n",
    );

    let config = temp_env::with_vars(
        [
            ("FACTCHECK__VERIFICATION__MODEL", Some("from-env")),
            ("FACTCHECK__VERIFICATION__RECENCY_WINDOW_MONTHS", Some("12")),
            ("FACTCHECK__GATEWAY__TIMEOUT_SECS", Some("7")),
        ],
        || FactcheckConfigLoader::new().with_file(&p).load().expect("load"),
    );

    assert_eq!(config.verification.model, "from-env");
    assert_eq!(config.verification.recency_window_months, 12);
    assert_eq!(config.gateway.timeout_secs, 7);
}

#[test]
#[serial]
fn numeric_looking_env_values_stay_strings_for_text_fields() {
    let config = temp_env::with_vars(
        [
            ("FACTCHECK__GATEWAY__API_KEY", Some("123456")),
            ("FACTCHECK__VERSION", Some("2")),
            ("FACTCHECK__VERIFICATION__MODEL", Some("4")),
            ("FACTCHECK__VERIFICATION__CREDIBILITY_MIN", Some("0.75")),
            ("FACTCHECK__LOGGING__STDERR", Some("true")),
        ],
        || FactcheckConfigLoader::new().load().expect("load"),
    );

    assert_eq!(config.gateway.api_key.as_deref(), Some("123456"));
    assert_eq!(config.version.as_deref(), Some("2"));
    assert_eq!(config.verification.model, "4");
    assert_eq!(config.verification.credibility_min, 0.75);
    assert!(config.logging.stderr);
}

#[test]
#[serial]
fn missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = FactcheckConfigLoader::new()
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("defaults load");

    assert_eq!(config.verification.model, "claude-3.5-sonnet");
    assert_eq!(config.verification.credibility_min, 0.7);
    assert_eq!(config.gateway.timeout_secs, 30);
    assert_eq!(config.gateway.api_key, None);
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let result = FactcheckConfigLoader::new()
        .with_file(tmp.path().join("absent.yaml"))
        .load();
    assert!(result.is_err());
}

#[test]
#[serial]
fn invalid_threshold_fails_to_load() {
    let result = FactcheckConfigLoader::new()
        .with_yaml_str("verification:\n  credibility_min: 7\n")
        .load();
    let err = result.unwrap_err().to_string();
    assert!(err.contains("credibility_min"), "{err}");
}
