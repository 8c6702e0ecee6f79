//! Loader for factcheck configuration with YAML + environment overlays.
//!
//! Sources are merged in this order, later ones winning:
//!
//! 1. built-in defaults (every section is optional)
//! 2. YAML files and inline YAML snippets, in the order they were added
//! 3. `FACTCHECK__<SECTION>__<KEY>` environment variables
//!
//! After merging, every string value has `${VAR}` / `$VAR` references
//! expanded from the process environment, recursively up to a fixed depth.
//!
//! ```yaml
//! version: "1"
//! gateway:
//!   endpoint: https://api.openai.com/v1/chat/completions
//!   api_key: "${OPENAI_API_KEY}"
//!   timeout_secs: 30
//! verification:
//!   model: claude-3.5-sonnet
//!   credibility_min: 0.7
//!   recency_window_months: 3
//! logging:
//!   format: json
//! ```
use config::{Config, ConfigError, Environment, File};
use factcheck_common::observability::LoggingConfig;
use factcheck_common::{FetchConfig, GatewayConfig, VerificationConfig};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "FACTCHECK";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FactcheckConfig {
    pub version: Option<String>,
    pub gateway: GatewayConfig,
    pub verification: VerificationConfig,
    pub fetch: FetchConfig,
    pub logging: LoggingConfig,
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct FactcheckConfigLoader {
    files: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for FactcheckConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FactcheckConfigLoader {
    /// Start with no files; environment overrides are applied at [`load`](Self::load).
    ///
    /// ```
    /// use factcheck_config::FactcheckConfigLoader;
    ///
    /// let config = FactcheckConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.verification.credibility_min, 0.7);
    /// ```
    pub fn new() -> Self {
        Self {
            files: Config::builder(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; the format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.files = self
            .files
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent, for deployments configured purely
    /// through the environment.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.files = self
            .files
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.files = self
            .files
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use factcheck_config::FactcheckConfigLoader;
    ///
    /// unsafe { std::env::set_var("DOC_GATEWAY_TOKEN", "injected-from-env"); }
    ///
    /// let config = FactcheckConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// gateway:
    ///   api_key: "${DOC_GATEWAY_TOKEN}"
    /// verification:
    ///   model: "gpt-4o"
    ///   credibility_min: 0.75
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.gateway.api_key.as_deref(), Some("injected-from-env"));
    /// assert_eq!(config.verification.model, "gpt-4o");
    /// assert_eq!(config.verification.credibility_min, 0.75);
    /// assert_eq!(config.gateway.timeout_secs, 30);
    ///
    /// unsafe { std::env::remove_var("DOC_GATEWAY_TOKEN"); }
    /// ```
    pub fn load(self) -> Result<FactcheckConfig, ConfigError> {
        let cfg = self
            .files
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        // Environment values arrive as strings; `config` converts them to
        // each field's type, in either direction.
        let typed: FactcheckConfig = Config::try_from(&v)?.try_deserialize()?;
        validate(&typed)?;
        Ok(typed)
    }
}

fn validate(cfg: &FactcheckConfig) -> Result<(), ConfigError> {
    let v = &cfg.verification;
    let thresholds = [
        ("verification.credibility_min", v.credibility_min),
        ("verification.semantic_confidence_min", v.semantic_confidence_min),
        (
            "verification.cross_reference_confidence_min",
            v.cross_reference_confidence_min,
        ),
        ("verification.recency_confidence_min", v.recency_confidence_min),
    ];
    for (name, value) in thresholds {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::Message(format!(
                "{name} must be within [0, 1], got {value}"
            )));
        }
    }
    if v.model.trim().is_empty() {
        return Err(ConfigError::Message(
            "verification.model must not be empty".into(),
        ));
    }
    if cfg.gateway.endpoint.trim().is_empty() {
        return Err(ConfigError::Message(
            "gateway.endpoint must not be empty".into(),
        ));
    }
    Ok(())
}
