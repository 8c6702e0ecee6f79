use std::sync::OnceLock;

use factcheck_common::observability::{LogConfig, LogFormat};
use factcheck_common::GatewayConfig;
use serde_json::{json, Value};
use wiremock::MockServer;

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let format = match std::env::var("FACTCHECK_LOG_FORMAT") {
            Ok(raw) if raw.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        let config = LogConfig {
            app_name: "factcheck-verify-tests",
            log_dir: Some(std::env::temp_dir().join("factcheck-verify-tests")),
            emit_stderr: true,
            format,
            default_filter: "factcheck_verify=debug,info".to_string(),
        };
        factcheck_common::observability::init_logging(config).unwrap_or_default()
    });
}

pub fn gateway_for(server: &MockServer) -> GatewayConfig {
    GatewayConfig {
        endpoint: format!("{}/v1/chat/completions", server.uri()),
        api_key: Some("sk-test".to_string()),
        timeout_secs: 5,
        max_retries: 0,
    }
}

/// Chat-completions body whose single choice carries `content`.
pub fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "model": "claude-3.5-sonnet",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}],
        "usage": {"total_tokens": 42}
    })
}

/// Model reply fenced the way gateways commonly return it.
pub fn fenced(value: Value) -> String {
    format!("```json\n{value}\n```")
}
