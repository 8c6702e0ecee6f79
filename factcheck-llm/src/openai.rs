use crate::busy::BusyIndicator;
use crate::traits::{ChatMessage, LlmClient, LlmResponse};
use async_trait::async_trait;
use factcheck_common::{FactcheckError, GatewayConfig, Result};
use factcheck_http::{HttpClient, HttpError, RequestOpts};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for any OpenAI-compatible `chat/completions` endpoint.
///
/// Calls are single-shot unless `max_retries` is raised, and always carry a
/// timeout. The client owns a [`BusyIndicator`] that callers may observe.
pub struct OpenAiClient {
    http: HttpClient,
    endpoint: String,
    api_key: String,
    timeout: Duration,
    busy: BusyIndicator,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: Option<u32>,
}

impl OpenAiClient {
    /// Build a client from the `gateway:` configuration section.
    ///
    /// ```
    /// use factcheck_common::GatewayConfig;
    /// use factcheck_llm::openai::OpenAiClient;
    ///
    /// let missing_key = OpenAiClient::new(&GatewayConfig::default());
    /// assert!(missing_key.is_err());
    ///
    /// let cfg = GatewayConfig {
    ///     api_key: Some("sk-demo".into()),
    ///     ..GatewayConfig::default()
    /// };
    /// let client = OpenAiClient::new(&cfg).unwrap();
    /// assert_eq!(client.busy().in_flight(), 0);
    /// ```
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| FactcheckError::Config("gateway.api_key is not set".to_string()))?;

        let http = HttpClient::new(&config.endpoint)
            .map_err(|e| FactcheckError::Config(format!("gateway.endpoint: {e}")))?
            .with_timeout(config.timeout())
            .with_retries(config.max_retries);

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: api_key.to_string(),
            timeout: config.timeout(),
            busy: BusyIndicator::new(),
        })
    }

    pub fn busy(&self) -> &BusyIndicator {
        &self.busy
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<LlmResponse> {
        let _busy = self.busy.enter();

        let req = ChatCompletionRequest {
            model,
            messages,
            temperature,
        };
        let opts = RequestOpts {
            timeout: Some(self.timeout),
            bearer: Some(self.api_key.as_str()),
            allow_absolute: true,
            ..Default::default()
        };

        tracing::debug!(
            model,
            temperature,
            messages = messages.len(),
            in_flight = self.busy.in_flight(),
            "llm.complete.start"
        );

        let resp: ChatCompletionResponse = self
            .http
            .post_json_opts(&self.endpoint, &req, opts)
            .await
            .map_err(http_to_factcheck)?;

        let text = resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                FactcheckError::Decode("response contained no choices[0].message.content".into())
            })?;

        let tokens_used = resp.usage.and_then(|u| u.total_tokens);
        tracing::debug!(model, reply_len = text.len(), ?tokens_used, "llm.complete.done");

        Ok(LlmResponse {
            text,
            model: resp.model,
            tokens_used,
        })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn in_flight(&self) -> usize {
        self.busy.in_flight()
    }
}

fn http_to_factcheck(e: HttpError) -> FactcheckError {
    match e {
        HttpError::Api {
            status, message, ..
        } => FactcheckError::Gateway {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message,
        },
        HttpError::Timeout(_) => FactcheckError::Timeout,
        HttpError::Network(msg) => FactcheckError::Network(msg),
        HttpError::Decode(err, snippet) => FactcheckError::Decode(format!("{err}; body: {snippet}")),
        HttpError::Url(msg) | HttpError::Build(msg) => FactcheckError::Config(msg),
    }
}
