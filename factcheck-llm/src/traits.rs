use async_trait::async_trait;
use factcheck_common::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of the ordered chat transcript sent to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Raw `choices[0].message.content`, untouched.
    pub text: String,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one chat-completion request and return the raw reply text.
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<LlmResponse>;

    /// Where requests are sent, for logs.
    fn endpoint(&self) -> &str;

    /// Number of calls currently outstanding on this client.
    fn in_flight(&self) -> usize {
        0
    }

    /// System + user prompt pair, the shape every verification step uses.
    async fn ask(
        &self,
        model: &str,
        system_prompt: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<LlmResponse> {
        let messages = [ChatMessage::system(system_prompt), ChatMessage::user(prompt)];
        tracing::trace!(model, temperature, prompt, "llm.ask");
        self.complete(model, &messages, temperature).await
    }

    /// Check if the gateway answers for the given model.
    async fn health_check(&self, model: &str) -> Result<bool> {
        let messages = [ChatMessage::user("Respond with just 'OK'")];
        match self.complete(model, &messages, 0.0).await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!(endpoint = self.endpoint(), error = %e, "llm.health_check.failed");
                Ok(false)
            }
        }
    }
}
