//! In-process gateway double for unit tests.

use async_trait::async_trait;
use factcheck_common::{FactcheckError, Result};
use factcheck_llm::traits::{ChatMessage, LlmClient, LlmResponse, Role};
use std::sync::Mutex;

#[derive(Clone)]
enum Scripted {
    Reply(String),
    Status(u16),
}

/// Answers each call with the first rule whose needle occurs in the user
/// prompt. Every prompt it sees is recorded.
#[derive(Default)]
pub(crate) struct ScriptedClient {
    rules: Vec<(String, Scripted)>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(mut self, needle: &str, text: &str) -> Self {
        self.rules
            .push((needle.to_string(), Scripted::Reply(text.to_string())));
        self
    }

    pub(crate) fn status(mut self, needle: &str, status: u16) -> Self {
        self.rules.push((needle.to_string(), Scripted::Status(status)));
        self
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    pub(crate) fn calls_containing(&self, needle: &str) -> usize {
        self.prompts().iter().filter(|p| p.contains(needle)).count()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        _temperature: f32,
    ) -> Result<LlmResponse> {
        let prompt = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.seen.lock().unwrap().push(prompt.clone());

        let rule = self
            .rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, r)| r.clone());
        match rule {
            Some(Scripted::Reply(text)) => Ok(LlmResponse {
                text,
                model: Some(model.to_string()),
                tokens_used: None,
            }),
            Some(Scripted::Status(status)) => Err(FactcheckError::Gateway {
                status,
                status_text: "Scripted".to_string(),
                message: "scripted failure".to_string(),
            }),
            None => Err(FactcheckError::Decode(format!(
                "no scripted reply for prompt starting {:?}",
                prompt.chars().take(40).collect::<String>()
            ))),
        }
    }

    fn endpoint(&self) -> &str {
        "scripted://"
    }
}
