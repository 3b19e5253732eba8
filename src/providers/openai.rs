//! OpenAI chat-completions binding.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::base::{ChatMessage, ChatProvider, ProviderReply};
use crate::errors::ProviderError;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

pub struct OpenAiProvider {
    api_key: String,
    api_base: String,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_base: OPENAI_API_BASE.to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn call(&self, model: &str, messages: &[ChatMessage]) -> Result<ProviderReply> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = serde_json::json!({
            "model": model,
            "messages": messages,
            "temperature": 0,
            "top_p": 1,
        });

        debug!("openai chat: model={}", model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::HttpError(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::ResponseReadError(e.to_string()))?;
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: text,
            }
            .into());
        }

        let data: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| ProviderError::JsonParseError(e.to_string()))?;
        parse_chat_completion(&data)
    }
}

/// Parse a chat-completions response body into a reply.
///
/// Shared with the OpenRouter binding, which speaks the same shape. A
/// missing or null `content` becomes an empty reply rather than an error,
/// so unanswered completions still flow through as scored rows; a missing
/// `choices` array is a malformed response.
pub(crate) fn parse_chat_completion(data: &serde_json::Value) -> Result<ProviderReply> {
    let choice = data
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .ok_or(ProviderError::EmptyCompletion)?;

    let text = choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let usage = match data.get("usage") {
        Some(value) if !value.is_null() => Some(
            serde_json::from_value(value.clone())
                .map_err(|e| ProviderError::JsonParseError(e.to_string()))?,
        ),
        _ => None,
    };

    Ok(ProviderReply { text, usage })
}
