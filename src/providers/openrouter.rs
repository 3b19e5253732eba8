//! OpenRouter chat-completions binding.
//!
//! Same wire shape as the OpenAI endpoint with OpenRouter's attribution
//! headers on top. Hosted models can be slow to first token, so calls carry
//! a generous per-request timeout.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::base::{ChatMessage, ChatProvider, ProviderReply};
use super::openai::parse_chat_completion;
use crate::errors::ProviderError;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const OPENROUTER_REFERER: &str = "https://research-workspace.local";
const OPENROUTER_TITLE: &str = "Conditional Forgetting Study";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub struct OpenRouterProvider {
    api_key: String,
    api_url: String,
    client: Client,
}

impl OpenRouterProvider {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_url: OPENROUTER_API_URL.to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ChatProvider for OpenRouterProvider {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    async fn call(&self, model: &str, messages: &[ChatMessage]) -> Result<ProviderReply> {
        let body = serde_json::json!({
            "model": model,
            "messages": messages,
            "temperature": 0,
            "top_p": 1,
        });

        debug!("openrouter chat: model={}", model);

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", OPENROUTER_REFERER)
            .header("X-Title", OPENROUTER_TITLE)
            .timeout(REQUEST_TIMEOUT)
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
