//! Anthropic Messages API binding.
//!
//! Speaks `POST /v1/messages` directly. The shared message list is translated
//! on the way out: system messages move to the top-level `system` field and
//! the remaining turns are wrapped in `text` content blocks. Reply text is
//! the concatenation of `text`-type blocks in the response.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::base::{ChatMessage, ChatProvider, ProviderReply};
use crate::errors::ProviderError;

const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    api_key: String,
    api_base: String,
    max_tokens: u32,
    client: Client,
}

impl AnthropicProvider {
    pub fn new(api_key: &str, max_tokens: u32) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_base: ANTHROPIC_API_BASE.to_string(),
            max_tokens,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn call(&self, model: &str, messages: &[ChatMessage]) -> Result<ProviderReply> {
        let url = format!("{}/v1/messages", self.api_base);
        let (system, turns) = split_system(messages);

        let mut body = serde_json::json!({
            "model": model,
            "messages": turns,
            "max_tokens": self.max_tokens,
            "temperature": 0,
        });
        if let Some(system_text) = &system {
            body["system"] = serde_json::json!(system_text);
        }

        debug!("anthropic chat: model={}", model);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
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
        parse_messages_response(&data)
    }
}

/// Hoist system messages into the top-level `system` string and wrap the
/// remaining turns in Anthropic content blocks. Multiple system messages
/// are joined with newlines.
fn split_system(messages: &[ChatMessage]) -> (Option<String>, Vec<serde_json::Value>) {
    let mut system_parts: Vec<&str> = Vec::new();
    let mut turns: Vec<serde_json::Value> = Vec::new();

    for msg in messages {
        if msg.role == "system" {
            system_parts.push(&msg.content);
            continue;
        }
        turns.push(serde_json::json!({
            "role": msg.role,
            "content": [{ "type": "text", "text": msg.content }],
        }));
    }

    let system = if system_parts.is_empty() {
        None
    } else {
        Some(system_parts.join("\n"))
    };
    (system, turns)
}

/// Parse a Messages API response body into a reply.
///
/// A response with no `content` array is malformed; an empty array (or one
/// with only non-text blocks) becomes an empty reply.
fn parse_messages_response(data: &serde_json::Value) -> Result<ProviderReply> {
    let blocks = data
        .get("content")
        .and_then(|c| c.as_array())
        .ok_or(ProviderError::EmptyCompletion)?;

    let texts: Vec<&str> = blocks
        .iter()
        .filter(|b| b.get("type").and_then(|t| t.as_str()) == Some("text"))
        .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
        .collect();
    let text = texts.join("\n");

    let usage = match data.get("usage") {
        Some(value) if !value.is_null() => Some(
            serde_json::from_value(value.clone())
                .map_err(|e| ProviderError::JsonParseError(e.to_string()))?,
        ),
        _ => None,
    };

    Ok(ProviderReply { text, usage })
}
