//! Provider-facing types and the `ChatProvider` trait.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// One chat message. The runner always sends exactly two: a system
/// instruction and a user prompt.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Usage
// ---------------------------------------------------------------------------

/// Token usage as reported by a provider.
///
/// Two field-name conventions exist across providers, and result files may
/// carry either. Deserialization tries the input/output shape first because
/// its fields are required; the prompt/completion shape accepts any object,
/// including an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UsageReport {
    /// `input_tokens` / `output_tokens` (content-block shape).
    InputOutput { input_tokens: i64, output_tokens: i64 },
    /// `prompt_tokens` / `completion_tokens` / `total_tokens`, all optional
    /// (chat-completion shape).
    PromptCompletion {
        #[serde(skip_serializing_if = "Option::is_none")]
        prompt_tokens: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        completion_tokens: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        total_tokens: Option<i64>,
    },
}

impl UsageReport {
    /// Canonical prompt-side count; zero when unreported.
    pub fn prompt_tokens(&self) -> i64 {
        match self {
            UsageReport::InputOutput { input_tokens, .. } => *input_tokens,
            UsageReport::PromptCompletion { prompt_tokens, .. } => prompt_tokens.unwrap_or(0),
        }
    }

    /// Canonical completion-side count; zero when unreported.
    pub fn completion_tokens(&self) -> i64 {
        match self {
            UsageReport::InputOutput { output_tokens, .. } => *output_tokens,
            UsageReport::PromptCompletion {
                completion_tokens, ..
            } => completion_tokens.unwrap_or(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Reply from one provider call.
#[derive(Debug, Clone)]
pub struct ProviderReply {
    pub text: String,
    pub usage: Option<UsageReport>,
}

/// A model provider that can answer one chat request.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Send `messages` to `model` and return the reply text plus whatever
    /// usage the provider reported. Failures are raised, never folded into
    /// the reply; the runner records them per scenario and moves on.
    async fn call(&self, model: &str, messages: &[ChatMessage]) -> Result<ProviderReply>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let msg = ChatMessage::system("obey the rule");
        assert_eq!(msg.role, "system");
        let msg = ChatMessage::user("what is 2 ⊕ 2?");
        assert_eq!(msg.role, "user");
    }

    #[test]
    fn test_usage_parses_input_output_convention() {
        let usage: UsageReport =
            serde_json::from_str(r#"{"input_tokens": 120, "output_tokens": 45}"#).unwrap();
        assert_eq!(usage.prompt_tokens(), 120);
        assert_eq!(usage.completion_tokens(), 45);
        assert!(matches!(usage, UsageReport::InputOutput { .. }));
    }

    #[test]
    fn test_usage_parses_prompt_completion_convention() {
        let usage: UsageReport = serde_json::from_str(
            r#"{"prompt_tokens": 80, "completion_tokens": 20, "total_tokens": 100}"#,
        )
        .unwrap();
        assert_eq!(usage.prompt_tokens(), 80);
        assert_eq!(usage.completion_tokens(), 20);
    }

    #[test]
    fn test_usage_empty_object_counts_zero() {
        let usage: UsageReport = serde_json::from_str("{}").unwrap();
        assert_eq!(usage.prompt_tokens(), 0);
        assert_eq!(usage.completion_tokens(), 0);
    }

    #[test]
    fn test_usage_serializes_in_native_convention() {
        let usage = UsageReport::InputOutput {
            input_tokens: 7,
            output_tokens: 3,
        };
        let json = serde_json::to_value(&usage).unwrap();
        assert_eq!(json["input_tokens"], 7);
        assert!(json.get("prompt_tokens").is_none());

        let usage = UsageReport::PromptCompletion {
            prompt_tokens: Some(7),
            completion_tokens: Some(3),
            total_tokens: None,
        };
        let json = serde_json::to_value(&usage).unwrap();
        assert_eq!(json["prompt_tokens"], 7);
        assert!(json.get("total_tokens").is_none());
    }
}
