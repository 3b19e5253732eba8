//! Centralized provider construction.
//!
//! Providers are created through this module rather than by calling the
//! binding constructors directly. Credential resolution happens here, at
//! construction time, so a missing key aborts the run before any scenario
//! is attempted.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::anthropic::AnthropicProvider;
use super::base::ChatProvider;
use super::openai::OpenAiProvider;
use super::openrouter::OpenRouterProvider;
use crate::errors::ProviderError;

/// Which API binding a model entry routes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Openai,
    Anthropic,
    Openrouter,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProviderKind::Openai => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Openrouter => "openrouter",
        };
        write!(f, "{}", name)
    }
}

impl ProviderKind {
    /// Environment variables that may carry this provider's credential,
    /// in lookup order.
    pub fn credential_vars(&self) -> &'static [&'static str] {
        match self {
            ProviderKind::Openai => &["OPENAI_API_KEY"],
            ProviderKind::Anthropic => &["CLAUDE_KEY", "ANTHROPIC_API_KEY"],
            ProviderKind::Openrouter => &["OPENROUTER_API_KEY"],
        }
    }
}

/// Resolve the first non-empty credential variable for a provider kind.
fn resolve_credential(kind: ProviderKind) -> Result<String, ProviderError> {
    for var in kind.credential_vars() {
        if let Ok(value) = std::env::var(var) {
            if !value.trim().is_empty() {
                return Ok(value);
            }
        }
    }
    Err(ProviderError::MissingCredential(
        kind.credential_vars().join(" or "),
    ))
}

/// Create a provider for `kind`, resolving its credential from the
/// environment. `anthropic_max_tokens` caps native Messages API completions
/// and is ignored by the other bindings.
pub fn create_provider(
    kind: ProviderKind,
    anthropic_max_tokens: u32,
) -> Result<Arc<dyn ChatProvider>> {
    let api_key = resolve_credential(kind)?;
    let provider: Arc<dyn ChatProvider> = match kind {
        ProviderKind::Openai => Arc::new(OpenAiProvider::new(&api_key)),
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(&api_key, anthropic_max_tokens)),
        ProviderKind::Openrouter => Arc::new(OpenRouterProvider::new(&api_key)),
    };
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_display() {
        assert_eq!(ProviderKind::Openai.to_string(), "openai");
        assert_eq!(ProviderKind::Anthropic.to_string(), "anthropic");
        assert_eq!(ProviderKind::Openrouter.to_string(), "openrouter");
    }

    #[test]
    fn test_provider_kind_serde_lowercase() {
        let kind: ProviderKind = serde_json::from_str("\"openrouter\"").unwrap();
        assert_eq!(kind, ProviderKind::Openrouter);
        assert_eq!(
            serde_json::to_string(&ProviderKind::Openai).unwrap(),
            "\"openai\""
        );
    }

    #[test]
    fn test_provider_kind_rejects_unknown() {
        assert!(serde_json::from_str::<ProviderKind>("\"azure\"").is_err());
    }

    #[test]
    fn test_credential_vars_lookup_order() {
        assert_eq!(ProviderKind::Openai.credential_vars(), ["OPENAI_API_KEY"]);
        assert_eq!(
            ProviderKind::Anthropic.credential_vars(),
            ["CLAUDE_KEY", "ANTHROPIC_API_KEY"]
        );
        assert_eq!(
            ProviderKind::Openrouter.credential_vars(),
            ["OPENROUTER_API_KEY"]
        );
    }

    #[test]
    fn test_missing_credential_message_names_every_var() {
        let err = ProviderError::MissingCredential(
            ProviderKind::Anthropic.credential_vars().join(" or "),
        );
        assert_eq!(
            err.to_string(),
            "Missing credential: set CLAUDE_KEY or ANTHROPIC_API_KEY"
        );
    }
}
