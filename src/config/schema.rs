//! Configuration schema for forgetbench.
//!
//! All structs use `#[serde(rename_all = "camelCase")]` so that the JSON
//! config file uses camelCase keys while Rust code uses snake_case fields.
//! Every field has a default, so an empty or missing config file yields the
//! full study setup.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::providers::ProviderKind;
use crate::runner::PromptStyle;

// ---------------------------------------------------------------------------
// Model roster
// ---------------------------------------------------------------------------

/// One evaluated model: a short display name, the provider binding that
/// serves it, the provider-side model identifier, and the prompt styles to
/// run it under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
    pub name: String,
    pub provider: ProviderKind,
    pub model: String,
    #[serde(default = "default_prompt_styles")]
    pub prompt_styles: Vec<PromptStyle>,
}

impl ModelEntry {
    pub fn new(name: &str, provider: ProviderKind, model: &str) -> Self {
        ModelEntry {
            name: name.to_string(),
            provider,
            model: model.to_string(),
            prompt_styles: default_prompt_styles(),
        }
    }
}

fn default_prompt_styles() -> Vec<PromptStyle> {
    vec![PromptStyle::Direct, PromptStyle::Cot]
}

fn default_models() -> Vec<ModelEntry> {
    vec![
        ModelEntry::new("gpt-4.1", ProviderKind::Openai, "gpt-4.1"),
        ModelEntry::new("gpt-4o-mini", ProviderKind::Openai, "gpt-4o-mini"),
        ModelEntry::new(
            "claude-3.5-sonnet",
            ProviderKind::Openrouter,
            "anthropic/claude-3.5-sonnet",
        ),
        ModelEntry::new(
            "mistral-large-2407",
            ProviderKind::Openrouter,
            "mistralai/mistral-large-2407",
        ),
    ]
}

// ---------------------------------------------------------------------------
// Root config
// ---------------------------------------------------------------------------

/// Root configuration: dataset and artifact paths, call pacing, the
/// Anthropic completion cap, and the model roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,
    #[serde(default = "default_results_dir")]
    pub results_dir: String,
    #[serde(default = "default_analysis_dir")]
    pub analysis_dir: String,
    #[serde(default = "default_plots_dir")]
    pub plots_dir: String,
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_error_delay_ms")]
    pub error_delay_ms: u64,
    #[serde(default = "default_anthropic_max_tokens")]
    pub anthropic_max_tokens: u32,
    #[serde(default = "default_models")]
    pub models: Vec<ModelEntry>,
}

fn default_dataset_path() -> String {
    "data/conditional_forgetting.jsonl".to_string()
}

fn default_results_dir() -> String {
    "results/model_outputs".to_string()
}

fn default_analysis_dir() -> String {
    "results/analysis".to_string()
}

fn default_plots_dir() -> String {
    "results/plots".to_string()
}

fn default_request_delay_ms() -> u64 {
    300
}

fn default_error_delay_ms() -> u64 {
    2000
}

fn default_anthropic_max_tokens() -> u32 {
    512
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            results_dir: default_results_dir(),
            analysis_dir: default_analysis_dir(),
            plots_dir: default_plots_dir(),
            request_delay_ms: default_request_delay_ms(),
            error_delay_ms: default_error_delay_ms(),
            anthropic_max_tokens: default_anthropic_max_tokens(),
            models: default_models(),
        }
    }
}

impl Config {
    /// Restrict the roster to the named models. An empty name list keeps
    /// everything; unknown names are warned about and skipped.
    pub fn select_models(&self, names: &[String]) -> Vec<ModelEntry> {
        if names.is_empty() {
            return self.models.clone();
        }
        let mut selected = Vec::new();
        for name in names {
            match self.models.iter().find(|m| &m.name == name) {
                Some(entry) => selected.push(entry.clone()),
                None => warn!("unknown model name in selection: {}", name),
            }
        }
        selected
    }
}
