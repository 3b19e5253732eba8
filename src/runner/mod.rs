//! Evaluation runner.
//!
//! Walks the (model, prompt style, scenario) grid strictly sequentially,
//! one outbound call at a time, and appends one result row per attempt.
//! A failed call becomes an error row, never an aborted run.

pub mod parse;
pub mod prompt;
pub mod record;

pub use parse::parse_choice;
pub use prompt::{build_messages, PromptStyle};
pub use record::{result_file_name, ResultRecord, ResultWriter};

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::warn;

use crate::config::schema::{Config, ModelEntry};
use crate::dataset::Scenario;
use crate::providers::{create_provider, ChatProvider};

/// Fixed sleeps between calls. Pacing only, there is exactly one attempt
/// per scenario per run.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub request_delay: Duration,
    pub error_delay: Duration,
}

impl Pacing {
    pub fn from_config(config: &Config) -> Self {
        Pacing {
            request_delay: Duration::from_millis(config.request_delay_ms),
            error_delay: Duration::from_millis(config.error_delay_ms),
        }
    }
}

/// Timestamp identifying one invocation of the runner. All result files of
/// a run share this prefix.
pub fn new_run_id() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S").to_string()
}

/// Evaluate every (model, style) combination in `models` over `scenarios`.
///
/// Credentials for every entry are resolved up front, so a missing key
/// aborts before the first call is made.
pub async fn run_evaluation(
    config: &Config,
    models: &[ModelEntry],
    scenarios: &[Scenario],
    run_id: &str,
) -> Result<()> {
    let pacing = Pacing::from_config(config);

    let mut providers: Vec<Arc<dyn ChatProvider>> = Vec::with_capacity(models.len());
    for entry in models {
        providers.push(create_provider(entry.provider, config.anthropic_max_tokens)?);
    }

    let results_dir = Path::new(&config.results_dir);
    for (entry, provider) in models.iter().zip(&providers) {
        for style in &entry.prompt_styles {
            let file_name = result_file_name(run_id, &entry.name, *style);
            let out_path = results_dir.join(&file_name);
            println!(
                "Evaluating {} [{}] -> {}",
                entry.name,
                style,
                out_path.display()
            );
            let rows = run_model_style(
                provider.as_ref(),
                &entry.name,
                &entry.model,
                *style,
                scenarios,
                &out_path,
                pacing,
            )
            .await?;
            println!("  finished {}: {} rows", file_name, rows);
        }
    }
    Ok(())
}

/// Run one model under one style over the whole scenario list, appending
/// a row per scenario to `out_path`. Returns the number of rows written.
pub async fn run_model_style(
    provider: &dyn ChatProvider,
    model_name: &str,
    model_id: &str,
    style: PromptStyle,
    scenarios: &[Scenario],
    out_path: &Path,
    pacing: Pacing,
) -> Result<usize> {
    let mut writer = ResultWriter::create(out_path)?;
    let mut written = 0usize;

    for scenario in scenarios {
        let messages = build_messages(style, scenario);
        match provider.call(model_id, &messages).await {
            Ok(reply) => {
                let record = ResultRecord::scored(
                    scenario,
                    style,
                    model_name,
                    model_id,
                    reply.text,
                    reply.usage,
                );
                writer.append(&record)?;
                written += 1;
                tokio::time::sleep(pacing.request_delay).await;
            }
            Err(e) => {
                warn!(
                    "{} call failed for {} ({} [{}]): {}",
                    provider.name(),
                    scenario.id,
                    model_name,
                    style,
                    e
                );
                let record =
                    ResultRecord::failed(scenario, style, model_name, model_id, e.to_string());
                writer.append(&record)?;
                written += 1;
                tokio::time::sleep(pacing.error_delay).await;
            }
        }
    }
    Ok(written)
}
