//! forgetbench - a conditional-forgetting benchmark for chat models.
//!
//! Builds a fixed scenario dataset, queries configured models over it with
//! two prompt styles, and aggregates the recorded answers into accuracy
//! tables, paired statistics, and plots.

mod analysis;
mod cli;
mod config;
mod dataset;
mod errors;
mod providers;
mod runner;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use clap::{Parser, Subcommand};

pub(crate) const VERSION: &str = "0.1.0";
pub(crate) const LOGO: &str = "*";

#[derive(Parser)]
#[command(
    name = "forgetbench",
    about = "forgetbench - conditional forgetting benchmark",
    version = VERSION
)]
struct Cli {
    /// Path to a JSON config file (default: ~/.forgetbench/config.json).
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the scenario dataset (deterministic, same output every run).
    Build,
    /// Query the configured models over the dataset and record answers.
    Run {
        /// Evaluate only the first N scenarios.
        #[arg(short, long)]
        limit: Option<usize>,
        /// Model names from the config to evaluate (default: all).
        #[arg(short, long, value_delimiter = ',')]
        models: Vec<String>,
    },
    /// Aggregate the latest run into tables, CSV artifacts, and plots.
    Analyze,
    /// Print the latest run's tables without writing artifacts.
    Report,
}

fn main() {
    let cli = Cli::parse();

    // Keep HTTP client crates quiet unless RUST_LOG explicitly raises them.
    let noisy_crate_filters = ",hyper=warn,reqwest=warn";
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(_) => {
            let combined = format!(
                "{}{}",
                std::env::var("RUST_LOG").unwrap_or_default(),
                noisy_crate_filters
            );
            tracing_subscriber::EnvFilter::new(combined)
        }
        Err(_) => tracing_subscriber::EnvFilter::new(format!("warn{}", noisy_crate_filters)),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .ok();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "forgetbench started");

    let config = config::loader::load_config(cli.config.as_deref());

    match cli.command {
        Commands::Build => cli::cmd_build(&config),
        Commands::Run { limit, models } => cli::cmd_run(&config, limit, models),
        Commands::Analyze => cli::cmd_analyze(&config),
        Commands::Report => cli::cmd_report(&config),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run_with_limit_and_models() {
        let cli = Cli::try_parse_from([
            "forgetbench",
            "run",
            "--limit",
            "5",
            "--models",
            "gpt-4.1,claude-3.5-sonnet",
        ])
        .unwrap();
        match cli.command {
            Commands::Run { limit, models } => {
                assert_eq!(limit, Some(5));
                assert_eq!(
                    models,
                    vec!["gpt-4.1".to_string(), "claude-3.5-sonnet".to_string()]
                );
            }
            other => panic!(
                "unexpected parsed command: {:?}",
                std::mem::discriminant(&other)
            ),
        }
    }

    #[test]
    fn test_cli_parses_repeated_models_flags() {
        let cli = Cli::try_parse_from([
            "forgetbench",
            "run",
            "--models",
            "gpt-4o-mini",
            "--models",
            "mistral-large-2407",
        ])
        .unwrap();
        match cli.command {
            Commands::Run { limit, models } => {
                assert_eq!(limit, None);
                assert_eq!(models.len(), 2);
            }
            other => panic!(
                "unexpected parsed command: {:?}",
                std::mem::discriminant(&other)
            ),
        }
    }

    #[test]
    fn test_cli_parses_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["forgetbench", "analyze", "--config", "custom.json"]).unwrap();
        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("custom.json"))
        );
        assert!(matches!(cli.command, Commands::Analyze));
    }

    #[test]
    fn test_cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["forgetbench", "frobnicate"]).is_err());
    }
}
