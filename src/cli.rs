//! CLI subcommand handlers for forgetbench.
//!
//! This module contains all command implementations so main.rs stays focused
//! on argument parsing and routing. Handlers are synchronous; the evaluation
//! loop spins up a tokio runtime for the duration of the run.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::analysis::{self, plots, report};
use crate::config::schema::Config;
use crate::dataset;
use crate::runner;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_run_build_writes_full_dataset() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.dataset_path = dir.path().join("scenarios.jsonl").display().to_string();

        let n = run_build(&config).unwrap();
        assert_eq!(n, 60);

        let loaded =
            dataset::store::load_dataset(&PathBuf::from(&config.dataset_path)).unwrap();
        assert_eq!(loaded.len(), 60);
    }

    #[test]
    fn test_run_eval_without_dataset_fails() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.dataset_path = dir.path().join("missing.jsonl").display().to_string();

        let err = run_eval(&config, Some(1), &[]).unwrap_err();
        assert!(err.to_string().contains("loading dataset"), "got: {:#}", err);
    }

    #[test]
    fn test_run_report_without_results_fails() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.results_dir = dir.path().join("none").display().to_string();

        assert!(run_report(&config).is_err());
    }
}

// ============================================================================
// Build
// ============================================================================

pub(crate) fn cmd_build(config: &Config) {
    match run_build(config) {
        Ok(n) => println!("  Wrote {} scenarios to {}", n, config.dataset_path),
        Err(e) => {
            eprintln!("Build failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run_build(config: &Config) -> Result<usize> {
    let scenarios = dataset::build_scenarios();
    let path = PathBuf::from(&config.dataset_path);
    dataset::store::write_dataset(&path, &scenarios)
}

// ============================================================================
// Run
// ============================================================================

pub(crate) fn cmd_run(config: &Config, limit: Option<usize>, models: Vec<String>) {
    match run_eval(config, limit, &models) {
        Ok(run_id) => println!("\n  Run {} complete", run_id),
        Err(e) => {
            eprintln!("Run failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run_eval(config: &Config, limit: Option<usize>, models: &[String]) -> Result<String> {
    let dataset_path = PathBuf::from(&config.dataset_path);
    let mut scenarios = dataset::store::load_dataset(&dataset_path)
        .context("loading dataset (run `forgetbench build` first)")?;

    if let Some(limit) = limit.or_else(env_eval_limit) {
        scenarios.truncate(limit);
    }
    if scenarios.is_empty() {
        bail!("dataset is empty");
    }

    let selected = config.select_models(models);
    if selected.is_empty() {
        bail!("no models selected");
    }

    println!(
        "{} Evaluating {} scenarios with {} model(s)\n",
        crate::LOGO,
        scenarios.len(),
        selected.len()
    );

    let run_id = runner::new_run_id();
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    runtime.block_on(runner::run_evaluation(config, &selected, &scenarios, &run_id))?;
    Ok(run_id)
}

/// Optional cap on the number of scenarios per (model, style) pass, read
/// from the EVAL_LIMIT environment variable. Invalid values are ignored.
fn env_eval_limit() -> Option<usize> {
    std::env::var("EVAL_LIMIT").ok()?.trim().parse().ok()
}

// ============================================================================
// Analyze / Report
// ============================================================================

pub(crate) fn cmd_analyze(config: &Config) {
    if let Err(e) = run_analyze(config) {
        eprintln!("Analyze failed: {:#}", e);
        std::process::exit(1);
    }
}

fn run_analyze(config: &Config) -> Result<()> {
    let bundle = load_and_analyze(config)?;
    print_tables(&bundle);

    let analysis_dir = PathBuf::from(&config.analysis_dir);
    report::write_artifacts(&bundle, &analysis_dir)?;
    println!("\n  Artifacts in {}", analysis_dir.display());

    let plots_dir = PathBuf::from(&config.plots_dir);
    let accuracy_png = plots::write_accuracy_plot(&bundle, &plots_dir)?;
    let domain_png = plots::write_domain_plot(&bundle, &plots_dir)?;
    println!("  Plots: {}", accuracy_png.display());
    println!("         {}", domain_png.display());
    Ok(())
}

pub(crate) fn cmd_report(config: &Config) {
    if let Err(e) = run_report(config) {
        eprintln!("Report failed: {:#}", e);
        std::process::exit(1);
    }
}

fn run_report(config: &Config) -> Result<()> {
    let bundle = load_and_analyze(config)?;
    print_tables(&bundle);
    Ok(())
}

fn load_and_analyze(config: &Config) -> Result<analysis::RunAnalysis> {
    let results_dir = PathBuf::from(&config.results_dir);
    let (run_id, records) = analysis::load_latest_run(&results_dir)?;
    Ok(analysis::analyze(&run_id, records))
}

fn print_tables(bundle: &analysis::RunAnalysis) {
    println!("{} Run {}\n", crate::LOGO, bundle.run_id);
    print!("{}", report::format_summary_table(&bundle.summary));
    println!();
    print!("{}", report::format_comparison_table(&bundle.comparisons));
}
