//! Result aggregation.
//!
//! Loads the latest run's result files and turns them into the analysis
//! tables: per-model/per-style accuracy with Wilson intervals, per-domain
//! breakdowns, and paired direct-vs-cot comparisons with McNemar tests and
//! Cohen's h effect sizes.

pub mod plots;
pub mod report;
pub mod stats;

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::dataset::Domain;
use crate::runner::{PromptStyle, ResultRecord};

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

/// Accuracy of one (model, prompt style) combination over a run.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub run_id: String,
    pub model: String,
    pub prompt_style: PromptStyle,
    pub n_examples: u64,
    pub n_correct: u64,
    pub accuracy: f64,
    pub ci_low: f64,
    pub ci_high: f64,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
}

/// Accuracy of one (model, prompt style, domain) combination.
#[derive(Debug, Clone, Serialize)]
pub struct DomainRow {
    pub run_id: String,
    pub model: String,
    pub prompt_style: PromptStyle,
    pub domain: Domain,
    pub n_examples: u64,
    pub n_correct: u64,
    pub accuracy: f64,
}

/// Paired direct-vs-cot comparison for one model, on the scenario subset
/// answered under both styles.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub run_id: String,
    pub model: String,
    pub direct_accuracy: f64,
    pub cot_accuracy: f64,
    pub delta: f64,
    pub mcnemar_b: u64,
    pub mcnemar_c: u64,
    pub mcnemar_p_value: f64,
    pub cohen_h_cot_vs_direct: f64,
}

/// Everything the analyze and report commands need for one run.
#[derive(Debug)]
pub struct RunAnalysis {
    pub run_id: String,
    pub records: Vec<ResultRecord>,
    pub summary: Vec<SummaryRow>,
    pub domains: Vec<DomainRow>,
    pub comparisons: Vec<ComparisonRow>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load every result row of the latest run in `results_dir`.
///
/// Result files are named `<run>__<model>__<style>.jsonl`; files are grouped
/// by the run prefix and the lexicographically latest group wins, which for
/// timestamp prefixes is the most recent run. Zero result files is fatal.
pub fn load_latest_run(results_dir: &Path) -> Result<(String, Vec<ResultRecord>)> {
    let entries = fs::read_dir(results_dir)
        .with_context(|| format!("reading results dir {}", results_dir.display()))?;

    let mut by_run: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(".jsonl") {
            continue;
        }
        let run = match name.split_once("__") {
            Some((run, _)) => run.to_string(),
            None => continue,
        };
        by_run.entry(run).or_default().push(entry.path());
    }

    let (run_id, mut files) = match by_run.pop_last() {
        Some(latest) => latest,
        None => bail!("no result files found in {}", results_dir.display()),
    };
    files.sort();

    let mut records = Vec::new();
    for path in &files {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading result file {}", path.display()))?;
        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let record: ResultRecord = serde_json::from_str(line)
                .with_context(|| format!("parsing result row in {}", path.display()))?;
            records.push(record);
        }
    }
    Ok((run_id, records))
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Compute all analysis tables for one run.
pub fn analyze(run_id: &str, records: Vec<ResultRecord>) -> RunAnalysis {
    let summary = summarize(run_id, &records);
    let domains = domain_breakdown(run_id, &records);
    let comparisons = compare_styles(run_id, &records);
    RunAnalysis {
        run_id: run_id.to_string(),
        records,
        summary,
        domains,
        comparisons,
    }
}

fn summarize(run_id: &str, records: &[ResultRecord]) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<(&str, PromptStyle), Vec<&ResultRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.model_name.as_str(), record.prompt_style))
            .or_default()
            .push(record);
    }

    let mut rows = Vec::with_capacity(groups.len());
    for ((model, style), group) in groups {
        let n_examples = group.len() as u64;
        let n_correct = group.iter().filter(|r| r.is_correct).count() as u64;
        let accuracy = n_correct as f64 / n_examples as f64;
        let (ci_low, ci_high) = stats::wilson_interval(n_correct, n_examples);
        let prompt_tokens: i64 = group
            .iter()
            .filter_map(|r| r.usage.as_ref())
            .map(|u| u.prompt_tokens())
            .sum();
        let completion_tokens: i64 = group
            .iter()
            .filter_map(|r| r.usage.as_ref())
            .map(|u| u.completion_tokens())
            .sum();
        rows.push(SummaryRow {
            run_id: run_id.to_string(),
            model: model.to_string(),
            prompt_style: style,
            n_examples,
            n_correct,
            accuracy,
            ci_low,
            ci_high,
            prompt_tokens,
            completion_tokens,
        });
    }
    rows
}

fn domain_breakdown(run_id: &str, records: &[ResultRecord]) -> Vec<DomainRow> {
    let mut groups: BTreeMap<(&str, PromptStyle, Domain), Vec<&ResultRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.model_name.as_str(), record.prompt_style, record.domain))
            .or_default()
            .push(record);
    }

    let mut rows = Vec::with_capacity(groups.len());
    for ((model, style, domain), group) in groups {
        let n_examples = group.len() as u64;
        let n_correct = group.iter().filter(|r| r.is_correct).count() as u64;
        rows.push(DomainRow {
            run_id: run_id.to_string(),
            model: model.to_string(),
            prompt_style: style,
            domain,
            n_examples,
            n_correct,
            accuracy: n_correct as f64 / n_examples as f64,
        });
    }
    rows
}

fn compare_styles(run_id: &str, records: &[ResultRecord]) -> Vec<ComparisonRow> {
    let models: BTreeSet<&str> = records.iter().map(|r| r.model_name.as_str()).collect();

    let mut rows = Vec::new();
    for model in models {
        let outcomes = |style: PromptStyle| -> BTreeMap<&str, bool> {
            records
                .iter()
                .filter(|r| r.model_name == model && r.prompt_style == style)
                .map(|r| (r.scenario_id.as_str(), r.is_correct))
                .collect()
        };
        let direct = outcomes(PromptStyle::Direct);
        let cot = outcomes(PromptStyle::Cot);

        // Inner join on scenario id: only scenarios answered under both
        // styles participate in the pairing.
        let mut joined = 0u64;
        let mut direct_correct = 0u64;
        let mut cot_correct = 0u64;
        let mut b = 0u64;
        let mut c = 0u64;
        for (scenario_id, &direct_ok) in &direct {
            let cot_ok = match cot.get(scenario_id) {
                Some(&ok) => ok,
                None => continue,
            };
            joined += 1;
            if direct_ok {
                direct_correct += 1;
            }
            if cot_ok {
                cot_correct += 1;
            }
            if direct_ok && !cot_ok {
                b += 1;
            }
            if !direct_ok && cot_ok {
                c += 1;
            }
        }
        if joined == 0 {
            continue;
        }

        let direct_accuracy = direct_correct as f64 / joined as f64;
        let cot_accuracy = cot_correct as f64 / joined as f64;
        let (_statistic, mcnemar_p_value) = stats::mcnemar_test(b, c);
        rows.push(ComparisonRow {
            run_id: run_id.to_string(),
            model: model.to_string(),
            direct_accuracy,
            cot_accuracy,
            delta: cot_accuracy - direct_accuracy,
            mcnemar_b: b,
            mcnemar_c: c,
            mcnemar_p_value,
            cohen_h_cot_vs_direct: stats::cohen_h(cot_accuracy, direct_accuracy),
        });
    }
    rows
}

/// Up to `per_group` failing rows per (model, style, domain), in
/// (model, style, domain, scenario id) order.
pub fn sample_failures(records: &[ResultRecord], per_group: usize) -> Vec<ResultRecord> {
    let mut failures: Vec<&ResultRecord> = records.iter().filter(|r| !r.is_correct).collect();
    failures.sort_by(|a, b| {
        (a.model_name.as_str(), a.prompt_style, a.domain, a.scenario_id.as_str()).cmp(&(
            b.model_name.as_str(),
            b.prompt_style,
            b.domain,
            b.scenario_id.as_str(),
        ))
    });

    let mut taken: BTreeMap<(&str, PromptStyle, Domain), usize> = BTreeMap::new();
    let mut out = Vec::new();
    for record in failures {
        let count = taken
            .entry((record.model_name.as_str(), record.prompt_style, record.domain))
            .or_insert(0);
        if *count < per_group {
            out.push(record.clone());
            *count += 1;
        }
    }
    out
}
