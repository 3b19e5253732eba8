//! Analysis artifacts: CSV tables, run marker, failure samples, and the
//! fixed-width console tables printed by the analyze and report commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::{sample_failures, ComparisonRow, RunAnalysis, SummaryRow};

const FAILURE_SAMPLES_PER_GROUP: usize = 2;

// ---------------------------------------------------------------------------
// File artifacts
// ---------------------------------------------------------------------------

/// Write the full artifact set for one run into `analysis_dir`.
///
/// Produces `summary.csv`, `domain_breakdown.csv`, `prompt_comparisons.csv`,
/// `run_id.txt` (the bare run id) and `sample_failures.json`.
pub fn write_artifacts(analysis: &RunAnalysis, analysis_dir: &Path) -> Result<()> {
    fs::create_dir_all(analysis_dir)
        .with_context(|| format!("creating analysis dir {}", analysis_dir.display()))?;

    write_csv(&analysis.summary, &analysis_dir.join("summary.csv"))?;
    write_csv(&analysis.domains, &analysis_dir.join("domain_breakdown.csv"))?;
    write_csv(&analysis.comparisons, &analysis_dir.join("prompt_comparisons.csv"))?;

    let run_id_path = analysis_dir.join("run_id.txt");
    fs::write(&run_id_path, &analysis.run_id)
        .with_context(|| format!("writing {}", run_id_path.display()))?;

    let failures = sample_failures(&analysis.records, FAILURE_SAMPLES_PER_GROUP);
    let failures_path = analysis_dir.join("sample_failures.json");
    let json = serde_json::to_string_pretty(&failures)?;
    fs::write(&failures_path, json)
        .with_context(|| format!("writing {}", failures_path.display()))?;

    Ok(())
}

fn write_csv<T: Serialize>(rows: &[T], path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("writing row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Console tables
// ---------------------------------------------------------------------------

pub fn format_summary_table(rows: &[SummaryRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<24} {:<8} {:>4} {:>8} {:>9} {:>18}\n",
        "Model", "Style", "N", "Correct", "Accuracy", "95% CI"
    ));
    for row in rows {
        let style = row.prompt_style.to_string();
        let interval = format!(
            "[{:.1}%, {:.1}%]",
            row.ci_low * 100.0,
            row.ci_high * 100.0
        );
        out.push_str(&format!(
            "{:<24} {:<8} {:>4} {:>8} {:>8.1}% {:>18}\n",
            row.model,
            style,
            row.n_examples,
            row.n_correct,
            row.accuracy * 100.0,
            interval,
        ));
    }
    out
}

pub fn format_comparison_table(rows: &[ComparisonRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<24} {:>8} {:>8} {:>8} {:>4} {:>4} {:>9} {:>10}\n",
        "Model", "Direct", "CoT", "Delta", "b", "c", "p-value", "Cohen's h"
    ));
    for row in rows {
        out.push_str(&format!(
            "{:<24} {:>7.1}% {:>7.1}% {:>+7.1}% {:>4} {:>4} {:>9.4} {:>+10.3}\n",
            row.model,
            row.direct_accuracy * 100.0,
            row.cot_accuracy * 100.0,
            row.delta * 100.0,
            row.mcnemar_b,
            row.mcnemar_c,
            row.mcnemar_p_value,
            row.cohen_h_cot_vs_direct,
        ));
    }
    out
}
