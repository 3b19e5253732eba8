//! Accuracy charts rendered with plotters.
//!
//! Two grouped bar charts per run: overall accuracy by model and prompt
//! style, and the per-domain breakdown. Charts are PNG files named after
//! the run id so successive runs never overwrite each other.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use plotters::prelude::*;

use super::RunAnalysis;
use crate::dataset::Domain;
use crate::runner::PromptStyle;

const BAR_PALETTE: [RGBColor; 4] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
];

// Bars of one group span 0.8 of the unit slot centred on the group index.
const GROUP_HALF_WIDTH: f64 = 0.4;
const BAR_FILL: f64 = 0.9;

/// Overall accuracy chart: one group per model, one bar per prompt style.
pub fn write_accuracy_plot(analysis: &RunAnalysis, plots_dir: &Path) -> Result<PathBuf> {
    if analysis.summary.is_empty() {
        bail!("no summary rows to plot");
    }
    fs::create_dir_all(plots_dir)
        .with_context(|| format!("creating plots dir {}", plots_dir.display()))?;
    let path = plots_dir.join(format!("accuracy_{}.png", analysis.run_id));

    let models: Vec<String> = analysis
        .summary
        .iter()
        .map(|row| row.model.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let styles: Vec<PromptStyle> = analysis
        .summary
        .iter()
        .map(|row| row.prompt_style)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let accuracy: BTreeMap<(&str, PromptStyle), f64> = analysis
        .summary
        .iter()
        .map(|row| ((row.model.as_str(), row.prompt_style), row.accuracy))
        .collect();

    // The backend borrows `path` until the drawing area drops, so the whole
    // render lives in its own scope.
    {
        let root = BitMapBackend::new(&path, (1000, 600)).into_drawing_area();
        root.fill(&WHITE)?;

        let caption = format!(
            "Conditional Forgetting Accuracy by Model & Prompt (Run {})",
            analysis.run_id
        );
        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..(models.len() as f64 - 0.5), 0f64..1f64)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(models.len())
            .x_label_formatter(&|x| group_label(*x, &models))
            .y_desc("Accuracy")
            .draw()?;

        let slot = GROUP_HALF_WIDTH * 2.0 / styles.len() as f64;
        for (style_idx, style) in styles.iter().enumerate() {
            let color = BAR_PALETTE[style_idx % BAR_PALETTE.len()];
            let bars = models.iter().enumerate().filter_map(|(model_idx, model)| {
                let value = *accuracy.get(&(model.as_str(), *style))?;
                let x0 = model_idx as f64 - GROUP_HALF_WIDTH + style_idx as f64 * slot;
                let x1 = x0 + slot * BAR_FILL;
                Some(Rectangle::new([(x0, 0.0), (x1, value)], color.filled()))
            });
            chart
                .draw_series(bars)?
                .label(style.to_string())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        root.present()?;
    }
    Ok(path)
}

/// Per-domain chart: one group per (model, style) combination, one bar per
/// domain.
pub fn write_domain_plot(analysis: &RunAnalysis, plots_dir: &Path) -> Result<PathBuf> {
    if analysis.domains.is_empty() {
        bail!("no domain rows to plot");
    }
    fs::create_dir_all(plots_dir)
        .with_context(|| format!("creating plots dir {}", plots_dir.display()))?;
    let path = plots_dir.join(format!("domain_accuracy_{}.png", analysis.run_id));

    let groups: Vec<(String, PromptStyle)> = analysis
        .domains
        .iter()
        .map(|row| (row.model.clone(), row.prompt_style))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let labels: Vec<String> = groups
        .iter()
        .map(|(model, style)| format!("{} ({})", model, style))
        .collect();
    let domains: Vec<Domain> = analysis
        .domains
        .iter()
        .map(|row| row.domain)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let accuracy: BTreeMap<(&str, PromptStyle, Domain), f64> = analysis
        .domains
        .iter()
        .map(|row| {
            (
                (row.model.as_str(), row.prompt_style, row.domain),
                row.accuracy,
            )
        })
        .collect();

    {
        let root = BitMapBackend::new(&path, (1400, 600)).into_drawing_area();
        root.fill(&WHITE)?;

        let caption = format!("Domain Accuracy Breakdown (Run {})", analysis.run_id);
        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..(groups.len() as f64 - 0.5), 0f64..1f64)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(groups.len())
            .x_label_formatter(&|x| group_label(*x, &labels))
            .x_label_style(("sans-serif", 11))
            .y_desc("Accuracy")
            .draw()?;

        let slot = GROUP_HALF_WIDTH * 2.0 / domains.len() as f64;
        for (domain_idx, domain) in domains.iter().enumerate() {
            let color = BAR_PALETTE[domain_idx % BAR_PALETTE.len()];
            let bars = groups
                .iter()
                .enumerate()
                .filter_map(|(group_idx, (model, style))| {
                    let value = *accuracy.get(&(model.as_str(), *style, *domain))?;
                    let x0 = group_idx as f64 - GROUP_HALF_WIDTH + domain_idx as f64 * slot;
                    let x1 = x0 + slot * BAR_FILL;
                    Some(Rectangle::new([(x0, 0.0), (x1, value)], color.filled()))
                });
            chart
                .draw_series(bars)?
                .label(domain.to_string())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        root.present()?;
    }
    Ok(path)
}

/// Label an axis position with its group name when the position sits on an
/// integer tick, and with nothing otherwise.
fn group_label(x: f64, names: &[String]) -> String {
    let idx = x.round();
    if (x - idx).abs() > 0.01 || idx < 0.0 {
        return String::new();
    }
    names.get(idx as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;

    // Rendering itself is exercised by the analyze command; these cover the
    // guard paths, which never touch the font stack.

    #[test]
    fn test_empty_run_is_rejected_before_any_file_io() {
        let dir = tempfile::tempdir().unwrap();
        let analysis = analyze("20240102-090000", Vec::new());

        let err = write_accuracy_plot(&analysis, dir.path()).unwrap_err();
        assert!(err.to_string().contains("no summary rows"));
        let err = write_domain_plot(&analysis, dir.path()).unwrap_err();
        assert!(err.to_string().contains("no domain rows"));

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_group_label_only_marks_integer_ticks() {
        let names = vec!["gpt-4.1".to_string(), "gpt-4o-mini".to_string()];
        assert_eq!(group_label(0.0, &names), "gpt-4.1");
        assert_eq!(group_label(1.004, &names), "gpt-4o-mini");
        assert_eq!(group_label(0.5, &names), "");
        assert_eq!(group_label(-1.0, &names), "");
        assert_eq!(group_label(5.0, &names), "");
    }
}
