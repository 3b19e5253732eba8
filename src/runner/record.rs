//! Result rows and the append-only run files that hold them.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::parse::parse_choice;
use super::prompt::PromptStyle;
use crate::dataset::{Domain, Scenario};
use crate::providers::UsageReport;

/// One scored attempt at one scenario. Written once, never rewritten.
///
/// `parsed_choice` is serialized as JSON null when absent so every row shows
/// whether parsing succeeded; `usage` and `error` are omitted entirely when
/// absent (success rows carry `usage`, failure rows carry `error`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    pub scenario_id: String,
    pub domain: Domain,
    pub rule: String,
    pub prompt_style: PromptStyle,
    pub model_name: String,
    pub model_id: String,
    pub raw_response: String,
    pub parsed_choice: Option<String>,
    pub correct_choice: String,
    pub is_correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultRecord {
    /// Row for a completed provider call: parse the reply text and score it
    /// against the scenario's correct label.
    pub fn scored(
        scenario: &Scenario,
        style: PromptStyle,
        model_name: &str,
        model_id: &str,
        raw_response: String,
        usage: Option<UsageReport>,
    ) -> Self {
        let parsed_choice = parse_choice(&raw_response);
        let is_correct = parsed_choice.as_deref() == Some(scenario.correct_choice.as_str());
        ResultRecord {
            scenario_id: scenario.id.clone(),
            domain: scenario.domain,
            rule: scenario.rule.clone(),
            prompt_style: style,
            model_name: model_name.to_string(),
            model_id: model_id.to_string(),
            raw_response,
            parsed_choice,
            correct_choice: scenario.correct_choice.clone(),
            is_correct,
            usage,
            error: None,
        }
    }

    /// Row for a failed provider call. Always unparsed and incorrect.
    pub fn failed(
        scenario: &Scenario,
        style: PromptStyle,
        model_name: &str,
        model_id: &str,
        error: String,
    ) -> Self {
        ResultRecord {
            scenario_id: scenario.id.clone(),
            domain: scenario.domain,
            rule: scenario.rule.clone(),
            prompt_style: style,
            model_name: model_name.to_string(),
            model_id: model_id.to_string(),
            raw_response: String::new(),
            parsed_choice: None,
            correct_choice: scenario.correct_choice.clone(),
            is_correct: false,
            usage: None,
            error: Some(error),
        }
    }
}

/// Result file name for one (run, model, style) combination.
pub fn result_file_name(run_id: &str, model_name: &str, style: PromptStyle) -> String {
    format!("{}__{}__{}.jsonl", run_id, model_name, style)
}

/// Append-only writer for one run file. Each row reaches the file before
/// the call returns, so interrupted runs stay inspectable.
pub struct ResultWriter {
    file: File,
    path: PathBuf,
}

impl ResultWriter {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating results dir {}", parent.display()))?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening result file {}", path.display()))?;
        Ok(ResultWriter {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn append(&mut self, record: &ResultRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        self.file
            .write_all(line.as_bytes())
            .with_context(|| format!("appending to {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::build_scenarios;

    fn sample_scenario() -> Scenario {
        build_scenarios().into_iter().next().unwrap()
    }

    #[test]
    fn test_scored_correct_answer() {
        let scenario = sample_scenario();
        let raw = format!("Final Answer: {}", scenario.correct_choice);
        let record = ResultRecord::scored(&scenario, PromptStyle::Cot, "m", "m-id", raw, None);
        assert_eq!(record.parsed_choice.as_deref(), Some(scenario.correct_choice.as_str()));
        assert!(record.is_correct);
        assert!(record.error.is_none());
    }

    #[test]
    fn test_scored_wrong_answer() {
        let scenario = sample_scenario();
        let wrong = if scenario.correct_choice == "A" { "B" } else { "A" };
        let record = ResultRecord::scored(
            &scenario,
            PromptStyle::Direct,
            "m",
            "m-id",
            wrong.to_string(),
            None,
        );
        assert_eq!(record.parsed_choice.as_deref(), Some(wrong));
        assert!(!record.is_correct);
    }

    #[test]
    fn test_scored_empty_response_is_unparsed_and_incorrect() {
        let scenario = sample_scenario();
        let record =
            ResultRecord::scored(&scenario, PromptStyle::Direct, "m", "m-id", String::new(), None);
        assert!(record.parsed_choice.is_none());
        assert!(!record.is_correct);
    }

    #[test]
    fn test_failed_row_shape() {
        let scenario = sample_scenario();
        let record = ResultRecord::failed(
            &scenario,
            PromptStyle::Direct,
            "m",
            "m-id",
            "HTTP request failed: timeout".to_string(),
        );
        assert_eq!(record.raw_response, "");
        assert!(record.parsed_choice.is_none());
        assert!(!record.is_correct);
        assert!(record.usage.is_none());
        assert_eq!(record.error.as_deref(), Some("HTTP request failed: timeout"));
    }

    #[test]
    fn test_serialization_null_and_omitted_fields() {
        let scenario = sample_scenario();
        let record =
            ResultRecord::scored(&scenario, PromptStyle::Direct, "m", "m-id", String::new(), None);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"parsed_choice\":null"));
        assert!(!json.contains("\"usage\""));
        assert!(!json.contains("\"error\""));

        let failed = ResultRecord::failed(&scenario, PromptStyle::Cot, "m", "m-id", "boom".into());
        let json = serde_json::to_string(&failed).unwrap();
        assert!(json.contains("\"error\":\"boom\""));
        assert!(!json.contains("\"usage\""));
    }

    #[test]
    fn test_record_roundtrip() {
        let scenario = sample_scenario();
        let record = ResultRecord::scored(
            &scenario,
            PromptStyle::Cot,
            "gpt-4.1",
            "gpt-4.1",
            "Final Answer: A".to_string(),
            serde_json::from_value(serde_json::json!({ "prompt_tokens": 9, "completion_tokens": 3 }))
                .ok(),
        );
        let line = serde_json::to_string(&record).unwrap();
        let back: ResultRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(back.scenario_id, record.scenario_id);
        assert_eq!(back.prompt_style, PromptStyle::Cot);
        assert_eq!(back.parsed_choice.as_deref(), Some("A"));
        assert_eq!(back.usage.unwrap().prompt_tokens(), 9);
    }

    #[test]
    fn test_result_file_name() {
        assert_eq!(
            result_file_name("20240711-153000", "gpt-4o-mini", PromptStyle::Cot),
            "20240711-153000__gpt-4o-mini__cot.jsonl"
        );
    }

    #[test]
    fn test_writer_appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/run__m__direct.jsonl");
        let scenario = sample_scenario();

        let mut writer = ResultWriter::create(&path).unwrap();
        writer
            .append(&ResultRecord::scored(
                &scenario,
                PromptStyle::Direct,
                "m",
                "m-id",
                "A".to_string(),
                None,
            ))
            .unwrap();
        writer
            .append(&ResultRecord::failed(
                &scenario,
                PromptStyle::Direct,
                "m",
                "m-id",
                "boom".to_string(),
            ))
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: ResultRecord = serde_json::from_str(lines[0]).unwrap();
        let second: ResultRecord = serde_json::from_str(lines[1]).unwrap();
        assert!(first.error.is_none());
        assert_eq!(second.error.as_deref(), Some("boom"));
    }
}
