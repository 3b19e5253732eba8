//! JSONL persistence for the scenario dataset.
//!
//! One scenario per line, written in build order. Lines are ASCII-escaped
//! so the file survives tools that mangle non-ASCII bytes; loading is
//! strict so a damaged dataset aborts a run instead of shrinking it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::Scenario;
use crate::errors::DatasetError;

/// Escape every non-ASCII character as a `\uXXXX` sequence.
///
/// `serde_json` always emits UTF-8 and has no ASCII-only mode. Escaping
/// after serialization is safe because non-ASCII characters can only
/// occur inside string literals. Characters outside the BMP become
/// surrogate pairs.
fn ascii_escape(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else {
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

/// Write scenarios to `path`, one ASCII-escaped JSON object per line.
///
/// Creates parent directories as needed. Returns the number of scenarios
/// written.
pub fn write_dataset(path: &Path, scenarios: &[Scenario]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let mut out = String::new();
    for scenario in scenarios {
        let line = serde_json::to_string(scenario)
            .with_context(|| format!("Failed to serialize scenario {}", scenario.id))?;
        out.push_str(&ascii_escape(&line));
        out.push('\n');
    }
    fs::write(path, out).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(scenarios.len())
}

/// Load scenarios in file order.
///
/// Fails on a missing file and on any line that does not parse as a
/// scenario; the error names the offending line.
pub fn load_dataset(path: &Path) -> Result<Vec<Scenario>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::Missing(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut scenarios = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let scenario: Scenario =
            serde_json::from_str(line).map_err(|source| DatasetError::BadLine {
                path: path.to_path_buf(),
                line: lineno + 1,
                source,
            })?;
        scenarios.push(scenario);
    }
    Ok(scenarios)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::dataset::build_scenarios;

    #[test]
    fn test_roundtrip_preserves_scenarios() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.jsonl");
        let scenarios = build_scenarios();

        let written = write_dataset(&path, &scenarios).unwrap();
        assert_eq!(written, scenarios.len());

        let loaded = load_dataset(&path).unwrap();
        assert_eq!(loaded, scenarios);
    }

    #[test]
    fn test_output_is_pure_ascii() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.jsonl");
        write_dataset(&path, &build_scenarios()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.is_ascii());
        // The redefined-addition rule carries a real ⊕ that must arrive
        // as an escape.
        assert!(text.contains("\\u2295"));
    }

    #[test]
    fn test_rebuild_is_byte_identical() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.jsonl");
        let second = dir.path().join("b.jsonl");
        write_dataset(&first, &build_scenarios()).unwrap();
        write_dataset(&second, &build_scenarios()).unwrap();
        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = load_dataset(&dir.path().join("absent.jsonl")).unwrap_err();
        assert!(matches!(err, DatasetError::Missing(_)));
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.jsonl");
        let scenarios = build_scenarios();
        let good = serde_json::to_string(&scenarios[0]).unwrap();
        fs::write(&path, format!("{}\nnot json\n", good)).unwrap();

        let err = load_dataset(&path).unwrap_err();
        match err {
            DatasetError::BadLine { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_blank_line_is_an_error() {
        // The writer never emits blank lines, so one in the file means the
        // dataset was edited or truncated by hand.
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.jsonl");
        let scenarios = build_scenarios();
        let good = serde_json::to_string(&scenarios[0]).unwrap();
        fs::write(&path, format!("{}\n\n{}\n", good, good)).unwrap();

        let err = load_dataset(&path).unwrap_err();
        match err {
            DatasetError::BadLine { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_ascii_escape_handles_surrogate_pairs() {
        assert_eq!(ascii_escape("plain"), "plain");
        assert_eq!(ascii_escape("x ⊕ y"), "x \\u2295 y");
        // U+1F600 needs a surrogate pair.
        assert_eq!(ascii_escape("😀"), "\\ud83d\\ude00");
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deep/dataset.jsonl");
        write_dataset(&path, &build_scenarios()[..2]).unwrap();
        assert!(path.exists());
    }
}
