//! Configuration loading.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::schema::Config;

/// Get the default configuration file path (`~/.forgetbench/config.json`).
pub fn get_config_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".forgetbench").join("config.json")
}

/// Load configuration from a file, or return a default [`Config`] if the
/// file does not exist or cannot be parsed.
///
/// If `config_path` is `None`, the default path
/// (`~/.forgetbench/config.json`) is used. A malformed file is never fatal:
/// it is reported and the defaults are used, so a typo in the config cannot
/// block a run.
pub fn load_config(config_path: Option<&Path>) -> Config {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => get_config_path(),
    };

    if path.exists() {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Config>(&contents) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(
                        "Failed to parse config from {}: {}. Using default configuration.",
                        path.display(),
                        e
                    );
                }
            },
            Err(e) => {
                warn!(
                    "Failed to read config from {}: {}. Using default configuration.",
                    path.display(),
                    e
                );
            }
        }
    }

    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_nonexistent_returns_default() {
        let path = Path::new("/tmp/forgetbench_test_does_not_exist_987654.json");
        let cfg = load_config(Some(path));
        assert_eq!(cfg.dataset_path, "data/conditional_forgetting.jsonl");
        assert_eq!(cfg.models.len(), 4);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"resultsDir": "scratch/outputs", "errorDelayMs": 10}"#).unwrap();

        let cfg = load_config(Some(&path));
        assert_eq!(cfg.results_dir, "scratch/outputs");
        assert_eq!(cfg.error_delay_ms, 10);
        assert_eq!(cfg.request_delay_ms, 300);
        assert_eq!(cfg.models.len(), 4);
    }

    #[test]
    fn test_load_malformed_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let cfg = load_config(Some(&path));
        assert_eq!(cfg.results_dir, "results/model_outputs");
    }

    #[test]
    fn test_default_config_path_under_home() {
        let path = get_config_path();
        assert!(path.ends_with(".forgetbench/config.json"));
    }
}
