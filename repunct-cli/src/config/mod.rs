//! Configuration file handling
//!
//! The CLI file is the pipeline configuration with two extra sections:
//!
//! ```toml
//! [vocabulary]
//! max_size = 100000
//!
//! [output]
//! default_format = "text"
//!
//! [performance]
//! worker_threads = 0
//! ```

use crate::error::CliError;
use anyhow::{Context, Result};
use repunct_core::RepunctConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// CLI configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CliConfig {
    /// Vocabulary, segmentation and restoration settings
    #[serde(flatten)]
    pub pipeline: RepunctConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Performance configuration
    #[serde(default)]
    pub performance: PerformanceConfig,
}

/// Output-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Pretty print JSON output
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty_json: true }
    }
}

/// Performance-related configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PerformanceConfig {
    /// Number of worker threads (0 = auto)
    pub worker_threads: usize,
}

impl CliConfig {
    /// Parse TOML text and validate the pipeline sections
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| CliError::ConfigError(e.to_string()))?;
        config
            .pipeline
            .validate()
            .map_err(|e| CliError::ConfigError(e.to_string()))?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(CliError::FileNotFound(path.to_path_buf()).into());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Load the given file, or fall back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repunct_core::SegmenterConfig;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_round_trips_through_toml() {
        let config = CliConfig::default();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[segmenter]"));
        assert!(text.contains("[performance]"));
        assert_eq!(CliConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = CliConfig::from_toml_str(
            r#"
[restore]
max_len = 50

[performance]
worker_threads = 4
"#,
        )
        .unwrap();
        assert_eq!(config.pipeline.restore.max_len, 50);
        assert_eq!(config.pipeline.segmenter, SegmenterConfig::default());
        assert_eq!(config.performance.worker_threads, 4);
        assert!(config.output.pretty_json);
    }

    #[test]
    fn test_invalid_pipeline_section_is_config_error() {
        let error = CliConfig::from_toml_str("[segmenter]\nmax_len = 1\n").unwrap_err();
        assert!(error.downcast_ref::<CliError>().is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let error = CliConfig::load(Some(Path::new("/nonexistent/repunct.toml"))).unwrap_err();
        assert!(error.to_string().contains("File not found"));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("repunct.toml");
        fs::write(&path, "[output]\npretty_json = false\n").unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert!(!config.output.pretty_json);
        assert_eq!(CliConfig::load(None).unwrap(), CliConfig::default());
    }
}
