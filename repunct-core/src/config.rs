//! Configuration for vocabulary building, segmentation and restoration
//!
//! Every section deserializes from TOML with defaults for missing keys:
//!
//! ```toml
//! [vocabulary]
//! max_size = 100000
//! min_count = 2
//!
//! [segmenter]
//! max_len = 200
//! discard_tokens = ["<BREAK>"]
//!
//! [segmenter.punctuation_mapping]
//! "-DASH" = ",COMMA"
//!
//! [restore]
//! capitalize_unknown = true
//! ```

use crate::error::{RepunctError, Result};
use crate::punctuation::Punctuation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default configuration constants
pub mod defaults {
    /// Maximum number of words in one window
    pub const MAX_SEQUENCE_LEN: usize = 200;

    /// Maximum number of corpus words kept in the vocabulary
    pub const MAX_WORD_VOCABULARY_SIZE: usize = 100_000;

    /// Minimum occurrences for a word to enter the vocabulary
    pub const MIN_WORD_COUNT_IN_VOCAB: u64 = 2;

    /// End-of-text token
    pub const END: &str = "</S>";

    /// Out-of-vocabulary token
    pub const UNK: &str = "<UNK>";

    /// Numeric literal token
    pub const NUM: &str = "<NUM>";

    /// Prefix of pause annotations in restoration input
    pub const PAUSE_PREFIX: &str = "<sil=";

    /// Line-break marker left by corpus preprocessing
    pub const BREAK: &str = "<BREAK>";
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepunctConfig {
    /// Vocabulary construction
    pub vocabulary: VocabularyConfig,
    /// Training-window segmentation
    pub segmenter: SegmenterConfig,
    /// Inference-time restoration
    pub restore: RestoreConfig,
}

impl RepunctConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| RepunctError::InvalidConfig(e.to_string()))
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        self.vocabulary.validate()?;
        self.segmenter.validate()?;
        self.restore.validate()
    }
}

/// Reserved word tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservedTokens {
    /// End-of-text marker
    pub end: String,
    /// Out-of-vocabulary marker
    pub unknown: String,
    /// Numeric literal marker
    pub number: String,
}

impl Default for ReservedTokens {
    fn default() -> Self {
        Self {
            end: defaults::END.to_string(),
            unknown: defaults::UNK.to_string(),
            number: defaults::NUM.to_string(),
        }
    }
}

impl ReservedTokens {
    fn validate(&self) -> Result<()> {
        let tokens = [&self.end, &self.unknown, &self.number];
        if tokens.iter().any(|t| t.trim().is_empty()) {
            return Err(RepunctError::InvalidConfig(
                "reserved tokens must not be empty".into(),
            ));
        }
        if self.end == self.unknown || self.end == self.number || self.unknown == self.number {
            return Err(RepunctError::InvalidConfig(
                "reserved tokens must be distinct".into(),
            ));
        }
        Ok(())
    }
}

/// Vocabulary construction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    /// Maximum number of corpus words (END and UNK are added on top)
    pub max_size: usize,
    /// Minimum occurrences for a word to be kept
    pub min_count: u64,
    /// Reserved tokens
    pub reserved: ReservedTokens,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            max_size: defaults::MAX_WORD_VOCABULARY_SIZE,
            min_count: defaults::MIN_WORD_COUNT_IN_VOCAB,
            reserved: ReservedTokens::default(),
        }
    }
}

impl VocabularyConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.min_count == 0 {
            return Err(RepunctError::InvalidConfig(
                "vocabulary.min_count must be greater than 0".into(),
            ));
        }
        self.reserved.validate()
    }
}

/// Training-window segmentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Maximum words per training example
    pub max_len: usize,
    /// Tokens dropped from the stream before anything else
    pub discard_tokens: Vec<String>,
    /// Emit the unfinished window at end of stream
    pub flush_trailing: bool,
    /// Punctuation tokens rewritten to another punctuation token
    pub punctuation_mapping: BTreeMap<String, String>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_len: defaults::MAX_SEQUENCE_LEN,
            discard_tokens: Vec::new(),
            flush_trailing: true,
            punctuation_mapping: BTreeMap::new(),
        }
    }
}

impl SegmenterConfig {
    /// Create a configuration builder
    pub fn builder() -> SegmenterConfigBuilder {
        SegmenterConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_len < 2 {
            return Err(RepunctError::InvalidConfig(
                "segmenter.max_len must be at least 2".into(),
            ));
        }
        for (from, to) in &self.punctuation_mapping {
            if Punctuation::from_token(to).is_none() {
                return Err(RepunctError::InvalidConfig(format!(
                    "punctuation_mapping target '{to}' for '{from}' is not a punctuation token"
                )));
            }
        }
        Ok(())
    }

    /// Apply the punctuation mapping to a token
    pub fn map_token<'a>(&'a self, token: &'a str) -> &'a str {
        self.punctuation_mapping
            .get(token)
            .map(String::as_str)
            .unwrap_or(token)
    }
}

/// Fluent builder for [`SegmenterConfig`]
#[derive(Debug, Default)]
pub struct SegmenterConfigBuilder {
    config: SegmenterConfig,
}

impl SegmenterConfigBuilder {
    /// Set the maximum window length in words
    pub fn max_len(mut self, max_len: usize) -> Self {
        self.config.max_len = max_len;
        self
    }

    /// Add a token to the discard set
    pub fn discard(mut self, token: impl Into<String>) -> Self {
        self.config.discard_tokens.push(token.into());
        self
    }

    /// Rewrite punctuation token `from` to `to`
    pub fn map_punctuation(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.config
            .punctuation_mapping
            .insert(from.into(), to.into());
        self
    }

    /// Enable or disable the end-of-stream flush
    pub fn flush_trailing(mut self, flush: bool) -> Self {
        self.config.flush_trailing = flush;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<SegmenterConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Restoration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreConfig {
    /// Maximum tokens per classifier window
    pub max_len: usize,
    /// Capitalize words that are out of vocabulary
    pub capitalize_unknown: bool,
    /// Input tokens starting with this prefix are pause annotations
    pub pause_prefix: String,
    /// Line-break marker dropped from input
    pub break_token: String,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            max_len: defaults::MAX_SEQUENCE_LEN,
            capitalize_unknown: true,
            pause_prefix: defaults::PAUSE_PREFIX.to_string(),
            break_token: defaults::BREAK.to_string(),
        }
    }
}

impl RestoreConfig {
    /// Create a configuration builder
    pub fn builder() -> RestoreConfigBuilder {
        RestoreConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_len < 2 {
            return Err(RepunctError::InvalidConfig(
                "restore.max_len must be at least 2".into(),
            ));
        }
        Ok(())
    }
}

/// Fluent builder for [`RestoreConfig`]
#[derive(Debug, Default)]
pub struct RestoreConfigBuilder {
    config: RestoreConfig,
}

impl RestoreConfigBuilder {
    /// Set the maximum window length in tokens
    pub fn max_len(mut self, max_len: usize) -> Self {
        self.config.max_len = max_len;
        self
    }

    /// Capitalize out-of-vocabulary words
    pub fn capitalize_unknown(mut self, enabled: bool) -> Self {
        self.config.capitalize_unknown = enabled;
        self
    }

    /// Set the pause annotation prefix
    pub fn pause_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.pause_prefix = prefix.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<RestoreConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RepunctConfig::default();
        assert_eq!(config.segmenter.max_len, 200);
        assert_eq!(config.restore.max_len, 200);
        assert_eq!(config.vocabulary.max_size, 100_000);
        assert_eq!(config.vocabulary.min_count, 2);
        assert_eq!(config.vocabulary.reserved.end, "</S>");
        assert!(config.segmenter.flush_trailing);
        assert!(config.restore.capitalize_unknown);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = RepunctConfig::from_toml_str(
            r#"
[segmenter]
max_len = 50
discard_tokens = ["<BREAK>"]

[segmenter.punctuation_mapping]
"-DASH" = ",COMMA"
"#,
        )
        .unwrap();

        assert_eq!(config.segmenter.max_len, 50);
        assert_eq!(config.segmenter.discard_tokens, vec!["<BREAK>"]);
        assert_eq!(config.segmenter.map_token("-DASH"), ",COMMA");
        assert_eq!(config.segmenter.map_token("word"), "word");
        assert_eq!(config.restore, RestoreConfig::default());
    }

    #[test]
    fn test_invalid_mapping_target() {
        let result = RepunctConfig::from_toml_str(
            r#"
[segmenter.punctuation_mapping]
"-DASH" = "DASH"
"#,
        );
        assert!(matches!(result, Err(RepunctError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_values() {
        assert!(SegmenterConfig::builder().max_len(1).build().is_err());
        assert!(RestoreConfig::builder().max_len(0).build().is_err());

        let mut vocabulary = VocabularyConfig::default();
        vocabulary.reserved.unknown = vocabulary.reserved.end.clone();
        assert!(vocabulary.validate().is_err());

        vocabulary = VocabularyConfig {
            min_count: 0,
            ..VocabularyConfig::default()
        };
        assert!(vocabulary.validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let result = RepunctConfig::from_toml_str("[segmenter\nmax_len = ");
        assert!(matches!(result, Err(RepunctError::ConfigParse(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = RepunctConfig {
            segmenter: SegmenterConfig::builder()
                .max_len(64)
                .discard("<BREAK>")
                .map_punctuation("-DASH", ",COMMA")
                .build()
                .unwrap(),
            ..RepunctConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        let parsed = RepunctConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
