//! Restoration input preparation
//!
//! Input lines may still carry punctuation tokens, pause annotations and
//! line-break markers left by preprocessing. They are removed so the engine
//! only sees words, and END is appended to close the text.

use crate::config::RestoreConfig;
use crate::punctuation::PunctuationVocabulary;
use std::collections::BTreeMap;

/// Filters raw input lines into restoration token streams
#[derive(Debug, Clone, Copy)]
pub struct InputFilter<'a> {
    punctuations: &'a PunctuationVocabulary,
    mapping: &'a BTreeMap<String, String>,
    config: &'a RestoreConfig,
}

impl<'a> InputFilter<'a> {
    /// Create a filter
    pub fn new(
        punctuations: &'a PunctuationVocabulary,
        mapping: &'a BTreeMap<String, String>,
        config: &'a RestoreConfig,
    ) -> Self {
        Self {
            punctuations,
            mapping,
            config,
        }
    }

    /// True if the token is a word the engine should see
    pub fn keeps(&self, token: &str) -> bool {
        !(self.punctuations.contains_token(token)
            || self.mapping.contains_key(token)
            || token == self.config.break_token
            || (!self.config.pause_prefix.is_empty()
                && token.starts_with(&self.config.pause_prefix)))
    }

    /// Split a line into kept words followed by `end_token`
    pub fn prepare<'l>(&self, line: &'l str, end_token: &'l str) -> Vec<&'l str> {
        line.split_whitespace()
            .filter(|token| self.keeps(token))
            .chain(std::iter::once(end_token))
            .collect()
    }
}

/// Prepare one line with a throwaway filter
pub fn prepare_tokens<'l>(
    line: &'l str,
    punctuations: &PunctuationVocabulary,
    mapping: &BTreeMap<String, String>,
    config: &RestoreConfig,
    end_token: &'l str,
) -> Vec<&'l str> {
    InputFilter::new(punctuations, mapping, config).prepare(line, end_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_annotations_and_appends_end() {
        let punctuations = PunctuationVocabulary::default();
        let mapping = BTreeMap::from([("-DASH".to_string(), ",COMMA".to_string())]);
        let config = RestoreConfig::default();

        let tokens = prepare_tokens(
            "  hello ,COMMA  world <sil=0.5> -DASH <BREAK> again\t.PERIOD ",
            &punctuations,
            &mapping,
            &config,
            "</S>",
        );
        assert_eq!(tokens, vec!["hello", "world", "again", "</S>"]);
    }

    #[test]
    fn test_empty_line_is_only_end() {
        let punctuations = PunctuationVocabulary::default();
        let mapping = BTreeMap::new();
        let config = RestoreConfig::default();
        let tokens = prepare_tokens("   ", &punctuations, &mapping, &config, "</S>");
        assert_eq!(tokens, vec!["</S>"]);
    }

    #[test]
    fn test_space_token_is_filtered() {
        let punctuations = PunctuationVocabulary::default();
        let config = RestoreConfig::default();
        let mapping = BTreeMap::new();
        let filter = InputFilter::new(&punctuations, &mapping, &config);
        assert!(!filter.keeps("_SPACE"));
        assert!(filter.keeps("<sil"));
    }

    #[test]
    fn test_empty_pause_prefix_keeps_everything() {
        let punctuations = PunctuationVocabulary::default();
        let config = RestoreConfig::builder().pause_prefix("").build().unwrap();
        let mapping = BTreeMap::new();
        let filter = InputFilter::new(&punctuations, &mapping, &config);
        assert!(filter.keeps("word"));
    }
}
