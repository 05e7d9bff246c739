//! Prepare command implementation

use super::{report, RunContext};
use crate::input::{resolve_patterns, FileReader};
use anyhow::{Context, Result};
use clap::Args;
use repunct_core::dataset::save_dataset;
use repunct_core::{segment_files, PunctuationVocabulary, WordVocabulary};
use std::path::PathBuf;

/// Arguments for the prepare command
#[derive(Debug, Args)]
pub struct PrepareArgs {
    /// Annotated corpus files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Word vocabulary file
    #[arg(long, value_name = "FILE")]
    pub vocab: PathBuf,

    /// Punctuation vocabulary file
    #[arg(short, long, value_name = "FILE")]
    pub punctuations: PathBuf,

    /// Training data output file (JSON Lines)
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,
}

impl PrepareArgs {
    /// Execute the prepare command
    pub fn execute(&self, context: &RunContext) -> Result<()> {
        let pipeline = &context.config.pipeline;
        let files = resolve_patterns(&self.input)?;

        FileReader::require(&self.vocab)?;
        FileReader::require(&self.punctuations)?;
        let vocabulary = WordVocabulary::load(&self.vocab, pipeline.vocabulary.reserved.clone())
            .with_context(|| format!("Failed to load vocabulary {}", self.vocab.display()))?;
        let punctuations = PunctuationVocabulary::load(&self.punctuations).with_context(|| {
            format!("Failed to load punctuations {}", self.punctuations.display())
        })?;

        let segmentation =
            segment_files(&files, &vocabulary, &punctuations, &pipeline.segmenter)?;
        if segmentation.examples.is_empty() {
            log::warn!("No training examples produced; is the corpus annotated?");
        }

        let mirror = save_dataset(
            &self.output,
            &segmentation.examples,
            &vocabulary,
            &punctuations,
        )
        .with_context(|| format!("Failed to write {}", self.output.display()))?;

        report(
            context,
            format!(
                "Wrote {} examples to {} (mirror: {})",
                segmentation.examples.len(),
                self.output.display(),
                mirror.display()
            ),
        );
        report(context, segmentation.stats.to_string());
        Ok(())
    }
}
