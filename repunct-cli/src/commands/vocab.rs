//! Vocab command implementation

use super::{report, RunContext};
use crate::input::resolve_patterns;
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use repunct_core::corpus::{count_file, ignored_tokens};
use repunct_core::{PunctuationVocabulary, VocabularyBuilder};
use std::path::PathBuf;

/// Arguments for the vocab command
#[derive(Debug, Args)]
pub struct VocabArgs {
    /// Annotated corpus files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Word vocabulary output file
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Also write the punctuation vocabulary here
    #[arg(short, long, value_name = "FILE")]
    pub punctuations: Option<PathBuf>,
}

impl VocabArgs {
    /// Execute the vocab command
    pub fn execute(&self, context: &RunContext) -> Result<()> {
        let pipeline = &context.config.pipeline;
        let files = resolve_patterns(&self.input)?;
        log::info!("Counting words in {} files", files.len());

        let mut progress = ProgressReporter::new(context.quiet);
        progress.init_files(files.len() as u64);

        let mut builder = VocabularyBuilder::new(pipeline.vocabulary.clone())
            .ignore_tokens(ignored_tokens(&pipeline.segmenter));
        for path in &files {
            builder = count_file(path, builder)
                .with_context(|| format!("Failed to count words in {}", path.display()))?;
            progress.file_completed(&path.display().to_string());
        }
        progress.finish();

        let vocabulary = builder.build()?;
        vocabulary
            .save(&self.output)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;
        report(
            context,
            format!(
                "Wrote {} words to {}",
                vocabulary.len(),
                self.output.display()
            ),
        );

        if let Some(path) = &self.punctuations {
            PunctuationVocabulary::default()
                .save(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            report(context, format!("Wrote punctuations to {}", path.display()));
        }

        Ok(())
    }
}
