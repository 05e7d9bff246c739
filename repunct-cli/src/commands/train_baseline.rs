//! Train-baseline command implementation

use super::{report, RunContext};
use crate::input::FileReader;
use anyhow::{Context, Result};
use clap::Args;
use repunct_core::dataset::load_examples;
use repunct_core::{BaselineModel, PunctuationVocabulary};
use std::path::PathBuf;

/// Arguments for the train-baseline command
#[derive(Debug, Args)]
pub struct TrainBaselineArgs {
    /// Training data written by `prepare`
    #[arg(short, long, value_name = "FILE")]
    pub data: PathBuf,

    /// Punctuation vocabulary file
    #[arg(short, long, value_name = "FILE")]
    pub punctuations: PathBuf,

    /// Model output file
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,
}

impl TrainBaselineArgs {
    /// Execute the train-baseline command
    pub fn execute(&self, context: &RunContext) -> Result<()> {
        FileReader::require(&self.data)?;
        FileReader::require(&self.punctuations)?;
        let examples = load_examples(&self.data)
            .with_context(|| format!("Failed to load training data {}", self.data.display()))?;
        let punctuations = PunctuationVocabulary::load(&self.punctuations)?;

        let model = BaselineModel::train(&examples, punctuations.len())?;
        model
            .save(&self.output)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;

        report(
            context,
            format!(
                "Trained on {} gaps from {} examples; model written to {}",
                model.gaps(),
                examples.len(),
                self.output.display()
            ),
        );
        Ok(())
    }
}
