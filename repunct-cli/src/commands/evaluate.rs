//! Evaluate command implementation

use super::RunContext;
use crate::error::CliError;
use crate::input::FileReader;
use anyhow::Result;
use clap::Args;
use repunct_core::{tokens_from_text, ErrorReport, Evaluator, PunctuationVocabulary};
use std::path::PathBuf;

/// Arguments for the evaluate command
#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// Reference file in annotated token format
    #[arg(short, long, value_name = "FILE")]
    pub target: PathBuf,

    /// Restored file (punctuated text or annotated tokens)
    #[arg(short = 'P', long, value_name = "FILE")]
    pub predicted: PathBuf,

    /// Punctuation vocabulary file (default: the standard seven classes)
    #[arg(short, long, value_name = "FILE")]
    pub punctuations: Option<PathBuf>,

    /// Also score capitalization of each word
    #[arg(long)]
    pub with_capitalization: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// Precision/recall/F-score table
    Text,
    /// The full report as JSON
    Json,
}

impl EvaluateArgs {
    /// Score the files line by line and merge the counts
    pub fn report(&self, context: &RunContext) -> Result<ErrorReport> {
        let punctuations = match &self.punctuations {
            Some(path) => PunctuationVocabulary::load(path)?,
            None => PunctuationVocabulary::default(),
        };
        let target = FileReader::read_lines(&self.target)?;
        let predicted = FileReader::read_lines(&self.predicted)?;
        if target.len() != predicted.len() {
            return Err(CliError::LineCountMismatch {
                target: target.len(),
                predicted: predicted.len(),
            }
            .into());
        }

        let mut evaluator = Evaluator::new(punctuations)
            .with_punctuation_mapping(context.config.pipeline.segmenter.punctuation_mapping.clone())
            .with_capitalization(self.with_capitalization);
        for (number, (target_line, predicted_line)) in target.iter().zip(&predicted).enumerate() {
            let target_tokens: Vec<&str> = target_line.split_whitespace().collect();
            let predicted_tokens = tokens_from_text(predicted_line);
            let label = format!("{}:{}", self.predicted.display(), number + 1);
            evaluator.add_pair(&label, &target_tokens, &predicted_tokens)?;
        }
        log::info!("Scored {} slots", evaluator.counts().slots);

        Ok(evaluator.report())
    }

    /// Execute the evaluate command
    pub fn execute(&self, context: &RunContext) -> Result<()> {
        let report = self.report(context)?;
        match self.format {
            ReportFormat::Text => println!("{report}"),
            ReportFormat::Json => {
                let json = if context.config.output.pretty_json {
                    serde_json::to_string_pretty(&report)?
                } else {
                    serde_json::to_string(&report)?
                };
                println!("{json}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(dir: &TempDir, target: &str, predicted: &str) -> EvaluateArgs {
        let target_path = dir.path().join("target.txt");
        let predicted_path = dir.path().join("predicted.txt");
        fs::write(&target_path, target).unwrap();
        fs::write(&predicted_path, predicted).unwrap();
        EvaluateArgs {
            target: target_path,
            predicted: predicted_path,
            punctuations: None,
            with_capitalization: false,
            format: ReportFormat::Text,
        }
    }

    #[test]
    fn test_perfect_restoration() {
        let temp_dir = TempDir::new().unwrap();
        let args = args(
            &temp_dir,
            "hello ,COMMA world .PERIOD\nhow are you ?QUESTIONMARK\n",
            "Hello, world.\nHow are you?\n",
        );

        let report = args.report(&RunContext::default()).unwrap();
        assert_eq!(report.counts.slots, 5);
        assert_eq!(report.slot_error_rate, Some(0.0));
    }

    #[test]
    fn test_missing_comma_is_a_deletion() {
        let temp_dir = TempDir::new().unwrap();
        let args = args(&temp_dir, "hello ,COMMA world .PERIOD\n", "Hello world.\n");

        let report = args.report(&RunContext::default()).unwrap();
        assert_eq!(report.counts.deletions, 1);
        assert_eq!(report.counts.slots_correct, 1);
    }

    #[test]
    fn test_line_count_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let args = args(&temp_dir, "a .PERIOD\nb .PERIOD\n", "A.\n");

        let error = args.report(&RunContext::default()).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<CliError>(),
            Some(CliError::LineCountMismatch {
                target: 2,
                predicted: 1
            })
        ));
    }

    #[test]
    fn test_misaligned_words_report_location() {
        let temp_dir = TempDir::new().unwrap();
        let args = args(&temp_dir, "hello world .PERIOD\n", "Hello there.\n");

        let error = args.report(&RunContext::default()).unwrap_err();
        assert!(error.to_string().contains("predicted.txt:1"));
    }
}
