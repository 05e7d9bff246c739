//! Restore command implementation

use super::RunContext;
use crate::input::{resolve_patterns, FileReader};
use crate::output::{open_writer, JsonFormatter, OutputFormatter, TextFormatter};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use repunct_core::{BaselineModel, PunctuationVocabulary, Restorer, WordId, WordVocabulary};
use std::path::PathBuf;

/// Arguments for the restore command
#[derive(Debug, Args)]
pub struct RestoreArgs {
    /// Unpunctuated input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Word vocabulary file
    #[arg(long, value_name = "FILE")]
    pub vocab: PathBuf,

    /// Punctuation vocabulary file
    #[arg(short, long, value_name = "FILE")]
    pub punctuations: PathBuf,

    /// Baseline model written by `train-baseline`
    #[arg(short, long, value_name = "FILE")]
    pub model: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one restored line per input line
    Text,
    /// JSON array of restored lines with their source positions
    Json,
}

impl RestoreArgs {
    /// Execute the restore command
    pub fn execute(&self, context: &RunContext) -> Result<()> {
        let pipeline = &context.config.pipeline;
        let files = resolve_patterns(&self.input)?;

        FileReader::require(&self.vocab)?;
        FileReader::require(&self.model)?;
        let vocabulary = WordVocabulary::load(&self.vocab, pipeline.vocabulary.reserved.clone())
            .with_context(|| format!("Failed to load vocabulary {}", self.vocab.display()))?;
        let punctuations = PunctuationVocabulary::load(&self.punctuations).with_context(|| {
            format!("Failed to load punctuations {}", self.punctuations.display())
        })?;
        let model = BaselineModel::load(&self.model)
            .with_context(|| format!("Failed to load model {}", self.model.display()))?;
        if model.classes() != punctuations.len() {
            anyhow::bail!(
                "model predicts {} classes but the punctuation vocabulary has {}",
                model.classes(),
                punctuations.len()
            );
        }

        let restorer = Restorer::new(&vocabulary, &punctuations, &pipeline.restore)?
            .with_punctuation_mapping(pipeline.segmenter.punctuation_mapping.clone());

        let writer = open_writer(self.output.as_deref())?;
        let mut formatter: Box<dyn OutputFormatter> = match self.format {
            OutputFormat::Text => Box::new(TextFormatter::new(writer)),
            OutputFormat::Json => Box::new(JsonFormatter::new(
                writer,
                context.config.output.pretty_json,
            )),
        };

        let mut progress = ProgressReporter::new(context.quiet || self.output.is_none());
        progress.init_files(files.len() as u64);

        let model = &model;
        for path in &files {
            let lines = FileReader::read_lines(path)?;
            log::info!("Restoring {} lines from {}", lines.len(), path.display());
            let restored = restorer
                .restore_lines(&lines, move || {
                    move |window: &[WordId]| model.score_window(window)
                })
                .with_context(|| format!("Failed to restore {}", path.display()))?;

            for (number, text) in restored.iter().enumerate() {
                formatter.format_line(path, number + 1, text)?;
            }
            progress.file_completed(&path.display().to_string());
        }

        progress.finish();
        formatter.finish()
    }
}
