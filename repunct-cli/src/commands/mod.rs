//! Command implementations

pub mod evaluate;
pub mod generate_config;
pub mod prepare;
pub mod restore;
pub mod train_baseline;
pub mod validate;
pub mod vocab;

use crate::config::CliConfig;
use anyhow::Result;
use clap::Subcommand;

pub use evaluate::EvaluateArgs;
pub use generate_config::GenerateConfigArgs;
pub use prepare::PrepareArgs;
pub use restore::RestoreArgs;
pub use train_baseline::TrainBaselineArgs;
pub use validate::ValidateArgs;
pub use vocab::VocabArgs;

/// Settings shared by every command
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// Loaded configuration
    pub config: CliConfig,
    /// Suppress progress bars and summaries
    pub quiet: bool,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the word vocabulary from corpus files
    Vocab(VocabArgs),

    /// Segment corpus files into training examples
    Prepare(PrepareArgs),

    /// Train the count-based baseline classifier
    TrainBaseline(TrainBaselineArgs),

    /// Restore punctuation and capitalization of plain text
    Restore(RestoreArgs),

    /// Score restored text against a reference
    Evaluate(EvaluateArgs),

    /// Generate a configuration template
    GenerateConfig(GenerateConfigArgs),

    /// Validate a configuration file
    Validate(ValidateArgs),
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self, context: &RunContext) -> Result<()> {
        match self {
            Commands::Vocab(args) => args.execute(context),
            Commands::Prepare(args) => args.execute(context),
            Commands::TrainBaseline(args) => args.execute(context),
            Commands::Restore(args) => args.execute(context),
            Commands::Evaluate(args) => args.execute(context),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
        }
    }
}

/// Print a one-line summary to stderr unless quiet
pub(crate) fn report(context: &RunContext, message: impl AsRef<str>) {
    if !context.quiet {
        eprintln!("{}", message.as_ref());
    }
}
