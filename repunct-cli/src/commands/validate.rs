//! Validate command implementation

use crate::config::CliConfig;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the configuration file to validate
    #[arg(short = 'c', long = "config-file", value_name = "FILE", required = true)]
    pub config_file: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating configuration: {}", self.config_file.display());

        match CliConfig::from_file(&self.config_file) {
            Ok(config) => {
                let pipeline = &config.pipeline;
                println!("✓ Configuration is valid!");
                println!("  Training window: {} words", pipeline.segmenter.max_len);
                println!("  Restoration window: {} words", pipeline.restore.max_len);
                println!("  Vocabulary limit: {} words", pipeline.vocabulary.max_size);
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e:#}");
                Err(e.context("Validation failed"))
            }
        }
    }
}
