//! Generate config command implementation

use crate::config::CliConfig;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

const HEADER: &str = "\
# repunct configuration
#
# Every key is optional; a missing key takes the value shown here.
# [segmenter] shapes training windows, [restore] shapes inference windows.
# performance.worker_threads = 0 uses every core.

";

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        let template = format!("{HEADER}{}", CliConfig::default().to_toml_string()?);
        std::fs::write(&self.output, template)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template written to {}", self.output.display());
        println!();
        println!("Next steps:");
        println!("1. Adjust window lengths and vocabulary limits");
        println!("2. Validate your configuration:");
        println!("   repunct validate -c {}", self.output.display());
        println!("3. Pass it to any command with --config");
        Ok(())
    }
}
