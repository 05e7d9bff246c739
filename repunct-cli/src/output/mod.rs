//! Output formatting module

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Trait for restored-text formatters
pub trait OutputFormatter: Send + Sync {
    /// Format and output one restored line
    fn format_line(&mut self, source: &Path, line: usize, text: &str) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Writer target shared by the formatters
pub type OutputWriter = Box<dyn Write + Send + Sync>;

/// Open `path` for writing, or stdout when absent
pub fn open_writer(path: Option<&Path>) -> Result<OutputWriter> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}
