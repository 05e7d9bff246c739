//! File reading utilities

use crate::error::CliError;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// File reader with UTF-8 validation
pub struct FileReader;

impl FileReader {
    /// Fail early with a clear message when a required file is missing
    pub fn require(path: &Path) -> Result<()> {
        if path.is_file() {
            Ok(())
        } else {
            Err(CliError::FileNotFound(path.to_path_buf()).into())
        }
    }

    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        Self::require(path)?;
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Read a file as UTF-8 lines
    pub fn read_lines(path: &Path) -> Result<Vec<String>> {
        Ok(Self::read_text(path)?.lines().map(str::to_owned).collect())
    }
}
