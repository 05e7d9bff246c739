//! Error types for the CLI

use std::fmt;
use std::path::PathBuf;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Input file was not found
    FileNotFound(PathBuf),
    /// Glob pattern was invalid or matched nothing
    InvalidPattern(String),
    /// Configuration could not be read or failed validation
    ConfigError(String),
    /// Target and predicted files do not pair up line by line
    LineCountMismatch {
        /// Lines in the target file
        target: usize,
        /// Lines in the predicted file
        predicted: usize,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileNotFound(path) => write!(f, "File not found: {}", path.display()),
            CliError::InvalidPattern(pattern) => write!(f, "Invalid pattern: {pattern}"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::LineCountMismatch { target, predicted } => write!(
                f,
                "Line count mismatch: target has {target} lines, predicted has {predicted}"
            ),
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_display() {
        let error = CliError::FileNotFound(PathBuf::from("/missing/corpus.txt"));
        assert_eq!(error.to_string(), "File not found: /missing/corpus.txt");
    }

    #[test]
    fn test_invalid_pattern_display() {
        let error = CliError::InvalidPattern("[unclosed".to_string());
        assert_eq!(error.to_string(), "Invalid pattern: [unclosed");
    }

    #[test]
    fn test_config_error_display() {
        let error = CliError::ConfigError("max_len must be at least 2".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: max_len must be at least 2"
        );
    }

    #[test]
    fn test_line_count_mismatch_display() {
        let error = CliError::LineCountMismatch {
            target: 3,
            predicted: 2,
        };
        assert_eq!(
            error.to_string(),
            "Line count mismatch: target has 3 lines, predicted has 2"
        );
    }

    #[test]
    fn test_into_anyhow() {
        let result: CliResult<()> = Err(CliError::InvalidPattern("*.txt".into()).into());
        let error = result.unwrap_err();
        assert!(error.downcast_ref::<CliError>().is_some());
    }
}
