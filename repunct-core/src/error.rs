//! Error types for segmentation, restoration and evaluation

use thiserror::Error;

/// Errors raised by the punctuation restoration core
#[derive(Error, Debug)]
pub enum RepunctError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration could not be parsed
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration values are inconsistent
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A reserved token is absent from a loaded vocabulary
    #[error("vocabulary is missing reserved token '{token}'")]
    MissingReservedToken {
        /// The reserved token that was expected
        token: String,
    },

    /// The same token appears twice in a vocabulary file
    #[error("duplicate vocabulary token '{token}' at line {line}")]
    DuplicateToken {
        /// The repeated token
        token: String,
        /// Zero-based line (id) of the second occurrence
        line: usize,
    },

    /// A token in a punctuation vocabulary is not a known punctuation class
    #[error("unknown punctuation token '{0}'")]
    UnknownPunctuation(String),

    /// An id has no entry in the vocabulary
    #[error("id {id} is out of range for a vocabulary of {len} entries")]
    IdOutOfRange {
        /// The offending id
        id: u32,
        /// Vocabulary length
        len: usize,
    },

    /// The classifier returned a result of the wrong shape
    #[error("classifier returned {rows} score rows for a window of {window} tokens")]
    ClassifierShape {
        /// Number of rows returned
        rows: usize,
        /// Number of tokens in the window
        window: usize,
    },

    /// The classifier returned a row with no scores
    #[error("classifier returned an empty score row at gap {gap}")]
    EmptyScores {
        /// Gap index within the window
        gap: usize,
    },

    /// The external classifier failed
    #[error("classifier failed: {0}")]
    Classifier(String),

    /// Ground truth and prediction streams cannot be aligned
    #[error(
        "misaligned streams in {file}: '{target}' ({target_pos}) != '{predicted}' ({predicted_pos})\n\
         target context: {target_context}\npredicted context: {predicted_context}"
    )]
    Misaligned {
        /// Label of the compared file pair
        file: String,
        /// Target word at the mismatch
        target: String,
        /// Token position in the target stream
        target_pos: usize,
        /// Predicted word at the mismatch
        predicted: String,
        /// Token position in the predicted stream
        predicted_pos: usize,
        /// Surrounding target tokens
        target_context: String,
        /// Surrounding predicted tokens
        predicted_context: String,
    },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, RepunctError>;
