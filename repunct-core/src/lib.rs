//! Windowed punctuation and capitalization restoration
//!
//! This crate implements the two windowing algorithms of a punctuation
//! restoration pipeline:
//!
//! - **Segmentation** turns an annotated token stream (`words` interleaved
//!   with `,COMMA`, `.PERIOD`, ...) into bounded training examples, cutting
//!   windows at the last sentence end so no sentence is split.
//! - **Restoration** slides the same bounded window over unpunctuated text,
//!   asks a [`Classifier`] for a class per gap, advances to the last
//!   predicted sentence end and reconstructs punctuated, capitalized text.
//!
//! Vocabulary construction, dataset persistence, a count-based baseline
//! classifier and error metrics complete the pipeline.
//!
//! # Example
//!
//! ```rust
//! use repunct_core::{
//!     segment, PunctuationVocabulary, RestoreConfig, Restorer, SegmenterConfig,
//!     VocabularyBuilder, VocabularyConfig,
//! };
//!
//! let corpus = "the cat sat .PERIOD the dog ran .PERIOD";
//! let config = VocabularyConfig { min_count: 1, ..VocabularyConfig::default() };
//! let mut builder = VocabularyBuilder::new(config).ignore_tokens([".PERIOD"]);
//! builder.add_line(corpus);
//! let vocabulary = builder.build().unwrap();
//! let punctuations = PunctuationVocabulary::default();
//!
//! let segmentation = segment(
//!     corpus.split_whitespace(),
//!     &vocabulary,
//!     &punctuations,
//!     &SegmenterConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(segmentation.examples.len(), 1);
//!
//! // A classifier that predicts SPACE (class 0) for every gap
//! let mut classifier = |window: &[u32]| vec![vec![1.0_f32, 0.0]; window.len() - 1];
//! let restore_config = RestoreConfig::default();
//! let restorer = Restorer::new(&vocabulary, &punctuations, &restore_config).unwrap();
//! let text = restorer.restore_line("the cat sat", &mut classifier).unwrap();
//! assert_eq!(text, "The cat sat");
//! ```

#![warn(missing_docs)]

pub mod baseline;
pub mod config;
pub mod corpus;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod input;
pub mod punctuation;
pub mod reconstructor;
pub mod restorer;
pub mod segmenter;
pub mod vocabulary;

// Re-export key types
pub use baseline::BaselineModel;
pub use config::{
    RepunctConfig, ReservedTokens, RestoreConfig, RestoreConfigBuilder, SegmenterConfig,
    SegmenterConfigBuilder, VocabularyConfig,
};
pub use corpus::{build_vocabulary, segment_files};
pub use dataset::TrainingExample;
pub use error::{RepunctError, Result};
pub use evaluation::{evaluate, tokens_from_text, ErrorReport, Evaluator};
pub use input::{prepare_tokens, InputFilter};
pub use punctuation::{Punctuation, PunctuationVocabulary};
pub use reconstructor::{Casing, Reconstructor, ReconstructorState};
pub use restorer::{argmax, Classifier, Restorer};
pub use segmenter::{segment, SegmentStats, Segmentation, Segmenter, SegmenterState};
pub use vocabulary::{Vocabulary, VocabularyBuilder, WordId, WordVocabulary};
