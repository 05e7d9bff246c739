//! Training-window segmentation
//!
//! Turns an annotated token stream (words interleaved with punctuation
//! descriptor tokens) into bounded training examples. Words and gaps are
//! buffered until the window holds `max_len` words; the window is then
//! either finalized, resuming right after its last sentence end, or dropped
//! when it contains no usable sentence end.
//!
//! # State machine
//!
//! | state                         | input                     | action / next state                          |
//! |-------------------------------|---------------------------|----------------------------------------------|
//! | `Reading { previous: Punct }` | punctuation               | dropped (collapsing)                         |
//! | `Reading { previous: Word }`  | punctuation               | gap pushed, `Reading { Punct }`              |
//! | `Reading { previous: Word }`  | word                      | SPACE gap + word pushed, `Reading { Word }`  |
//! | `Reading { previous: Punct }` | word                      | word pushed, `Reading { Word }`              |
//! | `Reading { .. }`              | window full, no boundary  | buffers cleared, `AwaitingSentenceEnd`       |
//! | `AwaitingSentenceEnd`         | sentence-ending token     | token dropped, `Reading { Punct }`           |
//! | `AwaitingSentenceEnd`         | anything else             | token dropped                                |
//!
//! The stream starts in `Reading { previous: Punct }`, so leading
//! punctuation is always dropped.

use crate::config::SegmenterConfig;
use crate::dataset::TrainingExample;
use crate::error::{RepunctError, Result};
use crate::punctuation::{Punctuation, PunctuationVocabulary, SPACE};
use crate::vocabulary::{WordId, WordVocabulary};
use std::collections::HashSet;
use std::fmt;

/// Kind of the last accepted token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A word
    Word,
    /// A punctuation token
    Punctuation,
}

/// Segmenter state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmenterState {
    /// Accepting tokens into the current window
    Reading {
        /// Kind of the last accepted token
        previous: TokenKind,
    },
    /// Dropping tokens until a sentence-ending punctuation token
    AwaitingSentenceEnd,
}

impl Default for SegmenterState {
    fn default() -> Self {
        SegmenterState::Reading {
            previous: TokenKind::Punctuation,
        }
    }
}

/// Counters accumulated over one or more streams
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentStats {
    /// Words accepted into windows
    pub words: u64,
    /// Accepted words that mapped to UNK
    pub unknown_words: u64,
    /// Training examples produced
    pub examples: u64,
    /// Windows dropped for lack of a sentence end
    pub discarded_windows: u64,
    /// Tokens dropped while awaiting a sentence end
    pub skipped_tokens: u64,
}

impl SegmentStats {
    /// Add another accumulator's counts
    pub fn merge(&mut self, other: &SegmentStats) {
        self.words += other.words;
        self.unknown_words += other.unknown_words;
        self.examples += other.examples;
        self.discarded_windows += other.discarded_windows;
        self.skipped_tokens += other.skipped_tokens;
    }

    /// Share of accepted words that were unknown (0.0 when nothing was read)
    pub fn unknown_ratio(&self) -> f64 {
        if self.words == 0 {
            0.0
        } else {
            self.unknown_words as f64 / self.words as f64
        }
    }
}

impl fmt::Display for SegmentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} examples, {} words ({:.2}% UNK), {} windows discarded, {} tokens skipped",
            self.examples,
            self.words,
            self.unknown_ratio() * 100.0,
            self.discarded_windows,
            self.skipped_tokens
        )
    }
}

/// Result of segmenting a whole stream
#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    /// Examples in stream order
    pub examples: Vec<TrainingExample>,
    /// Counters for the stream
    pub stats: SegmentStats,
}

/// Push-style segmenter over one token stream
pub struct Segmenter<'a> {
    vocabulary: &'a WordVocabulary,
    punctuations: &'a PunctuationVocabulary,
    config: &'a SegmenterConfig,
    discard: HashSet<&'a str>,
    space_id: u32,
    state: SegmenterState,
    words: Vec<WordId>,
    gaps: Vec<u32>,
    // Gap index of the last sentence end in the window; 0 means none.
    last_boundary: usize,
    stats: SegmentStats,
}

impl<'a> Segmenter<'a> {
    /// Create a segmenter for one stream
    pub fn new(
        vocabulary: &'a WordVocabulary,
        punctuations: &'a PunctuationVocabulary,
        config: &'a SegmenterConfig,
    ) -> Result<Self> {
        config.validate()?;
        let space_id =
            punctuations
                .id(Punctuation::Space)
                .ok_or_else(|| RepunctError::MissingReservedToken {
                    token: SPACE.to_string(),
                })?;

        Ok(Self {
            vocabulary,
            punctuations,
            config,
            discard: config.discard_tokens.iter().map(String::as_str).collect(),
            space_id,
            state: SegmenterState::default(),
            words: Vec::with_capacity(config.max_len),
            gaps: Vec::with_capacity(config.max_len),
            last_boundary: 0,
            stats: SegmentStats::default(),
        })
    }

    /// Current state
    pub fn state(&self) -> SegmenterState {
        self.state
    }

    /// Counters so far
    pub fn stats(&self) -> &SegmentStats {
        &self.stats
    }

    /// Number of words buffered in the open window
    pub fn buffered_words(&self) -> usize {
        self.words.len()
    }

    /// Feed one token; returns an example when a window is finalized
    pub fn push(&mut self, token: &str) -> Option<TrainingExample> {
        if self.discard.contains(token) {
            return None;
        }
        let token = self.config.map_token(token);

        let previous = match self.state {
            SegmenterState::AwaitingSentenceEnd => {
                if Punctuation::from_token(token).is_some_and(Punctuation::is_sentence_end) {
                    self.state = SegmenterState::default();
                } else {
                    self.stats.skipped_tokens += 1;
                }
                return None;
            }
            SegmenterState::Reading { previous } => previous,
        };

        if let Some(class_id) = self.punctuations.id_of_token(token) {
            if previous == TokenKind::Punctuation {
                return None;
            }
            if Punctuation::from_token(token).is_some_and(Punctuation::is_sentence_end) {
                self.last_boundary = self.gaps.len();
            }
            self.gaps.push(class_id);
            self.state = SegmenterState::Reading {
                previous: TokenKind::Punctuation,
            };
            return None;
        }

        if previous == TokenKind::Word {
            self.gaps.push(self.space_id);
        }
        let word = self.vocabulary.lookup_exact(token);
        self.words.push(word);
        self.stats.words += 1;
        if word == self.vocabulary.unknown_id() {
            self.stats.unknown_words += 1;
        }
        self.state = SegmenterState::Reading {
            previous: TokenKind::Word,
        };

        if self.words.len() == self.config.max_len {
            self.close_window()
        } else {
            None
        }
    }

    /// Feed every whitespace-separated token of a line
    pub fn push_line(&mut self, line: &str, examples: &mut Vec<TrainingExample>) {
        for token in line.split_whitespace() {
            if let Some(example) = self.push(token) {
                examples.push(example);
            }
        }
    }

    /// End the stream, flushing the open window when configured to
    ///
    /// The flushed example runs through the last accepted sentence end and
    /// gets END appended; words after it are dropped. An open window with
    /// no sentence end at all is discarded like an over-length one.
    pub fn finish(mut self) -> (Option<TrainingExample>, SegmentStats) {
        let flushed = match self.state {
            SegmenterState::Reading { .. }
                if self.config.flush_trailing && !self.words.is_empty() =>
            {
                self.flush()
            }
            _ => None,
        };
        (flushed, self.stats)
    }

    fn flush(&mut self) -> Option<TrainingExample> {
        let punctuations = self.punctuations;
        let Some(boundary) = self.gaps.iter().rposition(|&id| {
            punctuations
                .class(id)
                .is_some_and(Punctuation::is_sentence_end)
        }) else {
            log::debug!(
                "Dropping trailing {} words without a sentence end",
                self.words.len()
            );
            self.stats.discarded_windows += 1;
            return None;
        };

        let mut words = Vec::with_capacity(boundary + 2);
        words.extend_from_slice(&self.words[..=boundary]);
        words.push(self.vocabulary.end_id());
        self.stats.examples += 1;
        log::trace!(
            "Flushed trailing example, dropping {} words after the last sentence end",
            self.words.len() - boundary - 1
        );
        Some(TrainingExample {
            words,
            punctuations: self.gaps[..=boundary].to_vec(),
        })
    }

    fn close_window(&mut self) -> Option<TrainingExample> {
        debug_assert_eq!(self.words.len(), self.gaps.len() + 1);

        if self.last_boundary == 0 {
            log::debug!(
                "Discarding window of {} words without a sentence end",
                self.words.len()
            );
            self.words.clear();
            self.gaps.clear();
            self.stats.discarded_windows += 1;
            self.state = SegmenterState::AwaitingSentenceEnd;
            return None;
        }

        let keep = self.words.len() - 1;
        let mut words = Vec::with_capacity(self.words.len());
        words.extend_from_slice(&self.words[..keep]);
        words.push(self.vocabulary.end_id());
        let example = TrainingExample {
            words,
            punctuations: self.gaps.clone(),
        };

        let resume = self.last_boundary + 1;
        self.words.drain(..resume);
        self.gaps.drain(..resume);
        self.last_boundary = 0;
        self.stats.examples += 1;
        log::trace!(
            "Finalized example, resuming with {} buffered words",
            self.words.len()
        );

        Some(example)
    }
}

/// Segment a complete token stream
pub fn segment<I, S>(
    tokens: I,
    vocabulary: &WordVocabulary,
    punctuations: &PunctuationVocabulary,
    config: &SegmenterConfig,
) -> Result<Segmentation>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut segmenter = Segmenter::new(vocabulary, punctuations, config)?;
    let mut examples = Vec::new();
    for token in tokens {
        if let Some(example) = segmenter.push(token.as_ref()) {
            examples.push(example);
        }
    }
    let (flushed, stats) = segmenter.finish();
    examples.extend(flushed);

    Ok(Segmentation { examples, stats })
}
