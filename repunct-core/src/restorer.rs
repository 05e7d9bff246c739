//! Inference-time punctuation restoration
//!
//! The engine slides a window of at most `max_len` tokens over the input,
//! asks a [`Classifier`] for one score row per gap and writes the words and
//! predicted punctuation through a [`Reconstructor`]. After each window the
//! cursor advances to just after the last predicted sentence end, so the
//! next window starts on a sentence start. Without a predicted sentence end
//! the whole window is consumed except its last token, which becomes the
//! first token of the next window.

use crate::config::RestoreConfig;
use crate::error::{RepunctError, Result};
use crate::input::InputFilter;
use crate::punctuation::{Punctuation, PunctuationVocabulary};
use crate::reconstructor::{Casing, Reconstructor};
use crate::vocabulary::{WordId, WordVocabulary};
use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Per-gap punctuation scorer
///
/// For a window of `n` word ids the result has one score row per gap,
/// `n - 1` rows, each holding one score per punctuation class id. A result
/// with `n` rows is accepted too; its first row belongs to the first token,
/// which carries no prediction, and is ignored.
pub trait Classifier {
    /// Score every gap of the window
    fn classify(&mut self, window: &[WordId]) -> Result<Vec<Vec<f32>>>;
}

impl<F> Classifier for F
where
    F: FnMut(&[WordId]) -> Vec<Vec<f32>>,
{
    fn classify(&mut self, window: &[WordId]) -> Result<Vec<Vec<f32>>> {
        Ok(self(window))
    }
}

/// Index of the highest score; ties go to the lowest index and NaN never wins
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}

/// Restores punctuation and capitalization with a classifier
#[derive(Debug, Clone)]
pub struct Restorer<'a> {
    vocabulary: &'a WordVocabulary,
    punctuations: &'a PunctuationVocabulary,
    config: &'a RestoreConfig,
    mapping: BTreeMap<String, String>,
}

impl<'a> Restorer<'a> {
    /// Create a restorer; fails on an invalid configuration
    pub fn new(
        vocabulary: &'a WordVocabulary,
        punctuations: &'a PunctuationVocabulary,
        config: &'a RestoreConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            vocabulary,
            punctuations,
            config,
            mapping: BTreeMap::new(),
        })
    }

    /// Punctuation mapping keys are also removed from input lines
    pub fn with_punctuation_mapping(mut self, mapping: BTreeMap<String, String>) -> Self {
        self.mapping = mapping;
        self
    }

    /// Arg-max class for every gap of a window
    pub fn predict<C>(&self, window: &[WordId], classifier: &mut C) -> Result<Vec<Punctuation>>
    where
        C: Classifier + ?Sized,
    {
        let rows = classifier.classify(window)?;
        let gaps = window.len().saturating_sub(1);
        let rows = if rows.len() == gaps {
            &rows[..]
        } else if rows.len() == window.len() && !rows.is_empty() {
            &rows[1..]
        } else {
            return Err(RepunctError::ClassifierShape {
                rows: rows.len(),
                window: window.len(),
            });
        };

        rows.iter()
            .enumerate()
            .map(|(gap, row)| {
                let id = argmax(row).ok_or(RepunctError::EmptyScores { gap })? as u32;
                self.punctuations
                    .class(id)
                    .ok_or(RepunctError::IdOutOfRange {
                        id,
                        len: self.punctuations.len(),
                    })
            })
            .collect()
    }

    /// Restore a prepared token stream (normally ending in END)
    pub fn restore<S, C>(&self, tokens: &[S], classifier: &mut C) -> Result<String>
    where
        S: AsRef<str>,
        C: Classifier + ?Sized,
    {
        let end_token = self.vocabulary.end_token();
        let unknown_id = self.vocabulary.unknown_id();
        let mut output = Reconstructor::new(end_token, self.config.capitalize_unknown);
        let mut cursor = 0;

        while cursor < tokens.len() {
            let window = &tokens[cursor..tokens.len().min(cursor + self.config.max_len)];
            let ids: Vec<WordId> = window
                .iter()
                .map(|token| self.vocabulary.lookup(token.as_ref()))
                .collect();
            let predictions = if window.len() > 1 {
                self.predict(&ids, classifier)?
            } else {
                Vec::new()
            };

            output.word(window[0].as_ref(), Casing::Verbatim, ids[0] == unknown_id);

            let ends_text = window.last().is_some_and(|t| t.as_ref() == end_token);
            let last_sentence_end = predictions
                .iter()
                .rposition(|p| p.is_sentence_end())
                .map_or(0, |gap| gap + 1);
            let step = if ends_text || last_sentence_end == 0 {
                window.len() - 1
            } else {
                last_sentence_end
            };
            log::trace!(
                "window at {cursor}: {} tokens, advancing {step}",
                window.len()
            );

            for (j, &class) in predictions.iter().take(step).enumerate() {
                output.gap(class);
                if j + 1 < step {
                    output.word(window[j + 1].as_ref(), Casing::Lower, ids[j + 1] == unknown_id);
                }
            }

            if ends_text {
                break;
            }
            if step == 0 {
                log::warn!(
                    "restoration stopped at token {cursor} of {}: window cannot advance",
                    tokens.len()
                );
                break;
            }
            cursor += step;
        }

        Ok(output.finish())
    }

    /// Filter a raw input line and restore it
    pub fn restore_line<C>(&self, line: &str, classifier: &mut C) -> Result<String>
    where
        C: Classifier + ?Sized,
    {
        let filter = InputFilter::new(self.punctuations, &self.mapping, self.config);
        let tokens = filter.prepare(line, self.vocabulary.end_token());
        self.restore(&tokens, classifier)
    }

    /// Restore independent lines in order, one classifier per worker
    #[cfg(feature = "parallel")]
    pub fn restore_lines<S, C, F>(&self, lines: &[S], new_classifier: F) -> Result<Vec<String>>
    where
        S: AsRef<str> + Sync,
        C: Classifier,
        F: Fn() -> C + Sync + Send,
    {
        lines
            .par_iter()
            .map_init(new_classifier, |classifier, line| {
                self.restore_line(line.as_ref(), classifier)
            })
            .collect()
    }

    /// Restore independent lines in order
    #[cfg(not(feature = "parallel"))]
    pub fn restore_lines<S, C, F>(&self, lines: &[S], new_classifier: F) -> Result<Vec<String>>
    where
        S: AsRef<str> + Sync,
        C: Classifier,
        F: Fn() -> C + Sync + Send,
    {
        let mut classifier = new_classifier();
        lines
            .iter()
            .map(|line| self.restore_line(line.as_ref(), &mut classifier))
            .collect()
    }
}
