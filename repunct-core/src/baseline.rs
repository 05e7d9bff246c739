//! Count-based baseline classifier
//!
//! Scores each gap from how often every punctuation class followed the
//! previous word and preceded the next word in the training examples:
//!
//! `score(c) = log P(c | prev) + log P(c | next) - log P(c)`
//!
//! with add-one smoothing on every distribution. It needs no external model
//! and is good enough to exercise the restoration pipeline end to end.

use crate::dataset::TrainingExample;
use crate::error::{RepunctError, Result};
use crate::restorer::Classifier;
use crate::vocabulary::WordId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Class counts conditioned on one word
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct WordCounts {
    total: u64,
    classes: Vec<u64>,
}

impl WordCounts {
    fn new(classes: usize) -> Self {
        Self {
            total: 0,
            classes: vec![0; classes],
        }
    }

    fn add(&mut self, class: usize) {
        self.total += 1;
        self.classes[class] += 1;
    }

    fn log_probability(&self, class: usize) -> f64 {
        let count = self.classes.get(class).copied().unwrap_or(0);
        ((count + 1) as f64 / (self.total + self.classes.len() as u64) as f64).ln()
    }
}

/// Add-one smoothed gap classifier trained from [`TrainingExample`]s
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineModel {
    prior: WordCounts,
    after: HashMap<WordId, WordCounts>,
    before: HashMap<WordId, WordCounts>,
}

impl BaselineModel {
    /// Count class occurrences around every gap of the examples
    pub fn train<'e, I>(examples: I, classes: usize) -> Result<Self>
    where
        I: IntoIterator<Item = &'e TrainingExample>,
    {
        if classes == 0 {
            return Err(RepunctError::InvalidConfig(
                "baseline needs at least one punctuation class".into(),
            ));
        }

        let mut model = Self {
            prior: WordCounts::new(classes),
            after: HashMap::new(),
            before: HashMap::new(),
        };
        let mut skipped = 0usize;
        for example in examples {
            if !example.is_aligned() {
                skipped += 1;
                continue;
            }
            for (gap, &class) in example.punctuations.iter().enumerate() {
                let class_index = class as usize;
                if class_index >= classes {
                    return Err(RepunctError::IdOutOfRange {
                        id: class,
                        len: classes,
                    });
                }
                model.prior.add(class_index);
                model
                    .after
                    .entry(example.words[gap])
                    .or_insert_with(|| WordCounts::new(classes))
                    .add(class_index);
                model
                    .before
                    .entry(example.words[gap + 1])
                    .or_insert_with(|| WordCounts::new(classes))
                    .add(class_index);
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {skipped} misaligned training examples");
        }
        log::info!(
            "Baseline trained on {} gaps, {} distinct words",
            model.prior.total,
            model.after.len().max(model.before.len())
        );
        Ok(model)
    }

    /// Number of punctuation classes scored
    pub fn classes(&self) -> usize {
        self.prior.classes.len()
    }

    /// Number of gaps seen in training
    pub fn gaps(&self) -> u64 {
        self.prior.total
    }

    /// Scores of every class for the gap between two words
    ///
    /// A word never seen on its side of a gap backs off to the prior, so a
    /// gap between two unseen words scores `log P(c)`.
    pub fn score_gap(&self, previous: WordId, next: WordId) -> Vec<f32> {
        let after = self.after.get(&previous).unwrap_or(&self.prior);
        let before = self.before.get(&next).unwrap_or(&self.prior);

        (0..self.classes())
            .map(|class| {
                (after.log_probability(class) + before.log_probability(class)
                    - self.prior.log_probability(class)) as f32
            })
            .collect()
    }

    /// One score row per gap of a window
    pub fn score_window(&self, window: &[WordId]) -> Vec<Vec<f32>> {
        window
            .windows(2)
            .map(|pair| self.score_gap(pair[0], pair[1]))
            .collect()
    }

    /// Save as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Load from JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let model: Self = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        if model.classes() == 0 {
            return Err(RepunctError::InvalidConfig(
                "baseline model has no punctuation classes".into(),
            ));
        }
        Ok(model)
    }
}

impl Classifier for BaselineModel {
    fn classify(&mut self, window: &[WordId]) -> Result<Vec<Vec<f32>>> {
        Ok(self.score_window(window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restorer::argmax;
    use tempfile::TempDir;

    // ids: 0 "hello", 1 "world", 2 "yes", 3 END
    fn examples() -> Vec<TrainingExample> {
        vec![
            TrainingExample {
                words: vec![0, 1, 2, 3],
                punctuations: vec![1, 2, 2],
            },
            TrainingExample {
                words: vec![0, 1, 3],
                punctuations: vec![1, 2],
            },
        ]
    }

    #[test]
    fn test_learns_frequent_classes() {
        let model = BaselineModel::train(&examples(), 7).unwrap();
        assert_eq!(model.classes(), 7);
        assert_eq!(model.gaps(), 5);

        assert_eq!(argmax(&model.score_gap(0, 1)), Some(1));
        assert_eq!(argmax(&model.score_gap(1, 3)), Some(2));
    }

    #[test]
    fn test_window_rows() {
        let model = BaselineModel::train(&examples(), 7).unwrap();
        let rows = model.score_window(&[0, 1, 2]);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.len() == 7));
        assert!(model.score_window(&[0]).is_empty());
    }

    #[test]
    fn test_unseen_words_fall_back_to_prior() {
        let model = BaselineModel::train(&examples(), 7).unwrap();
        // PERIOD is the most frequent class overall
        assert_eq!(argmax(&model.score_gap(42, 43)), Some(2));

        let prior: Vec<f32> = (0..7)
            .map(|class| model.prior.log_probability(class) as f32)
            .collect();
        assert_eq!(model.score_gap(42, 43), prior);
    }

    #[test]
    fn test_one_unseen_side_keeps_the_other() {
        let model = BaselineModel::train(&examples(), 7).unwrap();
        // "hello" is always followed by COMMA
        assert_eq!(argmax(&model.score_gap(0, 43)), Some(1));
        // END is always preceded by PERIOD
        assert_eq!(argmax(&model.score_gap(42, 3)), Some(2));
    }

    #[test]
    fn test_rejects_class_out_of_range() {
        let bad = vec![TrainingExample {
            words: vec![0, 1],
            punctuations: vec![9],
        }];
        assert!(matches!(
            BaselineModel::train(&bad, 7),
            Err(RepunctError::IdOutOfRange { id: 9, len: 7 })
        ));
        assert!(BaselineModel::train(&examples(), 0).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("baseline.json");
        let model = BaselineModel::train(&examples(), 7).unwrap();
        model.save(&path).unwrap();
        assert_eq!(BaselineModel::load(&path).unwrap(), model);
    }
}
