//! Punctuation error metrics
//!
//! Ground truth and prediction are token streams in the punctuation token
//! format (words interleaved with `,COMMA`, `.PERIOD`, ...). Both are reduced
//! to one slot per word holding the punctuation that follows it; slots are
//! then compared pairwise. The streams must contain the same words in the
//! same order (case-insensitively), otherwise the comparison is rejected.

use crate::error::{RepunctError, Result};
use crate::punctuation::{Punctuation, PunctuationVocabulary};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Label of the capitalization pseudo-class in reports
pub const CAPITALIZATION: &str = "CAPITALIZATION";

/// Class a count is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScoreClass {
    /// A real punctuation class
    Punctuation(Punctuation),
    /// Upper-case first letter of a word
    Capitalization,
}

impl fmt::Display for ScoreClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreClass::Punctuation(p) => write!(f, "{p}"),
            ScoreClass::Capitalization => f.write_str(CAPITALIZATION),
        }
    }
}

/// Confusion counts of one class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassCounts {
    /// Predicted and present
    pub true_positives: u64,
    /// Predicted but absent or different
    pub false_positives: u64,
    /// Present but not predicted
    pub false_negatives: u64,
}

impl ClassCounts {
    fn add(&mut self, other: &ClassCounts) {
        self.true_positives += other.true_positives;
        self.false_positives += other.false_positives;
        self.false_negatives += other.false_negatives;
    }
}

/// Slot-level counts across all compared streams
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ErrorCounts {
    /// Compared slots (one per word)
    pub slots: u64,
    /// Slots whose punctuation (and case, when scored) matched
    pub slots_correct: u64,
    /// Correctly placed marks
    pub correct: u64,
    /// Marks predicted with the wrong class
    pub substitutions: u64,
    /// Marks that were missed
    pub deletions: u64,
    /// Marks predicted where there were none
    pub insertions: u64,
}

/// Precision, recall and F1 of one class; `None` where undefined
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassScore {
    /// Class label
    pub class: String,
    /// Underlying counts
    pub counts: ClassCounts,
    /// TP / (TP + FP)
    pub precision: Option<f64>,
    /// TP / (TP + FN)
    pub recall: Option<f64>,
    /// Harmonic mean of precision and recall
    pub f1: Option<f64>,
}

impl ClassScore {
    fn new(class: String, counts: ClassCounts) -> Self {
        let tp = counts.true_positives as f64;
        let ratio = |other: u64| {
            let denominator = tp + other as f64;
            (denominator > 0.0).then(|| tp / denominator)
        };
        let precision = ratio(counts.false_positives);
        let recall = ratio(counts.false_negatives);
        let f1 = match (precision, recall) {
            (Some(p), Some(r)) if p + r > 0.0 => Some(2.0 * p * r / (p + r)),
            _ => None,
        };
        Self {
            class,
            counts,
            precision,
            recall,
            f1,
        }
    }
}

/// Final evaluation report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    /// Per-class scores, SPACE excluded
    pub classes: Vec<ClassScore>,
    /// Scores over all reported classes
    pub overall: ClassScore,
    /// Slot counts
    pub counts: ErrorCounts,
    /// Fraction of slots that were wrong
    pub error_rate: Option<f64>,
    /// (S + D + I) / (C + S + D)
    pub slot_error_rate: Option<f64>,
}

fn percent(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v * 100.0),
        None => "nan".to_string(),
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(46);
        let row = |f: &mut fmt::Formatter<'_>, score: &ClassScore, label: &str| {
            writeln!(
                f,
                "{:<16} {:<9} {:<9} {:<9}",
                label,
                percent(score.precision, 3),
                percent(score.recall, 3),
                percent(score.f1, 3)
            )
        };

        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "{:<16} {:<9} {:<9} {:<9}",
            "PUNCTUATION", "PRECISION", "RECALL", "F-SCORE"
        )?;
        for score in &self.classes {
            row(f, score, &score.class)?;
        }
        writeln!(f, "{rule}")?;
        row(f, &self.overall, "Overall")?;
        writeln!(f, "Err: {}%", percent(self.error_rate, 2))?;
        write!(f, "SER: {}%", percent(self.slot_error_rate, 1))
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot<'t> {
    word: &'t str,
    position: usize,
    punctuation: Punctuation,
}

fn collect_slots<'t, S: AsRef<str>>(
    tokens: &'t [S],
    punctuations: &PunctuationVocabulary,
    mapping: Option<&BTreeMap<String, String>>,
) -> Vec<Slot<'t>> {
    let mut slots: Vec<Slot<'t>> = Vec::new();
    for (position, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        let mapped = mapping
            .and_then(|m| m.get(token))
            .map(String::as_str)
            .unwrap_or(token);
        match punctuations
            .id_of_token(mapped)
            .and_then(|id| punctuations.class(id))
        {
            // Leading punctuation has no word to attach to
            Some(class) => {
                if let Some(last) = slots.last_mut() {
                    last.punctuation = class;
                }
            }
            None => slots.push(Slot {
                word: token,
                position,
                punctuation: Punctuation::Space,
            }),
        }
    }
    slots
}

fn context<S: AsRef<str>>(tokens: &[S], position: usize) -> String {
    let start = position.saturating_sub(2);
    let end = tokens.len().min(position + 3);
    tokens
        .get(start..end)
        .unwrap_or_default()
        .iter()
        .map(|token| token.as_ref())
        .collect::<Vec<&str>>()
        .join(" ")
}

fn initial_case(word: &str) -> Option<bool> {
    let first = word.chars().next()?;
    if first.is_uppercase() {
        Some(true)
    } else if first.is_lowercase() {
        Some(false)
    } else {
        None
    }
}

/// Accumulates error counts over pairs of token streams
#[derive(Debug, Clone)]
pub struct Evaluator {
    punctuations: PunctuationVocabulary,
    mapping: BTreeMap<String, String>,
    include_capitalization: bool,
    counts: ErrorCounts,
    classes: BTreeMap<ScoreClass, ClassCounts>,
}

impl Evaluator {
    /// Create an evaluator over the given punctuation classes
    pub fn new(punctuations: PunctuationVocabulary) -> Self {
        Self {
            punctuations,
            mapping: BTreeMap::new(),
            include_capitalization: false,
            counts: ErrorCounts::default(),
            classes: BTreeMap::new(),
        }
    }

    /// Rewrite ground-truth punctuation tokens before scoring
    pub fn with_punctuation_mapping(mut self, mapping: BTreeMap<String, String>) -> Self {
        self.mapping = mapping;
        self
    }

    /// Also score word-initial capitalization
    pub fn with_capitalization(mut self, enabled: bool) -> Self {
        self.include_capitalization = enabled;
        self
    }

    /// Counts accumulated so far
    pub fn counts(&self) -> &ErrorCounts {
        &self.counts
    }

    /// Compare one ground-truth stream with its prediction
    ///
    /// The pair is checked for alignment before any count is updated, so a
    /// rejected pair leaves the evaluator unchanged.
    pub fn add_pair<S, P>(&mut self, label: &str, target: &[S], predicted: &[P]) -> Result<()>
    where
        S: AsRef<str>,
        P: AsRef<str>,
    {
        let target_slots = collect_slots(target, &self.punctuations, Some(&self.mapping));
        let predicted_slots = collect_slots(predicted, &self.punctuations, None);

        for index in 0..target_slots.len().max(predicted_slots.len()) {
            let t = target_slots.get(index);
            let p = predicted_slots.get(index);
            let aligned = match (t, p) {
                (Some(t), Some(p)) => t.word.to_lowercase() == p.word.to_lowercase(),
                _ => false,
            };
            if !aligned {
                let target_pos = t.map_or(target.len(), |s| s.position);
                let predicted_pos = p.map_or(predicted.len(), |s| s.position);
                return Err(RepunctError::Misaligned {
                    file: label.to_string(),
                    target: t.map_or("<end of stream>", |s| s.word).to_string(),
                    target_pos,
                    predicted: p.map_or("<end of stream>", |s| s.word).to_string(),
                    predicted_pos,
                    target_context: context(target, target_pos),
                    predicted_context: context(predicted, predicted_pos),
                });
            }
        }

        // Case is only compared for words that follow no punctuation in
        // either stream; the first word counts as following SPACE.
        let mut after_space = true;
        for (t, p) in target_slots.iter().zip(&predicted_slots) {
            self.score(t, p, after_space);
            after_space = t.punctuation == Punctuation::Space
                && p.punctuation == Punctuation::Space;
        }
        log::debug!("{label}: {} slots compared", target_slots.len());
        Ok(())
    }

    fn class(&mut self, class: ScoreClass) -> &mut ClassCounts {
        self.classes.entry(class).or_default()
    }

    fn score(&mut self, target: &Slot<'_>, predicted: &Slot<'_>, after_space: bool) {
        use Punctuation::Space;

        let t = target.punctuation;
        let p = predicted.punctuation;
        self.counts.slots += 1;
        if t == p && (!self.include_capitalization || target.word == predicted.word) {
            self.counts.slots_correct += 1;
        }

        match (t, p) {
            (Space, Space) => {}
            (t, Space) => {
                self.counts.deletions += 1;
                self.class(ScoreClass::Punctuation(t)).false_negatives += 1;
            }
            (Space, p) => {
                self.counts.insertions += 1;
                self.class(ScoreClass::Punctuation(p)).false_positives += 1;
            }
            (t, p) if t == p => {
                self.counts.correct += 1;
                self.class(ScoreClass::Punctuation(t)).true_positives += 1;
            }
            (t, p) => {
                self.counts.substitutions += 1;
                self.class(ScoreClass::Punctuation(p)).false_positives += 1;
                self.class(ScoreClass::Punctuation(t)).false_negatives += 1;
            }
        }

        if !self.include_capitalization || !after_space {
            return;
        }
        match (initial_case(target.word), initial_case(predicted.word)) {
            (Some(true), Some(true)) => {
                self.counts.correct += 1;
                self.class(ScoreClass::Capitalization).true_positives += 1;
            }
            (Some(true), Some(false)) => {
                self.counts.deletions += 1;
                self.class(ScoreClass::Capitalization).false_negatives += 1;
            }
            (Some(false), Some(true)) => {
                self.counts.insertions += 1;
                self.class(ScoreClass::Capitalization).false_positives += 1;
            }
            _ => {}
        }
    }

    /// Compute the report
    pub fn report(&self) -> ErrorReport {
        let mut reported: Vec<ScoreClass> = self
            .punctuations
            .classes()
            .iter()
            .filter(|p| **p != Punctuation::Space)
            .map(|p| ScoreClass::Punctuation(*p))
            .collect();
        if self.include_capitalization {
            reported.push(ScoreClass::Capitalization);
        }

        let mut overall = ClassCounts::default();
        let classes = reported
            .into_iter()
            .map(|class| {
                let counts = self.classes.get(&class).copied().unwrap_or_default();
                overall.add(&counts);
                ClassScore::new(class.to_string(), counts)
            })
            .collect();

        let c = &self.counts;
        let error_rate =
            (c.slots > 0).then(|| (c.slots - c.slots_correct) as f64 / c.slots as f64);
        let reference = c.correct + c.substitutions + c.deletions;
        let slot_error_rate = (reference > 0)
            .then(|| (c.substitutions + c.deletions + c.insertions) as f64 / reference as f64);

        ErrorReport {
            classes,
            overall: ClassScore::new("Overall".to_string(), overall),
            counts: self.counts,
            error_rate,
            slot_error_rate,
        }
    }
}

/// Evaluate a single pair of streams
pub fn evaluate<S, P>(
    label: &str,
    target: &[S],
    predicted: &[P],
    punctuations: &PunctuationVocabulary,
    include_capitalization: bool,
) -> Result<ErrorReport>
where
    S: AsRef<str>,
    P: AsRef<str>,
{
    let mut evaluator =
        Evaluator::new(punctuations.clone()).with_capitalization(include_capitalization);
    evaluator.add_pair(label, target, predicted)?;
    Ok(evaluator.report())
}

/// Split punctuated plain text into the punctuation token format
///
/// Trailing punctuation marks are peeled off each word (`"world."` becomes
/// `world .PERIOD`); marks that stand alone become tokens themselves.
pub fn tokens_from_text(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for word in text.split_whitespace() {
        let stem = word.trim_end_matches(|c| Punctuation::from_symbol(c).is_some());
        if !stem.is_empty() {
            tokens.push(stem.to_string());
        }
        tokens.extend(
            word[stem.len()..]
                .chars()
                .filter_map(Punctuation::from_symbol)
                .map(|p| p.token().to_string()),
        );
    }
    tokens
}
