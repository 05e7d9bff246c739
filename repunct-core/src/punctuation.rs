//! Punctuation classes and the punctuation vocabulary
//!
//! Punctuation is represented in token streams by descriptor tokens whose
//! first character is the printable mark (`,COMMA`, `.PERIOD`, ...). The
//! `_SPACE` class stands for "no punctuation" and is implicit between two
//! consecutive words.

use crate::error::{RepunctError, Result};
use crate::vocabulary::Vocabulary;
use std::fmt;
use std::path::Path;

/// Token of the "no punctuation" class
pub const SPACE: &str = "_SPACE";

/// The closed set of punctuation classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Punctuation {
    /// No punctuation, a plain space between words
    Space,
    /// `,`
    Comma,
    /// `.`
    Period,
    /// `?`
    QuestionMark,
    /// `!`
    ExclamationMark,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
}

impl Punctuation {
    /// All classes in canonical order
    pub const ALL: [Punctuation; 7] = [
        Punctuation::Space,
        Punctuation::Comma,
        Punctuation::Period,
        Punctuation::QuestionMark,
        Punctuation::ExclamationMark,
        Punctuation::Colon,
        Punctuation::Semicolon,
    ];

    /// Descriptor token used in token streams and vocabulary files
    pub fn token(self) -> &'static str {
        match self {
            Punctuation::Space => SPACE,
            Punctuation::Comma => ",COMMA",
            Punctuation::Period => ".PERIOD",
            Punctuation::QuestionMark => "?QUESTIONMARK",
            Punctuation::ExclamationMark => "!EXCLAMATIONMARK",
            Punctuation::Colon => ":COLON",
            Punctuation::Semicolon => ";SEMICOLON",
        }
    }

    /// Parse a descriptor token
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.token() == token)
    }

    /// Printable mark: the first character of the token, a space for SPACE
    pub fn symbol(self) -> char {
        match self {
            Punctuation::Space => ' ',
            other => other.token().chars().next().unwrap_or(' '),
        }
    }

    /// Class whose printable mark is `symbol` (SPACE is never returned)
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .filter(|p| *p != Punctuation::Space)
            .find(|p| p.symbol() == symbol)
    }

    /// PERIOD, QUESTIONMARK and EXCLAMATIONMARK end a sentence
    pub fn is_sentence_end(self) -> bool {
        matches!(
            self,
            Punctuation::Period | Punctuation::QuestionMark | Punctuation::ExclamationMark
        )
    }
}

impl fmt::Display for Punctuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Bijection between punctuation classes and the classifier's class ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PunctuationVocabulary {
    classes: Vec<Punctuation>,
}

impl Default for PunctuationVocabulary {
    fn default() -> Self {
        Self {
            classes: Punctuation::ALL.to_vec(),
        }
    }
}

impl PunctuationVocabulary {
    /// Build from classes in id order
    pub fn new(classes: Vec<Punctuation>) -> Result<Self> {
        for (line, class) in classes.iter().enumerate() {
            if classes[..line].contains(class) {
                return Err(RepunctError::DuplicateToken {
                    token: class.token().to_string(),
                    line,
                });
            }
        }
        Ok(Self { classes })
    }

    /// Interpret a generic vocabulary as punctuation classes
    pub fn from_vocabulary(vocabulary: &Vocabulary) -> Result<Self> {
        let classes = vocabulary
            .tokens()
            .iter()
            .map(|token| {
                Punctuation::from_token(token)
                    .ok_or_else(|| RepunctError::UnknownPunctuation(token.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(classes)
    }

    /// Load from a one-token-per-line file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_vocabulary(&Vocabulary::load(path)?)
    }

    /// Write as a one-token-per-line file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_vocabulary().save(path)
    }

    /// Generic vocabulary view with descriptor tokens
    pub fn to_vocabulary(&self) -> Vocabulary {
        Vocabulary::from_tokens_unchecked(self.classes.iter().map(|p| p.token().to_string()))
    }

    /// Class id of a punctuation class
    pub fn id(&self, punctuation: Punctuation) -> Option<u32> {
        self.classes
            .iter()
            .position(|p| *p == punctuation)
            .map(|id| id as u32)
    }

    /// Class id of a descriptor token
    pub fn id_of_token(&self, token: &str) -> Option<u32> {
        Punctuation::from_token(token).and_then(|p| self.id(p))
    }

    /// Punctuation class for a class id
    pub fn class(&self, id: u32) -> Option<Punctuation> {
        self.classes.get(id as usize).copied()
    }

    /// True if `token` is a descriptor token present in this vocabulary
    pub fn contains_token(&self, token: &str) -> bool {
        self.id_of_token(token).is_some()
    }

    /// Classes in id order
    pub fn classes(&self) -> &[Punctuation] {
        &self.classes
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True if there are no classes
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
