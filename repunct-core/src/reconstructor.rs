//! Incremental text reconstruction
//!
//! The reconstructor receives an alternating sequence of words and predicted
//! gap classes and produces spaced, cased text. It is a two-state machine:
//!
//! | state                 | input        | output                          | next state                                  |
//! |-----------------------|--------------|---------------------------------|---------------------------------------------|
//! | `WordPending{cap}`    | word         | word, capitalized if `cap`      | `PunctuationPending`                        |
//! | `PunctuationPending`  | gap(p)       | symbol of `p` (none for SPACE), then a space | `WordPending{p is sentence end}` |
//! | `PunctuationPending`  | word         | a space, then the word          | `PunctuationPending`                        |
//! | `WordPending{cap}`    | gap(p)       | as above                        | `WordPending{cap or p is sentence end}`     |
//!
//! The END token is never written.

use crate::punctuation::Punctuation;

/// How a word's case is rendered when no capitalization is forced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
    /// Keep the token as written
    Verbatim,
    /// Lower-case the whole token
    Lower,
}

/// Reconstructor state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconstructorState {
    /// A word is expected next
    WordPending {
        /// Upper-case the first letter of the next word
        capitalize: bool,
    },
    /// A gap class is expected next
    PunctuationPending,
}

/// Builds restored text from words and gap predictions
#[derive(Debug, Clone)]
pub struct Reconstructor {
    output: String,
    state: ReconstructorState,
    end_token: String,
    capitalize_unknown: bool,
}

impl Reconstructor {
    /// Create an empty reconstructor
    pub fn new(end_token: impl Into<String>, capitalize_unknown: bool) -> Self {
        Self {
            output: String::new(),
            state: ReconstructorState::WordPending { capitalize: false },
            end_token: end_token.into(),
            capitalize_unknown,
        }
    }

    /// Current state
    pub fn state(&self) -> ReconstructorState {
        self.state
    }

    /// Text produced so far
    pub fn as_str(&self) -> &str {
        &self.output
    }

    /// Append a word. `unknown` marks tokens outside the word vocabulary.
    pub fn word(&mut self, token: &str, casing: Casing, unknown: bool) {
        if token == self.end_token {
            return;
        }

        let capitalize = match self.state {
            ReconstructorState::WordPending { capitalize } => capitalize,
            ReconstructorState::PunctuationPending => {
                self.output.push(' ');
                false
            }
        };

        if capitalize || (unknown && self.capitalize_unknown) {
            push_capitalized(&mut self.output, token);
        } else {
            match casing {
                Casing::Verbatim => self.output.push_str(token),
                Casing::Lower => self.output.push_str(&token.to_lowercase()),
            }
        }
        self.state = ReconstructorState::PunctuationPending;
    }

    /// Append the gap after the last word
    pub fn gap(&mut self, class: Punctuation) {
        if class != Punctuation::Space {
            self.output.push(class.symbol());
        }
        self.output.push(' ');

        let carried = match self.state {
            ReconstructorState::WordPending { capitalize } => capitalize,
            ReconstructorState::PunctuationPending => false,
        };
        self.state = ReconstructorState::WordPending {
            capitalize: carried || class.is_sentence_end(),
        };
    }

    /// Trim trailing whitespace and upper-case the first character
    pub fn finish(self) -> String {
        let text = self.output.trim_end();
        let mut result = String::with_capacity(text.len());
        push_first_upper(&mut result, text);
        result
    }
}

/// First character upper-cased, the rest lower-cased
fn push_capitalized(output: &mut String, token: &str) {
    let mut chars = token.chars();
    if let Some(first) = chars.next() {
        output.extend(first.to_uppercase());
        output.push_str(&chars.as_str().to_lowercase());
    }
}

/// First character upper-cased, the rest unchanged
fn push_first_upper(output: &mut String, text: &str) {
    let mut chars = text.chars();
    if let Some(first) = chars.next() {
        output.extend(first.to_uppercase());
        output.push_str(chars.as_str());
    }
}
