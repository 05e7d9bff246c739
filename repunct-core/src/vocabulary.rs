//! Token vocabularies
//!
//! A vocabulary file holds one token per line; the zero-based line index is
//! the token id. Word vocabularies conventionally end with the END and UNK
//! tokens, which every consumer looks up by name rather than by position.

use crate::config::{ReservedTokens, VocabularyConfig};
use crate::error::{RepunctError, Result};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::OnceLock;

/// Id of a word in a [`WordVocabulary`]
pub type WordId = u32;

static NUMBER_PATTERN: OnceLock<Regex> = OnceLock::new();

/// True if `token` is a numeric literal (one or more digits)
pub fn is_number(token: &str) -> bool {
    NUMBER_PATTERN
        .get_or_init(|| Regex::new(r"^\d+$").expect("static pattern is valid"))
        .is_match(token)
}

/// Dense bijection between tokens and ids `0..len`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    tokens: Vec<String>,
    ids: HashMap<String, u32>,
}

impl Vocabulary {
    /// Build from tokens in id order, rejecting duplicates
    pub fn from_tokens<I>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut vocabulary = Self::default();
        for (line, token) in tokens.into_iter().enumerate() {
            if vocabulary.ids.contains_key(&token) {
                return Err(RepunctError::DuplicateToken { token, line });
            }
            vocabulary.ids.insert(token.clone(), line as u32);
            vocabulary.tokens.push(token);
        }
        Ok(vocabulary)
    }

    /// Build from tokens already known to be unique
    pub(crate) fn from_tokens_unchecked<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let tokens: Vec<String> = tokens.into_iter().collect();
        let ids = tokens
            .iter()
            .enumerate()
            .map(|(id, token)| (token.clone(), id as u32))
            .collect();
        Self { tokens, ids }
    }

    /// Read one token per line
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut tokens = Vec::new();
        for line in reader.lines() {
            tokens.push(line?.trim().to_string());
        }
        Self::from_tokens(tokens)
    }

    /// Load a vocabulary file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let vocabulary = Self::from_reader(BufReader::new(file))?;
        log::info!(
            "Vocabulary \"{}\" size: {}",
            path.as_ref().display(),
            vocabulary.len()
        );
        Ok(vocabulary)
    }

    /// Write tokens in id order, newline separated
    pub fn write_to(&self, mut writer: impl Write) -> Result<()> {
        writer.write_all(self.tokens.join("\n").as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Save to a vocabulary file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }

    /// Id of a token
    pub fn id(&self, token: &str) -> Option<u32> {
        self.ids.get(token).copied()
    }

    /// Token for an id
    pub fn token(&self, id: u32) -> Option<&str> {
        self.tokens.get(id as usize).map(String::as_str)
    }

    /// Tokens in id order
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if empty
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Word vocabulary with resolved reserved ids
#[derive(Debug, Clone)]
pub struct WordVocabulary {
    vocabulary: Vocabulary,
    reserved: ReservedTokens,
    end_id: WordId,
    unknown_id: WordId,
    number_id: Option<WordId>,
}

impl WordVocabulary {
    /// Wrap a vocabulary, resolving END, UNK and (optionally) NUM
    pub fn new(vocabulary: Vocabulary, reserved: ReservedTokens) -> Result<Self> {
        let require = |token: &str| {
            vocabulary
                .id(token)
                .ok_or_else(|| RepunctError::MissingReservedToken {
                    token: token.to_string(),
                })
        };
        let end_id = require(&reserved.end)?;
        let unknown_id = require(&reserved.unknown)?;
        let number_id = vocabulary.id(&reserved.number);

        Ok(Self {
            vocabulary,
            reserved,
            end_id,
            unknown_id,
            number_id,
        })
    }

    /// Load a word vocabulary file
    pub fn load(path: impl AsRef<Path>, reserved: ReservedTokens) -> Result<Self> {
        Self::new(Vocabulary::load(path)?, reserved)
    }

    /// Save to a vocabulary file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.vocabulary.save(path)
    }

    /// Id of a raw token: NUM for numeric literals, UNK when absent
    pub fn lookup(&self, token: &str) -> WordId {
        if let Some(number_id) = self.number_id {
            if is_number(token) {
                return number_id;
            }
        }
        self.vocabulary.id(token).unwrap_or(self.unknown_id)
    }

    /// Id of a token without numeric-literal folding
    pub fn lookup_exact(&self, token: &str) -> WordId {
        self.vocabulary.id(token).unwrap_or(self.unknown_id)
    }

    /// Token for an id
    pub fn token(&self, id: WordId) -> Result<&str> {
        self.vocabulary
            .token(id)
            .ok_or(RepunctError::IdOutOfRange {
                id,
                len: self.vocabulary.len(),
            })
    }

    /// Id of the END token
    pub fn end_id(&self) -> WordId {
        self.end_id
    }

    /// Id of the UNK token
    pub fn unknown_id(&self) -> WordId {
        self.unknown_id
    }

    /// Id of the NUM token, if the vocabulary has one
    pub fn number_id(&self) -> Option<WordId> {
        self.number_id
    }

    /// The END token text
    pub fn end_token(&self) -> &str {
        &self.reserved.end
    }

    /// The UNK token text
    pub fn unknown_token(&self) -> &str {
        &self.reserved.unknown
    }

    /// Underlying generic vocabulary
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Number of words including reserved tokens
    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    /// True if empty (never the case for a valid word vocabulary)
    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }
}

/// Counts word occurrences and builds a [`WordVocabulary`]
#[derive(Debug, Clone)]
pub struct VocabularyBuilder {
    config: VocabularyConfig,
    ignored: HashSet<String>,
    counts: HashMap<String, u64>,
}

impl VocabularyBuilder {
    /// Create an empty builder
    pub fn new(config: VocabularyConfig) -> Self {
        Self {
            config,
            ignored: HashSet::new(),
            counts: HashMap::new(),
        }
    }

    /// Tokens that are never counted (punctuation, mapped and discarded tokens)
    pub fn ignore_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored.extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Count one token
    pub fn add_token(&mut self, token: &str) {
        if self.ignored.contains(token) {
            return;
        }
        *self.counts.entry(token.to_string()).or_insert(0) += 1;
    }

    /// Count every whitespace-separated token of a line
    pub fn add_line(&mut self, line: &str) {
        for token in line.split_whitespace() {
            self.add_token(token);
        }
    }

    /// Fold another builder's counts into this one
    pub fn merge(&mut self, other: VocabularyBuilder) {
        for (token, count) in other.counts {
            *self.counts.entry(token).or_insert(0) += count;
        }
    }

    /// Occurrences counted so far for a token
    pub fn count(&self, token: &str) -> u64 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Keep frequent words, most frequent first, then append END and UNK
    pub fn build(self) -> Result<WordVocabulary> {
        let reserved = self.config.reserved.clone();
        let mut words: Vec<(String, u64)> = self
            .counts
            .into_iter()
            .filter(|(token, count)| {
                *count >= self.config.min_count
                    && *token != reserved.end
                    && *token != reserved.unknown
            })
            .collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(self.config.max_size);

        let tokens = words
            .into_iter()
            .map(|(token, _)| token)
            .chain([reserved.end.clone(), reserved.unknown.clone()]);
        let vocabulary = Vocabulary::from_tokens(tokens)?;
        log::info!("Vocabulary size: {}", vocabulary.len());

        WordVocabulary::new(vocabulary, reserved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn word_vocab(tokens: &[&str]) -> WordVocabulary {
        let vocabulary = Vocabulary::from_tokens(tokens.iter().map(|t| t.to_string())).unwrap();
        WordVocabulary::new(vocabulary, ReservedTokens::default()).unwrap()
    }

    #[test]
    fn test_from_reader_strips_whitespace() {
        let vocab = Vocabulary::from_reader(Cursor::new("the \ncat\r\n</S>\n<UNK>")).unwrap();
        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab.id("the"), Some(0));
        assert_eq!(vocab.id("<UNK>"), Some(3));
        assert_eq!(vocab.token(1), Some("cat"));
    }

    #[test]
    fn test_duplicate_tokens_rejected() {
        let result = Vocabulary::from_reader(Cursor::new("a\nb\na"));
        assert!(matches!(
            result,
            Err(RepunctError::DuplicateToken { line: 2, .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vocabulary");
        let vocab = word_vocab(&["the", "cat", "</S>", "<UNK>"]);
        vocab.save(&path).unwrap();

        let loaded = WordVocabulary::load(&path, ReservedTokens::default()).unwrap();
        assert_eq!(loaded.vocabulary(), vocab.vocabulary());
        assert_eq!(loaded.end_id(), 2);
        assert_eq!(loaded.unknown_id(), 3);
    }

    #[test]
    fn test_missing_reserved_token() {
        let vocabulary = Vocabulary::from_tokens(vec!["a".to_string(), "</S>".to_string()]).unwrap();
        let result = WordVocabulary::new(vocabulary, ReservedTokens::default());
        assert!(matches!(
            result,
            Err(RepunctError::MissingReservedToken { token }) if token == "<UNK>"
        ));
    }

    #[test]
    fn test_lookup_numbers_and_unknowns() {
        let vocab = word_vocab(&["the", "<NUM>", "</S>", "<UNK>"]);
        assert_eq!(vocab.lookup("the"), 0);
        assert_eq!(vocab.lookup("1984"), 1);
        assert_eq!(vocab.lookup("zebra"), 3);
        assert_eq!(vocab.lookup_exact("1984"), 3);

        let without_num = word_vocab(&["the", "</S>", "<UNK>"]);
        assert_eq!(without_num.lookup("1984"), without_num.unknown_id());
    }

    #[test]
    fn test_is_number() {
        assert!(is_number("42"));
        assert!(is_number("٣"));
        assert!(!is_number("4a"));
        assert!(!is_number(""));
    }

    #[test]
    fn test_builder_orders_by_count_and_filters() {
        let config = VocabularyConfig::default();
        let mut builder = VocabularyBuilder::new(config).ignore_tokens([".PERIOD", ",COMMA"]);
        builder.add_line("the cat sat .PERIOD the dog sat ,COMMA the end");
        builder.add_line("a cat");

        let vocab = builder.build().unwrap();
        let tokens = vocab.vocabulary().tokens();
        // the=3, cat=2, sat=2; singletons dropped
        assert_eq!(tokens, &["the", "cat", "sat", "</S>", "<UNK>"]);
    }

    #[test]
    fn test_builder_truncates_and_merges() {
        let config = VocabularyConfig {
            max_size: 1,
            min_count: 1,
            ..VocabularyConfig::default()
        };
        let mut left = VocabularyBuilder::new(config.clone());
        left.add_line("x y");
        let mut right = VocabularyBuilder::new(config);
        right.add_line("y <UNK> <UNK>");
        left.merge(right);

        assert_eq!(left.count("y"), 2);
        let vocab = left.build().unwrap();
        assert_eq!(vocab.vocabulary().tokens(), &["y", "</S>", "<UNK>"]);
    }
}
