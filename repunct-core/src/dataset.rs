//! Training example persistence
//!
//! Examples are stored as JSON Lines, one `{"words": [...], "punctuations": [...]}`
//! object per line, in corpus order. A text mirror with the ids decoded back
//! to tokens is written alongside for inspection.

use crate::error::{RepunctError, Result};
use crate::punctuation::{Punctuation, PunctuationVocabulary};
use crate::vocabulary::{WordId, WordVocabulary};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// One finalized window: word ids and the gap classes between them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// Word ids; the last one is always END
    pub words: Vec<WordId>,
    /// Punctuation class ids, `punctuations[i]` sits before `words[i + 1]`
    pub punctuations: Vec<u32>,
}

impl TrainingExample {
    /// `len(words) == len(punctuations) + 1`
    pub fn is_aligned(&self) -> bool {
        self.words.len() == self.punctuations.len() + 1
    }

    /// Decode into interleaved tokens, omitting SPACE gaps
    pub fn to_tokens<'v>(
        &self,
        vocabulary: &'v WordVocabulary,
        punctuations: &PunctuationVocabulary,
    ) -> Result<Vec<&'v str>> {
        let mut tokens = Vec::with_capacity(self.words.len() + self.punctuations.len());
        for (i, &word) in self.words.iter().enumerate() {
            if i > 0 {
                let class_id = self.punctuations[i - 1];
                let class = punctuations
                    .class(class_id)
                    .ok_or(RepunctError::IdOutOfRange {
                        id: class_id,
                        len: punctuations.len(),
                    })?;
                if class != Punctuation::Space {
                    tokens.push(class.token());
                }
            }
            tokens.push(vocabulary.token(word)?);
        }
        Ok(tokens)
    }
}

/// Write examples as JSON Lines
pub fn write_examples(examples: &[TrainingExample], writer: impl Write) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    for example in examples {
        serde_json::to_writer(&mut writer, example)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Read examples from JSON Lines, skipping blank lines
pub fn read_examples(reader: impl BufRead) -> Result<Vec<TrainingExample>> {
    let mut examples = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        examples.push(serde_json::from_str(&line)?);
    }
    Ok(examples)
}

/// Load examples from a JSON Lines file
pub fn load_examples(path: impl AsRef<Path>) -> Result<Vec<TrainingExample>> {
    read_examples(BufReader::new(File::open(path)?))
}

/// Write the human-readable mirror, one example per line
pub fn write_mirror(
    examples: &[TrainingExample],
    vocabulary: &WordVocabulary,
    punctuations: &PunctuationVocabulary,
    writer: impl Write,
) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    for example in examples {
        writeln!(
            writer,
            "{}",
            example.to_tokens(vocabulary, punctuations)?.join(" ")
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Path of the mirror for a dataset file (`<output>.txt`)
pub fn mirror_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".txt");
    PathBuf::from(name)
}

/// Save examples and their mirror; returns the mirror path
pub fn save_dataset(
    output: &Path,
    examples: &[TrainingExample],
    vocabulary: &WordVocabulary,
    punctuations: &PunctuationVocabulary,
) -> Result<PathBuf> {
    write_examples(examples, File::create(output)?)?;
    let mirror = mirror_path(output);
    write_mirror(examples, vocabulary, punctuations, File::create(&mirror)?)?;
    Ok(mirror)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReservedTokens;
    use crate::vocabulary::Vocabulary;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn vocab() -> WordVocabulary {
        let tokens = ["a", "b", "</S>", "<UNK>"];
        let vocabulary = Vocabulary::from_tokens(tokens.iter().map(|t| t.to_string())).unwrap();
        WordVocabulary::new(vocabulary, ReservedTokens::default()).unwrap()
    }

    fn example() -> TrainingExample {
        TrainingExample {
            words: vec![0, 1, 0, 2],
            punctuations: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_alignment() {
        assert!(example().is_aligned());
        let broken = TrainingExample {
            words: vec![0, 1],
            punctuations: vec![0, 1],
        };
        assert!(!broken.is_aligned());
    }

    #[test]
    fn test_jsonl_format() {
        let mut buffer = Vec::new();
        write_examples(&[example()], &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "{\"words\":[0,1,0,2],\"punctuations\":[0,1,2]}\n");

        let read = read_examples(Cursor::new(format!("{text}\n"))).unwrap();
        assert_eq!(read, vec![example()]);
    }

    #[test]
    fn test_mirror_decodes_tokens() {
        let mut buffer = Vec::new();
        write_mirror(
            &[example()],
            &vocab(),
            &PunctuationVocabulary::default(),
            &mut buffer,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "a b ,COMMA a .PERIOD </S>\n"
        );
    }

    #[test]
    fn test_mirror_rejects_bad_ids() {
        let bad = TrainingExample {
            words: vec![0, 9],
            punctuations: vec![0],
        };
        let vocabulary = vocab();
        let punctuations = PunctuationVocabulary::default();
        let result = bad.to_tokens(&vocabulary, &punctuations);
        assert!(matches!(result, Err(RepunctError::IdOutOfRange { id: 9, .. })));
    }

    #[test]
    fn test_save_dataset_writes_both_files() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("train");
        let mirror =
            save_dataset(&output, &[example()], &vocab(), &PunctuationVocabulary::default())
                .unwrap();

        assert_eq!(mirror, temp_dir.path().join("train.txt"));
        assert_eq!(load_examples(&output).unwrap(), vec![example()]);
        assert!(std::fs::read_to_string(mirror).unwrap().contains("</S>"));
    }
}
