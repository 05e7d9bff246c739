//! Multi-file corpus processing
//!
//! Each corpus file is one token stream with its own segmenter state, so
//! files are processed independently (on the rayon pool when the `parallel`
//! feature is enabled) and their results merged in input order.

use crate::config::{SegmenterConfig, VocabularyConfig};
use crate::error::Result;
use crate::punctuation::{Punctuation, PunctuationVocabulary};
use crate::segmenter::{segment, Segmentation};
use crate::vocabulary::{VocabularyBuilder, WordVocabulary};
use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Segment one whitespace-tokenized file as a single stream
pub fn segment_file(
    path: &Path,
    vocabulary: &WordVocabulary,
    punctuations: &PunctuationVocabulary,
    config: &SegmenterConfig,
) -> Result<Segmentation> {
    let text = std::fs::read_to_string(path)?;
    let segmentation = segment(text.split_whitespace(), vocabulary, punctuations, config)?;
    log::debug!("{}: {}", path.display(), segmentation.stats);
    Ok(segmentation)
}

fn merge(parts: Vec<Segmentation>) -> Segmentation {
    parts
        .into_iter()
        .fold(Segmentation::default(), |mut merged, part| {
            merged.examples.extend(part.examples);
            merged.stats.merge(&part.stats);
            merged
        })
}

/// Segment every file and concatenate the examples in input order
pub fn segment_files<P>(
    paths: &[P],
    vocabulary: &WordVocabulary,
    punctuations: &PunctuationVocabulary,
    config: &SegmenterConfig,
) -> Result<Segmentation>
where
    P: AsRef<Path> + Sync,
{
    config.validate()?;

    #[cfg(feature = "parallel")]
    let parts = paths
        .par_iter()
        .map(|path| segment_file(path.as_ref(), vocabulary, punctuations, config))
        .collect::<Result<Vec<_>>>()?;

    #[cfg(not(feature = "parallel"))]
    let parts = paths
        .iter()
        .map(|path| segment_file(path.as_ref(), vocabulary, punctuations, config))
        .collect::<Result<Vec<_>>>()?;

    let merged = merge(parts);
    log::info!("Segmented {} files: {}", paths.len(), merged.stats);
    Ok(merged)
}

/// Tokens that never enter the word vocabulary
pub fn ignored_tokens(config: &SegmenterConfig) -> Vec<String> {
    Punctuation::ALL
        .iter()
        .map(|p| p.token().to_string())
        .chain(config.punctuation_mapping.keys().cloned())
        .chain(config.discard_tokens.iter().cloned())
        .collect()
}

/// Count the words of one file
pub fn count_file(path: &Path, builder: VocabularyBuilder) -> Result<VocabularyBuilder> {
    let mut builder = builder;
    let text = std::fs::read_to_string(path)?;
    for line in text.lines() {
        builder.add_line(line);
    }
    Ok(builder)
}

/// Count every file and build the word vocabulary
pub fn build_vocabulary<P>(
    paths: &[P],
    vocabulary_config: &VocabularyConfig,
    segmenter_config: &SegmenterConfig,
) -> Result<WordVocabulary>
where
    P: AsRef<Path> + Sync,
{
    vocabulary_config.validate()?;
    let template =
        VocabularyBuilder::new(vocabulary_config.clone()).ignore_tokens(ignored_tokens(segmenter_config));

    #[cfg(feature = "parallel")]
    let counted = paths
        .par_iter()
        .map(|path| count_file(path.as_ref(), template.clone()))
        .collect::<Result<Vec<_>>>()?;

    #[cfg(not(feature = "parallel"))]
    let counted = paths
        .iter()
        .map(|path| count_file(path.as_ref(), template.clone()))
        .collect::<Result<Vec<_>>>()?;

    let mut total = template;
    for builder in counted {
        total.merge(builder);
    }
    total.build()
}
