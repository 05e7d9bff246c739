//! Throughput of segmentation and restoration windowing
//!
//! Run with: cargo bench --bench window_benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use repunct_core::{
    segment, PunctuationVocabulary, RestoreConfig, Restorer, SegmenterConfig, VocabularyBuilder,
    VocabularyConfig, WordId,
};
use std::hint::black_box;

const SENTENCE: &str = "the quick brown fox jumps over the lazy dog ,COMMA and then it rests .PERIOD";

/// Generate an annotated corpus of roughly `words` words
fn generate_corpus(words: usize) -> String {
    let per_sentence = 13;
    let repeat = words / per_sentence + 1;
    vec![SENTENCE; repeat].join(" ")
}

fn bench_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentation");
    let punctuations = PunctuationVocabulary::default();

    for words in [1_000, 10_000, 100_000] {
        let corpus = generate_corpus(words);
        let mut builder = VocabularyBuilder::new(VocabularyConfig::default())
            .ignore_tokens([",COMMA", ".PERIOD"]);
        builder.add_line(&corpus);
        let vocabulary = builder.build().unwrap();

        group.throughput(Throughput::Elements(words as u64));
        for max_len in [50, 200] {
            let config = SegmenterConfig::builder().max_len(max_len).build().unwrap();
            group.bench_with_input(
                BenchmarkId::new(format!("max_len_{max_len}"), words),
                &corpus,
                |b, corpus| {
                    b.iter(|| {
                        segment(
                            black_box(corpus).split_whitespace(),
                            &vocabulary,
                            &punctuations,
                            &config,
                        )
                        .unwrap()
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_restoration(c: &mut Criterion) {
    let mut group = c.benchmark_group("restoration");
    let punctuations = PunctuationVocabulary::default();
    let config = RestoreConfig::default();

    for words in [1_000, 10_000] {
        let corpus = generate_corpus(words);
        let mut builder = VocabularyBuilder::new(VocabularyConfig::default())
            .ignore_tokens([",COMMA", ".PERIOD"]);
        builder.add_line(&corpus);
        let vocabulary = builder.build().unwrap();
        let restorer = Restorer::new(&vocabulary, &punctuations, &config).unwrap();

        group.throughput(Throughput::Elements(words as u64));
        group.bench_with_input(BenchmarkId::new("period_every_8", words), &corpus, |b, corpus| {
            b.iter(|| {
                let mut classifier = |window: &[WordId]| {
                    (1..window.len())
                        .map(|gap| {
                            let mut row = vec![0.0_f32; 7];
                            row[if gap % 8 == 0 { 2 } else { 0 }] = 1.0;
                            row
                        })
                        .collect::<Vec<_>>()
                };
                restorer
                    .restore_line(black_box(corpus), &mut classifier)
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_segmentation, bench_restoration);
criterion_main!(benches);
