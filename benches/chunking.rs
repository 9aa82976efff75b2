//! Chunking and local embedding benchmarks
//!
//! Measures chunker throughput on article-sized inputs at the three preset
//! configurations, and the hashed model on a typical ingest batch.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use newsminds::domain::models::{ChunkingConfig, Metadata};
use newsminds::infrastructure::vector::HashedEmbeddingProvider;
use newsminds::Chunker;
use std::hint::black_box;

const PARAGRAPH: &str = "The committee met on Tuesday to review the quarterly figures. \
    Revenue rose by four percent while costs fell slightly! Was the rise sustainable? \
    Analysts were divided on the outlook for the coming year.\n\n";

fn article(paragraphs: usize) -> String {
    PARAGRAPH.repeat(paragraphs)
}

fn bench_chunking(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunking");

    for paragraphs in [4, 40, 400] {
        let text = article(paragraphs);
        group.throughput(Throughput::Bytes(text.len() as u64));

        for (name, config) in [
            ("small", ChunkingConfig::small()),
            ("default", ChunkingConfig::default()),
            ("large", ChunkingConfig::large()),
        ] {
            let chunker = Chunker::with_config(config).expect("valid preset");
            group.bench_with_input(
                BenchmarkId::new(name, paragraphs),
                &text,
                |b, text| b.iter(|| black_box(chunker.chunk(black_box(text), &Metadata::new()))),
            );
        }
    }

    group.finish();
}

fn bench_hashed_embedding(c: &mut Criterion) {
    let model = HashedEmbeddingProvider::new(384).expect("valid dimension");
    let chunks = Chunker::new().chunk(&article(40), &Metadata::new());

    let mut group = c.benchmark_group("hashed_embedding");
    group.throughput(Throughput::Elements(chunks.len() as u64));
    group.bench_function("embed_chunks", |b| {
        b.iter(|| {
            for chunk in &chunks {
                black_box(model.embed_sync(black_box(&chunk.text)));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_chunking, bench_hashed_embedding);
criterion_main!(benches);
