// Criterion benchmarks for Interest Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use interest_match::core::{Matcher, similarity_row, TfIdfMatrix};
use interest_match::models::CorpusEntry;

const TOPICS: &[&str] = &[
    "machine learning", "robotics", "chess", "music", "painting", "photography",
    "hiking", "rock climbing", "poetry", "film", "compilers", "databases",
    "startups", "cricket", "football", "cooking", "travel", "astronomy",
];

fn create_corpus(size: usize) -> Vec<CorpusEntry> {
    (0..size)
        .map(|i| {
            let interests = (0..3)
                .map(|k| TOPICS[(i * 7 + k * 5) % TOPICS.len()])
                .collect::<Vec<_>>()
                .join(", ");
            CorpusEntry {
                id: i as i64 + 1,
                name: format!("Student {}", i),
                interests,
                email: format!("student{}@example.edu", i),
            }
        })
        .collect()
}

fn bench_vectorize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tfidf_fit_transform");

    for size in [10, 100, 1000].iter() {
        let corpus = create_corpus(*size);
        let docs: Vec<&str> = corpus.iter().map(|e| e.interests.as_str()).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &docs, |b, docs| {
            b.iter(|| TfIdfMatrix::fit_transform(black_box(docs)));
        });
    }

    group.finish();
}

fn bench_similarity_row(c: &mut Criterion) {
    let corpus = create_corpus(1000);
    let docs: Vec<&str> = corpus.iter().map(|e| e.interests.as_str()).collect();
    let matrix = TfIdfMatrix::fit_transform(&docs);

    c.bench_function("similarity_row_1000", |b| {
        b.iter(|| similarity_row(black_box(&matrix), black_box(0)));
    });
}

fn bench_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");
    let corpus = create_corpus(500);

    let plain = Matcher::new();
    group.bench_function("uncached", |b| {
        b.iter(|| plain.recommend(black_box(&corpus), black_box(42)));
    });

    let cached = Matcher::with_cache(4);
    group.bench_function("cached", |b| {
        b.iter(|| cached.recommend(black_box(&corpus), black_box(42)));
    });

    group.finish();
}

criterion_group!(benches, bench_vectorize, bench_similarity_row, bench_recommend);
criterion_main!(benches);
