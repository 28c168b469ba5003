//! # Deck Benchmarks
//!
//! Performance benchmarks for lectern-core deck operations.
//!
//! Run with: `cargo bench -p lectern-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lectern_core::{Citation, MutationEngine, Slide, merge_citations, paginate};
use std::hint::black_box;

/// A deck of `size` slides with seven bullets each.
fn create_deck(size: usize) -> Vec<Slide> {
    (0..size)
        .map(|i| {
            Slide::new(format!("slide_{i}"), format!("Slide {i}"))
                .with_bullets((0..7).map(|b| format!("Bullet {b} of slide {i}")))
        })
        .collect()
}

fn create_citations(prefix: &str, count: usize) -> Vec<Citation> {
    (0..count)
        .map(|i| Citation::catalog(format!("{prefix}{i}"), "Title", "Author A", "Journal", "2020"))
        .collect()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_oversized_slides");

    for size in [10, 100, 1000].iter() {
        let deck = create_deck(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &deck, |b, deck| {
            b.iter(|| black_box(MutationEngine::split_oversized_slides(deck, 3)));
        });
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_citations");

    for existing_len in [0, 5, 10].iter() {
        let existing = create_citations("e", *existing_len);
        let fetched = create_citations("f", 5);
        group.bench_with_input(
            BenchmarkId::from_parameter(existing_len),
            &(existing, fetched),
            |b, (existing, fetched)| {
                b.iter(|| black_box(merge_citations(existing, fetched, 10)));
            },
        );
    }

    group.finish();
}

fn bench_paginate(c: &mut Criterion) {
    let deck = MutationEngine::split_oversized_slides(&create_deck(100), 3);
    c.bench_function("paginate_300", |b| {
        b.iter(|| black_box(paginate(&deck, true)));
    });
}

criterion_group!(benches, bench_split, bench_merge, bench_paginate);
criterion_main!(benches);
