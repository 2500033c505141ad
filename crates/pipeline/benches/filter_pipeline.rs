//! Benchmarks for the listing pipeline
//!
//! Run with: cargo bench --package pipeline

use catalog::{Decimal, Product};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pipeline::{FilterPipeline, FilterState, SortOrder};

const COLORS: [&str; 4] = ["Red, Blue", "Black", "White, Red", "Green"];

fn synthetic_catalog(size: i64) -> Vec<Product> {
    (0..size)
        .map(|i| {
            Product::new(i, format!("Product {i}"))
                .with_price(Decimal::new((i * 37) % 50_000, 2))
                .with_category(i % 12)
                .with_colors(&[COLORS[(i % 4) as usize]])
        })
        .collect()
}

fn bench_standard_pipeline(c: &mut Criterion) {
    let base = synthetic_catalog(10_000);
    let pipeline = FilterPipeline::standard();
    let state = FilterState::new()
        .with_categories(&[1, 3, 5])
        .with_color("red")
        .with_price_range("10", "400")
        .with_sort(SortOrder::PriceAsc);

    c.bench_function("standard_pipeline_10k", |b| {
        b.iter(|| {
            let visible = pipeline.run(black_box(&base), black_box(&state)).unwrap();
            black_box(visible)
        })
    });
}

fn bench_neutral_pipeline(c: &mut Criterion) {
    let base = synthetic_catalog(10_000);
    let pipeline = FilterPipeline::standard();
    let state = FilterState::default();

    c.bench_function("neutral_pipeline_10k", |b| {
        b.iter(|| {
            let visible = pipeline.run(black_box(&base), black_box(&state)).unwrap();
            black_box(visible)
        })
    });
}

criterion_group!(benches, bench_standard_pipeline, bench_neutral_pipeline);
criterion_main!(benches);
