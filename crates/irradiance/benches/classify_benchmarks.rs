//! Benchmarks for normalization, classification and full layer builds.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use irradiance::{Classifier, CoordinateNormalizer, LayerBuilder, LayerOptions};
use solar_common::{Axis, SchemeDefinition};
use test_utils::{create_irradiance_rows, create_lost_decimal_rows};

fn bench_normalize(c: &mut Criterion) {
    let normalizer = CoordinateNormalizer::default();
    let values: Vec<f64> = (0..10_000).map(|i| -519253.0 + i as f64).collect();

    c.bench_function("normalize_longitude_10k", |b| {
        b.iter(|| {
            for v in &values {
                black_box(normalizer.normalize(Axis::Longitude, black_box(*v)));
            }
        })
    });
}

fn bench_classify(c: &mut Criterion) {
    let classifier = Classifier::four_bucket();
    let values: Vec<f64> = (0..10_000).map(|i| 4000.0 + (i % 1000) as f64).collect();

    c.bench_function("classify_four_bucket_10k", |b| {
        b.iter(|| {
            for v in &values {
                black_box(classifier.classify(black_box(*v)));
            }
        })
    });
}

fn bench_build_layer(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_layer");

    for size in [100, 1_000, 10_000] {
        let clean = create_irradiance_rows(size);
        let broken = create_lost_decimal_rows(size);

        let classified =
            LayerBuilder::new(SchemeDefinition::four_bucket(), LayerOptions::default()).unwrap();
        group.bench_with_input(BenchmarkId::new("four_bucket", size), &clean, |b, rows| {
            b.iter(|| classified.build(black_box(rows)).unwrap())
        });

        let ramp =
            LayerBuilder::new(SchemeDefinition::observed_ramp(), LayerOptions::default()).unwrap();
        group.bench_with_input(BenchmarkId::new("observed_ramp_lost_decimals", size), &broken, |b, rows| {
            b.iter(|| ramp.build(black_box(rows)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_classify, bench_build_layer);
criterion_main!(benches);
