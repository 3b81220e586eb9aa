use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use premium_predictor::inference::predict_record;
use premium_predictor::schema::{validate, PremiumRequest};
use premium_predictor::training::TrainEngine;

#[path = "../tests/common/mod.rs"]
mod common;

fn bench_single_row(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict_single_row");
    let record = validate(&PremiumRequest::sample().to_json()).unwrap();
    let df = TrainEngine::normalize_columns(common::synthetic_frame(1000, 42)).unwrap();

    for trees in [25usize, 100, 300].iter() {
        let config = common::small_config().with_n_estimators(*trees).with_max_depth(Some(20));
        let (pipeline, _) = TrainEngine::new(config).fit(&df).unwrap();

        group.bench_with_input(BenchmarkId::new("trees", trees), &pipeline, |b, pipeline| {
            b.iter(|| predict_record(black_box(pipeline), black_box(&record)).unwrap())
        });
    }

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let body = PremiumRequest::sample().to_json();
    c.bench_function("validate_request", |b| b.iter(|| validate(black_box(&body)).unwrap()));
}

criterion_group!(benches, bench_single_row, bench_validation);
criterion_main!(benches);
