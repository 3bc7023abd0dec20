use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use getaround_pricing::artifact::ArtifactEnvelope;
use getaround_pricing::dataset::{synthetic, Frame};
use getaround_pricing::{PricingPipeline, Predictor};

fn fitted_predictor() -> Predictor {
    let (records, prices) = synthetic::listings(2_000, 42);
    let model = PricingPipeline::default()
        .fit(&Frame::from_records(&records), &prices)
        .expect("fit synthetic listings");
    let envelope = ArtifactEnvelope::seal(&model, "bench", "bench").expect("seal artifact");
    Predictor::new(model, envelope.meta, "bench")
}

fn bench_predict_single(c: &mut Criterion) {
    let predictor = fitted_predictor();
    let (records, _) = synthetic::listings(1, 7);
    let record = &records[0];

    c.bench_function("predict_single_row", |b| {
        b.iter(|| black_box(predictor.predict(black_box(record))))
    });
}

fn bench_predict_batch(c: &mut Criterion) {
    let predictor = fitted_predictor();
    for size in [100, 1_000, 10_000].iter() {
        let (records, _) = synthetic::listings(*size, 9);
        let frame = Frame::from_records(&records);
        c.bench_with_input(BenchmarkId::new("predict_frame", size), &frame, |b, frame| {
            b.iter(|| black_box(predictor.model().predict_frame(black_box(frame))))
        });
    }
}

criterion_group!(benches, bench_predict_single, bench_predict_batch);
criterion_main!(benches);
