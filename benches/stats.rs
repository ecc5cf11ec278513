use criterion::{black_box, criterion_group, criterion_main, Criterion};
use medring::MedianBuffer;

pub fn criterion_benchmark(c: &mut Criterion) {
    // Deterministic pseudo-random samples, enough to wrap a 64-slot window
    let data: Vec<f32> = (0u32..2000)
        .map(|i| ((i.wrapping_mul(2_654_435_761)) >> 16) as f32 / 100.0)
        .collect();

    let mut group = c.benchmark_group("medring");

    group.bench_function("push only", |b| {
        b.iter(|| {
            let mut buf: MedianBuffer<f32, u32, 64> = MedianBuffer::new();
            for (i, v) in data.iter().enumerate() {
                buf.push(black_box(*v), i as u32);
            }
            black_box(buf.len())
        })
    });

    group.bench_function("push + median every sample", |b| {
        b.iter(|| {
            let mut buf: MedianBuffer<f32, u32, 64> = MedianBuffer::new();
            let mut last = None;
            for (i, v) in data.iter().enumerate() {
                buf.push(black_box(*v), i as u32);
                last = buf.median();
            }
            black_box(last)
        })
    });

    group.bench_function("push + full statistic pass", |b| {
        b.iter(|| {
            let mut buf: MedianBuffer<f32, u32, 64> = MedianBuffer::new();
            for (i, v) in data.iter().enumerate() {
                buf.push(black_box(*v), i as u32);
            }
            (
                black_box(buf.median()),
                black_box(buf.median_average()),
                black_box(buf.average()),
                black_box(buf.mean_abs_deviation_around_average()),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
