//! Per-sample filter throughput
//!
//! Run with: cargo bench -p streamfilt-core --bench filters

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use streamfilt::filters::{design_lowpass, FastFirFilter};
use streamfilt::signal::{noisy_sine, seeded_rng};
use streamfilt::{FirFilter, IirCascade, LmsFilter, RlsFilter, WindowType};

const BLOCK: usize = 4096;

fn test_signal() -> Vec<f64> {
    let mut rng = seeded_rng(7);
    noisy_sine(50.0, 1.0, 0.5, BLOCK as f64 / 1000.0, 1000.0, &mut rng)
}

fn bench_fir(c: &mut Criterion) {
    let mut group = c.benchmark_group("fir");
    let input = test_signal();
    group.throughput(Throughput::Elements(input.len() as u64));

    for taps in [15usize, 63, 255] {
        let coeffs = design_lowpass(0.2, taps, WindowType::Hamming).unwrap();

        let mut direct = FirFilter::new(coeffs.clone()).unwrap();
        group.bench_with_input(BenchmarkId::new("direct", taps), &input, |b, input| {
            b.iter(|| direct.process_block(black_box(input)))
        });

        let mut fast = FastFirFilter::new(coeffs, 256).unwrap();
        group.bench_with_input(BenchmarkId::new("overlap_add", taps), &input, |b, input| {
            b.iter(|| fast.process_block(black_box(input)))
        });
    }

    group.finish();
}

fn bench_iir(c: &mut Criterion) {
    let mut group = c.benchmark_group("iir");
    let input = test_signal();
    group.throughput(Throughput::Elements(input.len() as u64));

    let section = [0.0675, 0.1349, 0.0675, 1.0, -1.1430, 0.4128];
    for sections in [1usize, 4] {
        let rows = vec![section; sections];
        let mut iir = IirCascade::from_sos(&rows).unwrap();
        group.bench_with_input(BenchmarkId::new("cascade", sections), &input, |b, input| {
            b.iter(|| iir.process_block(black_box(input)))
        });
    }

    group.finish();
}

fn bench_adaptive(c: &mut Criterion) {
    let mut group = c.benchmark_group("adaptive");
    let input = test_signal();
    let desired: Vec<f64> = (0..input.len())
        .map(|i| (std::f64::consts::TAU * 50.0 * i as f64 / 1000.0).sin())
        .collect();
    group.throughput(Throughput::Elements(input.len() as u64));

    for taps in [8usize, 32] {
        let mut lms = LmsFilter::new(taps, 0.01).unwrap();
        group.bench_with_input(BenchmarkId::new("lms", taps), &input, |b, input| {
            b.iter(|| lms.process_block(black_box(input), &desired))
        });

        let mut rls = RlsFilter::new(taps, 0.99, 0.1).unwrap();
        group.bench_with_input(BenchmarkId::new("rls", taps), &input, |b, input| {
            b.iter(|| {
                // keep P from collapsing across iterations
                rls.reset();
                rls.process_block(black_box(input), &desired)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fir, bench_iir, bench_adaptive);
criterion_main!(benches);
