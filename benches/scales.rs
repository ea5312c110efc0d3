use criterion::{black_box, criterion_group, criterion_main, Criterion};
use misure::scales::{Fixed, Linear, Logarithmic, RoughLogarithmic, Scale};

const SAMPLES: usize = 4096;

fn samples() -> Vec<f64> {
    // Spread over several decades, including values outside [low, high).
    (0..SAMPLES).map(|i| ((i % 64) as f64 * 0.35).exp2() - 10.0).collect()
}

fn bench_pos<S: Scale<Value = f64>>(c: &mut Criterion, name: &str, scale: S) {
    let values = samples();
    c.bench_function(&format!("pos/{name}"), |b| {
        b.iter(|| {
            let mut acc = 0usize;
            for v in &values {
                acc += scale.pos(black_box(*v));
            }
            black_box(acc)
        })
    });
}

fn bench_scales(c: &mut Criterion) {
    let delimiters: Vec<f64> = (1..20).map(|i| (1u64 << i) as f64).collect();

    bench_pos(c, "fixed", Fixed::new(0.0, 1_048_576.0, delimiters).unwrap());
    bench_pos(c, "linear", Linear::new(0.0, 1_048_576.0, 20).unwrap());
    bench_pos(c, "logarithmic", Logarithmic::new(2.0, 0.0, 1_048_576.0, 20).unwrap());
    bench_pos(
        c,
        "rough-logarithmic",
        RoughLogarithmic::new(2.0, 0.0, 1_048_576.0, 20).unwrap(),
    );
}

criterion_group!(benches, bench_scales);
criterion_main!(benches);
