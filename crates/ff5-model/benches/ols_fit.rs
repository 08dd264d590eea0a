//! Benchmarks for the five-factor regression.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ff5_model::{FactorInputs, FactorModel};
use ndarray::{Array1, Array2};
use rand::Rng;

fn random_panel(n: usize) -> (Vec<String>, Array1<f64>, Array2<f64>) {
    let mut rng = rand::thread_rng();
    let factors = Array2::from_shape_fn((n, 5), |_| rng.gen_range(-0.05..0.05));
    let betas = [1.0, 0.3, -0.2, 0.1, 0.4];
    let y = Array1::from_shape_fn(n, |t| {
        0.001
            + (0..5).map(|k| betas[k] * factors[[t, k]]).sum::<f64>()
            + rng.gen_range(-0.01..0.01)
    });
    let dates = (0..n).map(|t| t.to_string()).collect();
    (dates, y, factors)
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("factor_model_fit");

    for n in [60, 252, 2520] {
        let (dates, y, x) = random_panel(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| FactorModel::fit("BENCH", dates.clone(), black_box(&y), black_box(&x)))
        });
    }

    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let (dates, y, x) = random_panel(252);
    let model = FactorModel::fit("BENCH", dates, &y, &x).expect("synthetic panel is well posed");
    let inputs = FactorInputs::default();

    c.bench_function("factor_model_predict", |b| {
        b.iter(|| model.predict(black_box(&inputs)))
    });
}

criterion_group!(benches, bench_fit, bench_predict);
criterion_main!(benches);
