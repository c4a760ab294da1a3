use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use volscreen::{flag_lower_per_column, flag_two_sided, sliding_dispersion};

fn bench_sliding_dispersion(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let features = Array2::from_shape_fn((3, 2000), |_| rng.gen_range(0.0..1.0));
    c.bench_function("sliding_dispersion_win5", |b| {
        b.iter(|| sliding_dispersion(black_box(features.view()), 5).unwrap())
    });
}

fn bench_fences(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(11);
    let values: Vec<f64> = (0..2000).map(|_| rng.gen_range(0.0..1.0)).collect();
    c.bench_function("flag_two_sided_2000", |b| {
        b.iter(|| flag_two_sided(black_box(&values), 1.5))
    });

    let matrix = Array2::from_shape_fn((500, 64), |_| rng.gen_range(0.0..1.0));
    c.bench_function("flag_lower_per_column_500x64", |b| {
        b.iter(|| flag_lower_per_column(black_box(matrix.view()), 1.5))
    });
}

criterion_group!(benches, bench_sliding_dispersion, bench_fences);
criterion_main!(benches);
