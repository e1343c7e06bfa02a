use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gauss::{norm::residual_rms, Gauss, LSolver};
use nalgebra::DVector;

fn bench_gauss(gauss: &Gauss, problem: &sample_problems::LinearProblem) {
    let mut x = DVector::zeros(problem.dim());
    gauss.solve(&problem.a, &mut x, &problem.b).unwrap();

    let norm = residual_rms(&problem.a, &x, &problem.b);
    assert!(norm < 1e-8, "residual too large: {norm:e}");
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Gauss solver");
    for n in [10, 50, 200] {
        let problem = sample_problems::diagonally_dominant(n, 0);
        for threads in [1, 2, 4, 8] {
            let gauss = Gauss::new(threads);
            group.bench_with_input(
                BenchmarkId::new(format!("{threads} threads"), n),
                &problem,
                |b, problem| b.iter(|| bench_gauss(black_box(&gauss), black_box(problem))),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
