use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dpll::{CNF, Deadline, Solver, SolverVariant};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Clause to variable ratio around which random 3-SAT is hardest
const CLAUSE_RATIO: f64 = 4.26;
const SEED: u64 = 0x5a7;

fn random_3sat(num_variables: usize, rng: &mut StdRng) -> CNF {
    let num_clauses = (num_variables as f64 * CLAUSE_RATIO) as usize;
    let clauses: Vec<Vec<i64>> = (0..num_clauses)
        .map(|_| {
            (0..3)
                .map(|_| {
                    let variable = rng.gen_range(1, num_variables as i64 + 1);
                    if rng.gen::<bool>() { variable } else { -variable }
                })
                .collect()
        })
        .collect();
    CNF::from_literals(num_variables, clauses).unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(SEED);

    for &num_variables in &[20, 40, 60] {
        let formula = random_3sat(num_variables, &mut rng);
        let mut group = c.benchmark_group(format!("random 3-SAT, {} variables", num_variables));

        for variant in SolverVariant::ALL.iter() {
            group.bench_with_input(BenchmarkId::from_parameter(variant), &formula, |b, formula| {
                b.iter(|| variant.solve(black_box(formula), Deadline::none()))
            });
        }
        group.finish();
    }
}

criterion_group!{
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = criterion_benchmark
}
criterion_main!(benches);
