//! Criterion benchmarks for consistency scoring and dense cluster search.
//!
//! Run with: cargo bench
//! Run specific group: cargo bench -- scoring
//! Run specific size: cargo bench -- solve/sparse/400

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::{DMatrix, Rotation3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use robust_association_rs::association::ConsistencyGraphBuilder;
use robust_association_rs::graph::SparseConsistencyGraph;
use robust_association_rs::invariants::{EuclideanDistance, EuclideanDistanceParams};
use robust_association_rs::solver::{DenseClusterSolver, SolverParams};
use robust_association_rs::types::{Association, AssociationSet, Data};

const SIZES: [usize; 3] = [100, 200, 400];

// =============================================================================
// Helper: synthetic registration problem
// =============================================================================

/// Rigidly transformed cloud with half of the associations being outliers
fn problem(seed: u64, num_associations: usize) -> (Data, Data, AssociationSet) {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = num_associations / 2;

    let d1 = DMatrix::from_fn(3, n, |_, _| rng.gen_range(0.0..20.0));
    let rotation = Rotation3::from_euler_angles(0.3, -0.2, 1.1);
    let translation = Vector3::new(1.0, -2.0, 0.5);
    let mut d2 = DMatrix::zeros(3, n);
    for j in 0..n {
        let p = Vector3::new(d1[(0, j)], d1[(1, j)], d1[(2, j)]);
        d2.column_mut(j).copy_from(&(rotation * p + translation));
    }

    let mut associations: AssociationSet = (0..n).map(|i| Association::new(i, i)).collect();
    associations.extend(
        (0..num_associations - n).map(|_| Association::new(rng.gen_range(0..n), rng.gen_range(0..n))),
    );
    (d1, d2, associations)
}

fn invariant() -> EuclideanDistance {
    EuclideanDistance::new(EuclideanDistanceParams::new(0.05, 0.1, 0.0)).unwrap()
}

// =============================================================================
// Scoring
// =============================================================================

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring");
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(20);

    let inv = invariant();
    for &size in SIZES.iter() {
        let (d1, d2, a) = problem(42, size);

        for parallel in [false, true] {
            let builder = ConsistencyGraphBuilder::new(&inv).parallelize(parallel);
            let label = if parallel { "dense_parallel" } else { "dense_sequential" };
            group.bench_function(BenchmarkId::new(label, size), |b| {
                b.iter(|| builder.build_dense(&d1, &d2, &a))
            });
        }

        let builder = ConsistencyGraphBuilder::new(&inv);
        group.bench_function(BenchmarkId::new("sparse", size), |b| {
            b.iter(|| builder.build_sparse(&d1, &d2, &a))
        });
    }

    group.finish();
}

// =============================================================================
// Solving
// =============================================================================

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    let inv = invariant();
    let solver = DenseClusterSolver::new(SolverParams::default());
    for &size in SIZES.iter() {
        let (d1, d2, a) = problem(7, size);
        let dense = ConsistencyGraphBuilder::new(&inv)
            .build_dense(&d1, &d2, &a)
            .unwrap();
        let sparse = SparseConsistencyGraph::from_dense(&dense);

        group.bench_function(BenchmarkId::new("dense", size), |b| {
            b.iter(|| solver.solve(&dense, None))
        });
        group.bench_function(BenchmarkId::new("sparse", size), |b| {
            b.iter(|| solver.solve(&sparse, None))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scoring, bench_solve);
criterion_main!(benches);
