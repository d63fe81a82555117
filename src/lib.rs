/*!
# robust-association-rs - Robust data association via dense clusters

Finds the largest mutually consistent subset of putative correspondences
between two datasets. Every pair of candidate associations is scored with a
geometric invariant, producing a weighted consistency graph; a projected
gradient relaxation of the maximum clique problem then recovers its densest
cluster.

## Features

- Euclidean distance and point-normal invariants, plus closures as custom invariants
- Dense (`nalgebra`) and sparse (`sprs` CSR) consistency graphs
- Parallel pair scoring with `rayon`, gated by invariant reentrancy
- Projected gradient dense cluster solver with clique-preserving rounding

## Modules

- [`invariants`] - Pair scoring contract and builtin invariants
- [`graph`] - Consistency graph representations
- [`association`] - Graph construction and inlier selection
- [`solver`] - Dense cluster solver
- [`associator`] - Stateful score → solve → select pipeline
- [`reporter`] - Observability hooks
- [`common`] - Low-level utilities

## Example

```rust
use robust_association_rs::association::{score_pairwise_consistency, select_inlier_associations};
use robust_association_rs::invariants::{EuclideanDistance, EuclideanDistanceParams};
use robust_association_rs::solver::{DenseClusterSolver, SolverParams};
use robust_association_rs::types::{association_set, Data};

// Three collinear points, seen twice
let d1 = Data::from_column_slice(2, 3, &[0.0, 0.0, 1.0, 0.0, 2.0, 0.0]);
let mut d2 = d1.clone();
d2[(0, 2)] = 200.0;

let associations = association_set(vec![(0, 0), (1, 1), (2, 2)]);
let invariant = EuclideanDistance::new(EuclideanDistanceParams::new(0.5, 0.5, 0.0)).unwrap();

let graph = score_pairwise_consistency(&invariant, &d1, &d2, &associations, true).unwrap();
let solution = DenseClusterSolver::new(SolverParams::default())
    .solve(&graph, None)
    .unwrap();

let inliers = select_inlier_associations(&solution, &associations).unwrap();
assert_eq!(inliers, association_set(vec![(0, 0), (1, 1)]));
```
*/

// ============================================================================
// Core modules
// ============================================================================

/// Datasets and associations
pub mod types;

/// Input validation errors
pub mod errors;

/// Pairwise invariants
///
/// Builtin invariants:
/// - [`EuclideanDistance`](invariants::EuclideanDistance)
/// - [`PointNormalDistance`](invariants::PointNormalDistance)
pub mod invariants;

/// Dense and sparse consistency graphs
pub mod graph;

/// Consistency graph construction and inlier selection
pub mod association;

/// Dense cluster solver
pub mod solver;

/// Stateful association pipeline
pub mod associator;

/// Observability for scoring and solving
pub mod reporter;

/// Low-level utilities (linear algebra, constants)
pub mod common;

// ============================================================================
// Re-exports for convenience
// ============================================================================

// Core types
pub use types::{association_set, Association, AssociationSet, Data, Datum};

// Errors
pub use errors::ConsistencyError;

// Invariants
pub use invariants::{
    EuclideanDistance, EuclideanDistanceParams, FnInvariant, Invariant, PairwiseInvariant,
    PairwiseInvariantPtr, PointNormalDistance, PointNormalDistanceParams,
};

// Graphs
pub use graph::{
    AnyConsistencyGraph, ConsistencyGraph, DenseConsistencyGraph, GraphStorage,
    SparseConsistencyGraph,
};

// Graph construction and selection
pub use association::{
    score_pairwise_consistency, score_sparse_pairwise_consistency, select_inlier_associations,
    ConsistencyGraphBuilder,
};

// Solver
pub use solver::{
    find_dense_cluster, find_dense_cluster_of_sparse_graph,
    find_dense_cluster_of_sparse_graph_with_initial, find_dense_cluster_with_initial,
    DenseClusterSolver, Solution, SolverParams,
};

// Pipeline
pub use associator::{AssociatorConfig, RobustAssociator};

// Reporters
pub use reporter::{DebugReporter, LoggingReporter, NoOpReporter, SolveReporter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
