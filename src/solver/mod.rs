/*!
Dense cluster (relaxed maximum clique) solver.

- [`params`] - [`SolverParams`], tolerances and iteration caps
- [`solution`] - [`Solution`], the result of one solve
- [`dense_cluster`] - [`DenseClusterSolver`], projected gradient ascent
- [`rounding`] - mapping the relaxed membership vector to a clique

The `find_dense_cluster*` functions take raw affinity/compatibility matrices,
wrap them in a consistency graph and solve once.
*/

pub mod dense_cluster;
pub mod params;
pub mod rounding;
pub mod solution;

pub use dense_cluster::DenseClusterSolver;
pub use params::SolverParams;
pub use rounding::round_membership;
pub use solution::Solution;

use nalgebra::{DMatrix, DVector};
use sprs::CsMat;

use crate::errors::ConsistencyError;
use crate::graph::{DenseConsistencyGraph, SparseConsistencyGraph};

/// Find the dense cluster of a dense graph, starting from uniform membership
pub fn find_dense_cluster(
    m: &DMatrix<f64>,
    c: &DMatrix<f64>,
    params: &SolverParams,
) -> Result<Solution, ConsistencyError> {
    let graph = DenseConsistencyGraph::new(m, c)?;
    DenseClusterSolver::new(*params).solve(&graph, None)
}

/// Find the dense cluster of a dense graph, starting from `u0`
pub fn find_dense_cluster_with_initial(
    m: &DMatrix<f64>,
    c: &DMatrix<f64>,
    u0: &DVector<f64>,
    params: &SolverParams,
) -> Result<Solution, ConsistencyError> {
    let graph = DenseConsistencyGraph::new(m, c)?;
    DenseClusterSolver::new(*params).solve(&graph, Some(u0))
}

/// Find the dense cluster of a sparse graph, starting from uniform membership
pub fn find_dense_cluster_of_sparse_graph(
    m: &CsMat<f64>,
    c: &CsMat<f64>,
    params: &SolverParams,
) -> Result<Solution, ConsistencyError> {
    let graph = SparseConsistencyGraph::new(m, c)?;
    DenseClusterSolver::new(*params).solve(&graph, None)
}

/// Find the dense cluster of a sparse graph, starting from `u0`
pub fn find_dense_cluster_of_sparse_graph_with_initial(
    m: &CsMat<f64>,
    c: &CsMat<f64>,
    u0: &DVector<f64>,
    params: &SolverParams,
) -> Result<Solution, ConsistencyError> {
    let graph = SparseConsistencyGraph::new(m, c)?;
    DenseClusterSolver::new(*params).solve(&graph, Some(u0))
}
