//! Consistency graph representations
//!
//! A consistency graph has one node per candidate association. It is stored
//! as two square matrices indexed by association-set position:
//!
//! - `M` - affinity, real valued in `[0, 1]`, `M[a,a] = 1`
//! - `C` - compatibility, binary, `C[a,a] = 1`
//!
//! Compatibility gates affinity: `C[a,b] = 0 ⇒ M[a,b] = 0`. Both
//! representations enforce this on construction, so the solver can use the
//! stored affinity directly as `M ⊙ C`.
//!
//! - [`dense`] - full `nalgebra` matrices, random access
//! - [`sparse`] - CSR matrices via `sprs`, for large and sparse graphs

pub mod dense;
pub mod sparse;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

pub use dense::DenseConsistencyGraph;
pub use sparse::SparseConsistencyGraph;

/// Weighted compatibility graph consumed by the dense cluster solver.
///
/// Implementations must be read-only: the solver only ever borrows the graph.
pub trait ConsistencyGraph {
    /// Number of nodes (associations)
    fn num_nodes(&self) -> usize;

    /// Gated affinity `M[a,b] · C[a,b]`
    fn affinity(&self, a: usize, b: usize) -> f64;

    /// Whether `C[a,b] = 1`
    fn is_compatible(&self, a: usize, b: usize) -> bool;

    /// Matrix-vector product `(M ⊙ C) u`
    fn affinity_product(&self, u: &DVector<f64>) -> DVector<f64>;

    /// Matrix-vector product `C u`
    fn compatibility_product(&self, u: &DVector<f64>) -> DVector<f64>;

    /// Number of compatible unordered pairs `{a, b}` with `a ≠ b`
    fn num_edges(&self) -> usize;

    /// Fraction of possible edges present
    fn density(&self) -> f64 {
        let n = self.num_nodes();
        if n < 2 {
            return 0.0;
        }
        self.num_edges() as f64 / (n * (n - 1) / 2) as f64
    }

    /// Whether every pair of `nodes` is compatible
    fn is_clique(&self, nodes: &[usize]) -> bool {
        nodes.iter().enumerate().all(|(k, &a)| {
            self.is_compatible(a, a) && nodes[k + 1..].iter().all(|&b| self.is_compatible(a, b))
        })
    }
}

/// Storage layout selected for scored graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GraphStorage {
    /// Full matrices
    #[default]
    Dense,
    /// CSR matrices
    Sparse,
}

/// Either graph representation, for callers that pick storage at runtime
#[derive(Debug, Clone)]
pub enum AnyConsistencyGraph {
    /// Dense storage
    Dense(DenseConsistencyGraph),
    /// Sparse storage
    Sparse(SparseConsistencyGraph),
}

impl AnyConsistencyGraph {
    /// Storage layout of this graph
    pub fn storage(&self) -> GraphStorage {
        match self {
            AnyConsistencyGraph::Dense(_) => GraphStorage::Dense,
            AnyConsistencyGraph::Sparse(_) => GraphStorage::Sparse,
        }
    }

    /// Dense view of the graph, converting sparse storage if needed
    pub fn to_dense(&self) -> DenseConsistencyGraph {
        match self {
            AnyConsistencyGraph::Dense(g) => g.clone(),
            AnyConsistencyGraph::Sparse(g) => g.to_dense(),
        }
    }

    fn inner(&self) -> &dyn ConsistencyGraph {
        match self {
            AnyConsistencyGraph::Dense(g) => g,
            AnyConsistencyGraph::Sparse(g) => g,
        }
    }
}

impl From<DenseConsistencyGraph> for AnyConsistencyGraph {
    fn from(g: DenseConsistencyGraph) -> Self {
        AnyConsistencyGraph::Dense(g)
    }
}

impl From<SparseConsistencyGraph> for AnyConsistencyGraph {
    fn from(g: SparseConsistencyGraph) -> Self {
        AnyConsistencyGraph::Sparse(g)
    }
}

impl ConsistencyGraph for AnyConsistencyGraph {
    fn num_nodes(&self) -> usize {
        self.inner().num_nodes()
    }

    fn affinity(&self, a: usize, b: usize) -> f64 {
        self.inner().affinity(a, b)
    }

    fn is_compatible(&self, a: usize, b: usize) -> bool {
        self.inner().is_compatible(a, b)
    }

    fn affinity_product(&self, u: &DVector<f64>) -> DVector<f64> {
        self.inner().affinity_product(u)
    }

    fn compatibility_product(&self, u: &DVector<f64>) -> DVector<f64> {
        self.inner().compatibility_product(u)
    }

    fn num_edges(&self) -> usize {
        self.inner().num_edges()
    }
}
