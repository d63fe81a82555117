//! Sparse consistency graph
//!
//! Only compatible pairs are stored. Large association sets are usually very
//! sparse (most candidate pairs are geometrically inconsistent), which makes
//! the CSR matrix-vector product the solver's hot path.

use nalgebra::{DMatrix, DVector};
use sprs::{CsMat, TriMat};

use crate::common::linalg::{csr_mat_vec, dense_to_csr, for_each_stored, sparse_to_dense};
use crate::errors::ConsistencyError;

use super::{ConsistencyGraph, DenseConsistencyGraph};

/// Consistency graph backed by CSR matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseConsistencyGraph {
    /// Gated affinity `M ⊙ C` (CSR)
    affinity: CsMat<f64>,
    /// Binary compatibility `C` (CSR)
    compatibility: CsMat<f64>,
}

impl SparseConsistencyGraph {
    /// Create a graph from caller-provided sparse matrices.
    ///
    /// Accepts CSR or CSC input. Stored non-zero entries of `c` count as
    /// compatible; entries of `m` without a matching compatible entry are
    /// dropped. Inputs are not modified.
    ///
    /// # Errors
    /// Returns [`ConsistencyError::DimensionMismatch`] if either matrix is not
    /// square or their sizes differ.
    pub fn new(m: &CsMat<f64>, c: &CsMat<f64>) -> Result<Self, ConsistencyError> {
        if m.rows() != m.cols() {
            return Err(ConsistencyError::dimension(
                m.rows(),
                m.cols(),
                "affinity matrix columns",
            ));
        }
        if c.rows() != c.cols() {
            return Err(ConsistencyError::dimension(
                c.rows(),
                c.cols(),
                "compatibility matrix columns",
            ));
        }
        if m.rows() != c.rows() {
            return Err(ConsistencyError::dimension(
                m.rows(),
                c.rows(),
                "compatibility matrix size",
            ));
        }

        let n = c.rows();
        let mut c_tri = TriMat::new((n, n));
        for_each_stored(c, |row, col, value| {
            if value != 0.0 {
                c_tri.add_triplet(row, col, 1.0);
            }
        });
        let compatibility: CsMat<f64> = c_tri.to_csr();
        // Duplicate triplets in `c` would have been summed
        let compatibility = compatibility.map(|&v| if v != 0.0 { 1.0 } else { 0.0 });

        let mut m_tri = TriMat::new((n, n));
        for_each_stored(m, |row, col, value| {
            if value != 0.0 && compatibility.get(row, col).is_some() {
                m_tri.add_triplet(row, col, value);
            }
        });
        let affinity: CsMat<f64> = m_tri.to_csr();
        // Summed duplicates in `m` are clamped back to the unit interval
        let affinity = affinity.map(|&v| v.min(1.0));

        Ok(Self {
            affinity,
            compatibility,
        })
    }

    /// Assemble a graph from CSR matrices that already satisfy the gating invariant
    pub(crate) fn from_parts_unchecked(affinity: CsMat<f64>, compatibility: CsMat<f64>) -> Self {
        debug_assert!(affinity.is_csr() && compatibility.is_csr());
        debug_assert_eq!(affinity.shape(), compatibility.shape());
        Self {
            affinity,
            compatibility,
        }
    }

    /// Sparse copy of a dense graph
    pub fn from_dense(graph: &DenseConsistencyGraph) -> Self {
        Self::from_parts_unchecked(
            dense_to_csr(graph.affinity_matrix()),
            dense_to_csr(graph.compatibility_matrix()),
        )
    }

    /// Dense copy of this graph
    pub fn to_dense(&self) -> DenseConsistencyGraph {
        DenseConsistencyGraph::from_parts_unchecked(
            sparse_to_dense(&self.affinity),
            sparse_to_dense(&self.compatibility),
        )
    }

    /// Gated affinity matrix `M` (CSR)
    pub fn affinity_matrix(&self) -> &CsMat<f64> {
        &self.affinity
    }

    /// Binary compatibility matrix `C` (CSR)
    pub fn compatibility_matrix(&self) -> &CsMat<f64> {
        &self.compatibility
    }

    /// Consume the graph and return `(M, C)`
    pub fn into_parts(self) -> (CsMat<f64>, CsMat<f64>) {
        (self.affinity, self.compatibility)
    }

    /// Dense affinity matrix, mainly for inspection in tests
    pub fn affinity_dense(&self) -> DMatrix<f64> {
        sparse_to_dense(&self.affinity)
    }
}

impl ConsistencyGraph for SparseConsistencyGraph {
    #[inline]
    fn num_nodes(&self) -> usize {
        self.compatibility.rows()
    }

    #[inline]
    fn affinity(&self, a: usize, b: usize) -> f64 {
        self.affinity.get(a, b).copied().unwrap_or(0.0)
    }

    #[inline]
    fn is_compatible(&self, a: usize, b: usize) -> bool {
        self.compatibility.get(a, b).is_some_and(|&v| v != 0.0)
    }

    fn affinity_product(&self, u: &DVector<f64>) -> DVector<f64> {
        csr_mat_vec(&self.affinity, u)
    }

    fn compatibility_product(&self, u: &DVector<f64>) -> DVector<f64> {
        csr_mat_vec(&self.compatibility, u)
    }

    fn num_edges(&self) -> usize {
        let mut count = 0;
        for_each_stored(&self.compatibility, |row, col, value| {
            if row < col && value != 0.0 {
                count += 1;
            }
        });
        count
    }
}
