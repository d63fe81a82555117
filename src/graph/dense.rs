//! Dense consistency graph

use nalgebra::{DMatrix, DVector};

use crate::errors::ConsistencyError;

use super::ConsistencyGraph;

/// Consistency graph backed by full `n × n` matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseConsistencyGraph {
    /// Gated affinity `M ⊙ C`
    affinity: DMatrix<f64>,
    /// Binary compatibility `C`
    compatibility: DMatrix<f64>,
}

impl DenseConsistencyGraph {
    /// Create a graph from caller-provided affinity and compatibility matrices.
    ///
    /// Any non-zero entry of `c` counts as compatible. The stored affinity is
    /// `m ⊙ C`, so affinities on incompatible pairs are dropped. Inputs are
    /// not modified.
    ///
    /// # Errors
    /// Returns [`ConsistencyError::DimensionMismatch`] if either matrix is not
    /// square or their sizes differ.
    pub fn new(m: &DMatrix<f64>, c: &DMatrix<f64>) -> Result<Self, ConsistencyError> {
        validate_square(m.nrows(), m.ncols(), "affinity matrix columns")?;
        validate_square(c.nrows(), c.ncols(), "compatibility matrix columns")?;
        if m.nrows() != c.nrows() {
            return Err(ConsistencyError::dimension(
                m.nrows(),
                c.nrows(),
                "compatibility matrix size",
            ));
        }

        let compatibility = c.map(|v| if v != 0.0 { 1.0 } else { 0.0 });
        let affinity = m.component_mul(&compatibility);
        Ok(Self {
            affinity,
            compatibility,
        })
    }

    /// Assemble a graph whose matrices already satisfy the gating invariant
    pub(crate) fn from_parts_unchecked(affinity: DMatrix<f64>, compatibility: DMatrix<f64>) -> Self {
        debug_assert_eq!(affinity.shape(), compatibility.shape());
        Self {
            affinity,
            compatibility,
        }
    }

    /// Gated affinity matrix `M`
    pub fn affinity_matrix(&self) -> &DMatrix<f64> {
        &self.affinity
    }

    /// Binary compatibility matrix `C`
    pub fn compatibility_matrix(&self) -> &DMatrix<f64> {
        &self.compatibility
    }

    /// Consume the graph and return `(M, C)`
    pub fn into_parts(self) -> (DMatrix<f64>, DMatrix<f64>) {
        (self.affinity, self.compatibility)
    }
}

fn validate_square(rows: usize, cols: usize, context: &str) -> Result<(), ConsistencyError> {
    if rows != cols {
        return Err(ConsistencyError::dimension(rows, cols, context));
    }
    Ok(())
}

impl ConsistencyGraph for DenseConsistencyGraph {
    #[inline]
    fn num_nodes(&self) -> usize {
        self.affinity.nrows()
    }

    #[inline]
    fn affinity(&self, a: usize, b: usize) -> f64 {
        self.affinity[(a, b)]
    }

    #[inline]
    fn is_compatible(&self, a: usize, b: usize) -> bool {
        self.compatibility[(a, b)] != 0.0
    }

    fn affinity_product(&self, u: &DVector<f64>) -> DVector<f64> {
        &self.affinity * u
    }

    fn compatibility_product(&self, u: &DVector<f64>) -> DVector<f64> {
        &self.compatibility * u
    }

    fn num_edges(&self) -> usize {
        let n = self.num_nodes();
        (0..n)
            .map(|a| (a + 1..n).filter(|&b| self.is_compatible(a, b)).count())
            .sum()
    }
}
