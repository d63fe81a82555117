//! Consistency graph construction.
//!
//! The builder evaluates a [`PairwiseInvariant`] over every unordered pair of
//! candidate associations and stores the result as a consistency graph. The
//! diagonal is fixed to 1 (every association is consistent with itself) and
//! never evaluated.
//!
//! Pair scores are computed row by row: row `a` holds the scores of `(a, b)`
//! for all `b > a`. With the `rayon` feature, rows are scored on the global
//! thread pool when the invariant reports itself reentrant. Rows are
//! collected in order and written afterwards, so dense and sparse, parallel
//! and sequential builds all produce identical matrices.

use log::{debug, trace};
use nalgebra::DMatrix;
use sprs::{CsMat, TriMat};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::errors::ConsistencyError;
use crate::graph::{AnyConsistencyGraph, DenseConsistencyGraph, GraphStorage, SparseConsistencyGraph};
use crate::invariants::PairwiseInvariant;
use crate::types::{Association, Data};

/// Compatible pairs of one row: `(column, score)` with `column > row`
type ScoredRow = Vec<(usize, f64)>;

/// Builds consistency graphs from two datasets and a candidate association set.
///
/// # Example
///
/// ```
/// use robust_association_rs::association::ConsistencyGraphBuilder;
/// use robust_association_rs::graph::ConsistencyGraph;
/// use robust_association_rs::invariants::{EuclideanDistance, EuclideanDistanceParams};
/// use robust_association_rs::types::{association_set, Data};
///
/// let d = Data::from_column_slice(2, 3, &[0.0, 0.0, 1.0, 0.0, 2.0, 0.0]);
/// let inv = EuclideanDistance::new(EuclideanDistanceParams::new(0.5, 0.5, 0.0)).unwrap();
/// let a = association_set(vec![(0, 0), (1, 1), (2, 2)]);
///
/// let graph = ConsistencyGraphBuilder::new(&inv).build_dense(&d, &d, &a).unwrap();
/// assert_eq!(graph.num_edges(), 3);
/// ```
pub struct ConsistencyGraphBuilder<'a, I: PairwiseInvariant + ?Sized> {
    invariant: &'a I,
    parallelize: bool,
    affinity_eps: f64,
}

impl<'a, I: PairwiseInvariant + ?Sized> ConsistencyGraphBuilder<'a, I> {
    /// Create a builder with parallel scoring enabled and a zero affinity floor
    pub fn new(invariant: &'a I) -> Self {
        Self {
            invariant,
            parallelize: true,
            affinity_eps: 0.0,
        }
    }

    /// Request (or forbid) parallel pair scoring
    pub fn parallelize(mut self, parallelize: bool) -> Self {
        self.parallelize = parallelize;
        self
    }

    /// Scores at or below this value mark a pair as incompatible
    pub fn affinity_eps(mut self, affinity_eps: f64) -> Self {
        self.affinity_eps = affinity_eps;
        self
    }

    /// Whether pair scoring will actually run on multiple threads.
    ///
    /// Requires the `rayon` feature, a parallel request, and a reentrant
    /// invariant.
    pub fn will_parallelize(&self) -> bool {
        cfg!(feature = "rayon") && self.parallelize && self.invariant.is_reentrant()
    }

    /// Build a dense consistency graph
    pub fn build_dense(
        &self,
        d1: &Data,
        d2: &Data,
        associations: &[Association],
    ) -> Result<DenseConsistencyGraph, ConsistencyError> {
        self.validate(d1, d2, associations)?;
        let rows = self.score_rows(d1, d2, associations);

        let n = associations.len();
        let mut m = DMatrix::identity(n, n);
        let mut c = DMatrix::identity(n, n);
        for (a, row) in rows.into_iter().enumerate() {
            for (b, score) in row {
                m[(a, b)] = score;
                m[(b, a)] = score;
                c[(a, b)] = 1.0;
                c[(b, a)] = 1.0;
            }
        }

        Ok(DenseConsistencyGraph::from_parts_unchecked(m, c))
    }

    /// Build a sparse (CSR) consistency graph
    pub fn build_sparse(
        &self,
        d1: &Data,
        d2: &Data,
        associations: &[Association],
    ) -> Result<SparseConsistencyGraph, ConsistencyError> {
        self.validate(d1, d2, associations)?;
        let rows = self.score_rows(d1, d2, associations);

        let n = associations.len();
        let nnz = n + 2 * rows.iter().map(Vec::len).sum::<usize>();
        let mut m_tri = TriMat::with_capacity((n, n), nnz);
        let mut c_tri = TriMat::with_capacity((n, n), nnz);
        for a in 0..n {
            m_tri.add_triplet(a, a, 1.0);
            c_tri.add_triplet(a, a, 1.0);
        }
        for (a, row) in rows.into_iter().enumerate() {
            for (b, score) in row {
                m_tri.add_triplet(a, b, score);
                m_tri.add_triplet(b, a, score);
                c_tri.add_triplet(a, b, 1.0);
                c_tri.add_triplet(b, a, 1.0);
            }
        }

        let m: CsMat<f64> = m_tri.to_csr();
        let c: CsMat<f64> = c_tri.to_csr();
        Ok(SparseConsistencyGraph::from_parts_unchecked(m, c))
    }

    /// Build a graph in the requested storage layout
    pub fn build(
        &self,
        d1: &Data,
        d2: &Data,
        associations: &[Association],
        storage: GraphStorage,
    ) -> Result<AnyConsistencyGraph, ConsistencyError> {
        match storage {
            GraphStorage::Dense => self.build_dense(d1, d2, associations).map(Into::into),
            GraphStorage::Sparse => self.build_sparse(d1, d2, associations).map(Into::into),
        }
    }

    /// Check datum dimensions and association indices before any scoring
    fn validate(
        &self,
        d1: &Data,
        d2: &Data,
        associations: &[Association],
    ) -> Result<(), ConsistencyError> {
        if d1.nrows() != d2.nrows() {
            return Err(ConsistencyError::dimension(
                d1.nrows(),
                d2.nrows(),
                "second dataset datum dimension",
            ));
        }
        if let Some(dim) = self.invariant.datum_dim() {
            if d1.nrows() != dim {
                return Err(ConsistencyError::dimension(
                    dim,
                    d1.nrows(),
                    format!("{} datum dimension", self.invariant.name()),
                ));
            }
        }

        for (idx, assoc) in associations.iter().enumerate() {
            if assoc.source >= d1.ncols() {
                return Err(ConsistencyError::IndexOutOfRange {
                    association: idx,
                    index: assoc.source,
                    bound: d1.ncols(),
                    context: "first dataset".to_string(),
                });
            }
            if assoc.target >= d2.ncols() {
                return Err(ConsistencyError::IndexOutOfRange {
                    association: idx,
                    index: assoc.target,
                    bound: d2.ncols(),
                    context: "second dataset".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Apply the affinity floor; NaN never passes
    #[inline]
    fn admit(&self, score: f64) -> Option<f64> {
        if score > self.affinity_eps {
            Some(score.min(1.0))
        } else {
            None
        }
    }

    fn score_row(&self, d1: &Data, d2: &Data, associations: &[Association], a: usize) -> ScoredRow {
        let first = &associations[a];
        (a + 1..associations.len())
            .filter_map(|b| {
                let score = self.invariant.evaluate(d1, d2, first, &associations[b]);
                self.admit(score).map(|s| (b, s))
            })
            .collect()
    }

    fn score_rows(&self, d1: &Data, d2: &Data, associations: &[Association]) -> Vec<ScoredRow> {
        let n = associations.len();
        let parallel = self.will_parallelize();
        trace!(
            "Scoring {} association pairs with {} (parallel: {})",
            n * n.saturating_sub(1) / 2,
            self.invariant.name(),
            parallel
        );

        let rows = self.score_rows_with(d1, d2, associations, parallel);

        debug!(
            "Consistency graph: {} associations, {} compatible pairs",
            n,
            rows.iter().map(Vec::len).sum::<usize>()
        );
        rows
    }

    #[cfg(feature = "rayon")]
    fn score_rows_with(
        &self,
        d1: &Data,
        d2: &Data,
        associations: &[Association],
        parallel: bool,
    ) -> Vec<ScoredRow> {
        let n = associations.len();
        if parallel {
            (0..n)
                .into_par_iter()
                .map(|a| self.score_row(d1, d2, associations, a))
                .collect()
        } else {
            (0..n)
                .map(|a| self.score_row(d1, d2, associations, a))
                .collect()
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn score_rows_with(
        &self,
        d1: &Data,
        d2: &Data,
        associations: &[Association],
        _parallel: bool,
    ) -> Vec<ScoredRow> {
        (0..associations.len())
            .map(|a| self.score_row(d1, d2, associations, a))
            .collect()
    }
}

/// Score all pairs of `associations` into a dense consistency graph.
///
/// `parallelize` is a request: non-reentrant invariants are always evaluated
/// on the calling thread.
pub fn score_pairwise_consistency<I: PairwiseInvariant + ?Sized>(
    invariant: &I,
    d1: &Data,
    d2: &Data,
    associations: &[Association],
    parallelize: bool,
) -> Result<DenseConsistencyGraph, ConsistencyError> {
    ConsistencyGraphBuilder::new(invariant)
        .parallelize(parallelize)
        .build_dense(d1, d2, associations)
}

/// Score all pairs of `associations` into a sparse consistency graph.
///
/// Same semantics as [`score_pairwise_consistency`], CSR storage.
pub fn score_sparse_pairwise_consistency<I: PairwiseInvariant + ?Sized>(
    invariant: &I,
    d1: &Data,
    d2: &Data,
    associations: &[Association],
    parallelize: bool,
) -> Result<SparseConsistencyGraph, ConsistencyError> {
    ConsistencyGraphBuilder::new(invariant)
        .parallelize(parallelize)
        .build_sparse(d1, d2, associations)
}
