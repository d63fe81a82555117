//! Dataset and association types
//!
//! This module defines the core data types shared by the invariants, the
//! consistency graph builder and the inlier selector.
//! Uses runtime dimensions (DMatrix/DVector) so any datum size is accepted.

use nalgebra::{DMatrix, DVectorView};
use serde::{Deserialize, Serialize};

/// One side of the association problem.
///
/// Each column is one datum (a point, a point+normal, a descriptor, ...).
/// A dataset with `n` three-dimensional points is a `3 × n` matrix.
pub type Data = DMatrix<f64>;

/// Borrowed view of a single datum (one column of a [`Data`] matrix).
pub type Datum<'a> = DVectorView<'a, f64>;

/// Candidate correspondence between two datasets.
///
/// `source` indexes a column of the first dataset, `target` a column of the
/// second dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Association {
    /// Column index into the first dataset
    pub source: usize,
    /// Column index into the second dataset
    pub target: usize,
}

impl Association {
    /// Create a new association
    pub fn new(source: usize, target: usize) -> Self {
        Self { source, target }
    }
}

impl From<(usize, usize)> for Association {
    fn from((source, target): (usize, usize)) -> Self {
        Self::new(source, target)
    }
}

/// Ordered sequence of candidate associations.
///
/// The position of an association in this sequence is its node index in the
/// consistency graph and in [`Solution::nodes`](crate::solver::Solution).
pub type AssociationSet = Vec<Association>;

/// Build an association set from `(source, target)` pairs.
pub fn association_set<I>(pairs: I) -> AssociationSet
where
    I: IntoIterator<Item = (usize, usize)>,
{
    pairs.into_iter().map(Association::from).collect()
}
