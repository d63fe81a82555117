//! Pairwise invariants for scoring association consistency
//!
//! An invariant is a quantity that does not change under the (unknown)
//! transformation relating two datasets. Evaluating it over a pair of
//! associations tells whether both can be correct at the same time.
//!
//! This module provides:
//! - [`Invariant`] - base capability (name, reentrancy, datum dimension)
//! - [`PairwiseInvariant`] - scoring contract used by the graph builder
//! - [`EuclideanDistance`] - preserved point-to-point distance
//! - [`PointNormalDistance`] - preserved distance and relative normal angle
//! - [`FnInvariant`] - adapter turning a closure into a custom invariant

pub mod euclidean;
pub mod point_normal;

use std::fmt;
use std::sync::Arc;

use crate::types::{Association, Data, Datum};

pub use euclidean::{EuclideanDistance, EuclideanDistanceParams};
pub use point_normal::{PointNormalDistance, PointNormalDistanceParams};

/// Shared handle to a pairwise invariant.
pub type PairwiseInvariantPtr = Arc<dyn PairwiseInvariant>;

/// Base capability shared by all invariants.
///
/// # Thread Safety
///
/// Invariants must be `Send + Sync` so they can be shared with scoring
/// workers. An implementation that serializes internally (e.g. forwards to a
/// host runtime behind a lock) should return `false` from
/// [`is_reentrant`](Invariant::is_reentrant); the builder then evaluates it
/// on the calling thread only.
pub trait Invariant: Send + Sync {
    /// Human readable invariant name
    fn name(&self) -> &'static str;

    /// Whether concurrent calls to the scoring function are allowed
    fn is_reentrant(&self) -> bool {
        true
    }

    /// Required datum dimension, or `None` if any dimension is accepted
    fn datum_dim(&self) -> Option<usize> {
        None
    }
}

/// Invariant evaluated over a pair of associations.
///
/// For associations `a = (i, j)` and `b = (k, l)` the score compares the
/// relation between datums `i` and `k` of the first dataset with the relation
/// between datums `j` and `l` of the second dataset.
///
/// Scores live in `[0, 1]`; `0` marks the pair as incompatible.
pub trait PairwiseInvariant: Invariant {
    /// Score consistency of two datum pairs.
    ///
    /// # Arguments
    /// * `ai` - datum of the first dataset referenced by association `a`
    /// * `aj` - datum of the first dataset referenced by association `b`
    /// * `bi` - datum of the second dataset referenced by association `a`
    /// * `bj` - datum of the second dataset referenced by association `b`
    fn score(&self, ai: Datum<'_>, aj: Datum<'_>, bi: Datum<'_>, bj: Datum<'_>) -> f64;

    /// Score consistency of associations `a` and `b` over datasets `d1`, `d2`.
    ///
    /// Indices are assumed to be in range; the builder validates them once
    /// before scoring.
    #[inline]
    fn evaluate(&self, d1: &Data, d2: &Data, a: &Association, b: &Association) -> f64 {
        self.score(
            d1.column(a.source),
            d1.column(b.source),
            d2.column(a.target),
            d2.column(b.target),
        )
    }
}

/// Custom invariant backed by a closure.
///
/// # Example
///
/// ```
/// use robust_association_rs::invariants::{FnInvariant, PairwiseInvariant};
/// use robust_association_rs::types::{Association, Data};
///
/// // Preserved distance along the first axis only
/// let inv = FnInvariant::new("x-distance", |ai, aj, bi, bj| {
///     let d1 = (ai[0] - aj[0]).abs();
///     let d2 = (bi[0] - bj[0]).abs();
///     if (d1 - d2).abs() < 0.1 { 1.0 } else { 0.0 }
/// });
///
/// let d = Data::from_column_slice(1, 2, &[0.0, 1.0]);
/// let s = inv.evaluate(&d, &d, &Association::new(0, 0), &Association::new(1, 1));
/// assert_eq!(s, 1.0);
/// ```
pub struct FnInvariant<F> {
    name: &'static str,
    reentrant: bool,
    datum_dim: Option<usize>,
    f: F,
}

impl<F> FnInvariant<F> {
    /// Wrap a closure that may be called concurrently
    pub fn new(name: &'static str, f: F) -> Self
    where
        F: Fn(Datum<'_>, Datum<'_>, Datum<'_>, Datum<'_>) -> f64 + Send + Sync,
    {
        Self {
            name,
            reentrant: true,
            datum_dim: None,
            f,
        }
    }

    /// Force single-threaded evaluation of this invariant
    pub fn serialized(mut self) -> Self {
        self.reentrant = false;
        self
    }

    /// Require a fixed datum dimension
    pub fn with_datum_dim(mut self, dim: usize) -> Self {
        self.datum_dim = Some(dim);
        self
    }
}

impl<F> fmt::Debug for FnInvariant<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnInvariant")
            .field("name", &self.name)
            .field("reentrant", &self.reentrant)
            .field("datum_dim", &self.datum_dim)
            .finish()
    }
}

impl<F> Invariant for FnInvariant<F>
where
    F: Fn(Datum<'_>, Datum<'_>, Datum<'_>, Datum<'_>) -> f64 + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_reentrant(&self) -> bool {
        self.reentrant
    }

    fn datum_dim(&self) -> Option<usize> {
        self.datum_dim
    }
}

impl<F> PairwiseInvariant for FnInvariant<F>
where
    F: Fn(Datum<'_>, Datum<'_>, Datum<'_>, Datum<'_>) -> f64 + Send + Sync,
{
    #[inline]
    fn score(&self, ai: Datum<'_>, aj: Datum<'_>, bi: Datum<'_>, bj: Datum<'_>) -> f64 {
        (self.f)(ai, aj, bi, bj)
    }
}

/// Gaussian falloff `exp(-c² / (2σ²))` gated by `c < eps`.
#[inline]
pub(crate) fn gated_gaussian(c: f64, sigma: f64, eps: f64) -> f64 {
    if c < eps {
        (-0.5 * c * c / (sigma * sigma)).exp()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_invariant_flags() {
        let inv = FnInvariant::new("const", |_, _, _, _| 0.5);
        assert!(inv.is_reentrant());
        assert_eq!(inv.datum_dim(), None);

        let inv = inv.serialized().with_datum_dim(3);
        assert!(!inv.is_reentrant());
        assert_eq!(inv.datum_dim(), Some(3));
        assert_eq!(inv.name(), "const");
    }

    #[test]
    fn test_evaluate_picks_referenced_columns() {
        // Score is the first coordinate of each of the four datums packed
        // into a single number, so the column selection is observable.
        let inv = FnInvariant::new("probe", |ai, aj, bi, bj| {
            ai[0] * 1000.0 + aj[0] * 100.0 + bi[0] * 10.0 + bj[0]
        });
        let d1 = Data::from_column_slice(1, 3, &[0.0, 1.0, 2.0]);
        let d2 = Data::from_column_slice(1, 3, &[3.0, 4.0, 5.0]);

        let s = inv.evaluate(&d1, &d2, &Association::new(2, 0), &Association::new(1, 2));
        assert_eq!(s, 2.0 * 1000.0 + 1.0 * 100.0 + 3.0 * 10.0 + 5.0);
    }

    #[test]
    fn test_gated_gaussian() {
        assert_eq!(gated_gaussian(0.0, 1.0, 1.0), 1.0);
        assert_eq!(gated_gaussian(1.0, 1.0, 1.0), 0.0);
        let s = gated_gaussian(0.5, 1.0, 1.0);
        assert!((s - (-0.125f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_trait_object_dispatch() {
        let inv: PairwiseInvariantPtr = Arc::new(FnInvariant::new("one", |_, _, _, _| 1.0));
        let d = Data::zeros(2, 2);
        assert_eq!(
            inv.evaluate(&d, &d, &Association::new(0, 0), &Association::new(1, 1)),
            1.0
        );
    }
}
