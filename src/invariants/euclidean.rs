//! Euclidean distance invariant
//!
//! Rigid transformations preserve the distance between two points, so a pair
//! of correct associations must see (nearly) the same distance in both
//! datasets.

use serde::{Deserialize, Serialize};

use crate::errors::ConsistencyError;
use crate::types::Datum;

use super::{gated_gaussian, Invariant, PairwiseInvariant};

/// Parameters for [`EuclideanDistance`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EuclideanDistanceParams {
    /// Gaussian scale of the score falloff
    pub sigma: f64,
    /// Distance discrepancy at which a pair becomes incompatible
    pub epsilon: f64,
    /// Minimum admissible distance between two datums of the same dataset
    pub mindist: f64,
}

impl Default for EuclideanDistanceParams {
    fn default() -> Self {
        Self {
            sigma: 0.01,
            epsilon: 0.06,
            mindist: 0.0,
        }
    }
}

impl EuclideanDistanceParams {
    /// Create a new parameter set
    pub fn new(sigma: f64, epsilon: f64, mindist: f64) -> Self {
        Self {
            sigma,
            epsilon,
            mindist,
        }
    }

    /// Check that all parameters are usable
    pub fn validate(&self) -> Result<(), ConsistencyError> {
        if !(self.sigma > 0.0) || !self.sigma.is_finite() {
            return Err(ConsistencyError::parameter(
                "sigma",
                format!("must be positive and finite, got {}", self.sigma),
            ));
        }
        if !(self.epsilon > 0.0) {
            return Err(ConsistencyError::parameter(
                "epsilon",
                format!("must be positive, got {}", self.epsilon),
            ));
        }
        if !(self.mindist >= 0.0) {
            return Err(ConsistencyError::parameter(
                "mindist",
                format!("must be non-negative, got {}", self.mindist),
            ));
        }
        Ok(())
    }
}

/// Distance-preservation invariant.
///
/// `score = exp(-c² / (2σ²))` with `c = |‖ai - aj‖ - ‖bi - bj‖|` when
/// `c < epsilon` and both distances are at least `mindist`, `0` otherwise.
#[derive(Debug, Clone)]
pub struct EuclideanDistance {
    params: EuclideanDistanceParams,
}

impl EuclideanDistance {
    /// Create a new invariant after validating `params`
    pub fn new(params: EuclideanDistanceParams) -> Result<Self, ConsistencyError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Get the invariant parameters
    pub fn params(&self) -> &EuclideanDistanceParams {
        &self.params
    }
}

impl Invariant for EuclideanDistance {
    fn name(&self) -> &'static str {
        "EuclideanDistance"
    }
}

impl PairwiseInvariant for EuclideanDistance {
    #[inline]
    fn score(&self, ai: Datum<'_>, aj: Datum<'_>, bi: Datum<'_>, bj: Datum<'_>) -> f64 {
        let l1 = ai.metric_distance(&aj);
        let l2 = bi.metric_distance(&bj);

        // Coincident or near-duplicate points make every distance look consistent
        if l1 < self.params.mindist || l2 < self.params.mindist {
            return 0.0;
        }

        let c = (l1 - l2).abs();
        gated_gaussian(c, self.params.sigma, self.params.epsilon)
    }
}
