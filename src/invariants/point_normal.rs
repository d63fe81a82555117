//! Point-normal distance invariant
//!
//! Datums are 6-vectors `[px, py, pz, nx, ny, nz]`: a position and a unit
//! surface normal. Besides the point-to-point distance, rigid motions also
//! preserve the angle between the two normals.

use serde::{Deserialize, Serialize};

use crate::errors::ConsistencyError;
use crate::types::Datum;

use super::{gated_gaussian, Invariant, PairwiseInvariant};

/// Datum layout: 3D position followed by 3D unit normal
pub const POINT_NORMAL_DIM: usize = 6;

/// Parameters for [`PointNormalDistance`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointNormalDistanceParams {
    /// Gaussian scale of the positional term
    pub sigp: f64,
    /// Positional discrepancy at which a pair becomes incompatible
    pub epsp: f64,
    /// Gaussian scale of the normal-angle term (radians)
    pub sign: f64,
    /// Angle discrepancy at which a pair becomes incompatible (radians)
    pub epsn: f64,
}

impl Default for PointNormalDistanceParams {
    fn default() -> Self {
        Self {
            sigp: 0.5,
            epsp: 0.5,
            sign: 0.10,
            epsn: 0.35,
        }
    }
}

impl PointNormalDistanceParams {
    /// Create a new parameter set
    pub fn new(sigp: f64, epsp: f64, sign: f64, epsn: f64) -> Self {
        Self {
            sigp,
            epsp,
            sign,
            epsn,
        }
    }

    /// Check that all parameters are usable
    pub fn validate(&self) -> Result<(), ConsistencyError> {
        let checks = [
            ("sigp", self.sigp),
            ("epsp", self.epsp),
            ("sign", self.sign),
            ("epsn", self.epsn),
        ];
        for (name, value) in checks {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConsistencyError::parameter(
                    name,
                    format!("must be positive and finite, got {}", value),
                ));
            }
        }
        Ok(())
    }
}

/// Distance and normal-angle preservation invariant.
///
/// The score is the product of a positional term (as in
/// [`EuclideanDistance`](super::EuclideanDistance)) and a normal term built
/// from the difference between the normal angles measured in each dataset.
/// Either term failing its threshold zeroes the score.
#[derive(Debug, Clone)]
pub struct PointNormalDistance {
    params: PointNormalDistanceParams,
}

impl PointNormalDistance {
    /// Create a new invariant after validating `params`
    pub fn new(params: PointNormalDistanceParams) -> Result<Self, ConsistencyError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Get the invariant parameters
    pub fn params(&self) -> &PointNormalDistanceParams {
        &self.params
    }
}

/// Angle between two unit normals, robust to round-off past ±1
#[inline]
fn normal_angle(ni: Datum<'_>, nj: Datum<'_>) -> f64 {
    let n_i = ni.rows(3, 3);
    let n_j = nj.rows(3, 3);
    n_i.dot(&n_j).clamp(-1.0, 1.0).acos()
}

impl Invariant for PointNormalDistance {
    fn name(&self) -> &'static str {
        "PointNormalDistance"
    }

    fn datum_dim(&self) -> Option<usize> {
        Some(POINT_NORMAL_DIM)
    }
}

impl PairwiseInvariant for PointNormalDistance {
    fn score(&self, ai: Datum<'_>, aj: Datum<'_>, bi: Datum<'_>, bj: Datum<'_>) -> f64 {
        let l1 = ai.rows(0, 3).metric_distance(&aj.rows(0, 3));
        let l2 = bi.rows(0, 3).metric_distance(&bj.rows(0, 3));
        let sp = gated_gaussian((l1 - l2).abs(), self.params.sigp, self.params.epsp);
        if sp == 0.0 {
            return 0.0;
        }

        let alpha1 = normal_angle(ai, aj);
        let alpha2 = normal_angle(bi, bj);
        let sn = gated_gaussian((alpha1 - alpha2).abs(), self.params.sign, self.params.epsn);

        sp * sn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Association, Data};

    fn datums(cols: &[[f64; 6]]) -> Data {
        let flat: Vec<f64> = cols.iter().flat_map(|c| c.iter().copied()).collect();
        Data::from_column_slice(POINT_NORMAL_DIM, cols.len(), &flat)
    }

    fn invariant() -> PointNormalDistance {
        PointNormalDistance::new(PointNormalDistanceParams::new(0.5, 0.5, 0.1, 0.35)).unwrap()
    }

    #[test]
    fn test_rigidly_moved_pair_scores_one() {
        let d1 = datums(&[
            [0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        ]);
        // Translated by (10, 0, 0): normals unchanged
        let d2 = datums(&[
            [10.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            [11.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        ]);

        let s = invariant().evaluate(&d1, &d2, &Association::new(0, 0), &Association::new(1, 1));
        assert!((s - 1.0).abs() < 1e-12, "score {}", s);
    }

    #[test]
    fn test_normal_mismatch_zeroes_score() {
        let d1 = datums(&[
            [0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            [1.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        ]);
        // Same distance, but normals now perpendicular instead of parallel
        let d2 = datums(&[
            [0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        ]);

        let s = invariant().evaluate(&d1, &d2, &Association::new(0, 0), &Association::new(1, 1));
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_position_mismatch_zeroes_score() {
        let d1 = datums(&[
            [0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            [1.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        ]);
        let d2 = datums(&[
            [0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            [5.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        ]);

        let s = invariant().evaluate(&d1, &d2, &Association::new(0, 0), &Association::new(1, 1));
        assert_eq!(s, 0.0);
    }

    #[test]
    fn test_slightly_unnormalized_normals_do_not_produce_nan() {
        let d = datums(&[
            [0.0, 0.0, 0.0, 0.0, 0.0, 1.0 + 1e-12],
            [1.0, 0.0, 0.0, 0.0, 0.0, 1.0 + 1e-12],
        ]);

        let s = invariant().evaluate(&d, &d, &Association::new(0, 0), &Association::new(1, 1));
        assert!(s.is_finite());
        assert!((s - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_declares_datum_dimension() {
        assert_eq!(invariant().datum_dim(), Some(POINT_NORMAL_DIM));
        assert!(PointNormalDistance::new(PointNormalDistanceParams::new(0.5, 0.0, 0.1, 0.3)).is_err());
    }
}
