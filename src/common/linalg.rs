//! Linear algebra utilities
//!
//! Sparse/dense conversions, the CSR matrix-vector product used on the
//! solver hot path, and projection helpers for membership vectors.

use nalgebra::{DMatrix, DVector};
use sprs::{CsMat, TriMat};

/// Visit every stored entry of a sparse matrix as `(row, col, value)`.
///
/// Works for both CSR and CSC storage.
pub fn for_each_stored<F>(mat: &CsMat<f64>, mut f: F)
where
    F: FnMut(usize, usize, f64),
{
    let csr = mat.is_csr();
    for (outer, lane) in mat.outer_iterator().enumerate() {
        for (inner, &value) in lane.iter() {
            if csr {
                f(outer, inner, value);
            } else {
                f(inner, outer, value);
            }
        }
    }
}

/// Compute `y = A x` for a CSR matrix `A`.
///
/// # Panics
/// Debug builds assert CSR storage and matching dimensions.
pub fn csr_mat_vec(mat: &CsMat<f64>, x: &DVector<f64>) -> DVector<f64> {
    debug_assert!(mat.is_csr());
    debug_assert_eq!(mat.cols(), x.len());

    let mut y = DVector::zeros(mat.rows());
    for (row, lane) in mat.outer_iterator().enumerate() {
        y[row] = lane.iter().map(|(col, &value)| value * x[col]).sum();
    }
    y
}

/// Convert a sparse matrix to a dense one
pub fn sparse_to_dense(mat: &CsMat<f64>) -> DMatrix<f64> {
    let mut dense = DMatrix::zeros(mat.rows(), mat.cols());
    for_each_stored(mat, |row, col, value| dense[(row, col)] += value);
    dense
}

/// Convert a dense matrix to CSR, keeping only non-zero entries
pub fn dense_to_csr(mat: &DMatrix<f64>) -> CsMat<f64> {
    let mut tri = TriMat::new((mat.nrows(), mat.ncols()));
    for row in 0..mat.nrows() {
        for col in 0..mat.ncols() {
            let value = mat[(row, col)];
            if value != 0.0 {
                tri.add_triplet(row, col, value);
            }
        }
    }
    tri.to_csr()
}

/// Project `u` onto the non-negative part of the unit sphere.
///
/// Negative entries are clamped to zero before normalising. Returns `false`
/// (leaving `u` clamped but unnormalised) when the clamped norm is not above
/// `eps`, so the caller can decide how to recover.
pub fn project_nonnegative_unit(u: &mut DVector<f64>, eps: f64) -> bool {
    u.apply(|v| {
        if !(*v > 0.0) {
            *v = 0.0;
        }
    });
    let norm = u.norm();
    if !(norm > eps) || !norm.is_finite() {
        return false;
    }
    *u /= norm;
    true
}

/// Unit-norm vector with equal positive entries
pub fn uniform_unit(n: usize) -> DVector<f64> {
    if n == 0 {
        return DVector::zeros(0);
    }
    DVector::from_element(n, 1.0 / (n as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DMatrix<f64> {
        #[rustfmt::skip]
        let m = DMatrix::from_row_slice(3, 3, &[
            1.0, 0.0, 0.5,
            0.0, 1.0, 0.0,
            0.5, 0.0, 1.0,
        ]);
        m
    }

    #[test]
    fn test_dense_sparse_round_trip() {
        let dense = sample();
        let sparse = dense_to_csr(&dense);
        assert_eq!(sparse.nnz(), 5);
        assert_eq!(sparse_to_dense(&sparse), dense);
    }

    #[test]
    fn test_csr_mat_vec_matches_dense() {
        let dense = sample();
        let sparse = dense_to_csr(&dense);
        let x = DVector::from_vec(vec![1.0, -2.0, 4.0]);

        assert_eq!(csr_mat_vec(&sparse, &x), &dense * &x);
    }

    #[test]
    fn test_for_each_stored_handles_csc() {
        let dense = DMatrix::from_row_slice(2, 2, &[0.0, 2.0, 0.0, 0.0]);
        let csc = dense_to_csr(&dense).to_csc();
        let mut seen = Vec::new();
        for_each_stored(&csc, |r, c, v| seen.push((r, c, v)));
        assert_eq!(seen, vec![(0, 1, 2.0)]);
    }

    #[test]
    fn test_project_nonnegative_unit() {
        let mut u = DVector::from_vec(vec![3.0, -1.0, 4.0]);
        assert!(project_nonnegative_unit(&mut u, 1e-9));
        assert!((u[0] - 0.6).abs() < 1e-12);
        assert_eq!(u[1], 0.0);
        assert!((u[2] - 0.8).abs() < 1e-12);

        let mut z = DVector::from_vec(vec![-1.0, 0.0]);
        assert!(!project_nonnegative_unit(&mut z, 1e-9));
        assert_eq!(z, DVector::zeros(2));

        let mut nan = DVector::from_vec(vec![f64::NAN, 1.0]);
        assert!(project_nonnegative_unit(&mut nan, 1e-9));
        assert_eq!(nan, DVector::from_vec(vec![0.0, 1.0]));
    }

    #[test]
    fn test_uniform_unit() {
        let u = uniform_unit(4);
        assert!((u.norm() - 1.0).abs() < 1e-12);
        assert!(u.iter().all(|&v| (v - 0.5).abs() < 1e-12));
        assert_eq!(uniform_unit(0).len(), 0);
    }
}
