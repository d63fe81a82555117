//! Assertion functions for numerical comparisons with tolerance

use nalgebra::{DMatrix, DVector};

use robust_association_rs::graph::ConsistencyGraph;

/// Compare scalar values with tolerance
pub fn assert_scalar_close(actual: f64, expected: f64, tolerance: f64, field_name: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {}, got {} (diff: {}, tolerance: {})",
        field_name,
        expected,
        actual,
        diff,
        tolerance
    );
}

/// Element-wise vector comparison; reports the first offending index
pub fn assert_dvector_close(
    actual: &DVector<f64>,
    expected: &DVector<f64>,
    tolerance: f64,
    field_name: &str,
) {
    assert_eq!(actual.len(), expected.len(), "{}: length", field_name);
    if let Some((i, (a, e))) = actual
        .iter()
        .zip(expected.iter())
        .enumerate()
        .find(|(_, (a, e))| (*a - *e).abs() > tolerance)
    {
        panic!(
            "{}[{}]: expected {}, got {} (tolerance {})",
            field_name, i, e, a, tolerance
        );
    }
}

/// Element-wise matrix comparison; reports the first offending entry
pub fn assert_dmatrix_close(
    actual: &DMatrix<f64>,
    expected: &DMatrix<f64>,
    tolerance: f64,
    field_name: &str,
) {
    assert_eq!(actual.shape(), expected.shape(), "{}: shape", field_name);
    let worst = (actual - expected).amax();
    if worst > tolerance {
        let (row, col) = (actual - expected).iamax_full();
        panic!(
            "{}[{},{}]: expected {}, got {} (max deviation {}, tolerance {})",
            field_name,
            row,
            col,
            expected[(row, col)],
            actual[(row, col)],
            worst,
            tolerance
        );
    }
}

/// Check the structural invariants every consistency graph must satisfy:
/// symmetric, binary compatibility, unit diagonal, affinity gated by
/// compatibility and bounded to `[0, 1]`.
pub fn assert_consistency_graph<G: ConsistencyGraph + ?Sized>(graph: &G, field_name: &str) {
    let n = graph.num_nodes();
    for a in 0..n {
        assert!(
            graph.is_compatible(a, a),
            "{}: node {} not self-compatible",
            field_name,
            a
        );
        assert_eq!(
            graph.affinity(a, a),
            1.0,
            "{}: diagonal affinity at {}",
            field_name,
            a
        );

        for b in 0..n {
            let m = graph.affinity(a, b);
            assert_eq!(
                graph.is_compatible(a, b),
                graph.is_compatible(b, a),
                "{}: compatibility not symmetric at [{},{}]",
                field_name,
                a,
                b
            );
            assert_eq!(
                m,
                graph.affinity(b, a),
                "{}: affinity not symmetric at [{},{}]",
                field_name,
                a,
                b
            );
            assert!(
                (0.0..=1.0).contains(&m),
                "{}: affinity {} out of range at [{},{}]",
                field_name,
                m,
                a,
                b
            );
            if !graph.is_compatible(a, b) {
                assert_eq!(
                    m, 0.0,
                    "{}: incompatible pair [{},{}] has affinity",
                    field_name, a, b
                );
            }
        }
    }
}

/// Check that `nodes` is strictly increasing, in range and a clique
pub fn assert_valid_clique<G: ConsistencyGraph + ?Sized>(graph: &G, nodes: &[usize], field_name: &str) {
    assert!(
        nodes.windows(2).all(|w| w[0] < w[1]),
        "{}: nodes not strictly increasing: {:?}",
        field_name,
        nodes
    );
    assert!(
        nodes.iter().all(|&a| a < graph.num_nodes()),
        "{}: node out of range: {:?}",
        field_name,
        nodes
    );
    assert!(
        graph.is_clique(nodes),
        "{}: nodes are not a clique: {:?}",
        field_name,
        nodes
    );
}
