//! Rounding of the relaxed membership vector into a discrete node set.
//!
//! Policy: nodes with `u[a] > eps` are visited in decreasing `u` (ties by
//! index). A node is kept if it is self-compatible and compatible with every
//! node kept so far. The result is therefore always a clique of the
//! compatibility graph, even when the solver stopped on an iteration cap
//! before the penalty drove the support to a clique.

use nalgebra::DVector;

use crate::graph::ConsistencyGraph;

/// Select the dense cluster from the final membership vector.
///
/// Returns an empty set when `score <= eps`. The returned indices are sorted
/// ascending.
pub fn round_membership<G: ConsistencyGraph + ?Sized>(
    graph: &G,
    u: &DVector<f64>,
    score: f64,
    eps: f64,
) -> Vec<usize> {
    if !(score > eps) {
        return Vec::new();
    }

    let mut candidates: Vec<usize> = (0..u.len()).filter(|&a| u[a] > eps).collect();
    candidates.sort_by(|&a, &b| u[b].total_cmp(&u[a]).then(a.cmp(&b)));

    let mut nodes: Vec<usize> = Vec::with_capacity(candidates.len());
    for a in candidates {
        if graph.is_compatible(a, a) && nodes.iter().all(|&b| graph.is_compatible(a, b)) {
            nodes.push(a);
        }
    }

    nodes.sort_unstable();
    nodes
}
