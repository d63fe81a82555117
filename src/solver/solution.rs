//! Dense cluster solution

use nalgebra::DVector;

/// Result of one dense cluster search.
///
/// Created fresh by every solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Wall-clock solve time in seconds
    pub t: f64,
    /// Outer iterations consumed
    pub ifinal: usize,
    /// Association-set positions selected as the dense cluster, ascending
    pub nodes: Vec<usize>,
    /// Membership vector restricted to `nodes` (unit norm, non-negative);
    /// the starting membership when `nodes` is empty
    pub u: DVector<f64>,
    /// Objective `uᵀ(M ⊙ C)u` of `u`, best over all outer iterations
    pub score: f64,
    /// `false` when the outer loop stopped on its iteration cap
    pub converged: bool,
}

impl Default for Solution {
    fn default() -> Self {
        Self {
            t: 0.0,
            ifinal: 0,
            nodes: Vec::new(),
            u: DVector::zeros(0),
            score: 0.0,
            converged: true,
        }
    }
}

impl Solution {
    /// Number of selected nodes
    #[inline]
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node was selected
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether association-set position `node` is part of the cluster
    pub fn contains(&self, node: usize) -> bool {
        self.nodes.binary_search(&node).is_ok()
    }
}
