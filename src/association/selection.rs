//! Inlier selection from a dense cluster solution

use crate::errors::ConsistencyError;
use crate::solver::Solution;
use crate::types::{Association, AssociationSet};

/// Map the nodes of a dense cluster back to their associations.
///
/// Returns the associations whose position appears in `solution.nodes`, in
/// their original relative order. Duplicate node indices are ignored.
///
/// # Errors
/// Returns [`ConsistencyError::NodeOutOfRange`] if a node does not index
/// into `associations` (e.g. the solution belongs to another set).
pub fn select_inlier_associations(
    solution: &Solution,
    associations: &[Association],
) -> Result<AssociationSet, ConsistencyError> {
    let mut nodes = solution.nodes.clone();
    nodes.sort_unstable();
    nodes.dedup();

    nodes
        .into_iter()
        .map(|node| {
            associations
                .get(node)
                .copied()
                .ok_or(ConsistencyError::NodeOutOfRange {
                    node,
                    bound: associations.len(),
                })
        })
        .collect()
}
