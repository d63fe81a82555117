//! Consistency graph construction and inlier selection
//!
//! This module provides:
//! - [`builder`] - pairwise invariant scoring into dense or sparse graphs
//! - [`selection`] - mapping solved dense clusters back to associations

pub mod builder;
pub mod selection;

pub use builder::{
    score_pairwise_consistency, score_sparse_pairwise_consistency, ConsistencyGraphBuilder,
};
pub use selection::select_inlier_associations;
