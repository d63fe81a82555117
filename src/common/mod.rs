//! Common utilities shared by the graph builder and the solver.
//!
//! This module contains sparse/dense linear algebra helpers and the
//! numerical defaults used by the solver and the builtin invariants.

pub mod constants;
pub mod linalg;
