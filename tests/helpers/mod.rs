//! Shared integration test helpers
//!
//! Synthetic datasets and tolerance assertions used across test files.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
