//! Error types for graph construction and dense cluster search
//!
//! Only input validation is reported through these errors. Numerical
//! degeneracies inside the solver are clamped internally and reaching an
//! iteration cap is reported through [`Solution`](crate::solver::Solution)
//! diagnostics instead.

use std::fmt;

/// Errors that can occur when building or solving a consistency graph
#[derive(Debug, Clone, PartialEq)]
pub enum ConsistencyError {
    /// Dimension mismatch between expected and actual
    DimensionMismatch {
        /// What was expected
        expected: usize,
        /// What was received
        actual: usize,
        /// Context (e.g., "datum dimension", "compatibility matrix rows")
        context: String,
    },

    /// An association refers to a datum that does not exist
    IndexOutOfRange {
        /// Position of the offending association in the association set
        association: usize,
        /// The out-of-range datum index
        index: usize,
        /// Number of datums in the referenced dataset
        bound: usize,
        /// Which dataset was indexed
        context: String,
    },

    /// A solution node does not index into the association set
    NodeOutOfRange {
        /// The offending node
        node: usize,
        /// Size of the association set
        bound: usize,
    },

    /// A parameter is outside its admissible range
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Description of the issue
        description: String,
    },

    /// A solve was requested before any consistency graph was available
    NotScored,

    /// Inliers were requested before the dense cluster was solved
    NotSolved,
}

impl ConsistencyError {
    pub(crate) fn dimension(expected: usize, actual: usize, context: impl Into<String>) -> Self {
        ConsistencyError::DimensionMismatch {
            expected,
            actual,
            context: context.into(),
        }
    }

    pub(crate) fn parameter(name: &'static str, description: impl Into<String>) -> Self {
        ConsistencyError::InvalidParameter {
            name,
            description: description.into(),
        }
    }
}

impl fmt::Display for ConsistencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyError::DimensionMismatch {
                expected,
                actual,
                context,
            } => {
                write!(
                    f,
                    "Dimension mismatch for {}: expected {}, got {}",
                    context, expected, actual
                )
            }
            ConsistencyError::IndexOutOfRange {
                association,
                index,
                bound,
                context,
            } => {
                write!(
                    f,
                    "Association {} references {} index {} (only {} datums)",
                    association, context, index, bound
                )
            }
            ConsistencyError::NodeOutOfRange { node, bound } => {
                write!(
                    f,
                    "Solution node {} is outside the association set (size {})",
                    node, bound
                )
            }
            ConsistencyError::InvalidParameter { name, description } => {
                write!(f, "Invalid parameter `{}`: {}", name, description)
            }
            ConsistencyError::NotScored => write!(f, "No consistency graph has been scored yet"),
            ConsistencyError::NotSolved => write!(f, "Dense cluster has not been solved yet"),
        }
    }
}

impl std::error::Error for ConsistencyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = ConsistencyError::dimension(3, 2, "datum dimension");
        let msg = err.to_string();
        assert!(msg.contains("datum dimension"));
        assert!(msg.contains('3'));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_index_out_of_range_display() {
        let err = ConsistencyError::IndexOutOfRange {
            association: 4,
            index: 10,
            bound: 5,
            context: "first dataset".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("first dataset"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn test_node_out_of_range_display() {
        let err = ConsistencyError::NodeOutOfRange { node: 7, bound: 3 };
        assert_eq!(
            err.to_string(),
            "Solution node 7 is outside the association set (size 3)"
        );
    }

    #[test]
    fn test_parameter_display() {
        let err = ConsistencyError::parameter("beta", "must lie in (0, 1)");
        assert!(err.to_string().contains("beta"));
        assert_eq!(
            ConsistencyError::NotSolved.to_string(),
            "Dense cluster has not been solved yet"
        );
    }
}
