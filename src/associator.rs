//! Stateful score → solve → select pipeline.
//!
//! [`RobustAssociator`] owns an invariant and a configuration, keeps the last
//! scored graph and the last solution, and maps solutions back to
//! associations.

use std::sync::Arc;

use log::debug;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use sprs::CsMat;

use crate::association::{select_inlier_associations, ConsistencyGraphBuilder};
use crate::errors::ConsistencyError;
use crate::graph::{
    AnyConsistencyGraph, ConsistencyGraph, DenseConsistencyGraph, GraphStorage,
    SparseConsistencyGraph,
};
use crate::invariants::{PairwiseInvariant, PairwiseInvariantPtr};
use crate::reporter::{NoOpReporter, SolveReporter};
use crate::solver::{DenseClusterSolver, Solution, SolverParams};
use crate::types::{Association, AssociationSet, Data};

/// Configuration of a full association run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociatorConfig {
    /// Dense cluster solver parameters
    pub solver: SolverParams,
    /// Storage layout for scored graphs
    pub storage: GraphStorage,
    /// Request parallel pair scoring
    pub parallelize: bool,
    /// Pair scores at or below this are incompatible
    pub affinity_eps: f64,
}

impl Default for AssociatorConfig {
    fn default() -> Self {
        Self {
            solver: SolverParams::default(),
            storage: GraphStorage::Dense,
            parallelize: true,
            affinity_eps: 0.0,
        }
    }
}

impl AssociatorConfig {
    /// Check the solver parameters and the affinity floor
    pub fn validate(&self) -> Result<(), ConsistencyError> {
        self.solver.validate()?;
        if !(self.affinity_eps >= 0.0 && self.affinity_eps < 1.0) {
            return Err(ConsistencyError::parameter(
                "affinity_eps",
                format!("must lie in [0, 1), got {}", self.affinity_eps),
            ));
        }
        Ok(())
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Serialize to pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Parse from JSON, then validate
    pub fn from_json(json: &str) -> Result<Self, ConsistencyError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConsistencyError::parameter("json", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Robust data association pipeline.
///
/// # Example
///
/// ```
/// use robust_association_rs::associator::{AssociatorConfig, RobustAssociator};
/// use robust_association_rs::invariants::{EuclideanDistance, EuclideanDistanceParams};
/// use robust_association_rs::types::{association_set, Data};
///
/// let d1 = Data::from_column_slice(2, 3, &[0.0, 0.0, 1.0, 0.0, 2.0, 0.0]);
/// let d2 = d1.clone();
/// let a = association_set(vec![(0, 0), (1, 1), (2, 2), (0, 2)]);
///
/// let inv = EuclideanDistance::new(EuclideanDistanceParams::new(0.5, 0.5, 0.0)).unwrap();
/// let mut associator = RobustAssociator::new(inv, AssociatorConfig::default());
///
/// associator.score_pairwise_consistency(&d1, &d2, &a).unwrap();
/// associator.solve().unwrap();
/// let inliers = associator.selected_associations().unwrap();
/// assert_eq!(inliers, association_set(vec![(0, 0), (1, 1), (2, 2)]));
/// ```
pub struct RobustAssociator {
    /// Pair scoring function
    invariant: PairwiseInvariantPtr,
    /// Run configuration
    config: AssociatorConfig,

    /// Associations indexing the current graph
    associations: AssociationSet,
    /// Last scored or injected graph
    graph: Option<AnyConsistencyGraph>,
    /// Last solution over `graph`
    solution: Option<Solution>,
}

impl RobustAssociator {
    /// Create an associator owning `invariant`
    pub fn new<I: PairwiseInvariant + 'static>(invariant: I, config: AssociatorConfig) -> Self {
        Self::with_shared_invariant(Arc::new(invariant), config)
    }

    /// Create an associator sharing an invariant with other owners
    pub fn with_shared_invariant(invariant: PairwiseInvariantPtr, config: AssociatorConfig) -> Self {
        Self {
            invariant,
            config,
            associations: Vec::new(),
            graph: None,
            solution: None,
        }
    }

    /// Score all association pairs and store the consistency graph.
    ///
    /// Replaces any previous graph and drops the previous solution.
    pub fn score_pairwise_consistency(
        &mut self,
        d1: &Data,
        d2: &Data,
        associations: &[Association],
    ) -> Result<&AnyConsistencyGraph, ConsistencyError> {
        self.score_pairwise_consistency_with_reporter(d1, d2, associations, &mut NoOpReporter)
    }

    /// Same as [`score_pairwise_consistency`](Self::score_pairwise_consistency),
    /// reporting the built graph.
    pub fn score_pairwise_consistency_with_reporter<R: SolveReporter + ?Sized>(
        &mut self,
        d1: &Data,
        d2: &Data,
        associations: &[Association],
        reporter: &mut R,
    ) -> Result<&AnyConsistencyGraph, ConsistencyError> {
        self.config.validate()?;
        let graph = ConsistencyGraphBuilder::new(self.invariant.as_ref())
            .parallelize(self.config.parallelize)
            .affinity_eps(self.config.affinity_eps)
            .build(d1, d2, associations, self.config.storage)?;

        reporter.on_graph_built(graph.num_nodes(), graph.num_edges());
        Ok(self.store_graph(graph, associations.to_vec()))
    }

    /// Use precomputed dense matrices as the consistency graph
    pub fn set_graph_dense(
        &mut self,
        m: &DMatrix<f64>,
        c: &DMatrix<f64>,
        associations: &[Association],
    ) -> Result<&AnyConsistencyGraph, ConsistencyError> {
        let graph = DenseConsistencyGraph::new(m, c)?;
        check_graph_size(graph.num_nodes(), associations)?;
        Ok(self.store_graph(graph.into(), associations.to_vec()))
    }

    /// Use precomputed sparse matrices as the consistency graph
    pub fn set_graph_sparse(
        &mut self,
        m: &CsMat<f64>,
        c: &CsMat<f64>,
        associations: &[Association],
    ) -> Result<&AnyConsistencyGraph, ConsistencyError> {
        let graph = SparseConsistencyGraph::new(m, c)?;
        check_graph_size(graph.num_nodes(), associations)?;
        Ok(self.store_graph(graph.into(), associations.to_vec()))
    }

    /// Solve for the dense cluster from uniform membership
    pub fn solve(&mut self) -> Result<&Solution, ConsistencyError> {
        self.solve_with_reporter(None, &mut NoOpReporter)
    }

    /// Solve for the dense cluster from `u0`
    pub fn solve_from(&mut self, u0: &DVector<f64>) -> Result<&Solution, ConsistencyError> {
        self.solve_with_reporter(Some(u0), &mut NoOpReporter)
    }

    /// Solve for the dense cluster, reporting solver progress
    pub fn solve_with_reporter<R: SolveReporter + ?Sized>(
        &mut self,
        u0: Option<&DVector<f64>>,
        reporter: &mut R,
    ) -> Result<&Solution, ConsistencyError> {
        let graph = self.graph.as_ref().ok_or(ConsistencyError::NotScored)?;
        let solution = DenseClusterSolver::new(self.config.solver)
            .solve_with_reporter(graph, u0, reporter)?;
        Ok(&*self.solution.insert(solution))
    }

    /// Associations selected by the last solution
    pub fn selected_associations(&self) -> Result<AssociationSet, ConsistencyError> {
        if self.graph.is_none() {
            return Err(ConsistencyError::NotScored);
        }
        let solution = self.solution.as_ref().ok_or(ConsistencyError::NotSolved)?;
        select_inlier_associations(solution, &self.associations)
    }

    /// Drop the stored graph, associations and solution
    pub fn reset(&mut self) {
        self.associations.clear();
        self.graph = None;
        self.solution = None;
    }

    /// Current consistency graph, if any
    pub fn graph(&self) -> Option<&AnyConsistencyGraph> {
        self.graph.as_ref()
    }

    /// Last solution, if any
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// Associations indexing the current graph
    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    /// Run configuration
    pub fn config(&self) -> &AssociatorConfig {
        &self.config
    }

    /// Mutable run configuration; takes effect on the next score or solve
    pub fn config_mut(&mut self) -> &mut AssociatorConfig {
        &mut self.config
    }

    /// Pair scoring function
    pub fn invariant(&self) -> &dyn PairwiseInvariant {
        self.invariant.as_ref()
    }

    fn store_graph(
        &mut self,
        graph: AnyConsistencyGraph,
        associations: AssociationSet,
    ) -> &AnyConsistencyGraph {
        debug!(
            "Stored {:?} consistency graph over {} associations",
            graph.storage(),
            associations.len()
        );
        self.associations = associations;
        self.solution = None;
        self.graph.insert(graph)
    }
}

fn check_graph_size(num_nodes: usize, associations: &[Association]) -> Result<(), ConsistencyError> {
    if num_nodes != associations.len() {
        return Err(ConsistencyError::dimension(
            num_nodes,
            associations.len(),
            "association set size",
        ));
    }
    Ok(())
}
