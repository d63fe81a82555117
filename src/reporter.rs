//! Observability for consistency scoring and dense cluster search.
//!
//! This module provides the [`SolveReporter`] trait for debugging and research
//! instrumentation. Reporters receive callbacks at key points of a run
//! without polluting the core algorithm logic.
//!
//! # Zero-Cost Abstraction
//!
//! The default [`NoOpReporter`] compiles to zero overhead - all callback
//! methods are empty and will be optimized away by the compiler.
//!
//! # Example
//!
//! ```
//! use robust_association_rs::graph::DenseConsistencyGraph;
//! use robust_association_rs::reporter::DebugReporter;
//! use robust_association_rs::solver::{DenseClusterSolver, SolverParams};
//! use nalgebra::DMatrix;
//!
//! let ones = DMatrix::from_element(3, 3, 1.0);
//! let graph = DenseConsistencyGraph::new(&ones, &ones).unwrap();
//!
//! let mut reporter = DebugReporter::new();
//! let solver = DenseClusterSolver::new(SolverParams::default());
//! let solution = solver.solve_with_reporter(&graph, None, &mut reporter).unwrap();
//!
//! assert_eq!(reporter.outer_iterations().len(), solution.ifinal);
//! ```

use log::{debug, info, trace};

use crate::solver::{Solution, SolverParams};

// ============================================================================
// Events
// ============================================================================

/// Summary of one outer (penalty) iteration of the solver
#[derive(Debug, Clone, PartialEq)]
pub struct OuterIterationEvent {
    /// Outer iteration index (0-based)
    pub iteration: usize,
    /// Gradient steps taken during this outer iteration
    pub inner_iterations: usize,
    /// Whether the inner loop stopped on `tol_u` / `tol_F` rather than its cap
    pub inner_converged: bool,
    /// Penalty weight `d` used during this iteration
    pub penalty: f64,
    /// Penalised objective at the end of the iteration
    pub objective: f64,
    /// `‖Mu‖` change over the iteration
    pub operator_change: f64,
    /// Nodes in the support of `u` with incompatible support mass
    pub active_constraints: usize,
}

// ============================================================================
// SolveReporter Trait
// ============================================================================

/// Observability trait for scoring and solving.
///
/// All methods have default empty implementations, so you only need
/// to override the events you care about.
///
/// # Thread Safety
///
/// Reporters use `&mut self` for callbacks, so they are NOT required
/// to be `Send + Sync`. Callbacks are always made from the calling thread.
///
/// # Example
///
/// ```
/// use robust_association_rs::reporter::{OuterIterationEvent, SolveReporter};
///
/// struct PenaltyTrace(Vec<f64>);
///
/// impl SolveReporter for PenaltyTrace {
///     fn on_outer_iteration(&mut self, event: &OuterIterationEvent) {
///         self.0.push(event.penalty);
///     }
/// }
/// ```
pub trait SolveReporter {
    /// Called after a consistency graph is scored.
    fn on_graph_built(&mut self, _num_nodes: usize, _num_edges: usize) {}

    /// Called once before the first outer iteration.
    fn on_solve_start(&mut self, _num_nodes: usize, _params: &SolverParams) {}

    /// Called at the end of every outer iteration.
    fn on_outer_iteration(&mut self, _event: &OuterIterationEvent) {}

    /// Called with the final solution.
    fn on_solution(&mut self, _solution: &Solution) {}
}

// ============================================================================
// Built-in Reporters
// ============================================================================

/// No-op reporter with zero overhead.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReporter;

impl SolveReporter for NoOpReporter {}

/// Reporter that forwards events to the `log` crate.
///
/// Graph and solution summaries go to `info`, per-iteration events to
/// `debug`, and solve parameters to `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingReporter;

impl SolveReporter for LoggingReporter {
    fn on_graph_built(&mut self, num_nodes: usize, num_edges: usize) {
        info!(
            "Consistency graph built: {} nodes, {} edges",
            num_nodes, num_edges
        );
    }

    fn on_solve_start(&mut self, num_nodes: usize, params: &SolverParams) {
        trace!("Solving dense cluster over {} nodes with {:?}", num_nodes, params);
    }

    fn on_outer_iteration(&mut self, event: &OuterIterationEvent) {
        debug!(
            "Outer iteration {}: d={:.4e}, F={:.6}, inner={} ({}), dMu={:.3e}, active={}",
            event.iteration,
            event.penalty,
            event.objective,
            event.inner_iterations,
            if event.inner_converged { "converged" } else { "capped" },
            event.operator_change,
            event.active_constraints
        );
    }

    fn on_solution(&mut self, solution: &Solution) {
        info!(
            "Dense cluster: {} nodes, score {:.4}, {} outer iterations, {:.3} ms",
            solution.nodes.len(),
            solution.score,
            solution.ifinal,
            solution.t * 1e3
        );
    }
}

/// Reporter that captures every event for later inspection.
#[derive(Debug, Clone, Default)]
pub struct DebugReporter {
    graphs: Vec<(usize, usize)>,
    starts: Vec<usize>,
    outer_iterations: Vec<OuterIterationEvent>,
    solutions: Vec<Solution>,
}

impl DebugReporter {
    /// Create an empty reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured `(num_nodes, num_edges)` per built graph
    pub fn graphs(&self) -> &[(usize, usize)] {
        &self.graphs
    }

    /// Node counts of every started solve
    pub fn starts(&self) -> &[usize] {
        &self.starts
    }

    /// Captured outer-iteration events
    pub fn outer_iterations(&self) -> &[OuterIterationEvent] {
        &self.outer_iterations
    }

    /// Captured solutions
    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    /// Drop all captured events
    pub fn clear(&mut self) {
        self.graphs.clear();
        self.starts.clear();
        self.outer_iterations.clear();
        self.solutions.clear();
    }
}

impl SolveReporter for DebugReporter {
    fn on_graph_built(&mut self, num_nodes: usize, num_edges: usize) {
        self.graphs.push((num_nodes, num_edges));
    }

    fn on_solve_start(&mut self, num_nodes: usize, _params: &SolverParams) {
        self.starts.push(num_nodes);
    }

    fn on_outer_iteration(&mut self, event: &OuterIterationEvent) {
        self.outer_iterations.push(event.clone());
    }

    fn on_solution(&mut self, solution: &Solution) {
        self.solutions.push(solution.clone());
    }
}
