//! Numerical defaults for the dense cluster solver
//!
//! These are the defaults of [`SolverParams`](crate::solver::SolverParams).
//! They are kept separate so benchmarks and tests can refer to them by name.

/// Convergence tolerance on the change of the membership vector `u`
pub const DEFAULT_TOL_U: f64 = 1e-8;

/// Convergence tolerance on the change of the penalised objective
pub const DEFAULT_TOL_F: f64 = 1e-9;

/// Convergence tolerance on the change of the operator value `Mu` between
/// outer iterations
pub const DEFAULT_TOL_FOP: f64 = 1e-10;

/// Maximum gradient-ascent iterations per outer iteration
pub const DEFAULT_MAX_INNER_ITERATIONS: usize = 200;

/// Maximum penalty (homotopy) iterations
pub const DEFAULT_MAX_OUTER_ITERATIONS: usize = 1000;

/// Backtracking factor applied to the step size during line search
pub const DEFAULT_BETA: f64 = 0.25;

/// Maximum line-search trials per gradient step
pub const DEFAULT_MAX_LINE_SEARCH_ITERATIONS: usize = 99;

/// Numerical floor for divisions, norms and objective decrease
pub const DEFAULT_EPS: f64 = 1e-9;
