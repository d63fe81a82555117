//! Solver configuration

use serde::{Deserialize, Serialize};

use crate::common::constants::{
    DEFAULT_BETA, DEFAULT_EPS, DEFAULT_MAX_INNER_ITERATIONS, DEFAULT_MAX_LINE_SEARCH_ITERATIONS,
    DEFAULT_MAX_OUTER_ITERATIONS, DEFAULT_TOL_F, DEFAULT_TOL_FOP, DEFAULT_TOL_U,
};
use crate::errors::ConsistencyError;

/// Parameters of the dense cluster solver.
///
/// Read-only during a solve. Missing fields fall back to their defaults when
/// deserializing, so partial JSON configs are accepted.
///
/// # Example
///
/// ```
/// use robust_association_rs::solver::SolverParams;
///
/// let params = SolverParams::default().with_max_outer_iterations(50);
/// let json = params.to_json();
/// assert_eq!(SolverParams::from_json(&json).unwrap(), params);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParams {
    /// Inner loop stops when `‖u_new - u‖` falls below this
    pub tol_u: f64,
    /// Inner loop stops when `|F_new - F|` falls below this
    #[serde(rename = "tol_F")]
    pub tol_f: f64,
    /// Outer loop stops when `‖Mu_new - Mu‖` between outer iterations falls below this
    #[serde(rename = "tol_Fop")]
    pub tol_fop: f64,
    /// Maximum gradient steps per outer iteration
    pub maxiniters: usize,
    /// Maximum outer (penalty) iterations
    pub maxoliters: usize,
    /// Step-size backtracking factor, in `(0, 1)`
    pub beta: f64,
    /// Maximum backtracking trials per gradient step
    pub maxlsiters: usize,
    /// Numerical floor for divisions, norms and accepted objective decrease
    pub eps: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            tol_u: DEFAULT_TOL_U,
            tol_f: DEFAULT_TOL_F,
            tol_fop: DEFAULT_TOL_FOP,
            maxiniters: DEFAULT_MAX_INNER_ITERATIONS,
            maxoliters: DEFAULT_MAX_OUTER_ITERATIONS,
            beta: DEFAULT_BETA,
            maxlsiters: DEFAULT_MAX_LINE_SEARCH_ITERATIONS,
            eps: DEFAULT_EPS,
        }
    }
}

impl SolverParams {
    /// Set the membership-vector tolerance
    pub fn with_tol_u(mut self, tol_u: f64) -> Self {
        self.tol_u = tol_u;
        self
    }

    /// Set the objective tolerance
    pub fn with_tol_f(mut self, tol_f: f64) -> Self {
        self.tol_f = tol_f;
        self
    }

    /// Set the operator tolerance
    pub fn with_tol_fop(mut self, tol_fop: f64) -> Self {
        self.tol_fop = tol_fop;
        self
    }

    /// Set the inner iteration cap
    pub fn with_max_inner_iterations(mut self, maxiniters: usize) -> Self {
        self.maxiniters = maxiniters;
        self
    }

    /// Set the outer iteration cap
    pub fn with_max_outer_iterations(mut self, maxoliters: usize) -> Self {
        self.maxoliters = maxoliters;
        self
    }

    /// Set the backtracking factor
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Set the line-search cap
    pub fn with_max_line_search_iterations(mut self, maxlsiters: usize) -> Self {
        self.maxlsiters = maxlsiters;
        self
    }

    /// Set the numerical floor
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Check that all parameters are usable
    pub fn validate(&self) -> Result<(), ConsistencyError> {
        let tolerances = [
            ("tol_u", self.tol_u),
            ("tol_F", self.tol_f),
            ("tol_Fop", self.tol_fop),
            ("eps", self.eps),
        ];
        for (name, value) in tolerances {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ConsistencyError::parameter(
                    name,
                    format!("must be finite and non-negative, got {}", value),
                ));
            }
        }
        if !(self.beta > 0.0 && self.beta < 1.0) {
            return Err(ConsistencyError::parameter(
                "beta",
                format!("must lie in (0, 1), got {}", self.beta),
            ));
        }
        if self.maxlsiters == 0 {
            return Err(ConsistencyError::parameter(
                "maxlsiters",
                "at least one line-search trial is required",
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
        let params: Self = serde_json::from_str(json)
            .map_err(|e| ConsistencyError::parameter("json", e.to_string()))?;
        params.validate()?;
        Ok(params)
    }
}
