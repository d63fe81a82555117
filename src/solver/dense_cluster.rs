//! Dense cluster search by projected gradient ascent with a growing penalty.
//!
//! The maximum (weighted) clique problem is relaxed to
//!
//! ```text
//! max  uᵀ(M ⊙ C)u − d · uᵀ(11ᵀ − C)u     s.t.  u ≥ 0, ‖u‖ = 1
//! ```
//!
//! where the second term penalises membership mass on incompatible pairs.
//! The inner loop climbs the penalised objective for a fixed `d` with
//! projected gradient steps and a backtracking line search. The outer loop
//! then raises `d` just enough to make the smallest active constraint bind,
//! until the support of `u` is a clique of the compatibility graph.
//!
//! The iterate is rounded to a clique before the first outer iteration and
//! after each one. The reported solution is the best of these cliques, so a
//! larger `maxoliters` never lowers `score`.
//!
//! All iterations run on the calling thread; they are sequential by data
//! dependency. The graph is only borrowed.

use std::time::Instant;

use log::{debug, trace};
use nalgebra::DVector;

use crate::common::linalg::{project_nonnegative_unit, uniform_unit};
use crate::errors::ConsistencyError;
use crate::graph::ConsistencyGraph;
use crate::reporter::{NoOpReporter, OuterIterationEvent, SolveReporter};

use super::params::SolverParams;
use super::rounding::round_membership;
use super::solution::Solution;

/// Membership vector together with the two products the objective needs
#[derive(Debug, Clone)]
struct Iterate {
    u: DVector<f64>,
    /// `(M ⊙ C) u`
    mu: DVector<f64>,
    /// `(11ᵀ − C) u`: incompatible mass seen by each node
    cbu: DVector<f64>,
}

impl Iterate {
    fn new<G: ConsistencyGraph + ?Sized>(graph: &G, u: DVector<f64>) -> Self {
        let mu = graph.affinity_product(&u);
        let total = u.sum();
        let cbu = graph.compatibility_product(&u).map(|cu| total - cu);
        Self { u, mu, cbu }
    }

    /// Ascent direction of the penalised objective
    fn gradient(&self, d: f64) -> DVector<f64> {
        &self.mu - &self.cbu * d
    }

    /// Unpenalised objective `uᵀ(M ⊙ C)u`
    fn affinity_objective(&self) -> f64 {
        self.u.dot(&self.mu)
    }

    /// Ratios `Mu[a] / Cbu[a]` over nodes in the support that still see
    /// incompatible mass
    fn active_ratios(&self, eps: f64) -> Vec<f64> {
        (0..self.u.len())
            .filter(|&a| self.cbu[a] > eps && self.u[a] > eps)
            .map(|a| self.mu[a] / self.cbu[a])
            .collect()
    }
}

/// Clique rounded from an iterate, with the membership restricted to it
#[derive(Debug, Clone)]
struct Candidate {
    nodes: Vec<usize>,
    u: DVector<f64>,
    score: f64,
}

impl Candidate {
    fn from_iterate<G: ConsistencyGraph + ?Sized>(graph: &G, it: &Iterate, eps: f64) -> Self {
        let nodes = round_membership(graph, &it.u, it.affinity_objective(), eps);
        if nodes.is_empty() {
            return Self {
                nodes,
                u: it.u.clone(),
                score: 0.0,
            };
        }

        // Every kept node has u[a] > eps, so the norm is positive
        let mut u = DVector::zeros(it.u.len());
        for &a in &nodes {
            u[a] = it.u[a];
        }
        u /= u.norm();
        let score = u.dot(&graph.affinity_product(&u));
        Self { nodes, u, score }
    }
}

/// Candidate accepted by the line search
struct Step {
    iterate: Iterate,
    gradient: DVector<f64>,
    objective: f64,
}

/// Dense cluster solver.
///
/// # Example
///
/// ```
/// use nalgebra::DMatrix;
/// use robust_association_rs::graph::DenseConsistencyGraph;
/// use robust_association_rs::solver::{DenseClusterSolver, SolverParams};
///
/// // Triangle {0, 1, 2} plus a node compatible only with itself
/// #[rustfmt::skip]
/// let c = DMatrix::from_row_slice(4, 4, &[
///     1.0, 1.0, 1.0, 0.0,
///     1.0, 1.0, 1.0, 0.0,
///     1.0, 1.0, 1.0, 0.0,
///     0.0, 0.0, 0.0, 1.0,
/// ]);
/// let graph = DenseConsistencyGraph::new(&c, &c).unwrap();
///
/// let solution = DenseClusterSolver::new(SolverParams::default())
///     .solve(&graph, None)
///     .unwrap();
/// assert_eq!(solution.nodes, vec![0, 1, 2]);
/// assert!((solution.score - 3.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DenseClusterSolver {
    params: SolverParams,
}

impl DenseClusterSolver {
    /// Create a solver with the given parameters
    pub fn new(params: SolverParams) -> Self {
        Self { params }
    }

    /// Get the solver parameters
    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Find the dense cluster of `graph`.
    ///
    /// `u0` is the initial membership vector; uniform if `None`.
    pub fn solve<G: ConsistencyGraph + ?Sized>(
        &self,
        graph: &G,
        u0: Option<&DVector<f64>>,
    ) -> Result<Solution, ConsistencyError> {
        self.solve_with_reporter(graph, u0, &mut NoOpReporter)
    }

    /// Find the dense cluster of `graph`, reporting progress to `reporter`.
    ///
    /// # Errors
    /// Invalid parameters or a `u0` whose length differs from the node count.
    /// Numerical trouble and iteration caps are never errors.
    pub fn solve_with_reporter<G, R>(
        &self,
        graph: &G,
        u0: Option<&DVector<f64>>,
        reporter: &mut R,
    ) -> Result<Solution, ConsistencyError>
    where
        G: ConsistencyGraph + ?Sized,
        R: SolveReporter + ?Sized,
    {
        let params = &self.params;
        params.validate()?;

        let n = graph.num_nodes();
        if let Some(u0) = u0 {
            if u0.len() != n {
                return Err(ConsistencyError::dimension(
                    n,
                    u0.len(),
                    "initial membership vector length",
                ));
            }
        }

        let start = Instant::now();
        reporter.on_solve_start(n, params);

        if n == 0 {
            let solution = Solution {
                t: start.elapsed().as_secs_f64(),
                ..Solution::default()
            };
            reporter.on_solution(&solution);
            return Ok(solution);
        }

        let mut it = Iterate::new(graph, initial_membership(u0, n, params.eps));
        let mut best = Candidate::from_iterate(graph, &it, params.eps);

        // Start with the mean ratio over active constraints, zero if none
        let ratios = it.active_ratios(params.eps);
        let mut d = if ratios.is_empty() {
            0.0
        } else {
            ratios.iter().sum::<f64>() / ratios.len() as f64
        };

        let mut objective = 0.0;
        let mut outer = 0;
        let mut converged = false;

        while outer < params.maxoliters {
            let mu_prev = it.mu.clone();
            let mut gradient = it.gradient(d);
            objective = it.u.dot(&gradient);

            let mut inner = 0;
            let mut inner_converged = false;
            while inner < params.maxiniters {
                inner += 1;
                let Some(step) = self.line_search(graph, &it, &gradient, objective, d) else {
                    // No admissible step: u is stationary for this penalty
                    inner_converged = true;
                    break;
                };

                let delta_u = (&step.iterate.u - &it.u).norm();
                let delta_f = step.objective - objective;

                it = step.iterate;
                gradient = step.gradient;
                objective = step.objective;

                if delta_u < params.tol_u || delta_f.abs() < params.tol_f {
                    inner_converged = true;
                    break;
                }
            }

            let ratios = it.active_ratios(params.eps);
            let operator_change = (&it.mu - &mu_prev).norm();
            reporter.on_outer_iteration(&OuterIterationEvent {
                iteration: outer,
                inner_iterations: inner,
                inner_converged,
                penalty: d,
                objective,
                operator_change,
                active_constraints: ratios.len(),
            });
            outer += 1;

            let candidate = Candidate::from_iterate(graph, &it, params.eps);
            if candidate.score > best.score {
                best = candidate;
            }

            if ratios.is_empty() {
                // Support of u is a clique
                converged = true;
                break;
            }
            if operator_change < params.tol_fop {
                trace!(
                    "Operator change {:.3e} below tol_Fop after {} outer iterations",
                    operator_change,
                    outer
                );
                converged = true;
                break;
            }

            // Smallest increase that makes one more constraint bind
            d += ratios.iter().map(|r| r.abs()).fold(f64::INFINITY, f64::min);
        }

        let Candidate { nodes, u, score } = best;

        debug!(
            "Dense cluster search: {} of {} nodes selected, score {:.4}, penalized F {:.4}, d {:.3e}, {} outer iterations{}",
            nodes.len(),
            n,
            score,
            objective,
            d,
            outer,
            if converged { "" } else { " (iteration cap)" }
        );

        let solution = Solution {
            t: start.elapsed().as_secs_f64(),
            ifinal: outer,
            nodes,
            u,
            score,
            converged,
        };
        reporter.on_solution(&solution);
        Ok(solution)
    }

    /// Backtracking line search along `gradient`.
    ///
    /// Accepts the first trial whose objective does not drop by more than
    /// `eps`. Trials whose projection degenerates to the zero vector count as
    /// rejected. Returns `None` if all `maxlsiters` trials are rejected.
    fn line_search<G: ConsistencyGraph + ?Sized>(
        &self,
        graph: &G,
        it: &Iterate,
        gradient: &DVector<f64>,
        objective: f64,
        d: f64,
    ) -> Option<Step> {
        let params = &self.params;
        let mut alpha = 1.0;

        for _ in 0..params.maxlsiters {
            let mut u = &it.u + gradient * alpha;
            if project_nonnegative_unit(&mut u, params.eps) {
                let iterate = Iterate::new(graph, u);
                let gradient = iterate.gradient(d);
                let candidate = iterate.u.dot(&gradient);

                if candidate - objective >= -params.eps {
                    return Some(Step {
                        iterate,
                        gradient,
                        objective: candidate,
                    });
                }
            }
            alpha *= params.beta;
        }
        None
    }
}

/// Project `u0` onto the feasible set, falling back to uniform membership
fn initial_membership(u0: Option<&DVector<f64>>, n: usize, eps: f64) -> DVector<f64> {
    match u0 {
        Some(u0) => {
            let mut u = u0.clone();
            if project_nonnegative_unit(&mut u, eps) {
                u
            } else {
                debug!("Initial membership vector has no positive mass; using uniform start");
                uniform_unit(n)
            }
        }
        None => uniform_unit(n),
    }
}
