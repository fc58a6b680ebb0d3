//! The optimization engine boundary.
//!
//! An engine receives a built [`GapModel`] and a [`SolverPolicy`] and reports
//! a status together with one value per model variable and the objective it
//! computed itself. Everything above this trait is engine-agnostic.

pub mod cbc;
#[cfg(feature = "microlp")]
pub mod microlp;

use crate::error::{EngineError, GapError};
use crate::model::{GapModel, Sense};
use crate::policy::SolverPolicy;
use good_lp::{
    Constraint, Expression, ProblemVariables, ResolutionError, Solution, SolutionStatus,
    SolverModel, Variable, variable, variables,
};
use std::str::FromStr;

pub use cbc::CbcEngine;
#[cfg(feature = "microlp")]
pub use microlp::MicrolpEngine;

/// Tolerance used to decide whether engine values form an integral assignment.
pub const INTEGRALITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    ProvenOptimal,
    ProvenInfeasible,
    TimeLimitWithIncumbent,
    TimeLimitNoIncumbent,
}

/// What an engine hands back: a status and, when an assignment exists,
/// one value per model variable in index order plus the objective value the
/// engine reports for that point.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutcome {
    pub status: EngineStatus,
    pub values: Vec<f64>,
    pub objective: Option<f64>,
}

impl EngineOutcome {
    pub fn without_assignment(status: EngineStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective: None,
        }
    }
}

/// Common interface for MILP engines
pub trait Engine: Send + Sync {
    /// Solve `model` under `policy`. Infeasibility and time-limit stops are
    /// outcomes; `Err` means the engine itself could not produce a verdict.
    fn solve(&self, model: &GapModel, policy: &SolverPolicy)
    -> Result<EngineOutcome, EngineError>;

    /// Engine name for logging and reports
    fn name(&self) -> &str;
}

/// Available engine backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Cbc,
    #[cfg(feature = "microlp")]
    Microlp,
}

impl FromStr for EngineKind {
    type Err = GapError;

    /// Case-insensitive engine name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cbc" => Ok(EngineKind::Cbc),
            #[cfg(feature = "microlp")]
            "microlp" => Ok(EngineKind::Microlp),
            other => Err(GapError::Config(format!("unknown engine `{other}`"))),
        }
    }
}

pub fn create_engine(kind: EngineKind) -> Box<dyn Engine> {
    match kind {
        EngineKind::Cbc => Box::new(CbcEngine::new()),
        #[cfg(feature = "microlp")]
        EngineKind::Microlp => Box::new(MicrolpEngine::new()),
    }
}

/// Declare one binary good_lp variable per model variable, in index order.
pub(crate) fn declare_variables(model: &GapModel) -> (ProblemVariables, Vec<Variable>) {
    let mut problem_vars = variables!();
    let vars = (0..model.variable_count())
        .map(|_| problem_vars.add(variable().binary()))
        .collect();
    (problem_vars, vars)
}

pub(crate) fn create_objective_function(model: &GapModel, vars: &[Variable]) -> Expression {
    let mut objective = Expression::with_capacity(model.variable_count());
    for term in model.objective() {
        objective.add_mul(term.coefficient as f64, vars[term.var]);
    }
    objective
}

/// Add the assignment and capacity rows of `model` to `problem`.
pub(crate) fn add_constraints<M: SolverModel>(problem: M, model: &GapModel, vars: &[Variable]) -> M {
    model
        .constraints()
        .fold(problem, |p, row| p.with(to_constraint(row, vars)))
}

fn to_constraint(row: &crate::model::LinearConstraint, vars: &[Variable]) -> Constraint {
    let mut lhs = Expression::with_capacity(row.terms.len());
    for term in &row.terms {
        lhs.add_mul(term.coefficient as f64, vars[term.var]);
    }
    let rhs = row.rhs as f64;
    match row.sense {
        Sense::Equal => lhs.eq(rhs),
        Sense::LessOrEqual => lhs.leq(rhs),
    }
}

pub(crate) fn read_values(solution: &impl Solution, vars: &[Variable]) -> Vec<f64> {
    vars.iter().map(|&v| solution.value(v)).collect()
}

/// Classify a stop on the time limit by whether the returned point is usable.
pub(crate) fn classify_time_limit(model: &GapModel, values: Vec<f64>, objective: f64) -> EngineOutcome {
    if model.is_integral_feasible(&values, INTEGRALITY_TOLERANCE) {
        EngineOutcome {
            status: EngineStatus::TimeLimitWithIncumbent,
            values,
            objective: Some(objective),
        }
    } else {
        EngineOutcome::without_assignment(EngineStatus::TimeLimitNoIncumbent)
    }
}

/// Map a good_lp resolution onto an outcome.
///
/// `objective` reads the engine's own objective value off the solution.
/// Only `Optimal` and `TimeLimit` are verdicts; any other stop, and any
/// error besides infeasibility, is an [`EngineError`].
pub(crate) fn interpret<S: Solution>(
    engine: &str,
    model: &GapModel,
    vars: &[Variable],
    result: Result<S, ResolutionError>,
    objective: impl FnOnce(&S) -> f64,
) -> Result<EngineOutcome, EngineError> {
    let solution = match result {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) => {
            return Ok(EngineOutcome::without_assignment(
                EngineStatus::ProvenInfeasible,
            ));
        }
        Err(err) => {
            return Err(EngineError {
                engine: engine.to_string(),
                message: err.to_string(),
            });
        }
    };

    let values = read_values(&solution, vars);
    let objective = objective(&solution);
    match solution.status() {
        SolutionStatus::Optimal => Ok(EngineOutcome {
            status: EngineStatus::ProvenOptimal,
            values,
            objective: Some(objective),
        }),
        SolutionStatus::TimeLimit => Ok(classify_time_limit(model, values, objective)),
        other => Err(EngineError {
            engine: engine.to_string(),
            message: format!("stopped without a verdict ({other:?})"),
        }),
    }
}
