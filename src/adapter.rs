use crate::engine::{Engine, EngineStatus};
use crate::error::EngineError;
use crate::model::GapModel;
use crate::policy::SolverPolicy;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Terminal status of one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    TimedOutWithIncumbent,
    TimedOutNoIncumbent,
}

impl SolveStatus {
    /// Whether this status carries a feasible assignment.
    pub fn has_assignment(self) -> bool {
        matches!(
            self,
            SolveStatus::Optimal | SolveStatus::TimedOutWithIncumbent
        )
    }
}

impl From<EngineStatus> for SolveStatus {
    fn from(status: EngineStatus) -> Self {
        match status {
            EngineStatus::ProvenOptimal => SolveStatus::Optimal,
            EngineStatus::ProvenInfeasible => SolveStatus::Infeasible,
            EngineStatus::TimeLimitWithIncumbent => SolveStatus::TimedOutWithIncumbent,
            EngineStatus::TimeLimitNoIncumbent => SolveStatus::TimedOutNoIncumbent,
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::TimedOutWithIncumbent => "TimedOutWithIncumbent",
            SolveStatus::TimedOutNoIncumbent => "TimedOutNoIncumbent",
        };
        f.write_str(s)
    }
}

/// Engine result before analysis: status, raw variable values and the
/// objective value the engine reported.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSolution {
    pub status: SolveStatus,
    pub values: Vec<f64>,
    pub objective_value: Option<f64>,
    pub elapsed: Duration,
}

/// Runs one model through an [`Engine`] and times it.
pub struct SolverAdapter<'e> {
    engine: &'e dyn Engine,
}

impl<'e> SolverAdapter<'e> {
    pub fn new(engine: &'e dyn Engine) -> Self {
        Self { engine }
    }

    /// Blocks until the engine finishes, hits the policy's time limit, or fails.
    pub fn solve(&self, model: &GapModel, policy: SolverPolicy) -> Result<RawSolution, EngineError> {
        let start = Instant::now();
        let outcome = self.engine.solve(model, &policy);
        let elapsed = start.elapsed();

        let outcome = outcome.inspect_err(|err| {
            error!("{} failed after {:.3}s: {err}", self.engine.name(), elapsed.as_secs_f64());
        })?;

        let status = SolveStatus::from(outcome.status);
        let objective_value = outcome.objective.filter(|_| status.has_assignment());

        debug!(
            "{} returned {status} in {:.3}s",
            self.engine.name(),
            elapsed.as_secs_f64()
        );

        Ok(RawSolution {
            status,
            values: outcome.values,
            objective_value,
            elapsed,
        })
    }
}
