use super::{
    Engine, EngineOutcome, add_constraints, create_objective_function, declare_variables,
    interpret,
};
use crate::error::EngineError;
use crate::model::GapModel;
use crate::policy::SolverPolicy;
use good_lp::solvers::microlp::microlp;
use good_lp::{Solution, SolverModel};
use log::warn;

/// Pure-Rust branch-and-bound through good_lp's microlp backend.
///
/// microlp has no presolve, cut or heuristic switches and no time limit,
/// so the policy is only checked and reported.
#[derive(Debug, Default)]
pub struct MicrolpEngine;

impl MicrolpEngine {
    pub fn new() -> Self {
        MicrolpEngine
    }
}

impl Engine for MicrolpEngine {
    fn solve(
        &self,
        model: &GapModel,
        policy: &SolverPolicy,
    ) -> Result<EngineOutcome, EngineError> {
        if policy.time_limit.is_some() {
            warn!("microlp: time limit is not supported and will be ignored");
        }
        if policy.presolve || policy.cuts || policy.heuristics {
            warn!("microlp: presolve/cuts/heuristics cannot be toggled, running plain branch-and-bound");
        }

        let (problem_vars, vars) = declare_variables(model);
        let objective = create_objective_function(model, &vars);
        let problem = problem_vars.maximise(objective.clone()).using(microlp);
        let problem = add_constraints(problem, model, &vars);

        interpret(self.name(), model, &vars, problem.solve(), |solution| {
            solution.eval(&objective)
        })
    }

    fn name(&self) -> &str {
        "microlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineStatus;
    use crate::instance::Instance;

    #[test]
    fn agrees_with_hand_computed_optimum() {
        let instance = Instance::new(
            2,
            2,
            vec![vec![1, 2], vec![3, 4]],
            vec![vec![1, 1], vec![1, 1]],
            vec![1, 1],
        )
        .unwrap();
        let model = GapModel::build(&instance).unwrap();
        let outcome = MicrolpEngine::new()
            .solve(&model, &SolverPolicy::baseline())
            .unwrap();
        assert_eq!(outcome.status, EngineStatus::ProvenOptimal);
        assert!((model.objective_value(&outcome.values) - 5.0).abs() < 1e-6);
        assert!((outcome.objective.unwrap() - 5.0).abs() < 1e-6);
    }
}
