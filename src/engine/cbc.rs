use super::{
    Engine, EngineOutcome, add_constraints, create_objective_function, declare_variables,
    interpret,
};
use crate::error::EngineError;
use crate::model::GapModel;
use crate::policy::SolverPolicy;
use good_lp::solvers::coin_cbc::{CoinCbcProblem, coin_cbc};
use good_lp::SolverModel;
use log::debug;

/// COIN-OR CBC branch-and-cut, linked through good_lp.
#[derive(Debug, Default)]
pub struct CbcEngine;

impl CbcEngine {
    pub fn new() -> Self {
        CbcEngine
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

/// Translate the policy into CBC command-line parameters.
fn apply_policy(problem: &mut CoinCbcProblem, policy: &SolverPolicy) {
    problem.set_parameter("log", "0");
    problem.set_parameter("presolve", on_off(policy.presolve));
    problem.set_parameter("cuts", on_off(policy.cuts));
    problem.set_parameter("heuristicsOnOff", on_off(policy.heuristics));
    if let Some(limit) = policy.time_limit {
        problem.set_parameter("timeMode", "elapsed");
        problem.set_parameter("seconds", &limit.as_secs_f64().to_string());
    }
}

impl Engine for CbcEngine {
    fn solve(
        &self,
        model: &GapModel,
        policy: &SolverPolicy,
    ) -> Result<EngineOutcome, EngineError> {
        let (problem_vars, vars) = declare_variables(model);
        let objective = create_objective_function(model, &vars);
        let mut problem = problem_vars.maximise(objective).using(coin_cbc);
        apply_policy(&mut problem, policy);
        let problem = add_constraints(problem, model, &vars);

        debug!(
            "CBC: {} variables, {} constraints, policy {:?}",
            model.variable_count(),
            model.constraints().count(),
            policy
        );

        interpret(self.name(), model, &vars, problem.solve(), |solution| {
            solution.model().obj_value()
        })
    }

    fn name(&self) -> &str {
        "CBC"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineStatus;
    use crate::instance::Instance;

    fn solve(instance: &Instance, policy: SolverPolicy) -> EngineOutcome {
        let model = GapModel::build(instance).unwrap();
        CbcEngine::new().solve(&model, &policy).unwrap()
    }

    #[test]
    fn finds_the_optimum_of_a_small_instance() {
        let instance = Instance::new(
            2,
            3,
            vec![vec![5, 6, 7], vec![1, 2, 3]],
            vec![vec![4, 4, 4], vec![1, 2, 1]],
            vec![8, 9],
        )
        .unwrap();
        let outcome = solve(&instance, SolverPolicy::default());
        assert_eq!(outcome.status, EngineStatus::ProvenOptimal);
        let model = GapModel::build(&instance).unwrap();
        // agent 0 can afford two tasks: the best two are 6 and 7, agent 1 takes task 0
        assert!((model.objective_value(&outcome.values) - 14.0).abs() < 1e-6);
        assert!((outcome.objective.unwrap() - 14.0).abs() < 1e-6);
    }

    #[test]
    fn reports_infeasibility_as_an_outcome() {
        let instance = Instance::new(
            2,
            1,
            vec![vec![1], vec![1]],
            vec![vec![5], vec![5]],
            vec![1, 1],
        )
        .unwrap();
        let outcome = solve(&instance, SolverPolicy::baseline());
        assert_eq!(outcome.status, EngineStatus::ProvenInfeasible);
        assert!(outcome.values.is_empty());
    }
}
