//! Solver-agnostic integer program for the GAP.
//!
//! One binary variable `x[agent][task]` per pair, laid out row-major
//! (`index = agent * task_count + task`). The objective maximises total
//! satisfaction; every task is covered exactly once and every agent stays
//! within its capacity. Engines translate this into their own representation.

use crate::error::ShapeError;
use crate::instance::Instance;
use crate::validate::validate;

/// The (agent, task) pair a decision variable stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId {
    pub agent: usize,
    pub task: usize,
}

/// `coefficient * x[var]`, where `var` is a model variable index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub var: usize,
    pub coefficient: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Equal,
    LessOrEqual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    pub name: String,
    pub terms: Vec<Term>,
    pub sense: Sense,
    pub rhs: i64,
}

impl LinearConstraint {
    /// Left-hand side evaluated at `values`.
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|t| t.coefficient as f64 * values[t.var])
            .sum()
    }

    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.lhs(values);
        let rhs = self.rhs as f64;
        match self.sense {
            Sense::Equal => (lhs - rhs).abs() <= tolerance,
            Sense::LessOrEqual => lhs <= rhs + tolerance,
        }
    }
}

/// Immutable once built; engines and the analyzer only read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapModel {
    agent_count: usize,
    task_count: usize,
    objective: Vec<Term>,
    assignment: Vec<LinearConstraint>,
    capacity: Vec<LinearConstraint>,
}

impl GapModel {
    /// Validate `instance` and formulate it. No model exists for an invalid instance.
    pub fn build(instance: &Instance) -> Result<Self, ShapeError> {
        validate(instance)?;

        let agent_count = instance.agent_count;
        let task_count = instance.task_count;
        let index = |agent: usize, task: usize| agent * task_count + task;

        let objective = create_objective(instance, index);
        let assignment = constrain_tasks_assigned_exactly_once(instance, index);
        let capacity = constrain_agent_capacities(instance, index);

        Ok(Self {
            agent_count,
            task_count,
            objective,
            assignment,
            capacity,
        })
    }

    pub fn agent_count(&self) -> usize {
        self.agent_count
    }

    pub fn task_count(&self) -> usize {
        self.task_count
    }

    pub fn variable_count(&self) -> usize {
        self.agent_count * self.task_count
    }

    pub fn index(&self, agent: usize, task: usize) -> usize {
        agent * self.task_count + task
    }

    pub fn variable(&self, index: usize) -> VarId {
        VarId {
            agent: index / self.task_count,
            task: index % self.task_count,
        }
    }

    pub fn variables(&self) -> impl Iterator<Item = VarId> + '_ {
        (0..self.variable_count()).map(|index| self.variable(index))
    }

    /// Objective terms, one per variable in index order. Maximised.
    pub fn objective(&self) -> &[Term] {
        &self.objective
    }

    /// One `Σ_agent x[agent][task] = 1` row per task.
    pub fn assignment_constraints(&self) -> &[LinearConstraint] {
        &self.assignment
    }

    /// One `Σ_task cost * x[agent][task] <= capacity` row per agent.
    pub fn capacity_constraints(&self) -> &[LinearConstraint] {
        &self.capacity
    }

    pub fn constraints(&self) -> impl Iterator<Item = &LinearConstraint> {
        self.assignment.iter().chain(&self.capacity)
    }

    pub fn satisfaction(&self, agent: usize, task: usize) -> i64 {
        self.objective[self.index(agent, task)].coefficient
    }

    pub fn cost(&self, agent: usize, task: usize) -> i64 {
        self.capacity[agent].terms[task].coefficient
    }

    pub fn capacity(&self, agent: usize) -> i64 {
        self.capacity[agent].rhs
    }

    /// Objective evaluated at `values`.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .map(|t| t.coefficient as f64 * values[t.var])
            .sum()
    }

    /// Whether `values` is an integral point satisfying every constraint.
    pub fn is_integral_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        values.len() == self.variable_count()
            && values
                .iter()
                .all(|v| (v - v.round()).abs() <= tolerance && (-tolerance..=1.0 + tolerance).contains(v))
            && self.constraints().all(|c| c.is_satisfied(values, tolerance))
    }
}

fn create_objective(instance: &Instance, index: impl Fn(usize, usize) -> usize) -> Vec<Term> {
    instance
        .satisfaction
        .iter()
        .enumerate()
        .flat_map(|(agent, row)| {
            row.iter().enumerate().map(move |(task, &satisfaction)| (agent, task, satisfaction))
        })
        .map(|(agent, task, coefficient)| Term {
            var: index(agent, task),
            coefficient,
        })
        .collect()
}

fn constrain_tasks_assigned_exactly_once(
    instance: &Instance,
    index: impl Fn(usize, usize) -> usize,
) -> Vec<LinearConstraint> {
    (0..instance.task_count)
        .map(|task| LinearConstraint {
            name: format!("task_{task}"),
            terms: (0..instance.agent_count)
                .map(|agent| Term {
                    var: index(agent, task),
                    coefficient: 1,
                })
                .collect(),
            sense: Sense::Equal,
            rhs: 1,
        })
        .collect()
}

fn constrain_agent_capacities(
    instance: &Instance,
    index: impl Fn(usize, usize) -> usize,
) -> Vec<LinearConstraint> {
    instance
        .cost
        .iter()
        .zip(&instance.capacity)
        .enumerate()
        .map(|(agent, (costs, &capacity))| LinearConstraint {
            name: format!("agent_{agent}"),
            terms: costs
                .iter()
                .enumerate()
                .map(|(task, &coefficient)| Term {
                    var: index(agent, task),
                    coefficient,
                })
                .collect(),
            sense: Sense::LessOrEqual,
            rhs: capacity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> Instance {
        Instance {
            agent_count: 2,
            task_count: 3,
            satisfaction: vec![vec![5, 6, 7], vec![1, 2, 3]],
            cost: vec![vec![4, 4, 4], vec![1, 2, 1]],
            capacity: vec![8, 9],
        }
    }

    #[test]
    fn counts_match_dimensions() {
        let model = GapModel::build(&instance()).unwrap();
        assert_eq!(model.variable_count(), 6);
        assert_eq!(model.objective().len(), 6);
        assert_eq!(model.assignment_constraints().len(), 3);
        assert_eq!(model.capacity_constraints().len(), 2);
        assert_eq!(model.constraints().count(), 5);
    }

    #[test]
    fn coefficients_come_from_the_instance() {
        let i = instance();
        let model = GapModel::build(&i).unwrap();
        for VarId { agent, task } in model.variables() {
            assert_eq!(model.satisfaction(agent, task), i.satisfaction[agent][task]);
            assert_eq!(model.cost(agent, task), i.cost[agent][task]);
        }
        assert_eq!(model.capacity(0), 8);
        assert_eq!(model.capacity(1), 9);
    }

    #[test]
    fn index_layout_is_row_major() {
        let model = GapModel::build(&instance()).unwrap();
        assert_eq!(model.index(1, 2), 5);
        assert_eq!(model.variable(4), VarId { agent: 1, task: 1 });
        let indices: Vec<usize> = model.variables().map(|v| model.index(v.agent, v.task)).collect();
        assert_eq!(indices, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn assignment_rows_are_equalities_over_every_agent() {
        let model = GapModel::build(&instance()).unwrap();
        let row = &model.assignment_constraints()[1];
        assert_eq!(row.sense, Sense::Equal);
        assert_eq!(row.rhs, 1);
        let vars: Vec<usize> = row.terms.iter().map(|t| t.var).collect();
        assert_eq!(vars, vec![1, 4]);
        assert!(row.terms.iter().all(|t| t.coefficient == 1));
    }

    #[test]
    fn capacity_rows_are_bounded_by_agent_capacity() {
        let model = GapModel::build(&instance()).unwrap();
        let row = &model.capacity_constraints()[1];
        assert_eq!(row.sense, Sense::LessOrEqual);
        assert_eq!(row.rhs, 9);
        let coefficients: Vec<i64> = row.terms.iter().map(|t| t.coefficient).collect();
        assert_eq!(coefficients, vec![1, 2, 1]);
    }

    #[test]
    fn invalid_instance_builds_nothing() {
        let mut i = instance();
        i.capacity.pop();
        assert!(matches!(
            GapModel::build(&i),
            Err(ShapeError::CapacityLength { .. })
        ));
    }

    #[test]
    fn integral_feasibility_check() {
        let model = GapModel::build(&instance()).unwrap();
        // agent 0 takes tasks 0 and 2 (cost 8), agent 1 takes task 1 (cost 2)
        let feasible = [1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        assert!(model.is_integral_feasible(&feasible, 1e-6));
        assert_eq!(model.objective_value(&feasible), 14.0);

        // agent 0 takes everything: cost 12 > 8
        let over_capacity = [1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
        assert!(!model.is_integral_feasible(&over_capacity, 1e-6));

        let fractional = [0.5, 0.0, 1.0, 0.5, 1.0, 0.0];
        assert!(!model.is_integral_feasible(&fractional, 1e-6));
    }
}
