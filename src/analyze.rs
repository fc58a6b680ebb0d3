//! Re-derive and cross-check a solved assignment.
//!
//! The engine's variable values are turned into a task → agent map and a
//! per-agent breakdown, then checked against the model: each task covered
//! exactly once, each agent within capacity, and the recomputed objective
//! equal to the reported one. Any mismatch is a defect, never a result.

use crate::adapter::{RawSolution, SolveStatus};
use crate::error::ConsistencyError;
use crate::model::GapModel;
use log::debug;
use std::time::Duration;

/// Relative tolerance on the objective; values are integral up to round-off.
pub const OBJECTIVE_TOLERANCE: f64 = 1e-6;

/// A variable counts as selected above this value.
const SELECTION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSummary {
    pub agent: usize,
    pub capacity: i64,
    /// Assigned tasks in ascending order.
    pub tasks: Vec<usize>,
    pub satisfaction_sum: i64,
    pub consumed_capacity: i64,
}

impl AgentSummary {
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

/// A validated solve result.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub status: SolveStatus,
    /// `None` for statuses without an assignment.
    pub objective_value: Option<f64>,
    /// `assignment[task]` is the executing agent; empty without an assignment.
    pub assignment: Vec<usize>,
    /// One entry per agent; empty without an assignment.
    pub agents: Vec<AgentSummary>,
    pub elapsed: Duration,
}

pub fn analyze(model: &GapModel, raw: RawSolution) -> Result<Solution, ConsistencyError> {
    if !raw.status.has_assignment() {
        return Ok(Solution {
            status: raw.status,
            objective_value: None,
            assignment: Vec::new(),
            agents: Vec::new(),
            elapsed: raw.elapsed,
        });
    }

    if raw.values.len() != model.variable_count() {
        return Err(ConsistencyError::VariableCountMismatch {
            expected: model.variable_count(),
            found: raw.values.len(),
        });
    }

    let assignment = extract_assignment(model, &raw.values)?;
    let agents = summarize_agents(model, &assignment);

    if let Some(over) = agents.iter().find(|a| a.consumed_capacity > a.capacity) {
        return Err(ConsistencyError::CapacityExceeded {
            agent: over.agent,
            consumed: over.consumed_capacity,
            capacity: over.capacity,
        });
    }

    let recomputed = agents.iter().map(|a| a.satisfaction_sum).sum::<i64>() as f64;
    let reported = raw
        .objective_value
        .ok_or(ConsistencyError::ObjectiveMissing)?;
    if (reported - recomputed).abs() > OBJECTIVE_TOLERANCE * reported.abs().max(1.0) {
        return Err(ConsistencyError::ObjectiveMismatch {
            reported,
            recomputed,
        });
    }

    for (task, agent) in assignment.iter().enumerate() {
        debug!("agent {agent} executes task {task}");
    }

    Ok(Solution {
        status: raw.status,
        objective_value: Some(recomputed),
        assignment,
        agents,
        elapsed: raw.elapsed,
    })
}

/// `assignment[task] = agent`, requiring exactly one selected agent per task.
fn extract_assignment(model: &GapModel, values: &[f64]) -> Result<Vec<usize>, ConsistencyError> {
    (0..model.task_count())
        .map(|task| {
            let mut selected = (0..model.agent_count())
                .filter(|&agent| values[model.index(agent, task)] > SELECTION_THRESHOLD);
            match (selected.next(), selected.next()) {
                (Some(agent), None) => Ok(agent),
                (None, _) => Err(ConsistencyError::TaskUnassigned { task }),
                (Some(first), Some(second)) => Err(ConsistencyError::TaskAssignedTwice {
                    task,
                    first,
                    second,
                }),
            }
        })
        .collect()
}

fn summarize_agents(model: &GapModel, assignment: &[usize]) -> Vec<AgentSummary> {
    let mut agents: Vec<AgentSummary> = (0..model.agent_count())
        .map(|agent| AgentSummary {
            agent,
            capacity: model.capacity(agent),
            tasks: Vec::new(),
            satisfaction_sum: 0,
            consumed_capacity: 0,
        })
        .collect();

    for (task, &agent) in assignment.iter().enumerate() {
        let summary = &mut agents[agent];
        summary.tasks.push(task);
        summary.satisfaction_sum += model.satisfaction(agent, task);
        summary.consumed_capacity += model.cost(agent, task);
    }
    agents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Instance;

    fn model() -> GapModel {
        let instance = Instance::new(
            2,
            3,
            vec![vec![5, 6, 7], vec![1, 2, 3]],
            vec![vec![4, 4, 4], vec![1, 2, 1]],
            vec![8, 9],
        )
        .unwrap();
        GapModel::build(&instance).unwrap()
    }

    fn raw(values: Vec<f64>, objective: f64) -> RawSolution {
        RawSolution {
            status: SolveStatus::Optimal,
            values,
            objective_value: Some(objective),
            elapsed: Duration::from_millis(3),
        }
    }

    #[test]
    fn derives_per_agent_breakdown() {
        // agent 0: tasks 1, 2; agent 1: task 0
        let solution = analyze(&model(), raw(vec![0.0, 1.0, 1.0, 1.0, 0.0, 0.0], 14.0)).unwrap();
        assert_eq!(solution.assignment, vec![1, 0, 0]);
        assert_eq!(solution.objective_value, Some(14.0));
        assert_eq!(
            solution.agents,
            vec![
                AgentSummary {
                    agent: 0,
                    capacity: 8,
                    tasks: vec![1, 2],
                    satisfaction_sum: 13,
                    consumed_capacity: 8,
                },
                AgentSummary {
                    agent: 1,
                    capacity: 9,
                    tasks: vec![0],
                    satisfaction_sum: 1,
                    consumed_capacity: 1,
                },
            ]
        );
        assert_eq!(solution.agents[0].task_count(), 2);
    }

    #[test]
    fn tolerates_round_off_in_values_and_objective() {
        let values = vec![1e-9, 0.9999999, 1.0000001, 0.9999999, 0.0, -1e-9];
        let solution = analyze(&model(), raw(values, 14.000000001)).unwrap();
        assert_eq!(solution.objective_value, Some(14.0));
    }

    #[test]
    fn unassigned_task_is_a_defect() {
        let err = analyze(&model(), raw(vec![0.0, 1.0, 1.0, 0.0, 0.0, 0.0], 13.0)).unwrap_err();
        assert_eq!(err, ConsistencyError::TaskUnassigned { task: 0 });
    }

    #[test]
    fn doubly_assigned_task_is_a_defect() {
        let err = analyze(&model(), raw(vec![1.0, 1.0, 0.0, 1.0, 0.0, 1.0], 15.0)).unwrap_err();
        assert_eq!(
            err,
            ConsistencyError::TaskAssignedTwice {
                task: 0,
                first: 0,
                second: 1
            }
        );
    }

    #[test]
    fn capacity_violation_is_a_defect() {
        let err = analyze(&model(), raw(vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0], 18.0)).unwrap_err();
        assert_eq!(
            err,
            ConsistencyError::CapacityExceeded {
                agent: 0,
                consumed: 12,
                capacity: 8
            }
        );
    }

    #[test]
    fn objective_mismatch_is_a_defect() {
        let err = analyze(&model(), raw(vec![0.0, 1.0, 1.0, 1.0, 0.0, 0.0], 20.0)).unwrap_err();
        assert!(matches!(err, ConsistencyError::ObjectiveMismatch { .. }));
    }

    #[test]
    fn sign_flipped_engine_objective_is_a_defect() {
        // a sign-flipped objective row reports -14 for a point worth 14
        let err = analyze(&model(), raw(vec![0.0, 1.0, 1.0, 1.0, 0.0, 0.0], -14.0)).unwrap_err();
        assert_eq!(
            err,
            ConsistencyError::ObjectiveMismatch {
                reported: -14.0,
                recomputed: 14.0
            }
        );
    }

    #[test]
    fn assignment_without_objective_is_a_defect() {
        let mut raw = raw(vec![0.0, 1.0, 1.0, 1.0, 0.0, 0.0], 14.0);
        raw.objective_value = None;
        assert_eq!(
            analyze(&model(), raw).unwrap_err(),
            ConsistencyError::ObjectiveMissing
        );
    }

    #[test]
    fn wrong_value_count_is_a_defect() {
        let err = analyze(&model(), raw(vec![1.0; 4], 0.0)).unwrap_err();
        assert_eq!(
            err,
            ConsistencyError::VariableCountMismatch {
                expected: 6,
                found: 4
            }
        );
    }

    #[test]
    fn terminal_statuses_without_assignment_pass_through() {
        for status in [SolveStatus::Infeasible, SolveStatus::TimedOutNoIncumbent] {
            let solution = analyze(
                &model(),
                RawSolution {
                    status,
                    values: Vec::new(),
                    objective_value: None,
                    elapsed: Duration::from_secs(1),
                },
            )
            .unwrap();
            assert_eq!(solution.status, status);
            assert_eq!(solution.objective_value, None);
            assert!(solution.assignment.is_empty());
            assert!(solution.agents.is_empty());
            assert_eq!(solution.elapsed, Duration::from_secs(1));
        }
    }
}
