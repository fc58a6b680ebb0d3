//! Structural checks run before any model is built.
//!
//! An instance is accepted only if both matrices are exactly
//! `agent_count × task_count`, the capacity vector has one entry per agent,
//! and no cost or capacity is negative. The first violation is returned.

use crate::error::{Matrix, ShapeError};
use crate::instance::Instance;

pub fn validate(instance: &Instance) -> Result<(), ShapeError> {
    let agents = instance.agent_count;
    let tasks = instance.task_count;
    if agents == 0 || tasks == 0 {
        return Err(ShapeError::EmptyDimension { agents, tasks });
    }

    check_matrix(Matrix::Satisfaction, &instance.satisfaction, agents, tasks)?;
    check_matrix(Matrix::Cost, &instance.cost, agents, tasks)?;

    if instance.capacity.len() != agents {
        return Err(ShapeError::CapacityLength {
            expected: agents,
            found: instance.capacity.len(),
        });
    }

    for (agent, row) in instance.cost.iter().enumerate() {
        if let Some((task, &value)) = row.iter().enumerate().find(|(_, v)| **v < 0) {
            return Err(ShapeError::NegativeCost { agent, task, value });
        }
    }

    if let Some((agent, &value)) = instance.capacity.iter().enumerate().find(|(_, v)| **v < 0) {
        return Err(ShapeError::NegativeCapacity { agent, value });
    }

    Ok(())
}

fn check_matrix(
    matrix: Matrix,
    rows: &[Vec<i64>],
    agents: usize,
    tasks: usize,
) -> Result<(), ShapeError> {
    if rows.len() != agents {
        return Err(ShapeError::RowCount {
            matrix,
            expected: agents,
            found: rows.len(),
        });
    }
    match rows.iter().position(|row| row.len() != tasks) {
        Some(row) => Err(ShapeError::RowLength {
            matrix,
            row,
            expected: tasks,
            found: rows[row].len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance() -> Instance {
        Instance {
            agent_count: 2,
            task_count: 2,
            satisfaction: vec![vec![1, 2], vec![3, 4]],
            cost: vec![vec![1, 1], vec![1, 1]],
            capacity: vec![1, 1],
        }
    }

    #[test]
    fn accepts_well_formed_instance() {
        assert_eq!(validate(&instance()), Ok(()));
    }

    #[test]
    fn rejects_empty_dimensions() {
        let mut i = instance();
        i.task_count = 0;
        assert_eq!(
            validate(&i),
            Err(ShapeError::EmptyDimension {
                agents: 2,
                tasks: 0
            })
        );
    }

    #[test]
    fn rejects_missing_cost_row() {
        let mut i = instance();
        i.cost.pop();
        assert_eq!(
            validate(&i),
            Err(ShapeError::RowCount {
                matrix: Matrix::Cost,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn rejects_long_satisfaction_row() {
        let mut i = instance();
        i.satisfaction[0].push(9);
        assert_eq!(
            validate(&i),
            Err(ShapeError::RowLength {
                matrix: Matrix::Satisfaction,
                row: 0,
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn rejects_short_capacity_vector() {
        let i = Instance {
            agent_count: 3,
            task_count: 1,
            satisfaction: vec![vec![1]; 3],
            cost: vec![vec![1]; 3],
            capacity: vec![1, 1],
        };
        assert_eq!(
            validate(&i),
            Err(ShapeError::CapacityLength {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn rejects_negative_values() {
        let mut i = instance();
        i.cost[1][0] = -3;
        assert_eq!(
            validate(&i),
            Err(ShapeError::NegativeCost {
                agent: 1,
                task: 0,
                value: -3
            })
        );

        let mut i = instance();
        i.capacity[0] = -1;
        assert_eq!(
            validate(&i),
            Err(ShapeError::NegativeCapacity { agent: 0, value: -1 })
        );
    }

    #[test]
    fn negative_satisfaction_is_allowed() {
        let mut i = instance();
        i.satisfaction[0][0] = -5;
        assert_eq!(validate(&i), Ok(()));
    }
}
