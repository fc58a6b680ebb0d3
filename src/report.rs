use crate::adapter::SolveStatus;
use crate::analyze::{AgentSummary, Solution};
use crate::error::GapError;
use crate::policy::SolverPolicy;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Row status: a solve status, or `Rejected` for instances that never reached the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowStatus {
    Optimal,
    Infeasible,
    TimedOutWithIncumbent,
    TimedOutNoIncumbent,
    Rejected,
}

impl From<SolveStatus> for RowStatus {
    fn from(status: SolveStatus) -> Self {
        match status {
            SolveStatus::Optimal => RowStatus::Optimal,
            SolveStatus::Infeasible => RowStatus::Infeasible,
            SolveStatus::TimedOutWithIncumbent => RowStatus::TimedOutWithIncumbent,
            SolveStatus::TimedOutNoIncumbent => RowStatus::TimedOutNoIncumbent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentRow {
    pub agent: usize,
    pub capacity: i64,
    pub task_count: usize,
    pub satisfaction_sum: i64,
    pub consumed_capacity: i64,
}

impl From<&AgentSummary> for AgentRow {
    fn from(summary: &AgentSummary) -> Self {
        Self {
            agent: summary.agent,
            capacity: summary.capacity,
            task_count: summary.task_count(),
            satisfaction_sum: summary.satisfaction_sum,
            consumed_capacity: summary.consumed_capacity,
        }
    }
}

/// One instance's line in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub instance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<f64>,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<AgentRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReportRow {
    pub fn solved(
        instance: impl Into<String>,
        agent_count: usize,
        task_count: usize,
        solution: &Solution,
        detail: bool,
    ) -> Self {
        let agents = if detail {
            solution.agents.iter().map(AgentRow::from).collect()
        } else {
            Vec::new()
        };
        Self {
            instance: instance.into(),
            agent_count: Some(agent_count),
            task_count: Some(task_count),
            elapsed_seconds: Some(solution.elapsed.as_secs_f64()),
            status: solution.status.into(),
            objective: solution.objective_value,
            agents,
            error: None,
        }
    }

    pub fn rejected(instance: impl Into<String>, error: &GapError) -> Self {
        Self {
            instance: instance.into(),
            agent_count: None,
            task_count: None,
            elapsed_seconds: None,
            status: RowStatus::Rejected,
            objective: None,
            agents: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Everything handed to the reporting side for one batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub engine: String,
    pub policy: SolverPolicy,
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn new(engine: impl Into<String>, policy: SolverPolicy) -> Self {
        Self {
            engine: engine.into(),
            policy,
            rows: Vec::new(),
        }
    }

    pub fn count(&self, status: RowStatus) -> usize {
        self.rows.iter().filter(|r| r.status == status).count()
    }

    pub fn to_yaml(&self) -> Result<String, GapError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn write_yaml(&self, mut out: impl Write) -> Result<(), GapError> {
        serde_yaml::to_writer(&mut out, self)?;
        Ok(())
    }

    /// Write the YAML report to `path`, surfacing errors from the final flush.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GapError> {
        let path = path.as_ref();
        let io_err = |source: std::io::Error| GapError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
        self.write_yaml(&mut writer)?;
        writer.flush().map_err(io_err)
    }
}
