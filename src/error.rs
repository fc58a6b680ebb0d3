use std::path::PathBuf;
use thiserror::Error;

/// Malformed instance text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Which input matrix a shape check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matrix {
    Satisfaction,
    Cost,
}

impl std::fmt::Display for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Matrix::Satisfaction => write!(f, "satisfaction"),
            Matrix::Cost => write!(f, "cost"),
        }
    }
}

/// An instance whose dimensions or values disagree with its declared counts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("instance declares {agents} agents and {tasks} tasks; both must be positive")]
    EmptyDimension { agents: usize, tasks: usize },
    #[error("{matrix} matrix has {found} rows, expected {expected}")]
    RowCount {
        matrix: Matrix,
        expected: usize,
        found: usize,
    },
    #[error("{matrix} row {row} has {found} values, expected {expected}")]
    RowLength {
        matrix: Matrix,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("capacity vector has {found} values, expected {expected}")]
    CapacityLength { expected: usize, found: usize },
    #[error("negative cost {value} for agent {agent}, task {task}")]
    NegativeCost { agent: usize, task: usize, value: i64 },
    #[error("negative capacity {value} for agent {agent}")]
    NegativeCapacity { agent: usize, value: i64 },
}

/// A solved model whose extracted assignment contradicts the formulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsistencyError {
    #[error("engine returned {found} variable values, model has {expected}")]
    VariableCountMismatch { expected: usize, found: usize },
    #[error("task {task} is not assigned to any agent")]
    TaskUnassigned { task: usize },
    #[error("task {task} is assigned to agents {first} and {second}")]
    TaskAssignedTwice {
        task: usize,
        first: usize,
        second: usize,
    },
    #[error("agent {agent} consumes {consumed}, capacity is {capacity}")]
    CapacityExceeded {
        agent: usize,
        consumed: i64,
        capacity: i64,
    },
    #[error("recomputed objective {recomputed} differs from reported {reported}")]
    ObjectiveMismatch { reported: f64, recomputed: f64 },
    #[error("engine returned an assignment without an objective value")]
    ObjectiveMissing,
}

/// The optimization engine could not be started or aborted without a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{engine}: {message}")]
pub struct EngineError {
    pub engine: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum GapError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),
    #[error("solver unavailable: {0}")]
    SolverUnavailable(#[from] EngineError),
    #[error("consistency error: {0}")]
    Consistency(#[from] ConsistencyError),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl GapError {
    /// Whether this error must abort a whole batch rather than skip one instance.
    pub fn is_fatal(&self) -> bool {
        match self {
            GapError::Io { .. } | GapError::Parse(_) | GapError::Shape(_) => false,
            GapError::SolverUnavailable(_) | GapError::Consistency(_) | GapError::Config(_) => {
                true
            }
        }
    }
}

impl From<serde_yaml::Error> for GapError {
    fn from(err: serde_yaml::Error) -> Self {
        GapError::Config(err.to_string())
    }
}
