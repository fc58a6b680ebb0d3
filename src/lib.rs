//! Benchmark MILP solver configurations on Generalized Assignment Problem
//! instances.
//!
//! An [`Instance`] is validated and formulated as a [`GapModel`], solved by an
//! [`Engine`] under a [`SolverPolicy`] through the [`SolverAdapter`], and the
//! engine's answer is re-derived and cross-checked by [`analyze`] before it is
//! reported.

pub mod adapter;
pub mod analyze;
pub mod batch;
pub mod engine;
pub mod error;
pub mod instance;
pub mod model;
pub mod policy;
pub mod report;
pub mod validate;

pub use adapter::{RawSolution, SolveStatus, SolverAdapter};
pub use analyze::{AgentSummary, Solution, analyze};
pub use batch::{BatchOptions, discover_instances, run_batch, solve_instance};
pub use engine::{Engine, EngineKind, EngineOutcome, EngineStatus, create_engine};
pub use error::{ConsistencyError, EngineError, GapError, ParseError, ShapeError};
pub use instance::Instance;
pub use model::GapModel;
pub use policy::{PolicyConfig, PolicyPreset, SolverPolicy};
pub use report::{Report, ReportRow, RowStatus};
pub use validate::validate;
