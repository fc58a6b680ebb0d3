//! Sequential benchmark runs.
//!
//! Each instance goes through load → model → solve → analyze on its own;
//! nothing is shared between instances. Malformed instances become
//! `Rejected` rows, while engine and consistency failures abort the batch.

use crate::adapter::SolverAdapter;
use crate::analyze::{Solution, analyze};
use crate::engine::Engine;
use crate::error::GapError;
use crate::instance::Instance;
use crate::model::GapModel;
use crate::policy::SolverPolicy;
use crate::report::{Report, ReportRow};
use log::{info, warn};
use std::fs::read_dir;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchOptions {
    pub policy: SolverPolicy,
    /// Include the per-agent breakdown in every solved row.
    pub detail: bool,
}

/// Build, solve and analyze one instance.
pub fn solve_instance(
    engine: &dyn Engine,
    instance: &Instance,
    policy: SolverPolicy,
) -> Result<Solution, GapError> {
    let model = GapModel::build(instance)?;
    solve_model(engine, &model, policy)
}

fn solve_model(
    engine: &dyn Engine,
    model: &GapModel,
    policy: SolverPolicy,
) -> Result<Solution, GapError> {
    let raw = SolverAdapter::new(engine).solve(model, policy)?;
    Ok(analyze(model, raw)?)
}

/// Expand directories into their regular files, sorted by name. Files are kept as given.
pub fn discover_instances(paths: &[PathBuf]) -> Result<Vec<PathBuf>, GapError> {
    let mut found = Vec::new();
    for path in paths {
        if !path.is_dir() {
            found.push(path.clone());
            continue;
        }
        let io_err = |source: std::io::Error| GapError::Io {
            path: path.clone(),
            source,
        };
        let mut entries = Vec::new();
        for entry in read_dir(path).map_err(io_err)? {
            let entry_path = entry.map_err(io_err)?.path();
            if entry_path.is_file() {
                entries.push(entry_path);
            }
        }
        entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        found.extend(entries);
    }
    Ok(found)
}

fn instance_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn run_one(
    engine: &dyn Engine,
    path: &Path,
    name: &str,
    options: &BatchOptions,
) -> Result<ReportRow, GapError> {
    let model = {
        let instance = Instance::from_path(path)?;
        GapModel::build(&instance)?
    };
    info!(
        "{name}: {} agents, {} tasks",
        model.agent_count(),
        model.task_count()
    );

    let solution = solve_model(engine, &model, options.policy)?;
    match solution.objective_value {
        Some(objective) => info!(
            "{name}: {} objective {objective} in {:.3}s",
            solution.status,
            solution.elapsed.as_secs_f64()
        ),
        None => info!(
            "{name}: {} in {:.3}s",
            solution.status,
            solution.elapsed.as_secs_f64()
        ),
    }

    Ok(ReportRow::solved(
        name,
        model.agent_count(),
        model.task_count(),
        &solution,
        options.detail,
    ))
}

/// Solve every instance file in order. Returns the first fatal error, if any.
pub fn run_batch(
    engine: &dyn Engine,
    paths: &[PathBuf],
    options: &BatchOptions,
) -> Result<Report, GapError> {
    let mut report = Report::new(engine.name(), options.policy);
    for path in paths {
        let name = instance_name(path);
        match run_one(engine, path, &name, options) {
            Ok(row) => report.rows.push(row),
            Err(err) if !err.is_fatal() => {
                warn!("{name}: skipped, {err}");
                report.rows.push(ReportRow::rejected(name, &err));
            }
            Err(err) => return Err(err),
        }
    }
    Ok(report)
}
