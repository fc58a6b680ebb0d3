use clap::{Command, arg};
use gapbench::policy::time_limit_from_seconds;
use gapbench::{
    BatchOptions, EngineKind, GapError, PolicyConfig, PolicyPreset, RowStatus, create_engine,
    discover_instances, run_batch,
};
use log::info;
use std::io::stdout;
use std::path::PathBuf;

fn cli() -> Command {
    Command::new("gapbench")
        .about("Solves Generalized Assignment Problem instances and reports per-instance results")
        .arg(
            arg!(<PATH> ... "Instance files, or directories of instance files")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            arg!(-c --config [FILE] "YAML policy config (preset, time_limit_seconds, presolve, cuts, heuristics)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            arg!(-p --preset [NAME] "Policy preset: default or baseline (alias manual)")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            arg!(-t --"time-limit" [SECONDS] "Per-instance solver time limit")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            arg!(-e --engine [NAME] "Optimization engine")
                .value_parser(clap::value_parser!(String))
                .default_value("cbc"),
        )
        .arg(arg!(-d --detail "Include the per-agent breakdown in the report"))
        .arg(
            arg!(-o --output [FILE] "Write the YAML report here instead of stdout")
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

fn run() -> Result<(), GapError> {
    let matches = cli().get_matches();

    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => PolicyConfig::from_path(path)?,
        None => PolicyConfig::default(),
    };
    if let Some(preset) = matches.get_one::<String>("preset") {
        config.preset = preset.parse::<PolicyPreset>()?;
    }
    let mut policy = config.resolve()?;
    if let Some(&seconds) = matches.get_one::<f64>("time-limit") {
        policy = policy.with_time_limit(time_limit_from_seconds(seconds)?);
    }

    let engine_name = matches
        .get_one::<String>("engine")
        .map(String::as_str)
        .unwrap_or("cbc");
    let engine = create_engine(engine_name.parse::<EngineKind>()?);

    let inputs: Vec<PathBuf> = matches
        .get_many::<PathBuf>("PATH")
        .map(|paths| paths.cloned().collect())
        .unwrap_or_default();
    let paths = discover_instances(&inputs)?;
    info!(
        "solving {} instances with {} under {:?}",
        paths.len(),
        engine.name(),
        policy
    );

    let options = BatchOptions {
        policy,
        detail: matches.get_flag("detail"),
    };
    let report = run_batch(engine.as_ref(), &paths, &options)?;
    info!(
        "done: {} optimal, {} infeasible, {} timed out, {} rejected",
        report.count(RowStatus::Optimal),
        report.count(RowStatus::Infeasible),
        report.count(RowStatus::TimedOutWithIncumbent) + report.count(RowStatus::TimedOutNoIncumbent),
        report.count(RowStatus::Rejected)
    );

    match matches.get_one::<PathBuf>("output") {
        Some(path) => report.save(path),
        None => report.write_yaml(stdout().lock()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
