use crate::error::GapError;
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Solver tuning knobs applied before a solve.
///
/// The knobs are orthogonal; presets only pick a starting point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverPolicy {
    #[serde(
        rename = "time_limit_seconds",
        with = "seconds",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub time_limit: Option<Duration>,
    pub presolve: bool,
    pub cuts: bool,
    pub heuristics: bool,
}

impl Default for SolverPolicy {
    /// Everything the engine offers stays enabled, no time limit.
    fn default() -> Self {
        Self {
            time_limit: None,
            presolve: true,
            cuts: true,
            heuristics: true,
        }
    }
}

impl SolverPolicy {
    /// Presolve, cutting planes and primal heuristics all disabled:
    /// plain branch-and-bound.
    pub fn baseline() -> Self {
        Self {
            time_limit: None,
            presolve: false,
            cuts: false,
            heuristics: false,
        }
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_presolve(mut self, enabled: bool) -> Self {
        self.presolve = enabled;
        self
    }

    pub fn with_cuts(mut self, enabled: bool) -> Self {
        self.cuts = enabled;
        self
    }

    pub fn with_heuristics(mut self, enabled: bool) -> Self {
        self.heuristics = enabled;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyPreset {
    #[default]
    Default,
    #[serde(alias = "manual")]
    Baseline,
}

impl PolicyPreset {
    pub fn policy(self) -> SolverPolicy {
        match self {
            PolicyPreset::Default => SolverPolicy::default(),
            PolicyPreset::Baseline => SolverPolicy::baseline(),
        }
    }
}

impl FromStr for PolicyPreset {
    type Err = GapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(PolicyPreset::Default),
            "baseline" | "manual" => Ok(PolicyPreset::Baseline),
            other => Err(GapError::Config(format!("unknown policy preset `{other}`"))),
        }
    }
}

/// Policy as written in a YAML config file: a preset plus optional overrides.
///
/// ```yaml
/// preset: baseline
/// time_limit_seconds: 60
/// presolve: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    #[serde(default)]
    pub preset: PolicyPreset,
    pub time_limit_seconds: Option<f64>,
    pub presolve: Option<bool>,
    pub cuts: Option<bool>,
    pub heuristics: Option<bool>,
}

impl PolicyConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GapError> {
        let path = path.as_ref();
        let buf = read_to_string(path).map_err(|source| GapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_yaml::from_str(&buf)?)
    }

    pub fn resolve(&self) -> Result<SolverPolicy, GapError> {
        let mut policy = self.preset.policy();
        if let Some(seconds) = self.time_limit_seconds {
            policy = policy.with_time_limit(time_limit_from_seconds(seconds)?);
        }
        if let Some(presolve) = self.presolve {
            policy = policy.with_presolve(presolve);
        }
        if let Some(cuts) = self.cuts {
            policy = policy.with_cuts(cuts);
        }
        if let Some(heuristics) = self.heuristics {
            policy = policy.with_heuristics(heuristics);
        }
        Ok(policy)
    }
}

pub fn time_limit_from_seconds(seconds: f64) -> Result<Duration, GapError> {
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| GapError::Config(format!("invalid time limit {seconds}")))
}

mod seconds {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(limit: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        limit.map(|d| d.as_secs_f64()).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Option::<f64>::deserialize(d)?
            .map(|secs| Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom))
            .transpose()
    }
}
