use crate::error::{GapError, ParseError, ShapeError};
use crate::validate::validate;
use std::fmt;
use std::fs::read_to_string;
use std::path::Path;
use std::str::FromStr;

/// A parsed GAP instance.
///
/// `satisfaction[agent][task]` and `cost[agent][task]` are dense
/// `agent_count × task_count` matrices, `capacity[agent]` is the agent's budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub agent_count: usize,
    pub task_count: usize,
    pub satisfaction: Vec<Vec<i64>>,
    pub cost: Vec<Vec<i64>>,
    pub capacity: Vec<i64>,
}

impl Instance {
    /// Build an instance and check it against its declared dimensions.
    pub fn new(
        agent_count: usize,
        task_count: usize,
        satisfaction: Vec<Vec<i64>>,
        cost: Vec<Vec<i64>>,
        capacity: Vec<i64>,
    ) -> Result<Self, ShapeError> {
        let instance = Self {
            agent_count,
            task_count,
            satisfaction,
            cost,
            capacity,
        };
        validate(&instance)?;
        Ok(instance)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GapError> {
        let path = path.as_ref();
        let buf = read_to_string(path).map_err(|source| GapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        buf.parse()
    }
}

impl FromStr for Instance {
    type Err = GapError;

    /// Parse the line-oriented text format:
    /// a header `agents tasks`, `agents` satisfaction rows, `agents` cost rows,
    /// then one capacity row. Blank lines are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let end_of_input = s.lines().count() + 1;
        let mut lines = s
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (header_line, header) = lines
            .next()
            .ok_or_else(|| ParseError::new(1, "missing header line"))?;
        let header = parse_row(header_line, header)?;
        let [agents, tasks] = header[..] else {
            return Err(ParseError::new(
                header_line,
                format!("header must hold 2 values, found {}", header.len()),
            )
            .into());
        };
        let agent_count = parse_count(header_line, agents, "agent count")?;
        let task_count = parse_count(header_line, tasks, "task count")?;

        let mut take_rows = |what: &str, count: usize| -> Result<Vec<Vec<i64>>, ParseError> {
            (0..count)
                .map(|row| {
                    let (line_no, line) = lines.next().ok_or_else(|| {
                        ParseError::new(end_of_input, format!("missing {what} row {row} of {count}"))
                    })?;
                    parse_row(line_no, line)
                })
                .collect()
        };

        let satisfaction = take_rows("satisfaction", agent_count)?;
        let cost = take_rows("cost", agent_count)?;
        let capacity = take_rows("capacity", 1)?.pop().unwrap_or_default();

        if let Some((line_no, _)) = lines.next() {
            return Err(ParseError::new(line_no, "unexpected trailing line").into());
        }

        Ok(Instance::new(
            agent_count,
            task_count,
            satisfaction,
            cost,
            capacity,
        )?)
    }
}

fn parse_row(line_no: usize, line: &str) -> Result<Vec<i64>, ParseError> {
    line.split_whitespace()
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| ParseError::new(line_no, format!("`{token}` is not an integer")))
        })
        .collect()
}

fn parse_count(line_no: usize, value: i64, what: &str) -> Result<usize, ParseError> {
    usize::try_from(value)
        .map_err(|_| ParseError::new(line_no, format!("{what} must be non-negative, got {value}")))
}

fn write_row(f: &mut fmt::Formatter<'_>, row: &[i64]) -> fmt::Result {
    let mut values = row.iter();
    if let Some(first) = values.next() {
        write!(f, "{first}")?;
    }
    for value in values {
        write!(f, " {value}")?;
    }
    writeln!(f)
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.agent_count, self.task_count)?;
        for row in self.satisfaction.iter().chain(&self.cost) {
            write_row(f, row)?;
        }
        write_row(f, &self.capacity)
    }
}
