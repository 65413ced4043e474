//! Loader for the textual instance format.
//!
//! ```text
//! # optional comment line
//! <jobs> <machines> [<optimal cost>]
//! <machine> <duration> <machine> <duration> ...   (one line per job)
//! ```

use std::path::Path;

use thiserror::Error;

use crate::models::{MachineId, Problem, ProblemError};

/// Errors raised while reading an instance.
#[derive(Error, Debug)]
pub enum InstanceError {
    #[error("Failed to read instance file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Instance is missing the '<jobs> <machines>' header line")]
    MissingHeader,
    #[error("Line {line}: invalid integer {token:?}")]
    InvalidNumber { line: usize, token: String },
    #[error("Line {line}: expected <machine> <duration> pairs, found {count} values")]
    UnpairedValues { line: usize, count: usize },
    #[error("Expected {expected} job lines, found {found}")]
    MissingJobs { expected: usize, found: usize },
    #[error(transparent)]
    Problem(#[from] ProblemError),
}

fn parse_number<T: std::str::FromStr>(token: &str, line: usize) -> Result<T, InstanceError> {
    token.parse().map_err(|_| InstanceError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

/// Parse an instance from its text.
pub fn parse_instance(text: &str) -> Result<Problem, InstanceError> {
    // (1-based line number, content) for lines that carry data
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

    let (header_line, header) = lines.next().ok_or(InstanceError::MissingHeader)?;
    let tokens: Vec<&str> = header.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(InstanceError::MissingHeader);
    }
    let num_jobs: usize = parse_number(tokens[0], header_line)?;
    let num_machines: usize = parse_number(tokens[1], header_line)?;
    let optimal_cost = match tokens.get(2) {
        Some(token) => Some(parse_number::<u64>(token, header_line)? as f64),
        None => None,
    };

    let mut routes: Vec<Vec<(MachineId, u32)>> = Vec::with_capacity(num_jobs);
    for (line_no, line) in lines.by_ref().take(num_jobs) {
        let values: Vec<&str> = line.split_whitespace().collect();
        if values.len() % 2 != 0 {
            return Err(InstanceError::UnpairedValues {
                line: line_no,
                count: values.len(),
            });
        }
        let route = values
            .chunks(2)
            .map(|pair| {
                Ok((
                    parse_number::<MachineId>(pair[0], line_no)?,
                    parse_number::<u32>(pair[1], line_no)?,
                ))
            })
            .collect::<Result<Vec<_>, InstanceError>>()?;
        routes.push(route);
    }

    if routes.len() < num_jobs {
        return Err(InstanceError::MissingJobs {
            expected: num_jobs,
            found: routes.len(),
        });
    }

    Ok(Problem::from_routes(&routes, num_machines, optimal_cost)?)
}

/// Read and parse an instance file.
pub fn load_instance(path: impl AsRef<Path>) -> Result<Problem, InstanceError> {
    let text = std::fs::read_to_string(path)?;
    parse_instance(&text)
}
