//! Types for critical path evaluation.

use thiserror::Error;

use crate::models::OperationId;

/// Errors that make a schedule impossible to evaluate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CriticalPathError {
    #[error("Machine order closes a cycle through operation {operation}")]
    Cycle { operation: OperationId },
    #[error("Operation {operation} is not reachable from the source")]
    UnreachableOperation { operation: OperationId },
    #[error("Predecessor chain from the sink does not end at the source")]
    BrokenPath,
}

/// Longest-path label of one operation.
///
/// Only lives for the duration of one evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Label {
    /// Best longest-path distance from the source found so far.
    pub distance: f64,
    /// Operation through which `distance` was achieved.
    pub predecessor: Option<OperationId>,
}

impl Label {
    pub fn unreached() -> Self {
        Self {
            distance: f64::NEG_INFINITY,
            predecessor: None,
        }
    }

    pub fn is_reached(&self) -> bool {
        self.distance.is_finite()
    }
}

impl Default for Label {
    fn default() -> Self {
        Self::unreached()
    }
}

/// Outcome of evaluating a schedule.
#[derive(Clone, Debug, PartialEq)]
pub struct CriticalPathResult {
    /// Operations on the longest path, source first and sink last.
    pub path: Vec<OperationId>,
    /// Length of the longest path; the makespan.
    pub length: f64,
    /// Start time of every operation along its longest incoming path, indexed by id.
    pub earliest_starts: Vec<f64>,
}
