//! Tabu search for the job shop scheduling problem.
//!
//! An instance is modeled as a disjunctive graph: jobs fix the order of their
//! operations, and a [`Schedule`] fixes the order of the operations on each
//! machine. The makespan of a schedule is the length of the longest path from
//! the source to the sink. [`tabu_search`] starts from a constructed schedule
//! and repeatedly reverses arcs on that critical path, guided by an adaptive
//! [`TabuMemory`].
//!
//! Python bindings are available with the `python` feature.

pub mod config;
pub mod construction;
pub mod critical_path;
pub mod instance;
pub mod logging;
pub mod models;
pub mod moves;
pub mod schedule;
pub mod search;
pub mod solution;
pub mod tabu;

#[cfg(feature = "python")]
mod python;

pub use config::{ConfigError, ConstructionHeuristic, TabuBounds, TabuSearchConfig};
pub use critical_path::{calculate_critical_path, CriticalPathError, CriticalPathResult};
pub use instance::{load_instance, parse_instance, InstanceError};
pub use models::{JobId, MachineId, Operation, OperationId, Problem, ProblemError};
pub use moves::{Move, Neighborhood};
pub use schedule::{Schedule, ScheduleError};
pub use search::{tabu_search, SearchError, SearchOutcome, TabuSearch, TerminationReason};
pub use solution::Solution;
pub use tabu::{Phase, TabuMemory};
