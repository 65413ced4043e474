//! Critical path evaluation of a schedule.
//!
//! The machine order fixed by a [`Schedule`](crate::schedule::Schedule) turns the
//! disjunctive graph into a DAG. Its longest source-to-sink path is the
//! critical path, and the path length is the makespan of the schedule.

mod calculation;
mod graph;
mod types;

pub use calculation::{calculate_critical_path, topological_order};
pub use graph::DisjunctiveGraph;
pub use types::{CriticalPathError, CriticalPathResult, Label};
