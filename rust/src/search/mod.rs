//! Tabu search controller.
//!
//! Each iteration evaluates the neighborhood of the current solution, moves
//! to the cheapest admissible neighbor (or a random one when every move is
//! tabu), classifies the step as EUREKA, IMPROVING or WORSEN and feeds that
//! back into the tabu memory. The search always moves; the best solution seen
//! is kept aside and returned.

mod core;
mod state;

pub use core::{tabu_search, SearchError, SearchOutcome, TabuSearch, TerminationReason};
pub use state::SearchState;
