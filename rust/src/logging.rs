//! Stderr tracing of a tabu search run, gated by `TabuSearchConfig::verbosity`.
//!
//! Format arguments are only evaluated when the run's verbosity reaches the
//! macro's level, so per-candidate messages cost nothing in silent runs.
//! - 0: SILENT
//! - 1: PROGRESS (initial makespan, new best makespan, restarts, termination)
//! - 2: MOVES (accepted move, its makespan and the tabu length each iteration)
//! - 3: DEBUG (skipped candidates, tabu bound changes)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_PROGRESS: u8 = 1;
pub const VERBOSITY_MOVES: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at PROGRESS level (verbosity >= 1).
#[macro_export]
macro_rules! log_progress {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_PROGRESS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at MOVES level (verbosity >= 2).
#[macro_export]
macro_rules! log_moves {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_MOVES {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_verbosity_levels_are_ordered() {
        assert!(VERBOSITY_SILENT < VERBOSITY_PROGRESS);
        assert!(VERBOSITY_PROGRESS < VERBOSITY_MOVES);
        assert!(VERBOSITY_MOVES < VERBOSITY_DEBUG);
    }

    #[test]
    fn test_silent_run_skips_formatting() {
        let evaluated = Cell::new(0);
        let makespan = || {
            evaluated.set(evaluated.get() + 1);
            7.0
        };
        let verbosity = VERBOSITY_SILENT;
        log_progress!(verbosity, "new best makespan {}", makespan());
        log_moves!(verbosity, "accepted M0(1 4) makespan {}", makespan());
        log_debug!(verbosity, "skipped candidate makespan {}", makespan());
        assert_eq!(evaluated.get(), 0);
    }

    #[test]
    fn test_levels_gate_formatting() {
        let evaluated = Cell::new(0);
        let makespan = || {
            evaluated.set(evaluated.get() + 1);
            7.0
        };
        let verbosity = VERBOSITY_MOVES;
        log_progress!(verbosity, "new best makespan {}", makespan());
        log_moves!(verbosity, "accepted M0(1 4) makespan {}", makespan());
        log_debug!(verbosity, "skipped candidate makespan {}", makespan());
        assert_eq!(evaluated.get(), 2);

        log_debug!(VERBOSITY_DEBUG, "skipped candidate makespan {}", makespan());
        assert_eq!(evaluated.get(), 3);
    }
}
