//! Configuration types for the tabu search.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::moves::Neighborhood;

/// Errors raised when a configuration value cannot be interpreted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown neighborhood: {0} (expected \"n1\" or \"na\")")]
    UnknownNeighborhood(String),
    #[error("Unknown construction heuristic: {0} (expected \"bidirectional\" or \"left\")")]
    UnknownConstruction(String),
}

/// Heuristic that builds the first feasible schedule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConstructionHeuristic {
    /// Grow the schedule alternately from the start and from the end.
    #[default]
    Bidirectional,
    /// Grow the schedule from the start only.
    LeftOnly,
}

impl FromStr for ConstructionHeuristic {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bidirectional" | "bidir" => Ok(Self::Bidirectional),
            "left" | "left_only" | "left-only" => Ok(Self::LeftOnly),
            _ => Err(ConfigError::UnknownConstruction(s.to_string())),
        }
    }
}

impl fmt::Display for ConstructionHeuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bidirectional => write!(f, "bidirectional"),
            Self::LeftOnly => write!(f, "left"),
        }
    }
}

/// Parameters of the adaptive tabu length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabuBounds {
    /// Re-randomize `min` and `max` every `lambda` iterations.
    pub lambda: usize,
    /// Lower end `a` of the range `min` is drawn from.
    pub min_lower: usize,
    /// Gap between `min` and the lower end of the range `max` is drawn from.
    pub max_gap: usize,
    /// Tabu length at the start of a run.
    pub initial_length: usize,
}

impl Default for TabuBounds {
    fn default() -> Self {
        Self {
            lambda: 60,
            min_lower: 2,
            max_gap: 6,
            initial_length: 1,
        }
    }
}

/// Configuration for one tabu search run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabuSearchConfig {
    /// Iteration count after which a stalled search may stop.
    pub max_iter: usize,
    /// Stall length (iterations without a new best) that triggers a restart.
    pub delta: usize,
    /// Hard cap on iterations is `safety_factor * max_iter`.
    pub safety_factor: usize,
    /// Seed of the run's random source.
    pub seed: u64,
    pub neighborhood: Neighborhood,
    pub construction: ConstructionHeuristic,
    pub tabu: TabuBounds,
    /// Verbosity level: 0=silent, 1=progress, 2=moves, 3=debug.
    pub verbosity: u8,
}

impl Default for TabuSearchConfig {
    fn default() -> Self {
        Self {
            max_iter: 1200,
            delta: 800,
            safety_factor: 5,
            seed: 0,
            neighborhood: Neighborhood::N1,
            construction: ConstructionHeuristic::Bidirectional,
            tabu: TabuBounds::default(),
            verbosity: 0,
        }
    }
}

impl TabuSearchConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_delta(mut self, delta: usize) -> Self {
        self.delta = delta;
        self
    }

    pub fn with_neighborhood(mut self, neighborhood: Neighborhood) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    pub fn with_construction(mut self, construction: ConstructionHeuristic) -> Self {
        self.construction = construction;
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Iteration count at which the search stops unconditionally.
    pub fn safety_cap(&self) -> usize {
        self.safety_factor.saturating_mul(self.max_iter)
    }
}
