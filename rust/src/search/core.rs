//! Tabu search loop.

use std::fmt;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::config::TabuSearchConfig;
use crate::critical_path::CriticalPathError;
use crate::models::Problem;
use crate::moves::Move;
use crate::schedule::ScheduleError;
use crate::solution::Solution;
use crate::tabu::{Phase, TabuMemory};
use crate::{log_debug, log_moves, log_progress};

use super::state::SearchState;

/// Errors that prevent a search from producing a result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("Failed to build the initial schedule: {0}")]
    Construction(#[from] ScheduleError),
    #[error("Initial schedule cannot be evaluated: {0}")]
    Evaluation(#[from] CriticalPathError),
}

/// Why the search loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// Stalled for `delta` iterations after `max_iter`.
    MaxIterations,
    /// Reached `safety_factor * max_iter` iterations.
    SafetyCap,
    /// Best cost matches the known optimum.
    OptimumReached,
    /// The current solution has no valid neighbor.
    NoCandidates,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxIterations => write!(f, "max iterations"),
            Self::SafetyCap => write!(f, "safety cap"),
            Self::OptimumReached => write!(f, "optimum reached"),
            Self::NoCandidates => write!(f, "no candidates"),
        }
    }
}

/// Result of a search run.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// Lowest-cost solution observed.
    pub best: Solution,
    pub cost: f64,
    pub initial_cost: f64,
    pub iterations: usize,
    pub restarts: usize,
    /// Accepted moves, in order.
    pub trace: Vec<Move>,
    pub termination: TerminationReason,
}

/// Evaluated neighbor of the current solution.
struct Candidate {
    mv: Move,
    solution: Solution,
    cost: f64,
}

/// Tabu search over one instance.
pub struct TabuSearch {
    problem: Arc<Problem>,
    config: TabuSearchConfig,
}

impl TabuSearch {
    pub fn new(problem: Arc<Problem>, config: TabuSearchConfig) -> Self {
        Self { problem, config }
    }

    fn stop_reason(&self, state: &SearchState) -> Option<TerminationReason> {
        if let Some(optimum) = self.problem.optimal_cost() {
            if state.best_cost <= optimum {
                return Some(TerminationReason::OptimumReached);
            }
        }
        if state.stall >= self.config.delta && state.iteration > self.config.max_iter {
            return Some(TerminationReason::MaxIterations);
        }
        if state.iteration >= self.config.safety_cap() {
            return Some(TerminationReason::SafetyCap);
        }
        None
    }

    /// Apply and evaluate every move; failed candidates are dropped.
    fn evaluate(
        &self,
        current: &Solution,
        moves: impl IntoIterator<Item = Move>,
    ) -> Vec<Candidate> {
        let verbosity = self.config.verbosity;
        let mut candidates = Vec::new();
        for mv in moves {
            let solution = match current.neighbor(&mv) {
                Ok(solution) => solution,
                Err(e) => {
                    log_debug!(verbosity, "  skip {}: {}", mv, e);
                    continue;
                }
            };
            match solution.cost() {
                Ok(cost) => {
                    log_debug!(verbosity, "  candidate {} cost {}", mv, cost);
                    candidates.push(Candidate { mv, solution, cost });
                }
                Err(e) => log_debug!(verbosity, "  skip {}: {}", mv, e),
            }
        }
        candidates
    }

    /// Cheapest candidate that is not tabu or beats the reference cost.
    ///
    /// Candidates arrive in canonical move order and only a strictly lower
    /// cost replaces the pick, so the first of equal-cost moves wins.
    fn select(
        &self,
        candidates: &[Candidate],
        state: &SearchState,
        tabu: &TabuMemory,
    ) -> Option<usize> {
        let mut chosen = None;
        let mut chosen_cost = f64::INFINITY;
        for (i, c) in candidates.iter().enumerate() {
            if c.cost < chosen_cost
                && (c.cost < state.reference_cost || tabu.is_allowed(&c.mv, state.iteration))
            {
                chosen = Some(i);
                chosen_cost = c.cost;
            }
        }
        chosen
    }

    /// Run the search from the configured initial schedule.
    pub fn run(&self) -> Result<SearchOutcome, SearchError> {
        let verbosity = self.config.verbosity;
        let mut rng = SmallRng::seed_from_u64(self.config.seed);

        let initial = Solution::construct(Arc::clone(&self.problem), self.config.construction)?;
        let initial_cost = initial.cost()?;
        log_progress!(
            verbosity,
            "Initial cost {} ({} construction, {} neighborhood, seed {})",
            initial_cost,
            self.config.construction,
            self.config.neighborhood,
            self.config.seed
        );

        let mut tabu = TabuMemory::new(&self.problem, &self.config.tabu, &mut rng);
        let mut state = SearchState::new(initial, initial_cost);

        let termination = loop {
            if let Some(reason) = self.stop_reason(&state) {
                break reason;
            }

            let moves = state.current.moves(self.config.neighborhood)?;
            let total = moves.len();
            log_debug!(verbosity, "Iteration {}: {} moves", state.iteration, total);
            let mut candidates = self.evaluate(&state.current, moves);
            if candidates.is_empty() {
                log_progress!(
                    verbosity,
                    "Iteration {}: none of {} moves is valid",
                    state.iteration,
                    total
                );
                break TerminationReason::NoCandidates;
            }

            let index = match self.select(&candidates, &state, &tabu) {
                Some(index) => index,
                None => {
                    log_debug!(verbosity, "  all moves tabu, picking at random");
                    rng.random_range(0..candidates.len())
                }
            };
            let Candidate { mv, solution, cost } = candidates.swap_remove(index);

            let phase = state.classify(cost, self.config.delta);
            if phase == Phase::Eureka && cost >= state.reference_cost {
                log_progress!(
                    verbosity,
                    "Iteration {}: restart from cost {} after {} stalled iterations",
                    state.iteration,
                    cost,
                    state.stall
                );
            }

            let iteration = state.iteration;
            tabu.update(&mv, iteration, phase, &mut rng);
            log_moves!(
                verbosity,
                "Iteration {}: {} -> cost {} ({:?}, tabu length {})",
                iteration,
                mv,
                cost,
                phase,
                tabu.length()
            );

            if state.accept(mv, solution, cost, phase) {
                log_progress!(verbosity, "Iteration {}: new best cost {}", iteration, cost);
            }
        };

        log_progress!(
            verbosity,
            "Search finished after {} iterations ({}), best cost {}, {} restarts",
            state.iteration,
            termination,
            state.best_cost,
            state.restarts
        );

        Ok(SearchOutcome {
            cost: state.best_cost,
            initial_cost: state.initial_cost,
            iterations: state.iteration,
            restarts: state.restarts,
            trace: state.trace,
            best: state.best,
            termination,
        })
    }
}

/// Run a tabu search on `problem` with `config`.
pub fn tabu_search(
    problem: Arc<Problem>,
    config: &TabuSearchConfig,
) -> Result<SearchOutcome, SearchError> {
    TabuSearch::new(problem, config.clone()).run()
}
