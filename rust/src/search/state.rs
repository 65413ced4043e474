//! Mutable state of one search run.

use crate::moves::Move;
use crate::solution::Solution;
use crate::tabu::Phase;

/// Counters and solutions tracked across iterations.
///
/// `reference_cost` is the cost the aspiration criterion and the EUREKA test
/// compare against. A restart resets it to the adopted neighbor's cost, which
/// can be worse than `best_cost`; `best` only ever improves.
#[derive(Clone, Debug)]
pub struct SearchState {
    pub current: Solution,
    pub current_cost: f64,
    pub best: Solution,
    pub best_cost: f64,
    pub reference_cost: f64,
    pub initial_cost: f64,
    /// Number of moves made so far; the index of the next iteration.
    pub iteration: usize,
    /// Iterations since the last EUREKA.
    pub stall: usize,
    pub restarts: usize,
    pub trace: Vec<Move>,
}

impl SearchState {
    pub fn new(initial: Solution, cost: f64) -> Self {
        Self {
            best: initial.clone(),
            current: initial,
            current_cost: cost,
            best_cost: cost,
            reference_cost: cost,
            initial_cost: cost,
            iteration: 0,
            stall: 0,
            restarts: 0,
            trace: Vec::new(),
        }
    }

    /// Phase of moving to a neighbor of cost `cost`, given the restart threshold `delta`.
    pub fn classify(&self, cost: f64, delta: usize) -> Phase {
        if cost < self.reference_cost || self.stall == delta {
            Phase::Eureka
        } else if cost < self.current_cost {
            Phase::Improving
        } else {
            Phase::Worsen
        }
    }

    /// Move to `neighbor` via `mv`. Returns true if the incumbent improved.
    pub fn accept(&mut self, mv: Move, neighbor: Solution, cost: f64, phase: Phase) -> bool {
        let mut improved = false;
        if phase == Phase::Eureka {
            if cost >= self.reference_cost {
                self.restarts += 1;
            }
            self.reference_cost = cost;
            self.stall = 0;
            if cost < self.best_cost {
                self.best = neighbor.clone();
                self.best_cost = cost;
                improved = true;
            }
        } else {
            self.stall += 1;
        }

        self.trace.push(mv);
        self.current = neighbor;
        self.current_cost = cost;
        self.iteration += 1;
        improved
    }
}
