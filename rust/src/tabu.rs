//! Adaptive tabu memory.
//!
//! `stamps[i][j]` records `k + 1` for the last iteration `k` in which the arc
//! `(i, j)` was reversed. Reversing `(j, i)` back is forbidden while
//! `stamps[i][j] + length > k + 1`. The forbid length follows the search
//! phase and is kept between `min` and `max`, which are re-drawn every
//! `lambda` iterations.

use rand::Rng;

use crate::config::TabuBounds;
use crate::models::{OperationId, Problem};
use crate::moves::Move;

/// Classification of one search iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// New best solution, or a restart.
    Eureka,
    /// Neighbor is cheaper than the current solution.
    Improving,
    /// Neighbor is not cheaper than the current solution.
    Worsen,
}

/// Tabu state owned by a single search run.
#[derive(Clone, Debug)]
pub struct TabuMemory {
    n: usize,
    stamps: Vec<usize>,
    length: usize,
    min: usize,
    max: usize,
    lambda: usize,
    /// Inclusive range `min` is drawn from.
    min_range: (usize, usize),
    max_gap: usize,
    /// Width of the range `max` is drawn from.
    spread: usize,
}

impl TabuMemory {
    /// Fresh memory for `problem` with `min` and `max` drawn from `rng`.
    pub fn new<R: Rng + ?Sized>(problem: &Problem, bounds: &TabuBounds, rng: &mut R) -> Self {
        let n = problem.num_operations();
        let spread = (problem.num_jobs() + problem.num_machines()) / 3;
        let mut memory = Self {
            n,
            stamps: vec![0; n * n],
            length: bounds.initial_length,
            min: bounds.min_lower,
            max: bounds.min_lower + bounds.max_gap,
            lambda: bounds.lambda.max(1),
            min_range: (bounds.min_lower, bounds.min_lower + spread),
            max_gap: bounds.max_gap,
            spread,
        };
        memory.randomize_bounds(rng);
        memory
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Iteration stamp of the arc `(from, to)`.
    #[inline]
    pub fn stamp(&self, from: OperationId, to: OperationId) -> usize {
        self.stamps[from * self.n + to]
    }

    fn randomize_bounds<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let (low, high) = self.min_range;
        self.min = rng.random_range(low..=high);
        let max_low = self.min + self.max_gap;
        self.max = rng.random_range(max_low..=max_low + self.spread);
    }

    /// Record `mv` as applied in iteration `iteration` and adapt the forbid length.
    ///
    /// On iterations that are a multiple of `lambda` (zero included) the
    /// bounds are re-drawn before the length is adjusted.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        mv: &Move,
        iteration: usize,
        phase: Phase,
        rng: &mut R,
    ) {
        for (from, to) in mv.arcs() {
            self.stamps[from * self.n + to] = iteration + 1;
        }

        if iteration % self.lambda == 0 {
            self.randomize_bounds(rng);
        }

        match phase {
            Phase::Eureka => self.length = 1,
            Phase::Improving => {
                if self.length > self.min {
                    self.length -= 1;
                }
            }
            Phase::Worsen => {
                if self.length < self.max {
                    self.length += 1;
                }
            }
        }
    }

    /// Whether every arc reversed by `mv` may be reversed in iteration `iteration`.
    pub fn is_allowed(&self, mv: &Move, iteration: usize) -> bool {
        mv.arcs()
            .into_iter()
            .all(|(from, to)| self.stamp(to, from) + self.length <= iteration + 1)
    }
}
