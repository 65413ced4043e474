//! Construction heuristics for the initial schedule.
//!
//! The bidirectional heuristic alternates a left step, which appends the
//! ready operation with the smallest release time to the front part of its
//! machine row, and a right step, which prepends the operation with the
//! smallest queue time to the back part. Ties go to the lowest operation id.
//! Every machine row is expected to hold the same number of operations; rows
//! with fewer are left with empty slots in the middle.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

use crate::config::ConstructionHeuristic;
use crate::models::{OperationId, Problem};
use crate::schedule::{Schedule, ScheduleError};

/// Candidate with the smallest time, lowest id on ties.
fn select(candidates: &BTreeMap<OperationId, u64>) -> Option<(OperationId, u64)> {
    candidates
        .iter()
        .min_by_key(|&(&id, &time)| (time, id))
        .map(|(&id, &time)| (id, time))
}

/// Add `duration` to every candidate processed on the same machine as `placed`.
fn bump_machine(
    problem: &Problem,
    candidates: &mut BTreeMap<OperationId, u64>,
    placed: OperationId,
) {
    let op = problem.operation(placed);
    for (&id, time) in candidates.iter_mut() {
        if problem.operation(id).machine == op.machine {
            *time += op.duration as u64;
        }
    }
}

struct Builder<'a> {
    problem: &'a Problem,
    schedule: Schedule,
    left_placed: FxHashSet<OperationId>,
    right_placed: FxHashSet<OperationId>,
    /// Left-schedulable operations with their release time.
    left: BTreeMap<OperationId, u64>,
    /// Right-schedulable operations with their queue time.
    right: BTreeMap<OperationId, u64>,
    total: usize,
}

impl<'a> Builder<'a> {
    fn new(problem: &'a Problem) -> Self {
        let mut left = BTreeMap::new();
        let mut right = BTreeMap::new();
        for job in problem.jobs() {
            if let (Some(&first), Some(&last)) = (job.first(), job.last()) {
                left.insert(first, 0);
                right.insert(last, 0);
            }
        }
        Self {
            problem,
            schedule: Schedule::new(problem.num_machines(), problem.max_operations_per_machine()),
            left_placed: FxHashSet::default(),
            right_placed: FxHashSet::default(),
            left,
            right,
            total: problem.num_operations() - 2,
        }
    }

    fn placed(&self) -> usize {
        self.left_placed.len() + self.right_placed.len()
    }

    fn is_complete(&self) -> bool {
        self.placed() >= self.total
    }

    fn stalled(&self) -> ScheduleError {
        ScheduleError::ConstructionStalled {
            placed: self.placed(),
            total: self.total,
        }
    }

    fn step_left(&mut self) -> Result<(), ScheduleError> {
        let (id, release) = select(&self.left).ok_or_else(|| self.stalled())?;
        let op = *self.problem.operation(id);
        let machine = op.machine.ok_or_else(|| self.stalled())?;
        self.schedule.place_left(machine, id)?;

        self.left.remove(&id);
        self.right.remove(&id);
        self.left_placed.insert(id);

        if let Some(next) = self.problem.job_successor(id) {
            if !self.right_placed.contains(&next) {
                self.left.insert(next, release + op.duration as u64);
            }
        }
        // the freshly released successor queues behind `id` too when it shares the machine
        bump_machine(self.problem, &mut self.left, id);
        Ok(())
    }

    fn step_right(&mut self) -> Result<(), ScheduleError> {
        let (id, queue) = select(&self.right).ok_or_else(|| self.stalled())?;
        let op = *self.problem.operation(id);
        let machine = op.machine.ok_or_else(|| self.stalled())?;
        self.schedule.place_right(machine, id)?;

        self.right.remove(&id);
        self.left.remove(&id);
        self.right_placed.insert(id);

        if let Some(prev) = self.problem.job_predecessor(id) {
            if !self.left_placed.contains(&prev) {
                self.right.insert(prev, queue + op.duration as u64);
            }
        }
        bump_machine(self.problem, &mut self.right, id);
        Ok(())
    }
}

/// Build a schedule growing it from both ends.
pub fn bidirectional(problem: &Problem) -> Result<Schedule, ScheduleError> {
    let mut builder = Builder::new(problem);
    while !builder.is_complete() {
        builder.step_left()?;
        if !builder.is_complete() {
            builder.step_right()?;
        }
    }
    Ok(builder.schedule)
}

/// Build a schedule growing it from the start only.
pub fn left_only(problem: &Problem) -> Result<Schedule, ScheduleError> {
    let mut builder = Builder::new(problem);
    while !builder.is_complete() {
        builder.step_left()?;
    }
    Ok(builder.schedule)
}

/// Build the initial schedule with the chosen heuristic.
pub fn construct(
    problem: &Problem,
    heuristic: ConstructionHeuristic,
) -> Result<Schedule, ScheduleError> {
    match heuristic {
        ConstructionHeuristic::Bidirectional => bidirectional(problem),
        ConstructionHeuristic::LeftOnly => left_only(problem),
    }
}
