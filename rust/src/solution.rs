//! A schedule bound to its instance, with a lazily computed evaluation.

use std::cell::OnceCell;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::ConstructionHeuristic;
use crate::construction;
use crate::critical_path::{calculate_critical_path, CriticalPathError, CriticalPathResult};
use crate::models::{OperationId, Problem};
use crate::moves::{generate_moves, Move, Neighborhood};
use crate::schedule::{Schedule, ScheduleError};

/// Candidate or accepted solution of the search.
///
/// The schedule is never mutated after creation; neighbors are new
/// solutions. The critical path is computed on first use and cached.
#[derive(Clone, Debug)]
pub struct Solution {
    problem: Arc<Problem>,
    schedule: Schedule,
    evaluation: OnceCell<Result<CriticalPathResult, CriticalPathError>>,
}

impl Solution {
    pub fn new(problem: Arc<Problem>, schedule: Schedule) -> Self {
        Self {
            problem,
            schedule,
            evaluation: OnceCell::new(),
        }
    }

    /// Initial solution built with `heuristic`.
    pub fn construct(
        problem: Arc<Problem>,
        heuristic: ConstructionHeuristic,
    ) -> Result<Self, ScheduleError> {
        let schedule = construction::construct(&problem, heuristic)?;
        Ok(Self::new(problem, schedule))
    }

    pub fn problem(&self) -> &Arc<Problem> {
        &self.problem
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Critical path evaluation, computed once.
    pub fn evaluation(&self) -> Result<&CriticalPathResult, CriticalPathError> {
        self.evaluation
            .get_or_init(|| calculate_critical_path(&self.problem, &self.schedule))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Makespan of the schedule.
    pub fn cost(&self) -> Result<f64, CriticalPathError> {
        Ok(self.evaluation()?.length)
    }

    pub fn critical_path(&self) -> Result<&[OperationId], CriticalPathError> {
        Ok(&self.evaluation()?.path)
    }

    /// Candidate moves of `neighborhood` along the critical path.
    pub fn moves(&self, neighborhood: Neighborhood) -> Result<BTreeSet<Move>, CriticalPathError> {
        let path = self.critical_path()?;
        Ok(generate_moves(&self.problem, &self.schedule, path, neighborhood))
    }

    /// Copy of this solution with `mv` applied.
    pub fn neighbor(&self, mv: &Move) -> Result<Solution, ScheduleError> {
        let mut schedule = self.schedule.clone();
        schedule.apply(mv)?;
        Ok(Self::new(Arc::clone(&self.problem), schedule))
    }

    /// Result in the text exchange format.
    ///
    /// First line `<jobs> <machines>`, then per job the start time of each of
    /// its operations in processing order, then the makespan. Times are
    /// rounded half away from zero. No trailing newline.
    pub fn format_result(&self) -> Result<String, CriticalPathError> {
        let evaluation = self.evaluation()?;
        let mut lines = Vec::with_capacity(self.problem.num_jobs() + 2);
        lines.push(format!(
            "{} {}",
            self.problem.num_jobs(),
            self.problem.num_machines()
        ));
        for job in self.problem.jobs() {
            let starts: Vec<String> = job
                .iter()
                .map(|&id| (evaluation.earliest_starts[id].round() as i64).to_string())
                .collect();
            lines.push(starts.join(" "));
        }
        lines.push((evaluation.length.round() as i64).to_string());
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::{three_by_three, toy_problem};

    fn toy_solution() -> Solution {
        Solution::construct(Arc::new(toy_problem()), ConstructionHeuristic::Bidirectional).unwrap()
    }

    #[test]
    fn test_cost_is_idempotent() {
        let s = Solution::construct(
            Arc::new(three_by_three()),
            ConstructionHeuristic::Bidirectional,
        )
        .unwrap();
        let first = s.cost().unwrap();
        assert_eq!(s.cost().unwrap(), first);
        assert_eq!(s.evaluation().unwrap().length, first);
    }

    #[test]
    fn test_n1_neighbor_swaps_two_entries() {
        let s = Solution::construct(
            Arc::new(three_by_three()),
            ConstructionHeuristic::Bidirectional,
        )
        .unwrap();
        let unchanged = s.schedule().clone();
        for mv in s.moves(Neighborhood::N1).unwrap() {
            let n = s.neighbor(&mv).unwrap();
            let mut changed = 0;
            for m in 0..s.problem().num_machines() {
                let before = s.schedule().row(m);
                let after = n.schedule().row(m);
                let mut a: Vec<_> = before.to_vec();
                let mut b: Vec<_> = after.to_vec();
                a.sort_unstable();
                b.sort_unstable();
                assert_eq!(a, b);
                changed += before.iter().zip(after).filter(|(x, y)| x != y).count();
            }
            assert_eq!(changed, 2, "move {} changed {} slots", mv, changed);
            assert_eq!(s.schedule(), &unchanged);
        }
    }

    #[test]
    fn test_toy_neighbor() {
        let s = toy_solution();
        let moves: Vec<Move> = s.moves(Neighborhood::N1).unwrap().into_iter().collect();
        assert_eq!(moves, vec![Move::pair(0, 1, 4)]);
        let n = s.neighbor(&moves[0]).unwrap();
        assert_eq!(n.schedule().row(0), &[Some(4), Some(1)]);
        assert_eq!(n.schedule().row(1), s.schedule().row(1));
        assert_eq!(n.cost().unwrap(), 11.0);
        assert_eq!(s.cost().unwrap(), 7.0);
    }

    #[test]
    fn test_format_result() {
        let s = toy_solution();
        // m0 = [1, 4], m1 = [3, 2]
        assert_eq!(s.format_result().unwrap(), "2 2\n0 3\n0 3\n7");
    }

    #[test]
    fn test_format_result_three_by_three_shape() {
        let s = Solution::construct(
            Arc::new(three_by_three()),
            ConstructionHeuristic::Bidirectional,
        )
        .unwrap();
        let out = s.format_result().unwrap();
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "3 3");
        for line in &lines[1..4] {
            assert_eq!(line.split(' ').count(), 3);
            assert!(line.split(' ').all(|t| t.parse::<i64>().is_ok_and(|v| v >= 0)));
        }
        assert_eq!(lines[4], (s.cost().unwrap().round() as i64).to_string());
        assert!(!out.ends_with('\n'));
    }

    #[test]
    fn test_cyclic_schedule_reports_error() {
        let p = Arc::new(toy_problem());
        let mut schedule = Schedule::new(2, 2);
        for op in [4, 1] {
            schedule.place_left(0, op).unwrap();
        }
        for op in [2, 3] {
            schedule.place_left(1, op).unwrap();
        }
        let s = Solution::new(p, schedule);
        assert!(matches!(s.cost(), Err(CriticalPathError::Cycle { .. })));
        assert!(s.format_result().is_err());
    }
}
