//! Weighted DAG derived from a problem and a complete schedule.

use crate::models::{OperationId, Problem};
use crate::schedule::Schedule;

/// Adjacency lists of the disjunctive graph with the machine order fixed.
///
/// Edge weights use the half-duration convention: an arc `a -> b` weighs
/// `d(a)/2 + d(b)/2`, source arcs weigh half the first operation and sink
/// arcs half the last one, so a source-to-sink path length equals the sum of
/// the durations on it.
#[derive(Clone, Debug)]
pub struct DisjunctiveGraph {
    successors: Vec<Vec<(OperationId, f64)>>,
}

impl DisjunctiveGraph {
    /// Build the graph. Edge lists are filled in a fixed order: source arcs
    /// by job, then job arcs, then machine arcs by machine.
    pub fn build(problem: &Problem, schedule: &Schedule) -> Self {
        let n = problem.num_operations();
        let mut successors: Vec<Vec<(OperationId, f64)>> = vec![Vec::new(); n];
        let source = problem.source();
        let sink = problem.sink();

        for job in problem.jobs() {
            if let (Some(&first), Some(&last)) = (job.first(), job.last()) {
                successors[source].push((first, problem.operation(first).half_duration()));
                successors[last].push((sink, problem.operation(last).half_duration()));
            }
        }

        for op in problem.operations() {
            if let Some(next) = problem.job_successor(op.id) {
                let weight = op.half_duration() + problem.operation(next).half_duration();
                successors[op.id].push((next, weight));
            }
        }

        for machine in 0..schedule.num_machines() {
            let sequence: Vec<OperationId> = schedule.sequence(machine).collect();
            for pair in sequence.windows(2) {
                let weight = problem.operation(pair[0]).half_duration()
                    + problem.operation(pair[1]).half_duration();
                successors[pair[0]].push((pair[1], weight));
            }
        }

        Self { successors }
    }

    pub fn len(&self) -> usize {
        self.successors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    #[inline]
    pub fn successors(&self, id: OperationId) -> &[(OperationId, f64)] {
        &self.successors[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::toy_problem;

    #[test]
    fn test_edges_and_half_weights() {
        let p = toy_problem();
        let mut s = Schedule::new(2, 2);
        // machine 0: op1 then op4; machine 1: op3 then op2
        s.place_left(0, 1).unwrap();
        s.place_left(0, 4).unwrap();
        s.place_left(1, 3).unwrap();
        s.place_left(1, 2).unwrap();

        let g = DisjunctiveGraph::build(&p, &s);
        assert_eq!(g.len(), 6);
        assert_eq!(g.successors(0), &[(1, 1.5), (3, 1.0)]);
        // job arc to the sink, nothing on machine 1 after op2
        assert_eq!(g.successors(2), &[(5, 1.0)]);
        // job arc 1 -> 2, machine arc 1 -> 4
        assert_eq!(g.successors(1), &[(2, 2.5), (4, 3.5)]);
        assert_eq!(g.successors(3), &[(4, 3.0), (2, 2.0)]);
        assert!(g.successors(5).is_empty());
    }
}
