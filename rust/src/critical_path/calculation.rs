//! Longest-path evaluation of a complete schedule.

use crate::models::{OperationId, Problem};
use crate::schedule::Schedule;

use super::graph::DisjunctiveGraph;
use super::types::{CriticalPathError, CriticalPathResult, Label};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    OnStack,
    Done,
}

/// Topological order of every node via depth-first postorder.
///
/// Uses an explicit work stack so deep instances cannot overflow the call
/// stack. Roots are tried in ascending id order and successors in edge order,
/// which makes the result deterministic. A back edge means the machine order
/// closed a cycle.
pub fn topological_order(graph: &DisjunctiveGraph) -> Result<Vec<OperationId>, CriticalPathError> {
    let n = graph.len();
    let mut visit = vec![Visit::New; n];
    let mut postorder: Vec<OperationId> = Vec::with_capacity(n);
    // (node, index of the next outgoing edge to explore)
    let mut stack: Vec<(OperationId, usize)> = Vec::new();

    for root in 0..n {
        if visit[root] != Visit::New {
            continue;
        }
        visit[root] = Visit::OnStack;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            match graph.successors(node).get(frame.1) {
                Some(&(next, _)) => {
                    frame.1 += 1;
                    match visit[next] {
                        Visit::New => {
                            visit[next] = Visit::OnStack;
                            stack.push((next, 0));
                        }
                        Visit::OnStack => {
                            return Err(CriticalPathError::Cycle { operation: next });
                        }
                        Visit::Done => {}
                    }
                }
                None => {
                    visit[node] = Visit::Done;
                    postorder.push(node);
                    stack.pop();
                }
            }
        }
    }

    postorder.reverse();
    Ok(postorder)
}

/// Compute the critical path of `schedule` and its length.
///
/// Labels start at negative infinity except the source. Operations are
/// relaxed in topological order with a strict `<`, so on equal distances the
/// predecessor found first in edge order is kept.
pub fn calculate_critical_path(
    problem: &Problem,
    schedule: &Schedule,
) -> Result<CriticalPathResult, CriticalPathError> {
    let graph = DisjunctiveGraph::build(problem, schedule);
    let order = topological_order(&graph)?;
    let n = graph.len();
    let source = problem.source();
    let sink = problem.sink();

    let mut labels = vec![Label::unreached(); n];
    labels[source].distance = 0.0;

    for &op in &order {
        let label = labels[op];
        if !label.is_reached() {
            continue;
        }
        for &(next, weight) in graph.successors(op) {
            let candidate = label.distance + weight;
            if labels[next].distance < candidate {
                labels[next] = Label {
                    distance: candidate,
                    predecessor: Some(op),
                };
            }
        }
    }

    if let Some(operation) = labels.iter().position(|l| !l.is_reached()) {
        return Err(CriticalPathError::UnreachableOperation { operation });
    }

    let mut path = vec![sink];
    let mut current = sink;
    while let Some(prev) = labels[current].predecessor {
        path.push(prev);
        current = prev;
        if path.len() > n {
            return Err(CriticalPathError::BrokenPath);
        }
    }
    if current != source {
        return Err(CriticalPathError::BrokenPath);
    }
    path.reverse();

    let earliest_starts = labels
        .iter()
        .enumerate()
        .map(|(id, label)| label.distance - problem.operation(id).half_duration())
        .collect();

    Ok(CriticalPathResult {
        path,
        length: labels[sink].distance,
        earliest_starts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::toy_problem;

    fn toy_schedule(m0: [OperationId; 2], m1: [OperationId; 2]) -> Schedule {
        let mut s = Schedule::new(2, 2);
        for op in m0 {
            s.place_left(0, op).unwrap();
        }
        for op in m1 {
            s.place_left(1, op).unwrap();
        }
        s
    }

    #[test]
    fn test_topological_order_respects_edges() {
        let p = toy_problem();
        let s = toy_schedule([1, 4], [3, 2]);
        let g = DisjunctiveGraph::build(&p, &s);
        let order = topological_order(&g).unwrap();
        assert_eq!(order.len(), 6);
        let mut rank = vec![0; 6];
        for (i, &op) in order.iter().enumerate() {
            rank[op] = i;
        }
        for op in 0..6 {
            for &(next, _) in g.successors(op) {
                assert!(rank[op] < rank[next], "{} must precede {}", op, next);
            }
        }
        assert_eq!(order[0], 0);
    }

    #[test]
    fn test_critical_path_on_toy_schedule() {
        let p = toy_problem();
        let s = toy_schedule([1, 4], [3, 2]);
        let result = calculate_critical_path(&p, &s).unwrap();
        assert_eq!(result.path, vec![0, 1, 4, 5]);
        assert_eq!(result.length, 7.0);
        assert_eq!(result.earliest_starts[1], 0.0);
        assert_eq!(result.earliest_starts[2], 3.0);
        assert_eq!(result.earliest_starts[3], 0.0);
        assert_eq!(result.earliest_starts[4], 3.0);
        assert_eq!(result.earliest_starts[5], 7.0);
    }

    #[test]
    fn test_path_length_is_sum_of_durations() {
        let p = toy_problem();
        let s = toy_schedule([4, 1], [2, 3]);
        // cycle: 1 -> 2 (job), 2 -> 3 (machine), 3 -> 4 (job), 4 -> 1 (machine)
        assert!(matches!(
            calculate_critical_path(&p, &s),
            Err(CriticalPathError::Cycle { .. })
        ));

        let s = toy_schedule([4, 1], [3, 2]);
        let result = calculate_critical_path(&p, &s).unwrap();
        let total: u32 = result.path.iter().map(|&id| p.operation(id).duration).sum();
        assert_eq!(result.length, total as f64);
        // op3 (2) -> op4 (4) -> op1 (3) -> op2 (2)
        assert_eq!(result.length, 11.0);
        assert_eq!(result.path, vec![0, 3, 4, 1, 2, 5]);
    }

    #[test]
    fn test_row_with_gap() {
        // machine 1 carries a single operation, leaving an empty slot
        let p = Problem::from_routes(&[vec![(0, 2)], vec![(0, 3), (1, 1)]], 2, None).unwrap();
        let mut s = Schedule::new(2, 2);
        s.place_left(0, 1).unwrap();
        s.place_left(0, 2).unwrap();
        s.place_right(1, 3).unwrap();

        let result = calculate_critical_path(&p, &s).unwrap();
        assert_eq!(result.length, 6.0);
        assert_eq!(result.path, vec![0, 1, 2, 3, 4]);
        assert_eq!(result.earliest_starts[2], 2.0);
        assert_eq!(result.earliest_starts[3], 5.0);
    }
}
