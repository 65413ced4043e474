//! Arc-reversal moves and the N1 / NA neighborhood structures.
//!
//! Both neighborhoods are derived from the critical path of a solution:
//!
//! - **N1**: every pair of adjacent critical operations that share a machine
//!   yields a two-operation move reversing that machine arc.
//! - **NA**: N1 plus three-operation moves that also reverse the arc to the
//!   machine predecessor of the first operation or the machine successor of the
//!   second. Three-operation moves can close a cycle in the machine order, so
//!   NA is never selected unless asked for.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;

use crate::config::ConfigError;
use crate::models::{MachineId, OperationId, Problem};
use crate::schedule::Schedule;

/// Neighborhood structure used to generate candidate moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Neighborhood {
    #[default]
    N1,
    NA,
}

impl FromStr for Neighborhood {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "n1" => Ok(Self::N1),
            "na" => Ok(Self::NA),
            _ => Err(ConfigError::UnknownNeighborhood(s.to_string())),
        }
    }
}

impl fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::N1 => write!(f, "n1"),
            Self::NA => write!(f, "na"),
        }
    }
}

/// Ordered sequence of two or three operations on one machine whose arcs are reversed.
///
/// Moves compare by content; the derived ordering (machine, then operation
/// ids) is the canonical order used to break ties during the search.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    machine: MachineId,
    operations: Vec<OperationId>,
}

impl Move {
    /// Swap of `first` and `second`.
    pub fn pair(machine: MachineId, first: OperationId, second: OperationId) -> Self {
        Self {
            machine,
            operations: vec![first, second],
        }
    }

    /// Reversal of the block `first, second, third`.
    pub fn triple(
        machine: MachineId,
        first: OperationId,
        second: OperationId,
        third: OperationId,
    ) -> Self {
        Self {
            machine,
            operations: vec![first, second, third],
        }
    }

    pub fn machine(&self) -> MachineId {
        self.machine
    }

    pub fn operations(&self) -> &[OperationId] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Arcs `(i, j)` reversed by this move, `i` sequenced before `j` prior to the move.
    pub fn arcs(&self) -> Vec<(OperationId, OperationId)> {
        match self.operations.as_slice() {
            &[a, b] => vec![(a, b)],
            &[a, b, c] => vec![(a, b), (a, c), (b, c)],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}(", self.machine)?;
        for (i, op) in self.operations.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", op)?;
        }
        write!(f, ")")
    }
}

/// N1 moves along `path`: adjacent critical operations on the same machine.
pub fn n1_moves(problem: &Problem, path: &[OperationId]) -> BTreeSet<Move> {
    let mut moves = BTreeSet::new();
    for pair in path.windows(2) {
        let prev = problem.operation(pair[0]);
        let cur = problem.operation(pair[1]);
        if let (Some(m_prev), Some(m_cur)) = (prev.machine, cur.machine) {
            if m_prev == m_cur {
                moves.insert(Move::pair(m_cur, prev.id, cur.id));
            }
        }
    }
    moves
}

/// NA moves: N1 plus the three-operation extensions whose chain conditions hold on `path`.
pub fn na_moves(problem: &Problem, schedule: &Schedule, path: &[OperationId]) -> BTreeSet<Move> {
    let n1 = n1_moves(problem, path);
    let position: FxHashMap<OperationId, usize> =
        path.iter().enumerate().map(|(i, &op)| (op, i)).collect();

    // `a` is immediately followed by `b` on the critical path
    let precedes = |a: Option<OperationId>, b: Option<OperationId>| -> bool {
        match (a, b) {
            (Some(a), Some(b)) => position
                .get(&a)
                .and_then(|&i| path.get(i + 1))
                .is_some_and(|&next| next == b),
            _ => false,
        }
    };

    let mut moves = BTreeSet::new();
    for mv in n1 {
        let machine = mv.machine();
        let (u, v) = (mv.operations()[0], mv.operations()[1]);
        let pm_u = schedule.machine_predecessor(machine, u);
        let sm_v = schedule.machine_successor(machine, v);
        let pm_pm_u = pm_u.and_then(|op| schedule.machine_predecessor(machine, op));
        let sm_sm_v = sm_v.and_then(|op| schedule.machine_successor(machine, op));

        if let Some(pm) = pm_u {
            if precedes(Some(pm), Some(u))
                && (sm_v.is_none() || precedes(Some(v), sm_v))
                && (pm_pm_u.is_none() || precedes(pm_pm_u, Some(pm)))
                && (pm_pm_u.is_none() || precedes(Some(v), pm_pm_u))
                && (sm_v.is_none() || precedes(sm_v, Some(pm)))
            {
                moves.insert(Move::triple(machine, pm, u, v));
            }
        }

        if let Some(sm) = sm_v {
            if precedes(Some(v), Some(sm))
                && (pm_u.is_none() || precedes(pm_u, Some(u)))
                && (sm_sm_v.is_none() || precedes(Some(sm), sm_sm_v))
                && (pm_u.is_none() || precedes(Some(v), pm_u))
                && (sm_sm_v.is_none() || precedes(sm_sm_v, Some(u)))
            {
                moves.insert(Move::triple(machine, u, v, sm));
            }
        }

        moves.insert(mv);
    }
    moves
}

/// Candidate moves of the requested neighborhood.
pub fn generate_moves(
    problem: &Problem,
    schedule: &Schedule,
    path: &[OperationId],
    neighborhood: Neighborhood,
) -> BTreeSet<Move> {
    match neighborhood {
        Neighborhood::N1 => n1_moves(problem, path),
        Neighborhood::NA => na_moves(problem, schedule, path),
    }
}
