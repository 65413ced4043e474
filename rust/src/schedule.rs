//! Machine sequencing matrix.
//!
//! A [`Schedule`] holds, per machine, a row of slots that is filled from both
//! ends during construction and afterwards only permuted by moves.

use thiserror::Error;

use crate::models::{MachineId, OperationId};
use crate::moves::Move;

/// Errors that can occur while placing operations or applying a move.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Machine {0} has no free slot left")]
    RowFull(MachineId),
    #[error("Operation {operation} is not sequenced on machine {machine}")]
    OperationNotOnMachine {
        machine: MachineId,
        operation: OperationId,
    },
    #[error("Operations of move {0} do not occupy consecutive slots")]
    NotContiguous(Move),
    #[error("Construction ran out of candidates with {placed} of {total} operations placed")]
    ConstructionStalled { placed: usize, total: usize },
}

/// Per-machine operation order, indexed by (machine, slot).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    rows: Vec<Vec<Option<OperationId>>>,
}

impl Schedule {
    /// Empty schedule with `slots` positions per machine.
    pub fn new(num_machines: usize, slots: usize) -> Self {
        Self {
            rows: vec![vec![None; slots]; num_machines],
        }
    }

    pub fn num_machines(&self) -> usize {
        self.rows.len()
    }

    /// Raw slots of one machine row.
    pub fn row(&self, machine: MachineId) -> &[Option<OperationId>] {
        &self.rows[machine]
    }

    /// Operations sequenced on `machine`, in order, gaps skipped.
    pub fn sequence(&self, machine: MachineId) -> impl Iterator<Item = OperationId> + '_ {
        self.rows[machine].iter().flatten().copied()
    }

    /// Put `operation` in the first free slot counting from the start.
    pub fn place_left(
        &mut self,
        machine: MachineId,
        operation: OperationId,
    ) -> Result<usize, ScheduleError> {
        let row = &mut self.rows[machine];
        let slot = row
            .iter()
            .position(Option::is_none)
            .ok_or(ScheduleError::RowFull(machine))?;
        row[slot] = Some(operation);
        Ok(slot)
    }

    /// Put `operation` in the first free slot counting from the end.
    pub fn place_right(
        &mut self,
        machine: MachineId,
        operation: OperationId,
    ) -> Result<usize, ScheduleError> {
        let row = &mut self.rows[machine];
        let slot = row
            .iter()
            .rposition(Option::is_none)
            .ok_or(ScheduleError::RowFull(machine))?;
        row[slot] = Some(operation);
        Ok(slot)
    }

    /// Slot index of `operation` on `machine`.
    pub fn position(&self, machine: MachineId, operation: OperationId) -> Option<usize> {
        self.rows[machine]
            .iter()
            .position(|slot| *slot == Some(operation))
    }

    /// Operation sequenced right before `operation` on `machine`.
    pub fn machine_predecessor(
        &self,
        machine: MachineId,
        operation: OperationId,
    ) -> Option<OperationId> {
        let pos = self.position(machine, operation)?;
        self.rows[machine][..pos].iter().rev().flatten().next().copied()
    }

    /// Operation sequenced right after `operation` on `machine`.
    pub fn machine_successor(
        &self,
        machine: MachineId,
        operation: OperationId,
    ) -> Option<OperationId> {
        let pos = self.position(machine, operation)?;
        self.rows[machine][pos + 1..].iter().flatten().next().copied()
    }

    /// Number of filled slots over all machines.
    pub fn filled(&self) -> usize {
        self.rows.iter().map(|r| r.iter().flatten().count()).sum()
    }

    /// Apply `mv` in place.
    ///
    /// A two-operation move swaps the two entries. A three-operation move
    /// takes the earliest slot holding any of its operations and writes the
    /// operations there in reverse order; the three must occupy that slot and
    /// the two following ones. On error the schedule is left untouched.
    pub fn apply(&mut self, mv: &Move) -> Result<(), ScheduleError> {
        let machine = mv.machine();
        let ops = mv.operations();
        let mut positions = Vec::with_capacity(ops.len());
        for &operation in ops {
            let pos = self
                .position(machine, operation)
                .ok_or(ScheduleError::OperationNotOnMachine { machine, operation })?;
            positions.push(pos);
        }

        let row = &mut self.rows[machine];
        match positions.as_slice() {
            &[a, b] => row.swap(a, b),
            &[_, _, _] => {
                let start = positions.iter().copied().min().unwrap_or(0);
                let mut sorted = positions.clone();
                sorted.sort_unstable();
                if sorted != [start, start + 1, start + 2] {
                    return Err(ScheduleError::NotContiguous(mv.clone()));
                }
                for (offset, &operation) in ops.iter().rev().enumerate() {
                    row[start + offset] = Some(operation);
                }
            }
            _ => unreachable!("moves hold two or three operations"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_row() -> Schedule {
        let mut s = Schedule::new(1, 4);
        for op in [1, 2, 3, 4] {
            s.place_left(0, op).unwrap();
        }
        s
    }

    #[test]
    fn test_place_from_both_ends() {
        let mut s = Schedule::new(2, 3);
        assert_eq!(s.place_left(0, 1), Ok(0));
        assert_eq!(s.place_right(0, 2), Ok(2));
        assert_eq!(s.place_left(0, 3), Ok(1));
        assert_eq!(s.place_left(0, 4), Err(ScheduleError::RowFull(0)));
        assert_eq!(s.row(0), &[Some(1), Some(3), Some(2)]);
        assert_eq!(s.row(1), &[None, None, None]);
        assert_eq!(s.filled(), 3);
    }

    #[test]
    fn test_machine_neighbors_skip_gaps() {
        let mut s = Schedule::new(1, 4);
        s.place_left(0, 1).unwrap();
        s.place_right(0, 2).unwrap();
        assert_eq!(s.machine_successor(0, 1), Some(2));
        assert_eq!(s.machine_predecessor(0, 2), Some(1));
        assert_eq!(s.machine_predecessor(0, 1), None);
        assert_eq!(s.machine_successor(0, 2), None);
        assert_eq!(s.machine_successor(0, 9), None);
        assert_eq!(s.sequence(0).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_apply_swap() {
        let mut s = filled_row();
        s.apply(&Move::pair(0, 2, 3)).unwrap();
        assert_eq!(s.sequence(0).collect::<Vec<_>>(), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_apply_triple_reverses_block() {
        let mut s = filled_row();
        s.apply(&Move::triple(0, 2, 3, 4)).unwrap();
        assert_eq!(s.sequence(0).collect::<Vec<_>>(), vec![1, 4, 3, 2]);
    }

    #[test]
    fn test_apply_missing_operation_leaves_schedule() {
        let mut s = filled_row();
        let before = s.clone();
        let err = s.apply(&Move::pair(0, 2, 7)).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::OperationNotOnMachine {
                machine: 0,
                operation: 7
            }
        );
        assert_eq!(s, before);
    }

    #[test]
    fn test_apply_triple_not_contiguous() {
        let mut s = filled_row();
        let before = s.clone();
        let mv = Move::triple(0, 1, 2, 4);
        assert_eq!(s.apply(&mv), Err(ScheduleError::NotContiguous(mv.clone())));
        assert_eq!(s, before);
    }
}
