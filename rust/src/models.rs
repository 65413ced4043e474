//! Core data types for a job shop instance.
//!
//! A [`Problem`] is the disjunctive-graph view of an instance: the operation set
//! `V` (including a synthetic source and sink), the per-job processing order `A`
//! and the per-machine membership `E`. It is immutable once built and is shared
//! between solutions through an `Arc`.

use thiserror::Error;

/// Dense operation index. `0` is the source, `num_operations() - 1` the sink.
pub type OperationId = usize;
/// Job index in `[0, num_jobs)`.
pub type JobId = usize;
/// Machine index in `[0, num_machines)`.
pub type MachineId = usize;

/// Errors raised when operation, job and machine data do not form a valid instance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProblemError {
    #[error("Instance has no jobs")]
    NoJobs,
    #[error("Instance has no machines")]
    NoMachines,
    #[error("Job {0} has no operations")]
    EmptyJob(JobId),
    #[error("Operation of job {job} uses machine {machine}, but only {num_machines} machines exist")]
    MachineOutOfRange {
        job: JobId,
        machine: MachineId,
        num_machines: usize,
    },
    #[error("Operation {0} is listed in more than one job or machine")]
    DuplicateOperation(OperationId),
    #[error("Operation {0} is not listed in exactly one job and one machine")]
    UnassignedOperation(OperationId),
    #[error("Operation at index {index} carries id {id}")]
    MisnumberedOperation { index: usize, id: OperationId },
    #[error("Operation {operation} is listed in job {listed} but declares job {declared:?}")]
    JobMismatch {
        operation: OperationId,
        listed: JobId,
        declared: Option<JobId>,
    },
    #[error("Operation {operation} is listed on machine {listed} but declares machine {declared:?}")]
    MachineMismatch {
        operation: OperationId,
        listed: MachineId,
        declared: Option<MachineId>,
    },
    #[error("Sentinel operation {0} must not carry a job or machine")]
    SentinelAssigned(OperationId),
}

/// A single operation of the instance.
///
/// Equality and hashing use the id only. Source and sink carry neither job nor
/// machine and are told apart by their reserved ids.
#[derive(Clone, Copy, Debug)]
pub struct Operation {
    pub id: OperationId,
    pub duration: u32,
    pub job: Option<JobId>,
    pub machine: Option<MachineId>,
}

impl Operation {
    /// Source or sink.
    pub fn is_sentinel(&self) -> bool {
        self.job.is_none() && self.machine.is_none()
    }

    /// Half of the processing time, the weight convention of the critical path graph.
    pub fn half_duration(&self) -> f64 {
        self.duration as f64 / 2.0
    }
}

impl PartialEq for Operation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Operation {}

impl std::hash::Hash for Operation {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Immutable job shop instance.
#[derive(Clone, Debug)]
pub struct Problem {
    operations: Vec<Operation>,
    jobs: Vec<Vec<OperationId>>,
    machines: Vec<Vec<OperationId>>,
    /// Position of each operation inside its job, indexed by operation id.
    job_position: Vec<usize>,
    optimal_cost: Option<f64>,
}

impl Problem {
    /// Build an instance from job routings.
    ///
    /// `routes[j]` lists job `j`'s operations in processing order as
    /// `(machine, duration)` pairs. Operation ids are assigned in job order
    /// starting at 1; the source is 0 and the sink is the last id.
    pub fn from_routes(
        routes: &[Vec<(MachineId, u32)>],
        num_machines: usize,
        optimal_cost: Option<f64>,
    ) -> Result<Self, ProblemError> {
        if routes.is_empty() {
            return Err(ProblemError::NoJobs);
        }
        if num_machines == 0 {
            return Err(ProblemError::NoMachines);
        }

        let total: usize = routes.iter().map(Vec::len).sum();
        let mut operations = Vec::with_capacity(total + 2);
        operations.push(Operation {
            id: 0,
            duration: 0,
            job: None,
            machine: None,
        });

        let mut jobs = Vec::with_capacity(routes.len());
        let mut machines = vec![Vec::new(); num_machines];

        for (job, route) in routes.iter().enumerate() {
            if route.is_empty() {
                return Err(ProblemError::EmptyJob(job));
            }
            let mut sequence = Vec::with_capacity(route.len());
            for &(machine, duration) in route {
                if machine >= num_machines {
                    return Err(ProblemError::MachineOutOfRange {
                        job,
                        machine,
                        num_machines,
                    });
                }
                let id = operations.len();
                operations.push(Operation {
                    id,
                    duration,
                    job: Some(job),
                    machine: Some(machine),
                });
                sequence.push(id);
                machines[machine].push(id);
            }
            jobs.push(sequence);
        }

        let sink = operations.len();
        operations.push(Operation {
            id: sink,
            duration: 0,
            job: None,
            machine: None,
        });

        Self::new(operations, jobs, machines, optimal_cost)
    }

    /// Build an instance from explicit `V`, `A` and `E`.
    ///
    /// `operations[i]` must carry id `i`. Every non-sentinel operation must
    /// appear in exactly one job list and exactly one machine list, and its
    /// own `job` and `machine` must name those lists. Source and sink carry
    /// neither.
    pub fn new(
        operations: Vec<Operation>,
        jobs: Vec<Vec<OperationId>>,
        machines: Vec<Vec<OperationId>>,
        optimal_cost: Option<f64>,
    ) -> Result<Self, ProblemError> {
        if jobs.is_empty() {
            return Err(ProblemError::NoJobs);
        }
        if machines.is_empty() {
            return Err(ProblemError::NoMachines);
        }

        let n = operations.len();
        for (index, op) in operations.iter().enumerate() {
            if op.id != index {
                return Err(ProblemError::MisnumberedOperation { index, id: op.id });
            }
        }
        for id in [0, n.saturating_sub(1)] {
            if operations.get(id).is_some_and(|op| !op.is_sentinel()) {
                return Err(ProblemError::SentinelAssigned(id));
            }
        }

        let mut in_job = vec![false; n];
        let mut in_machine = vec![false; n];
        let mut job_position = vec![0; n];

        for (job, sequence) in jobs.iter().enumerate() {
            if sequence.is_empty() {
                return Err(ProblemError::EmptyJob(job));
            }
            for (pos, &id) in sequence.iter().enumerate() {
                if id == 0 || id + 1 >= n {
                    return Err(ProblemError::UnassignedOperation(id));
                }
                if in_job[id] {
                    return Err(ProblemError::DuplicateOperation(id));
                }
                if operations[id].job != Some(job) {
                    return Err(ProblemError::JobMismatch {
                        operation: id,
                        listed: job,
                        declared: operations[id].job,
                    });
                }
                in_job[id] = true;
                job_position[id] = pos;
            }
        }

        for (machine, sequence) in machines.iter().enumerate() {
            for &id in sequence {
                if id == 0 || id + 1 >= n {
                    return Err(ProblemError::UnassignedOperation(id));
                }
                if in_machine[id] {
                    return Err(ProblemError::DuplicateOperation(id));
                }
                if operations[id].machine != Some(machine) {
                    return Err(ProblemError::MachineMismatch {
                        operation: id,
                        listed: machine,
                        declared: operations[id].machine,
                    });
                }
                in_machine[id] = true;
            }
        }

        for id in 1..n.saturating_sub(1) {
            if !in_job[id] || !in_machine[id] {
                return Err(ProblemError::UnassignedOperation(id));
            }
        }

        Ok(Self {
            operations,
            jobs,
            machines,
            job_position,
            optimal_cost,
        })
    }

    /// Number of operations, source and sink included.
    pub fn num_operations(&self) -> usize {
        self.operations.len()
    }

    pub fn num_jobs(&self) -> usize {
        self.jobs.len()
    }

    pub fn num_machines(&self) -> usize {
        self.machines.len()
    }

    pub fn source(&self) -> OperationId {
        0
    }

    pub fn sink(&self) -> OperationId {
        self.operations.len() - 1
    }

    #[inline]
    pub fn operation(&self, id: OperationId) -> &Operation {
        &self.operations[id]
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Operations of `job` in processing order.
    pub fn job_operations(&self, job: JobId) -> &[OperationId] {
        &self.jobs[job]
    }

    /// Operations that must be sequenced on `machine`, in no particular order.
    pub fn machine_operations(&self, machine: MachineId) -> &[OperationId] {
        &self.machines[machine]
    }

    pub fn jobs(&self) -> &[Vec<OperationId>] {
        &self.jobs
    }

    /// Width of the schedule matrix.
    pub fn max_operations_per_machine(&self) -> usize {
        self.machines.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Immediate successor of `id` within its own job.
    pub fn job_successor(&self, id: OperationId) -> Option<OperationId> {
        let job = self.operations.get(id)?.job?;
        self.jobs[job].get(self.job_position[id] + 1).copied()
    }

    /// Immediate predecessor of `id` within its own job.
    pub fn job_predecessor(&self, id: OperationId) -> Option<OperationId> {
        let job = self.operations.get(id)?.job?;
        let pos = self.job_position[id].checked_sub(1)?;
        Some(self.jobs[job][pos])
    }

    pub fn optimal_cost(&self) -> Option<f64> {
        self.optimal_cost
    }

    /// Simple lower bound on the makespan: the largest job or machine load.
    pub fn lower_bound(&self) -> u64 {
        let load = |ids: &Vec<OperationId>| -> u64 {
            ids.iter()
                .map(|&id| self.operations[id].duration as u64)
                .sum()
        };
        let job_bound = self.jobs.iter().map(load).max().unwrap_or(0);
        let machine_bound = self.machines.iter().map(load).max().unwrap_or(0);
        job_bound.max(machine_bound)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two jobs on two machines, crossing routes.
    pub(crate) fn toy_problem() -> Problem {
        Problem::from_routes(&[vec![(0, 3), (1, 2)], vec![(1, 2), (0, 4)]], 2, None).unwrap()
    }

    /// Three jobs on three machines.
    pub(crate) fn three_by_three() -> Problem {
        Problem::from_routes(
            &[
                vec![(0, 3), (1, 2), (2, 2)],
                vec![(0, 2), (2, 1), (1, 4)],
                vec![(1, 4), (2, 3), (0, 1)],
            ],
            3,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_from_routes_assigns_dense_ids() {
        let p = toy_problem();
        assert_eq!(p.num_operations(), 6);
        assert_eq!(p.num_jobs(), 2);
        assert_eq!(p.num_machines(), 2);
        assert_eq!(p.source(), 0);
        assert_eq!(p.sink(), 5);
        assert_eq!(p.job_operations(0), &[1, 2]);
        assert_eq!(p.job_operations(1), &[3, 4]);
        assert_eq!(p.machine_operations(0), &[1, 4]);
        assert_eq!(p.machine_operations(1), &[2, 3]);
        assert!(p.operation(0).is_sentinel());
        assert!(p.operation(5).is_sentinel());
        assert!(!p.operation(1).is_sentinel());
    }

    #[test]
    fn test_job_neighbors() {
        let p = three_by_three();
        assert_eq!(p.job_successor(1), Some(2));
        assert_eq!(p.job_successor(3), None);
        assert_eq!(p.job_predecessor(1), None);
        assert_eq!(p.job_predecessor(6), Some(5));
        assert_eq!(p.job_successor(0), None);
        assert_eq!(p.job_predecessor(p.sink()), None);
    }

    #[test]
    fn test_lower_bound() {
        let p = toy_problem();
        // machine 0 carries 3 + 4
        assert_eq!(p.lower_bound(), 7);
    }

    #[test]
    fn test_machine_out_of_range() {
        let err = Problem::from_routes(&[vec![(2, 1)]], 2, None).unwrap_err();
        assert_eq!(
            err,
            ProblemError::MachineOutOfRange {
                job: 0,
                machine: 2,
                num_machines: 2
            }
        );
    }

    #[test]
    fn test_duplicate_operation_rejected() {
        let ops = (0..4)
            .map(|id| Operation {
                id,
                duration: 1,
                job: (id != 0 && id != 3).then_some(0),
                machine: (id != 0 && id != 3).then_some(0),
            })
            .collect();
        let err = Problem::new(ops, vec![vec![1, 2]], vec![vec![1, 1]], None).unwrap_err();
        assert_eq!(err, ProblemError::DuplicateOperation(1));
    }

    #[test]
    fn test_unassigned_operation_rejected() {
        let ops = (0..4)
            .map(|id| Operation {
                id,
                duration: 1,
                job: (id != 0 && id != 3).then_some(0),
                machine: (id == 1).then_some(0),
            })
            .collect();
        let err = Problem::new(ops, vec![vec![1, 2]], vec![vec![1]], None).unwrap_err();
        assert_eq!(err, ProblemError::UnassignedOperation(2));
    }

    fn toy_parts() -> (Vec<Operation>, Vec<Vec<OperationId>>, Vec<Vec<OperationId>>) {
        let p = toy_problem();
        (p.operations, p.jobs, p.machines)
    }

    #[test]
    fn test_toy_parts_are_accepted() {
        let (ops, jobs, machines) = toy_parts();
        assert!(Problem::new(ops, jobs, machines, None).is_ok());
    }

    #[test]
    fn test_misnumbered_operation_rejected() {
        let (mut ops, jobs, machines) = toy_parts();
        ops[1].id = 7;
        ops[1].job = Some(3);
        let err = Problem::new(ops, jobs, machines, None).unwrap_err();
        assert_eq!(err, ProblemError::MisnumberedOperation { index: 1, id: 7 });
    }

    #[test]
    fn test_job_mismatch_rejected() {
        let (mut ops, jobs, machines) = toy_parts();
        // listed in job 1
        ops[3].job = Some(0);
        let err = Problem::new(ops, jobs, machines, None).unwrap_err();
        assert_eq!(
            err,
            ProblemError::JobMismatch {
                operation: 3,
                listed: 1,
                declared: Some(0),
            }
        );
    }

    #[test]
    fn test_job_out_of_range_rejected() {
        let (mut ops, jobs, machines) = toy_parts();
        ops[2].job = Some(9);
        let err = Problem::new(ops, jobs, machines, None).unwrap_err();
        assert_eq!(
            err,
            ProblemError::JobMismatch {
                operation: 2,
                listed: 0,
                declared: Some(9),
            }
        );
    }

    #[test]
    fn test_machine_mismatch_rejected() {
        let (mut ops, jobs, machines) = toy_parts();
        // listed on machine 0
        ops[1].machine = Some(5);
        let err = Problem::new(ops, jobs, machines, None).unwrap_err();
        assert_eq!(
            err,
            ProblemError::MachineMismatch {
                operation: 1,
                listed: 0,
                declared: Some(5),
            }
        );
    }

    #[test]
    fn test_missing_machine_field_rejected() {
        let (mut ops, jobs, machines) = toy_parts();
        ops[4].machine = None;
        let err = Problem::new(ops, jobs, machines, None).unwrap_err();
        assert_eq!(
            err,
            ProblemError::MachineMismatch {
                operation: 4,
                listed: 0,
                declared: None,
            }
        );
    }

    #[test]
    fn test_assigned_sentinel_rejected() {
        let (mut ops, jobs, machines) = toy_parts();
        ops[5].machine = Some(0);
        let err = Problem::new(ops, jobs.clone(), machines.clone(), None).unwrap_err();
        assert_eq!(err, ProblemError::SentinelAssigned(5));

        let (mut ops, _, _) = toy_parts();
        ops[0].job = Some(1);
        let err = Problem::new(ops, jobs, machines, None).unwrap_err();
        assert_eq!(err, ProblemError::SentinelAssigned(0));
    }

    #[test]
    fn test_operation_equality_by_id() {
        let a = Operation {
            id: 1,
            duration: 3,
            job: Some(0),
            machine: Some(0),
        };
        let b = Operation {
            id: 2,
            duration: 3,
            job: Some(0),
            machine: Some(0),
        };
        assert_ne!(a, b);
        assert_eq!(a, Operation { duration: 9, ..a });
    }
}
