// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::{
    id::{BatchId, ContainerId},
    yard::{YardError, YardLayout, YardState},
};
use std::fmt::Display;
use yard_plan_core::slot::SlotPosition;

/// Batch identifier used when the command file does not provide one.
pub const DEFAULT_BATCH_ID: BatchId = BatchId::new(20260117);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemBuildError {
    DuplicateContainer(ContainerId),
    Placement(YardError),
}

impl Display for ProblemBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemBuildError::DuplicateContainer(id) => {
                write!(f, "Snapshot lists {id} more than once")
            }
            ProblemBuildError::Placement(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ProblemBuildError {}

impl From<YardError> for ProblemBuildError {
    fn from(e: YardError) -> Self {
        match e {
            YardError::AlreadyInYard(id) => ProblemBuildError::DuplicateContainer(id),
            other => ProblemBuildError::Placement(other),
        }
    }
}

/// A retrieval-planning instance: the initial yard plus the ordered
/// batch of target containers to bring to the workstation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    yard: YardState,
    targets: Vec<ContainerId>,
    batch_id: BatchId,
}

impl Problem {
    #[inline]
    pub fn layout(&self) -> &YardLayout {
        self.yard.layout()
    }

    /// The authoritative initial yard. Simulation runs clone it and
    /// never mutate it in place.
    #[inline]
    pub fn initial_yard(&self) -> &YardState {
        &self.yard
    }

    /// Targets in command-file order; this is the baseline sequence.
    #[inline]
    pub fn targets(&self) -> &[ContainerId] {
        &self.targets
    }

    #[inline]
    pub fn batch_id(&self) -> BatchId {
        self.batch_id
    }
}

/// Builds a [`Problem`] from snapshot rows and target commands.
///
/// Snapshot rows are placed strictly: each row must land on the current
/// top of its column, which validates that the file is gravity-packed
/// in read order.
#[derive(Debug, Clone)]
pub struct ProblemBuilder {
    yard: YardState,
    targets: Vec<ContainerId>,
    batch_id: BatchId,
}

impl ProblemBuilder {
    pub fn new(layout: YardLayout) -> Self {
        ProblemBuilder {
            yard: YardState::empty(layout),
            targets: Vec::new(),
            batch_id: DEFAULT_BATCH_ID,
        }
    }

    pub fn add_container(
        &mut self,
        id: ContainerId,
        position: SlotPosition,
    ) -> Result<(), ProblemBuildError> {
        self.yard.place(id, position)?;
        Ok(())
    }

    /// Queues `id` for retrieval. Targets referencing containers that
    /// are not in the yard are skipped; the return value reports
    /// whether the target was accepted.
    pub fn add_target(&mut self, id: ContainerId) -> bool {
        if self.yard.position_of(id).is_none() {
            return false;
        }
        self.targets.push(id);
        true
    }

    pub fn batch_id(&mut self, batch_id: BatchId) -> &mut Self {
        self.batch_id = batch_id;
        self
    }

    pub fn build(self) -> Problem {
        Problem {
            yard: self.yard,
            targets: self.targets,
            batch_id: self.batch_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> ProblemBuilder {
        ProblemBuilder::new(YardLayout::new(1, 2, 2, 4).unwrap())
    }

    #[test]
    fn duplicate_snapshot_rows_are_rejected() {
        let mut b = builder();
        b.add_container(ContainerId::new(1), SlotPosition::new(0, 0, 0))
            .unwrap();
        assert_eq!(
            b.add_container(ContainerId::new(1), SlotPosition::new(0, 1, 0)),
            Err(ProblemBuildError::DuplicateContainer(ContainerId::new(1)))
        );
    }

    #[test]
    fn non_packed_snapshot_rows_are_rejected() {
        let mut b = builder();
        let err = b
            .add_container(ContainerId::new(1), SlotPosition::new(0, 0, 1))
            .unwrap_err();
        assert!(matches!(err, ProblemBuildError::Placement(_)));
    }

    #[test]
    fn absent_targets_are_skipped() {
        let mut b = builder();
        b.add_container(ContainerId::new(1), SlotPosition::new(0, 0, 0))
            .unwrap();
        assert!(b.add_target(ContainerId::new(1)));
        assert!(!b.add_target(ContainerId::new(2)));

        let problem = b.build();
        assert_eq!(problem.targets(), &[ContainerId::new(1)]);
        assert_eq!(problem.batch_id(), DEFAULT_BATCH_ID);
        assert_eq!(problem.initial_yard().len(), 1);
    }
}
