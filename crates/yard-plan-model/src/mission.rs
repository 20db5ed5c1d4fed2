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

use crate::id::{BatchId, ContainerId};
use std::fmt::Display;
use yard_plan_core::slot::SlotPosition;

/// Rendering of the out-of-yard location in the mission-plan CSV.
pub const WORKSTATION_LABEL: &str = "work station";

/// Epoch second all planned mission timestamps count from.
pub const DEFAULT_BASE_TIME: i64 = 1_705_363_200;

/// Seconds between the planned start times of consecutive missions.
pub const MISSION_TIME_STEP: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissionKind {
    /// Deliver the requested container to the workstation.
    Target,
    /// Move a blocker aside to uncover a target.
    Block,
    /// Put a retrieved container back into the yard.
    Return,
}

impl MissionKind {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            MissionKind::Target => "target",
            MissionKind::Block => "block",
            MissionKind::Return => "return",
        }
    }
}

impl Display for MissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissionStatus {
    Planned,
}

impl MissionStatus {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            MissionStatus::Planned => "PLANNED",
        }
    }
}

impl Display for MissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned crane move. `src`/`dst` of `None` mean the workstation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mission {
    mission_no: u32,
    kind: MissionKind,
    batch_id: BatchId,
    container_id: ContainerId,
    src: Option<SlotPosition>,
    dst: Option<SlotPosition>,
    priority: u32,
    status: MissionStatus,
    created_time: i64,
}

impl Mission {
    /// A retrieval of `container_id` from `src` to the workstation.
    pub fn target(batch_id: BatchId, container_id: ContainerId, src: Option<SlotPosition>) -> Self {
        Mission {
            mission_no: 0,
            kind: MissionKind::Target,
            batch_id,
            container_id,
            src,
            dst: None,
            priority: 0,
            status: MissionStatus::Planned,
            created_time: 0,
        }
    }

    /// A reshuffle of the blocker `container_id` between two columns.
    pub fn block(
        batch_id: BatchId,
        container_id: ContainerId,
        src: SlotPosition,
        dst: SlotPosition,
    ) -> Self {
        Mission {
            mission_no: 0,
            kind: MissionKind::Block,
            batch_id,
            container_id,
            src: Some(src),
            dst: Some(dst),
            priority: 0,
            status: MissionStatus::Planned,
            created_time: 0,
        }
    }

    /// A return of `container_id` from the workstation into the yard.
    pub fn back_into_yard(batch_id: BatchId, container_id: ContainerId, dst: SlotPosition) -> Self {
        Mission {
            mission_no: 0,
            kind: MissionKind::Return,
            batch_id,
            container_id,
            src: None,
            dst: Some(dst),
            priority: 0,
            status: MissionStatus::Planned,
            created_time: 0,
        }
    }

    #[inline]
    pub fn mission_no(&self) -> u32 {
        self.mission_no
    }

    #[inline]
    pub fn kind(&self) -> MissionKind {
        self.kind
    }

    #[inline]
    pub fn batch_id(&self) -> BatchId {
        self.batch_id
    }

    #[inline]
    pub fn container_id(&self) -> ContainerId {
        self.container_id
    }

    #[inline]
    pub fn src(&self) -> Option<SlotPosition> {
        self.src
    }

    #[inline]
    pub fn dst(&self) -> Option<SlotPosition> {
        self.dst
    }

    #[inline]
    pub fn priority(&self) -> u32 {
        self.priority
    }

    #[inline]
    pub fn status(&self) -> MissionStatus {
        self.status
    }

    #[inline]
    pub fn created_time(&self) -> i64 {
        self.created_time
    }

    #[inline]
    pub fn src_label(&self) -> String {
        position_label(self.src)
    }

    #[inline]
    pub fn dst_label(&self) -> String {
        position_label(self.dst)
    }
}

fn position_label(position: Option<SlotPosition>) -> String {
    match position {
        Some(p) => p.to_string(),
        None => WORKSTATION_LABEL.to_string(),
    }
}

/// Final pass over a recorded plan: mission numbers and priorities
/// become the 1-based position in the log, start times step by
/// [`MISSION_TIME_STEP`] from `base_time`.
pub fn renumber_missions(missions: &mut [Mission], base_time: i64) {
    for (index, mission) in missions.iter_mut().enumerate() {
        let serial = (index + 1) as u32;
        mission.mission_no = serial;
        mission.priority = serial;
        mission.created_time = base_time + index as i64 * MISSION_TIME_STEP;
    }
}
