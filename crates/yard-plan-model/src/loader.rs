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
    err::LoadError,
    id::{BatchId, ContainerId},
    yard::YardLayout,
};
use serde::Deserialize;
use std::{collections::HashSet, fs::File, io::Read, path::Path};
use tracing::debug;
use yard_plan_core::slot::SlotPosition;

#[derive(Debug, Deserialize)]
struct RawLayoutRow {
    max_row: usize,
    max_bay: usize,
    max_level: usize,
    total_boxes: usize,
}

#[derive(Debug, Deserialize)]
struct RawSnapshotRow {
    container_id: u32,
    row: usize,
    bay: usize,
    level: usize,
}

#[derive(Debug, Deserialize)]
struct RawCommandRow {
    cmd_no: u32,
    batch_id: u32,
    cmd_type: String,
    cmd_priority: u32,
    parent_carrier_id: u32,
    src_row: i64,
    src_bay: i64,
    src_level: i64,
    dest_row: Option<i64>,
    dest_bay: Option<i64>,
    dest_level: Option<i64>,
    create_time: Option<i64>,
}

/// One `mock_yard.csv` row: a container and the slot it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotRecord {
    id: ContainerId,
    position: SlotPosition,
}

impl SnapshotRecord {
    #[inline]
    pub const fn new(id: ContainerId, position: SlotPosition) -> Self {
        SnapshotRecord { id, position }
    }

    #[inline]
    pub const fn id(&self) -> ContainerId {
        self.id
    }

    #[inline]
    pub const fn position(&self) -> SlotPosition {
        self.position
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Target,
    Block,
    /// Anything the planner does not act on; kept so foreign rows pass
    /// through loading without failing the run.
    Other,
}

impl CommandKind {
    fn parse(raw: &str) -> Self {
        match raw.trim() {
            "target" => CommandKind::Target,
            "block" => CommandKind::Block,
            _ => CommandKind::Other,
        }
    }
}

/// One `mock_commands.csv` row. Coordinates of `-1` (or missing
/// trailing fields) collapse to `None`, the workstation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    cmd_no: u32,
    batch_id: BatchId,
    kind: CommandKind,
    priority: u32,
    carrier: ContainerId,
    src: Option<SlotPosition>,
    dst: Option<SlotPosition>,
    create_time: i64,
}

impl CommandRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cmd_no: u32,
        batch_id: BatchId,
        kind: CommandKind,
        priority: u32,
        carrier: ContainerId,
        src: Option<SlotPosition>,
        dst: Option<SlotPosition>,
        create_time: i64,
    ) -> Self {
        CommandRecord {
            cmd_no,
            batch_id,
            kind,
            priority,
            carrier,
            src,
            dst,
            create_time,
        }
    }

    #[inline]
    pub fn cmd_no(&self) -> u32 {
        self.cmd_no
    }

    #[inline]
    pub fn batch_id(&self) -> BatchId {
        self.batch_id
    }

    #[inline]
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    #[inline]
    pub fn priority(&self) -> u32 {
        self.priority
    }

    #[inline]
    pub fn carrier(&self) -> ContainerId {
        self.carrier
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
    pub fn create_time(&self) -> i64 {
        self.create_time
    }
}

fn slot_from_signed(row: i64, bay: i64, level: i64) -> Option<SlotPosition> {
    if row < 0 || bay < 0 || level < 0 {
        return None;
    }
    Some(SlotPosition::new(row as usize, bay as usize, level as usize))
}

/// Reads `yard_config.csv`. Zero or inconsistent values surface as
/// [`LoadError::Layout`]; the caller decides whether to fall back.
pub fn load_layout_reader<R: Read>(reader: R) -> Result<YardLayout, LoadError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let row: RawLayoutRow = match rdr.deserialize().next() {
        Some(row) => row?,
        None => return Err(LoadError::EmptyConfig),
    };
    Ok(YardLayout::new(
        row.max_row,
        row.max_bay,
        row.max_level,
        row.total_boxes,
    )?)
}

pub fn load_layout_path(path: impl AsRef<Path>) -> Result<YardLayout, LoadError> {
    load_layout_reader(File::open(path)?)
}

/// Reads `mock_yard.csv` in file order. The order matters: snapshots
/// are gravity-packed per column only when replayed as read.
pub fn load_snapshot_reader<R: Read>(reader: R) -> Result<Vec<SnapshotRecord>, LoadError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    let mut seen: HashSet<ContainerId> = HashSet::new();
    for row in rdr.deserialize() {
        let row: RawSnapshotRow = row?;
        let id = ContainerId::new(row.container_id);
        if !seen.insert(id) {
            return Err(LoadError::DuplicateContainer(id));
        }
        records.push(SnapshotRecord::new(
            id,
            SlotPosition::new(row.row, row.bay, row.level),
        ));
    }
    debug!(containers = records.len(), "yard snapshot loaded");
    Ok(records)
}

pub fn load_snapshot_path(path: impl AsRef<Path>) -> Result<Vec<SnapshotRecord>, LoadError> {
    load_snapshot_reader(File::open(path)?)
}

/// Reads `mock_commands.csv`, tolerating truncated destination fields
/// the way the upstream emitters produce them.
pub fn load_commands_reader<R: Read>(reader: R) -> Result<Vec<CommandRecord>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut records = Vec::new();
    for row in rdr.deserialize() {
        let row: RawCommandRow = row?;
        records.push(CommandRecord {
            cmd_no: row.cmd_no,
            batch_id: BatchId::new(row.batch_id),
            kind: CommandKind::parse(&row.cmd_type),
            priority: row.cmd_priority,
            carrier: ContainerId::new(row.parent_carrier_id),
            src: slot_from_signed(row.src_row, row.src_bay, row.src_level),
            dst: slot_from_signed(
                row.dest_row.unwrap_or(-1),
                row.dest_bay.unwrap_or(-1),
                row.dest_level.unwrap_or(-1),
            ),
            create_time: row.create_time.unwrap_or(0),
        });
    }
    debug!(commands = records.len(), "command file loaded");
    Ok(records)
}

pub fn load_commands_path(path: impl AsRef<Path>) -> Result<Vec<CommandRecord>, LoadError> {
    load_commands_reader(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yard::LayoutError;

    #[test]
    fn layout_row_parses() {
        let csv = "max_row,max_bay,max_level,total_boxes\n6,11,8,400\n";
        let layout = load_layout_reader(csv.as_bytes()).unwrap();
        assert_eq!(
            (layout.rows(), layout.bays(), layout.tiers(), layout.capacity()),
            (6, 11, 8, 400)
        );
    }

    #[test]
    fn zero_layout_values_surface_as_layout_errors() {
        let csv = "max_row,max_bay,max_level,total_boxes\n0,0,0,0\n";
        assert!(matches!(
            load_layout_reader(csv.as_bytes()),
            Err(LoadError::Layout(LayoutError::ZeroDimension { .. }))
        ));
    }

    #[test]
    fn empty_config_is_reported() {
        let csv = "max_row,max_bay,max_level,total_boxes\n";
        assert!(matches!(
            load_layout_reader(csv.as_bytes()),
            Err(LoadError::EmptyConfig)
        ));
    }

    #[test]
    fn snapshot_rows_parse_in_order() {
        let csv = "container_id,row,bay,level\n1,0,0,0\n2,0,0,1\n3,1,2,0\n";
        let rows = load_snapshot_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].id(), ContainerId::new(2));
        assert_eq!(rows[1].position(), SlotPosition::new(0, 0, 1));
        assert_eq!(rows[2].position(), SlotPosition::new(1, 2, 0));
    }

    #[test]
    fn duplicate_snapshot_ids_are_an_error() {
        let csv = "container_id,row,bay,level\n1,0,0,0\n1,0,1,0\n";
        assert!(matches!(
            load_snapshot_reader(csv.as_bytes()),
            Err(LoadError::DuplicateContainer(id)) if id == ContainerId::new(1)
        ));
    }

    #[test]
    fn command_rows_parse_with_workstation_destination() {
        let csv = "cmd_no,batch_id,cmd_type,cmd_priority,parent_carrier_id,\
src_row,src_bay,src_level,dest_row,dest_bay,dest_level,create_time\n\
1,20260117,target,1,42,0,3,1,-1,-1,-1,1705363260\n\
2,20260117,block,2,7,1,1,0,2,2,0,1705363320\n\
3,20260117,inspect,3,9,0,0,0,-1,-1,-1,1705363380\n";
        let rows = load_commands_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].kind(), CommandKind::Target);
        assert_eq!(rows[0].carrier(), ContainerId::new(42));
        assert_eq!(rows[0].src(), Some(SlotPosition::new(0, 3, 1)));
        assert_eq!(rows[0].dst(), None);
        assert_eq!(rows[0].batch_id(), BatchId::new(20260117));
        assert_eq!(rows[0].create_time(), 1705363260);

        assert_eq!(rows[1].kind(), CommandKind::Block);
        assert_eq!(rows[1].dst(), Some(SlotPosition::new(2, 2, 0)));

        assert_eq!(rows[2].kind(), CommandKind::Other);
    }
}
