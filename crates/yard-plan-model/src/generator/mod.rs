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

mod config;
mod err;

pub use config::{InstanceGenConfig, InstanceGenConfigBuilder};
pub use err::InstanceGenConfigError;

use crate::{
    err::EmitError,
    id::ContainerId,
    loader::{CommandKind, CommandRecord, SnapshotRecord},
};
use rand::{
    SeedableRng,
    distr::{Distribution, Uniform},
    rngs::SmallRng,
    seq::SliceRandom,
};
use std::{fs::File, io::Write, path::Path};
use yard_plan_core::slot::SlotPosition;

/// Random column draws before the generator gives up and falls back to
/// a linear scan for the next free column.
const PLACEMENT_ATTEMPTS: usize = 1000;

/// A synthetic instance: a gravity-packed yard snapshot plus a batch of
/// retrieval commands over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedInstance {
    config: InstanceGenConfig,
    snapshot: Vec<SnapshotRecord>,
    commands: Vec<CommandRecord>,
}

impl GeneratedInstance {
    #[inline]
    pub fn config(&self) -> &InstanceGenConfig {
        &self.config
    }

    /// Snapshot rows in placement order; replaying them in this order
    /// keeps every column gravity-packed.
    #[inline]
    pub fn snapshot(&self) -> &[SnapshotRecord] {
        &self.snapshot
    }

    #[inline]
    pub fn commands(&self) -> &[CommandRecord] {
        &self.commands
    }

    pub fn write_layout<W: Write>(&self, writer: W) -> Result<(), EmitError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["max_row", "max_bay", "max_level", "total_boxes"])?;
        let layout = self.config.layout();
        wtr.write_record([
            layout.rows().to_string(),
            layout.bays().to_string(),
            layout.tiers().to_string(),
            layout.capacity().to_string(),
        ])?;
        wtr.flush()?;
        Ok(())
    }

    pub fn write_snapshot<W: Write>(&self, writer: W) -> Result<(), EmitError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["container_id", "row", "bay", "level"])?;
        for record in &self.snapshot {
            let p = record.position();
            wtr.write_record([
                record.id().value().to_string(),
                p.row().to_string(),
                p.bay().to_string(),
                p.tier().to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_commands<W: Write>(&self, writer: W) -> Result<(), EmitError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record([
            "cmd_no",
            "batch_id",
            "cmd_type",
            "cmd_priority",
            "parent_carrier_id",
            "src_row",
            "src_bay",
            "src_level",
            "dest_row",
            "dest_bay",
            "dest_level",
            "create_time",
        ])?;
        for command in &self.commands {
            let (src_row, src_bay, src_level) = signed_triple(command.src());
            let (dest_row, dest_bay, dest_level) = signed_triple(command.dst());
            wtr.write_record([
                command.cmd_no().to_string(),
                command.batch_id().value().to_string(),
                "target".to_string(),
                command.priority().to_string(),
                command.carrier().value().to_string(),
                src_row.to_string(),
                src_bay.to_string(),
                src_level.to_string(),
                dest_row.to_string(),
                dest_bay.to_string(),
                dest_level.to_string(),
                command.create_time().to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Writes `yard_config.csv`, `mock_yard.csv` and `mock_commands.csv`
    /// into `dir`.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<(), EmitError> {
        let dir = dir.as_ref();
        self.write_layout(File::create(dir.join("yard_config.csv"))?)?;
        self.write_snapshot(File::create(dir.join("mock_yard.csv"))?)?;
        self.write_commands(File::create(dir.join("mock_commands.csv"))?)?;
        Ok(())
    }
}

fn signed_triple(position: Option<SlotPosition>) -> (i64, i64, i64) {
    match position {
        Some(p) => (p.row() as i64, p.bay() as i64, p.tier() as i64),
        None => (-1, -1, -1),
    }
}

pub struct InstanceGenerator {
    config: InstanceGenConfig,
    rng: SmallRng,
    row_distribution: Uniform<usize>,
    bay_distribution: Uniform<usize>,
}

impl From<InstanceGenConfig> for InstanceGenerator {
    fn from(config: InstanceGenConfig) -> Self {
        Self::new(config)
    }
}

impl InstanceGenerator {
    pub fn new(config: InstanceGenConfig) -> Self {
        let layout = config.layout();
        InstanceGenerator {
            row_distribution: Uniform::new(0, layout.rows()).expect("valid [0, rows)"),
            bay_distribution: Uniform::new(0, layout.bays()).expect("valid [0, bays)"),
            rng: SmallRng::seed_from_u64(config.seed()),
            config,
        }
    }

    pub fn generate(&mut self) -> GeneratedInstance {
        let snapshot = self.place_containers();
        let commands = self.sample_commands(&snapshot);
        GeneratedInstance {
            config: self.config,
            snapshot,
            commands,
        }
    }

    fn place_containers(&mut self) -> Vec<SnapshotRecord> {
        let layout = self.config.layout();
        let mut heights = vec![0usize; layout.column_count()];
        let mut snapshot = Vec::with_capacity(self.config.total_boxes());

        for raw_id in 1..=self.config.total_boxes() {
            let (row, bay) = self.free_column(&heights);
            let column = row * layout.bays() + bay;
            snapshot.push(SnapshotRecord::new(
                ContainerId::new(raw_id as u32),
                SlotPosition::new(row, bay, heights[column]),
            ));
            heights[column] += 1;
        }
        snapshot
    }

    /// Draws random columns until a non-full one comes up; at high fill
    /// rates this degenerates, so after [`PLACEMENT_ATTEMPTS`] draws the
    /// first free column in row-major order is taken instead. Capacity
    /// validation guarantees one exists.
    fn free_column(&mut self, heights: &[usize]) -> (usize, usize) {
        let layout = self.config.layout();
        for _ in 0..PLACEMENT_ATTEMPTS {
            let row = self.row_distribution.sample(&mut self.rng);
            let bay = self.bay_distribution.sample(&mut self.rng);
            if heights[row * layout.bays() + bay] < layout.tiers() {
                return (row, bay);
            }
        }
        layout
            .columns()
            .map(|c| (c.row(), c.bay()))
            .find(|&(r, b)| heights[r * layout.bays() + b] < layout.tiers())
            .expect("capacity check guarantees a free column")
    }

    fn sample_commands(&mut self, snapshot: &[SnapshotRecord]) -> Vec<CommandRecord> {
        let mut candidates: Vec<SnapshotRecord> = snapshot.to_vec();
        candidates.shuffle(&mut self.rng);
        candidates
            .iter()
            .take(self.config.mission_count())
            .enumerate()
            .map(|(i, record)| {
                let serial = (i + 1) as u32;
                CommandRecord::new(
                    serial,
                    self.config.batch_id(),
                    CommandKind::Target,
                    serial,
                    record.id(),
                    Some(record.position()),
                    None,
                    self.config.base_time() + serial as i64 * 60,
                )
            })
            .collect()
    }
}
