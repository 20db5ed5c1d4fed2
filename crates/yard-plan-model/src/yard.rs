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

use crate::id::ContainerId;
use std::fmt::Display;
use yard_plan_core::slot::{Column, SlotPosition};

/// Dimensions and capacity of a yard: `rows x bays x tiers` slots, with
/// at most `capacity` distinct container ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YardLayout {
    rows: usize,
    bays: usize,
    tiers: usize,
    capacity: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutError {
    ZeroDimension {
        rows: usize,
        bays: usize,
        tiers: usize,
    },
    ZeroCapacity,
    CapacityExceedsSlots {
        capacity: usize,
        slots: usize,
    },
}

impl Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::ZeroDimension { rows, bays, tiers } => {
                write!(f, "Yard dimensions must be positive, got {rows}x{bays}x{tiers}")
            }
            LayoutError::ZeroCapacity => write!(f, "Yard capacity must be positive"),
            LayoutError::CapacityExceedsSlots { capacity, slots } => {
                write!(f, "Capacity {capacity} exceeds the {slots} slots of the yard")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

impl YardLayout {
    /// Fallback layout used when no configuration can be read.
    pub const FALLBACK: YardLayout = YardLayout {
        rows: 6,
        bays: 11,
        tiers: 8,
        capacity: 400,
    };

    pub fn new(
        rows: usize,
        bays: usize,
        tiers: usize,
        capacity: usize,
    ) -> Result<Self, LayoutError> {
        if rows == 0 || bays == 0 || tiers == 0 {
            return Err(LayoutError::ZeroDimension { rows, bays, tiers });
        }
        if capacity == 0 {
            return Err(LayoutError::ZeroCapacity);
        }
        let slots = rows * bays * tiers;
        if capacity > slots {
            return Err(LayoutError::CapacityExceedsSlots { capacity, slots });
        }
        Ok(YardLayout {
            rows,
            bays,
            tiers,
            capacity,
        })
    }

    #[inline]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub const fn bays(&self) -> usize {
        self.bays
    }

    #[inline]
    pub const fn tiers(&self) -> usize {
        self.tiers
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub const fn slot_count(&self) -> usize {
        self.rows * self.bays * self.tiers
    }

    #[inline]
    pub const fn column_count(&self) -> usize {
        self.rows * self.bays
    }

    #[inline]
    pub fn contains(&self, position: SlotPosition) -> bool {
        position.row() < self.rows && position.bay() < self.bays && position.tier() < self.tiers
    }

    #[inline]
    pub fn contains_column(&self, column: Column) -> bool {
        column.row() < self.rows && column.bay() < self.bays
    }

    /// All columns of the yard in row-major order.
    pub fn columns(&self) -> impl Iterator<Item = Column> + use<> {
        let bays = self.bays;
        (0..self.rows).flat_map(move |r| (0..bays).map(move |b| Column::new(r, b)))
    }

    #[inline]
    fn slot_index(&self, position: SlotPosition) -> usize {
        (position.row() * self.bays + position.bay()) * self.tiers + position.tier()
    }

    #[inline]
    fn column_index(&self, column: Column) -> usize {
        column.row() * self.bays + column.bay()
    }
}

impl Display for YardLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}x{} ({} slots, capacity {})",
            self.rows,
            self.bays,
            self.tiers,
            self.slot_count(),
            self.capacity
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YardError {
    OutOfBounds(SlotPosition),
    ColumnOutOfBounds(Column),
    /// The raw id `0` marks empty slots in the interchange format and
    /// never names a container.
    ReservedId(ContainerId),
    AlreadyInYard(ContainerId),
    NotGravityPacked {
        position: SlotPosition,
        expected_tier: usize,
    },
    SourceColumnEmpty(Column),
    DestinationColumnFull(Column),
    SameColumn(Column),
}

impl Display for YardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YardError::OutOfBounds(p) => write!(f, "Slot {p} is outside the yard"),
            YardError::ColumnOutOfBounds(c) => write!(f, "{c} is outside the yard"),
            YardError::ReservedId(id) => {
                write!(f, "{id} is reserved for empty slots and cannot be placed")
            }
            YardError::AlreadyInYard(id) => write!(f, "{id} is already placed in the yard"),
            YardError::NotGravityPacked {
                position,
                expected_tier,
            } => write!(
                f,
                "Placing at {position} would break gravity packing, next free tier is {expected_tier}"
            ),
            YardError::SourceColumnEmpty(c) => write!(f, "{c} has no container to move"),
            YardError::DestinationColumnFull(c) => write!(f, "{c} is full"),
            YardError::SameColumn(c) => write!(f, "Source and destination are both {c}"),
        }
    }
}

impl std::error::Error for YardError {}

/// The mutable 3D state of a yard.
///
/// Three flat vectors back the state so that cloning a beam node is a
/// handful of bulk memory copies: `grid` maps slots to container ids,
/// `tops` caches the height of each column, and `locations` maps raw
/// container ids back to slots (`None` while a container is at the
/// workstation). Every mutating operation keeps all three in sync and
/// preserves gravity packing; the invariants are re-checked after each
/// mutation in debug builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YardState {
    layout: YardLayout,
    grid: Vec<Option<ContainerId>>,
    tops: Vec<usize>,
    locations: Vec<Option<SlotPosition>>,
    occupied: usize,
}

impl YardState {
    pub fn empty(layout: YardLayout) -> Self {
        YardState {
            grid: vec![None; layout.slot_count()],
            tops: vec![0; layout.column_count()],
            locations: vec![None; layout.capacity() + 1],
            occupied: 0,
            layout,
        }
    }

    #[inline]
    pub fn layout(&self) -> &YardLayout {
        &self.layout
    }

    /// Number of containers currently in the yard.
    #[inline]
    pub fn len(&self) -> usize {
        self.occupied
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Puts `id` on top of the column of `position`.
    ///
    /// The tier must be the current height of the column; anything else
    /// would leave a gap or bury an existing container. Ids need not be
    /// dense or bounded by the capacity; the reverse index grows on
    /// demand.
    pub fn place(&mut self, id: ContainerId, position: SlotPosition) -> Result<(), YardError> {
        if id.value() == 0 {
            return Err(YardError::ReservedId(id));
        }
        if id.index() >= self.locations.len() {
            self.locations.resize(id.index() + 1, None);
        }
        if self.locations[id.index()].is_some() {
            return Err(YardError::AlreadyInYard(id));
        }
        if !self.layout.contains(position) {
            return Err(YardError::OutOfBounds(position));
        }
        let column = self.layout.column_index(position.column());
        if position.tier() != self.tops[column] {
            return Err(YardError::NotGravityPacked {
                position,
                expected_tier: self.tops[column],
            });
        }
        let slot = self.layout.slot_index(position);
        self.grid[slot] = Some(id);
        self.tops[column] += 1;
        self.locations[id.index()] = Some(position);
        self.occupied += 1;
        self.debug_assert_invariants();
        Ok(())
    }

    /// Moves the top container of `from` onto the top of `to` and
    /// returns its id.
    pub fn move_top(&mut self, from: Column, to: Column) -> Result<ContainerId, YardError> {
        if !self.layout.contains_column(from) {
            return Err(YardError::ColumnOutOfBounds(from));
        }
        if !self.layout.contains_column(to) {
            return Err(YardError::ColumnOutOfBounds(to));
        }
        if from == to {
            return Err(YardError::SameColumn(from));
        }
        let from_idx = self.layout.column_index(from);
        let to_idx = self.layout.column_index(to);
        if self.tops[from_idx] == 0 {
            return Err(YardError::SourceColumnEmpty(from));
        }
        if self.tops[to_idx] == self.layout.tiers() {
            return Err(YardError::DestinationColumnFull(to));
        }

        let source = SlotPosition::new(from.row(), from.bay(), self.tops[from_idx] - 1);
        let target = SlotPosition::new(to.row(), to.bay(), self.tops[to_idx]);
        let id = self.grid[self.layout.slot_index(source)]
            .expect("tops points at an occupied slot");

        self.grid[self.layout.slot_index(source)] = None;
        self.grid[self.layout.slot_index(target)] = Some(id);
        self.locations[id.index()] = Some(target);
        self.tops[from_idx] -= 1;
        self.tops[to_idx] += 1;
        self.debug_assert_invariants();
        Ok(id)
    }

    /// Takes `id` out of the yard if it is currently on top of its
    /// column. Returns whether the container was removed; a buried or
    /// absent container is a no-op.
    pub fn remove_top(&mut self, id: ContainerId) -> bool {
        let Some(position) = self.position_of(id) else {
            return false;
        };
        let column = self.layout.column_index(position.column());
        if position.tier() + 1 != self.tops[column] {
            return false;
        }
        self.grid[self.layout.slot_index(position)] = None;
        self.tops[column] -= 1;
        self.locations[id.index()] = None;
        self.occupied -= 1;
        self.debug_assert_invariants();
        true
    }

    #[inline]
    pub fn position_of(&self, id: ContainerId) -> Option<SlotPosition> {
        self.locations.get(id.index()).copied().flatten()
    }

    /// Containers strictly above `id` in its column, bottom to top. The
    /// last element is the topmost blocker and the first one that has
    /// to move.
    pub fn blockers_above(&self, id: ContainerId) -> Vec<ContainerId> {
        let Some(position) = self.position_of(id) else {
            return Vec::new();
        };
        let column = self.layout.column_index(position.column());
        (position.tier() + 1..self.tops[column])
            .map(|tier| {
                let slot = SlotPosition::new(position.row(), position.bay(), tier);
                self.grid[self.layout.slot_index(slot)]
                    .expect("tiers below tops are occupied")
            })
            .collect()
    }

    #[inline]
    pub fn can_receive(&self, column: Column) -> bool {
        self.layout.contains_column(column)
            && self.tops[self.layout.column_index(column)] < self.layout.tiers()
    }

    /// Whether `id` can be picked without reshuffling. An absent
    /// container counts as already retrieved, hence on top.
    #[inline]
    pub fn is_top(&self, id: ContainerId) -> bool {
        match self.position_of(id) {
            None => true,
            Some(position) => {
                position.tier() + 1 == self.tops[self.layout.column_index(position.column())]
            }
        }
    }

    #[inline]
    pub fn stack_height(&self, column: Column) -> usize {
        if !self.layout.contains_column(column) {
            return 0;
        }
        self.tops[self.layout.column_index(column)]
    }

    pub fn top_of(&self, column: Column) -> Option<ContainerId> {
        let height = self.stack_height(column);
        if height == 0 {
            return None;
        }
        let slot = SlotPosition::new(column.row(), column.bay(), height - 1);
        self.grid[self.layout.slot_index(slot)]
    }

    /// Occupied tiers of `column`, bottom to top.
    pub fn iter_column(&self, column: Column) -> impl Iterator<Item = ContainerId> + '_ {
        let height = self.stack_height(column);
        (0..height).map(move |tier| {
            let slot = SlotPosition::new(column.row(), column.bay(), tier);
            self.grid[self.layout.slot_index(slot)]
                .expect("tiers below tops are occupied")
        })
    }

    fn debug_assert_invariants(&self) {
        #[cfg(debug_assertions)]
        {
            let mut counted = 0;
            for column in self.layout.columns() {
                let column_idx = self.layout.column_index(column);
                let top = self.tops[column_idx];
                for tier in 0..self.layout.tiers() {
                    let slot = SlotPosition::new(column.row(), column.bay(), tier);
                    let cell = self.grid[self.layout.slot_index(slot)];
                    if tier < top {
                        let id = cell.expect("gravity packing: no gaps below the top");
                        assert_eq!(
                            self.locations[id.index()],
                            Some(slot),
                            "location of {id} disagrees with the grid"
                        );
                        counted += 1;
                    } else {
                        assert!(cell.is_none(), "container above tops in {column}");
                    }
                }
            }
            assert_eq!(counted, self.occupied, "occupied count out of sync");
        }
    }
}
