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

use std::collections::HashMap;
use yard_plan_core::{
    cost::Cost,
    slot::{Column, SlotPosition},
};
use yard_plan_model::{id::ContainerId, yard::YardState};

/// Base penalty for any column that still holds a future target. Keeps
/// every future-blocking column strictly worse than every safe one.
const FUTURE_BLOCK_BASE: u64 = 1_000;

/// Scale of the schedule-distance term: the soonest future target in
/// the column contributes `SCALE / (distance + 1)`.
const FUTURE_BLOCK_SCALE: u64 = 100_000;

/// Return-slot surcharge for stacking onto a lower-numbered (more
/// urgent, by the originating convention) container.
const URGENT_BELOW_PENALTY: u64 = 50;

/// Return-slot surcharge for opening up an empty column.
const EMPTY_COLUMN_PENALTY: u64 = 20;

/// Positions of the retrieval sequence, keyed by container id.
///
/// Built once per simulation run from the full sequence and never
/// updated afterwards; "already retrieved" is expressed by comparing an
/// entry against the current step index, not by removing it.
#[derive(Debug, Clone, Default)]
pub struct PriorityMap {
    positions: HashMap<ContainerId, usize>,
}

impl PriorityMap {
    pub fn from_sequence(sequence: &[ContainerId]) -> Self {
        PriorityMap {
            positions: sequence
                .iter()
                .enumerate()
                .map(|(index, &id)| (id, index))
                .collect(),
        }
    }

    #[inline]
    pub fn index_of(&self, id: ContainerId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// How much does landing another container on `column` hurt the rest of
/// the schedule?
///
/// Scans every occupied tier for containers that are still to be
/// retrieved (`priority >= step`). A column without any is safe and
/// scores `0`; otherwise the score grows sharply the sooner the
/// earliest such target is due.
pub fn stack_penalty(
    yard: &YardState,
    column: Column,
    priorities: &PriorityMap,
    step: usize,
) -> Cost {
    let mut soonest: Option<usize> = None;
    for id in yard.iter_column(column) {
        if let Some(position) = priorities.index_of(id)
            && position >= step
            && soonest.is_none_or(|s| position < s)
        {
            soonest = Some(position);
        }
    }
    match soonest {
        None => Cost::ZERO,
        Some(soonest) => {
            let distance = (soonest - step) as u64;
            Cost::new(FUTURE_BLOCK_BASE + FUTURE_BLOCK_SCALE / (distance + 1))
        }
    }
}

/// Picks the cheapest column to put `target` back into after its visit
/// to the workstation, or `None` if every column is full.
///
/// On top of the lookahead penalty, a non-empty column is charged
/// either for covering a lower-numbered container or for its height,
/// and an empty column carries a small flat charge so that safe
/// occupied stacks win over breaking up empties. The first column in
/// row-major order wins ties.
pub fn find_return_slot(
    yard: &YardState,
    target: ContainerId,
    priorities: &PriorityMap,
    step: usize,
) -> Option<SlotPosition> {
    let mut best: Option<(u64, SlotPosition)> = None;
    for column in yard.layout().columns() {
        if !yard.can_receive(column) {
            continue;
        }
        let mut score = stack_penalty(yard, column, priorities, step).value();
        match yard.top_of(column) {
            Some(top) => {
                if top < target {
                    score += URGENT_BELOW_PENALTY;
                } else {
                    score += yard.stack_height(column) as u64;
                }
            }
            None => score += EMPTY_COLUMN_PENALTY,
        }
        let slot = SlotPosition::new(column.row(), column.bay(), yard.stack_height(column));
        if best.is_none_or(|(best_score, _)| score < best_score) {
            best = Some((score, slot));
        }
    }
    best.map(|(_, slot)| slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yard_plan_model::yard::YardLayout;

    fn id(v: u32) -> ContainerId {
        ContainerId::new(v)
    }

    fn yard(rows: usize, bays: usize, tiers: usize, stacks: &[&[u32]]) -> YardState {
        let layout = YardLayout::new(rows, bays, tiers, rows * bays * tiers).unwrap();
        let mut yard = YardState::empty(layout);
        for (column, stack) in stacks.iter().enumerate() {
            for (tier, &v) in stack.iter().enumerate() {
                yard.place(id(v), SlotPosition::new(column / bays, column % bays, tier))
                    .unwrap();
            }
        }
        yard
    }

    #[test]
    fn penalty_is_zero_without_future_targets() {
        let yard = yard(1, 2, 3, &[&[7, 8], &[]]);
        let priorities = PriorityMap::from_sequence(&[id(1), id(2)]);
        assert_eq!(
            stack_penalty(&yard, Column::new(0, 0), &priorities, 0),
            Cost::ZERO
        );
        assert_eq!(
            stack_penalty(&yard, Column::new(0, 1), &priorities, 0),
            Cost::ZERO
        );
    }

    #[test]
    fn penalty_ignores_already_retrieved_entries() {
        let yard = yard(1, 1, 3, &[&[5]]);
        let priorities = PriorityMap::from_sequence(&[id(5), id(9)]);
        // At step 0 container 5 is still pending; at step 1 it is past.
        assert_eq!(
            stack_penalty(&yard, Column::new(0, 0), &priorities, 0),
            Cost::new(1_000 + 100_000)
        );
        assert_eq!(
            stack_penalty(&yard, Column::new(0, 0), &priorities, 1),
            Cost::ZERO
        );
    }

    #[test]
    fn penalty_grows_as_the_target_draws_near() {
        let yard = yard(1, 1, 3, &[&[4]]);
        let priorities = PriorityMap::from_sequence(&[id(1), id(2), id(4)]);
        // Distance 2 from step 0, distance 1 from step 1, due at step 2.
        assert_eq!(
            stack_penalty(&yard, Column::new(0, 0), &priorities, 0),
            Cost::new(1_000 + 100_000 / 3)
        );
        assert_eq!(
            stack_penalty(&yard, Column::new(0, 0), &priorities, 1),
            Cost::new(1_000 + 100_000 / 2)
        );
        assert_eq!(
            stack_penalty(&yard, Column::new(0, 0), &priorities, 2),
            Cost::new(1_000 + 100_000)
        );
    }

    #[test]
    fn penalty_uses_the_soonest_target_in_the_column() {
        let yard = yard(1, 1, 4, &[&[3, 1, 2]]);
        let priorities = PriorityMap::from_sequence(&[id(1), id(2), id(3)]);
        // Soonest pending entry is container 1 at index 0.
        assert_eq!(
            stack_penalty(&yard, Column::new(0, 0), &priorities, 0),
            Cost::new(1_000 + 100_000)
        );
    }

    #[test]
    fn return_slot_avoids_columns_holding_future_targets() {
        // Container 1 blocks 5; column 1 holds the later target 9 and
        // column 2 is empty. The empty column must win.
        let yard = yard(1, 3, 2, &[&[5, 1], &[9], &[]]);
        let priorities = PriorityMap::from_sequence(&[id(5), id(9)]);

        let hot = stack_penalty(&yard, Column::new(0, 1), &priorities, 0);
        let safe = stack_penalty(&yard, Column::new(0, 2), &priorities, 0);
        assert!(safe < hot);

        let slot = find_return_slot(&yard, id(1), &priorities, 0).unwrap();
        assert_eq!(slot, SlotPosition::new(0, 2, 0));
    }

    #[test]
    fn return_slot_prefers_safe_stacks_over_empties() {
        // Column 0 holds a higher-numbered, already-handled container;
        // stacking on it (height 1) beats an empty column (20).
        let yard = yard(1, 2, 3, &[&[9], &[]]);
        let priorities = PriorityMap::from_sequence(&[id(2)]);
        let slot = find_return_slot(&yard, id(2), &priorities, 0).unwrap();
        assert_eq!(slot, SlotPosition::new(0, 0, 1));
    }

    #[test]
    fn return_slot_charges_for_covering_urgent_containers() {
        // Top of column 0 is lower-numbered than the returner, which
        // costs 50; the empty column at 20 wins.
        let yard = yard(1, 2, 3, &[&[1], &[]]);
        let priorities = PriorityMap::from_sequence(&[id(2)]);
        let slot = find_return_slot(&yard, id(2), &priorities, 0).unwrap();
        assert_eq!(slot, SlotPosition::new(0, 1, 0));
    }

    #[test]
    fn return_slot_breaks_ties_in_scan_order() {
        let yard = yard(1, 3, 2, &[&[], &[], &[]]);
        let priorities = PriorityMap::from_sequence(&[id(1)]);
        let slot = find_return_slot(&yard, id(1), &priorities, 0).unwrap();
        assert_eq!(slot, SlotPosition::new(0, 0, 0));
    }

    #[test]
    fn return_slot_is_none_when_the_yard_is_full() {
        let yard = yard(1, 2, 1, &[&[1], &[2]]);
        let priorities = PriorityMap::from_sequence(&[id(3)]);
        assert_eq!(find_return_slot(&yard, id(3), &priorities, 0), None);
    }
}
