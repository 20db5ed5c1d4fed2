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
    config::SearchConfig,
    penalty::{PriorityMap, find_return_slot, stack_penalty},
};
use yard_plan_core::{cost::Cost, slot::SlotPosition};
use yard_plan_model::{
    id::{BatchId, ContainerId},
    mission::{Mission, renumber_missions},
    yard::YardState,
};

/// What a beam node remembers about the moves that produced it.
///
/// The simulator is generic over this so that the optimiser's hot
/// evaluation path carries no history at all while the final logging
/// run records every mission, without the two paths diverging.
pub trait Trace: Clone + Default {
    fn on_target(&mut self, batch_id: BatchId, id: ContainerId, src: Option<SlotPosition>);
    fn on_block(&mut self, batch_id: BatchId, id: ContainerId, src: SlotPosition, dst: SlotPosition);
    fn on_return(&mut self, batch_id: BatchId, id: ContainerId, dst: SlotPosition);
}

/// History-free trace for pure cost evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoTrace;

impl Trace for NoTrace {
    #[inline]
    fn on_target(&mut self, _: BatchId, _: ContainerId, _: Option<SlotPosition>) {}

    #[inline]
    fn on_block(&mut self, _: BatchId, _: ContainerId, _: SlotPosition, _: SlotPosition) {}

    #[inline]
    fn on_return(&mut self, _: BatchId, _: ContainerId, _: SlotPosition) {}
}

/// Trace that accumulates the mission log of its branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissionTrace {
    missions: Vec<Mission>,
}

impl MissionTrace {
    #[inline]
    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    #[inline]
    pub fn into_missions(self) -> Vec<Mission> {
        self.missions
    }
}

impl Trace for MissionTrace {
    fn on_target(&mut self, batch_id: BatchId, id: ContainerId, src: Option<SlotPosition>) {
        self.missions.push(Mission::target(batch_id, id, src));
    }

    fn on_block(&mut self, batch_id: BatchId, id: ContainerId, src: SlotPosition, dst: SlotPosition) {
        self.missions.push(Mission::block(batch_id, id, src, dst));
    }

    fn on_return(&mut self, batch_id: BatchId, id: ContainerId, dst: SlotPosition) {
        self.missions.push(Mission::back_into_yard(batch_id, id, dst));
    }
}

#[derive(Debug, Clone)]
struct BeamNode<H: Trace> {
    yard: YardState,
    /// Reshuffle moves accumulated so far. Retrievals and returns are
    /// free; this is the quantity the optimiser minimises.
    g: Cost,
    /// Ranking score `g + penalty`, only meaningful within a phase and
    /// reset to `g` whenever one completes.
    f: Cost,
    trace: H,
}

impl<H: Trace> BeamNode<H> {
    fn fresh(yard: YardState) -> Self {
        BeamNode {
            yard,
            g: Cost::ZERO,
            f: Cost::ZERO,
            trace: H::default(),
        }
    }
}

fn sort_by_rank<H: Trace>(nodes: &mut [BeamNode<H>]) {
    nodes.sort_by_key(|node| (node.f, node.g));
}

/// The finished plan for one retrieval sequence: the reshuffle cost and
/// the renumbered mission log of the best terminal branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionPlan {
    cost: Cost,
    missions: Vec<Mission>,
}

impl MissionPlan {
    #[inline]
    pub fn cost(&self) -> Cost {
        self.cost
    }

    #[inline]
    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    #[inline]
    pub fn into_missions(self) -> Vec<Mission> {
        self.missions
    }
}

/// Beam-search simulator of one retrieval batch.
///
/// For every target in sequence, phase one uncovers and retrieves it
/// (each reshuffle of a blocker costs one g), phase two puts it back
/// into the yard through [`find_return_slot`]. The beam keeps the
/// `beam_width` best branches between expansions and the search of a
/// step is abandoned once `depth_limit` expansion rounds pass without
/// finishing.
#[derive(Debug, Clone, Copy)]
pub struct Simulator<'a> {
    config: &'a SearchConfig,
    batch_id: BatchId,
    base_time: i64,
}

impl<'a> Simulator<'a> {
    pub fn new(config: &'a SearchConfig, batch_id: BatchId, base_time: i64) -> Self {
        Simulator {
            config,
            batch_id,
            base_time,
        }
    }

    /// Reshuffle count of retrieving `sequence` in order from a copy of
    /// `initial`, or [`Cost::INFEASIBLE`] when the beam dies.
    pub fn evaluate(&self, initial: &YardState, sequence: &[ContainerId]) -> Cost {
        match self.run::<NoTrace>(initial, sequence) {
            Some((cost, _)) => cost,
            None => Cost::INFEASIBLE,
        }
    }

    /// Like [`evaluate`](Self::evaluate), but also returns the mission
    /// log of the best terminal branch, renumbered and timestamped.
    pub fn plan(&self, initial: &YardState, sequence: &[ContainerId]) -> Option<MissionPlan> {
        let (cost, trace) = self.run::<MissionTrace>(initial, sequence)?;
        let mut missions = trace.into_missions();
        renumber_missions(&mut missions, self.base_time);
        Some(MissionPlan { cost, missions })
    }

    fn run<H: Trace>(
        &self,
        initial: &YardState,
        sequence: &[ContainerId],
    ) -> Option<(Cost, H)> {
        let width = self.config.beam_width.max(1);
        let priorities = PriorityMap::from_sequence(sequence);
        let layout = *initial.layout();
        let mut beam: Vec<BeamNode<H>> = vec![BeamNode::fresh(initial.clone())];

        for (step, &target) in sequence.iter().enumerate() {
            // Phase 1: uncover and retrieve the target on every branch.
            let mut finished: Vec<BeamNode<H>> = Vec::new();
            let mut processing = std::mem::take(&mut beam);
            let mut depth = 0;

            while !processing.is_empty() {
                let mut next: Vec<BeamNode<H>> = Vec::new();
                for node in &processing {
                    if node.yard.is_top(target) {
                        let mut done = node.clone();
                        let src = done.yard.position_of(target);
                        done.yard.remove_top(target);
                        done.f = done.g;
                        done.trace.on_target(self.batch_id, target, src);
                        finished.push(done);
                        continue;
                    }

                    let blockers = node.yard.blockers_above(target);
                    let Some(&blocker) = blockers.last() else {
                        continue;
                    };
                    let Some(src) = node.yard.position_of(blocker) else {
                        continue;
                    };

                    for destination in layout.columns() {
                        if destination == src.column() || !node.yard.can_receive(destination) {
                            continue;
                        }
                        // Score the destination before the move lands on it.
                        let penalty = stack_penalty(&node.yard, destination, &priorities, step);
                        let mut child = node.clone();
                        if child.yard.move_top(src.column(), destination).is_err() {
                            continue;
                        }
                        child.g = child.g.saturating_add(Cost::new(1));
                        child.f = child.g.saturating_add(penalty);
                        let dst = child
                            .yard
                            .position_of(blocker)
                            .expect("moved blocker stays in the yard");
                        child.trace.on_block(self.batch_id, blocker, src, dst);
                        next.push(child);
                    }
                }

                sort_by_rank(&mut next);
                next.truncate(width);
                processing = next;

                depth += 1;
                if depth >= self.config.depth_limit {
                    break;
                }
            }

            if finished.is_empty() {
                return None;
            }
            sort_by_rank(&mut finished);
            finished.truncate(width);

            // Phase 2: put the target back into the yard.
            let mut returned: Vec<BeamNode<H>> = Vec::new();
            for mut node in finished {
                let Some(slot) = find_return_slot(&node.yard, target, &priorities, step) else {
                    continue;
                };
                if node.yard.place(target, slot).is_err() {
                    continue;
                }
                node.f = node.g;
                node.trace.on_return(self.batch_id, target, slot);
                returned.push(node);
            }
            if returned.is_empty() {
                return None;
            }

            // Carry-over beam for the next target, cheapest plans first.
            returned.sort_by_key(|node| node.g);
            returned.truncate(width);
            beam = returned;
        }

        let best = beam
            .into_iter()
            .next()
            .expect("terminal beam holds at least the carry-over node");
        Some((best.g, best.trace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yard_plan_model::{
        generator::{InstanceGenConfigBuilder, InstanceGenerator},
        mission::MissionKind,
        problem::DEFAULT_BATCH_ID,
        yard::YardLayout,
    };

    const BASE_TIME: i64 = 1_705_363_200;

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

    fn simulator(config: &SearchConfig) -> Simulator<'_> {
        Simulator::new(config, DEFAULT_BATCH_ID, BASE_TIME)
    }

    #[test]
    fn trivial_top_retrieval_costs_nothing() {
        let config = SearchConfig::default();
        let sim = simulator(&config);
        let initial = yard(1, 1, 2, &[&[1, 2]]);

        assert_eq!(sim.evaluate(&initial, &[id(2)]), Cost::ZERO);

        let plan = sim.plan(&initial, &[id(2)]).unwrap();
        assert_eq!(plan.cost(), Cost::ZERO);

        let log = plan.missions();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].kind(), MissionKind::Target);
        assert_eq!(log[0].src(), Some(SlotPosition::new(0, 0, 1)));
        assert_eq!(log[0].dst(), None);
        assert_eq!(log[1].kind(), MissionKind::Return);
        assert_eq!(log[1].src(), None);
        assert_eq!(log[1].dst(), Some(SlotPosition::new(0, 0, 1)));
    }

    #[test]
    fn buried_target_needs_one_reshuffle() {
        let config = SearchConfig::default();
        let sim = simulator(&config);
        let initial = yard(1, 2, 2, &[&[1, 2], &[]]);

        assert_eq!(sim.evaluate(&initial, &[id(1)]), Cost::new(1));

        let plan = sim.plan(&initial, &[id(1)]).unwrap();
        let log = plan.missions();
        assert_eq!(plan.cost(), Cost::new(1));
        assert_eq!(log.len(), 3);

        assert_eq!(log[0].kind(), MissionKind::Block);
        assert_eq!(log[0].container_id(), id(2));
        assert_eq!(log[0].src(), Some(SlotPosition::new(0, 0, 1)));
        assert_eq!(log[0].dst(), Some(SlotPosition::new(0, 1, 0)));

        assert_eq!(log[1].kind(), MissionKind::Target);
        assert_eq!(log[1].container_id(), id(1));
        assert_eq!(log[1].src(), Some(SlotPosition::new(0, 0, 0)));

        // Stacking on the already-handled 2 (height 1) is cheaper than
        // opening the empty column (20).
        assert_eq!(log[2].kind(), MissionKind::Return);
        assert_eq!(log[2].dst(), Some(SlotPosition::new(0, 1, 1)));
    }

    #[test]
    fn single_slot_yard_retrieves_and_returns_in_place() {
        let config = SearchConfig::default();
        let sim = simulator(&config);
        let initial = yard(1, 1, 1, &[&[1]]);

        let plan = sim.plan(&initial, &[id(1)]).unwrap();
        assert_eq!(plan.cost(), Cost::ZERO);
        assert_eq!(plan.missions().len(), 2);
        assert_eq!(plan.missions()[1].dst(), Some(SlotPosition::new(0, 0, 0)));
    }

    #[test]
    fn blocked_target_with_no_spare_column_is_infeasible() {
        let config = SearchConfig::default();
        let sim = simulator(&config);
        let initial = yard(1, 1, 2, &[&[1, 2]]);

        assert_eq!(sim.evaluate(&initial, &[id(1)]), Cost::INFEASIBLE);
        assert!(sim.plan(&initial, &[id(1)]).is_none());
    }

    #[test]
    fn absent_target_is_a_free_step_with_sentinel_source() {
        let config = SearchConfig::default();
        let sim = simulator(&config);
        let initial = yard(1, 2, 2, &[&[1], &[]]);

        let plan = sim.plan(&initial, &[id(2)]).unwrap();
        assert_eq!(plan.cost(), Cost::ZERO);
        assert_eq!(plan.missions()[0].kind(), MissionKind::Target);
        assert_eq!(plan.missions()[0].src(), None);
    }

    #[test]
    fn penalty_steers_blockers_away_from_future_targets() {
        // Retrieving 5 forces its blocker 1 aside; the empty column
        // must win over the column holding the upcoming target 9.
        let config = SearchConfig::default();
        let sim = simulator(&config);
        let initial = yard(1, 3, 2, &[&[5, 1], &[9], &[]]);

        let plan = sim.plan(&initial, &[id(5), id(9)]).unwrap();
        assert_eq!(plan.cost(), Cost::new(1));

        let block = &plan.missions()[0];
        assert_eq!(block.kind(), MissionKind::Block);
        assert_eq!(block.container_id(), id(1));
        assert_eq!(block.dst(), Some(SlotPosition::new(0, 2, 0)));
    }

    #[test]
    fn log_is_renumbered_and_timestamped() {
        let config = SearchConfig::default();
        let sim = simulator(&config);
        let initial = yard(1, 2, 2, &[&[1, 2], &[]]);

        let plan = sim.plan(&initial, &[id(1)]).unwrap();
        for (i, mission) in plan.missions().iter().enumerate() {
            assert_eq!(mission.mission_no(), (i + 1) as u32);
            assert_eq!(mission.priority(), (i + 1) as u32);
            assert_eq!(mission.created_time(), BASE_TIME + i as i64 * 30);
            assert_eq!(mission.batch_id(), DEFAULT_BATCH_ID);
        }
    }

    #[test]
    fn wider_beams_agree_on_forced_plans() {
        // With a single legal reshuffle the beam width cannot matter.
        let wide = SearchConfig {
            beam_width: 4,
            ..SearchConfig::default()
        };
        let initial = yard(1, 2, 2, &[&[1, 2], &[]]);
        assert_eq!(simulator(&wide).evaluate(&initial, &[id(1)]), Cost::new(1));
    }

    /// Replays a plan move by move against a copy of the initial yard,
    /// checking the structural guarantees every emitted log must obey.
    fn assert_log_well_formed(initial: &YardState, plan: &MissionPlan) {
        let mut yard = initial.clone();
        let mut in_yard = yard.len();

        for mission in plan.missions() {
            match mission.kind() {
                MissionKind::Target => {
                    if let Some(src) = mission.src() {
                        assert_eq!(yard.position_of(mission.container_id()), Some(src));
                        assert!(yard.is_top(mission.container_id()));
                        assert!(yard.remove_top(mission.container_id()));
                        in_yard -= 1;
                    }
                    assert_eq!(mission.dst(), None);
                }
                MissionKind::Block => {
                    let src = mission.src().expect("block missions move within the yard");
                    let dst = mission.dst().expect("block missions move within the yard");
                    assert_ne!(src.column(), dst.column());
                    let moved = yard.move_top(src.column(), dst.column()).unwrap();
                    assert_eq!(moved, mission.container_id());
                    assert_eq!(yard.position_of(moved), Some(dst));
                }
                MissionKind::Return => {
                    assert_eq!(mission.src(), None);
                    let dst = mission.dst().expect("returns land in the yard");
                    assert_eq!(yard.stack_height(dst.column()), dst.tier());
                    yard.place(mission.container_id(), dst).unwrap();
                    in_yard += 1;
                }
            }
            assert_eq!(yard.len(), in_yard, "container conservation");
        }

        let blocks = plan
            .missions()
            .iter()
            .filter(|m| m.kind() == MissionKind::Block)
            .count() as u64;
        assert_eq!(plan.cost(), Cost::new(blocks));
    }

    #[test]
    fn generated_instances_produce_well_formed_logs() {
        let config = InstanceGenConfigBuilder::new()
            .rows(2)
            .bays(4)
            .tiers(3)
            .total_boxes(16)
            .mission_count(6)
            .seed(2024)
            .build()
            .unwrap();
        let instance = InstanceGenerator::new(config).generate();

        let mut initial = YardState::empty(config.layout());
        for record in instance.snapshot() {
            initial.place(record.id(), record.position()).unwrap();
        }
        let sequence: Vec<ContainerId> =
            instance.commands().iter().map(|c| c.carrier()).collect();

        let search = SearchConfig::default();
        let plan = simulator(&search).plan(&initial, &sequence).unwrap();
        assert_log_well_formed(&initial, &plan);

        // Evaluation and planning agree on the cost of a sequence.
        assert_eq!(simulator(&search).evaluate(&initial, &sequence), plan.cost());
    }
}
