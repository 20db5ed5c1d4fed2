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
    generator::err::InstanceGenConfigError,
    id::BatchId,
    mission::DEFAULT_BASE_TIME,
    problem::DEFAULT_BATCH_ID,
    yard::YardLayout,
};

/// Parameters of a synthetic yard instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceGenConfig {
    layout: YardLayout,
    mission_count: usize,
    batch_id: BatchId,
    base_time: i64,
    seed: u64,
}

impl InstanceGenConfig {
    #[inline]
    pub fn layout(&self) -> YardLayout {
        self.layout
    }

    #[inline]
    pub fn total_boxes(&self) -> usize {
        self.layout.capacity()
    }

    #[inline]
    pub fn mission_count(&self) -> usize {
        self.mission_count
    }

    #[inline]
    pub fn batch_id(&self) -> BatchId {
        self.batch_id
    }

    #[inline]
    pub fn base_time(&self) -> i64 {
        self.base_time
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for InstanceGenConfig {
    /// The stock instance: a 6x11x8 yard, 400 containers, 50 missions.
    fn default() -> Self {
        InstanceGenConfigBuilder::new()
            .build()
            .expect("default instance config is valid")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceGenConfigBuilder {
    rows: usize,
    bays: usize,
    tiers: usize,
    total_boxes: usize,
    mission_count: usize,
    batch_id: BatchId,
    base_time: i64,
    seed: u64,
}

impl Default for InstanceGenConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceGenConfigBuilder {
    pub fn new() -> Self {
        InstanceGenConfigBuilder {
            rows: 6,
            bays: 11,
            tiers: 8,
            total_boxes: 400,
            mission_count: 50,
            batch_id: DEFAULT_BATCH_ID,
            base_time: DEFAULT_BASE_TIME,
            seed: 42,
        }
    }

    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    pub fn bays(mut self, bays: usize) -> Self {
        self.bays = bays;
        self
    }

    pub fn tiers(mut self, tiers: usize) -> Self {
        self.tiers = tiers;
        self
    }

    pub fn total_boxes(mut self, total_boxes: usize) -> Self {
        self.total_boxes = total_boxes;
        self
    }

    pub fn mission_count(mut self, mission_count: usize) -> Self {
        self.mission_count = mission_count;
        self
    }

    pub fn batch_id(mut self, batch_id: BatchId) -> Self {
        self.batch_id = batch_id;
        self
    }

    pub fn base_time(mut self, base_time: i64) -> Self {
        self.base_time = base_time;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<InstanceGenConfig, InstanceGenConfigError> {
        let layout = YardLayout::new(self.rows, self.bays, self.tiers, self.total_boxes)?;
        if self.mission_count > self.total_boxes {
            return Err(InstanceGenConfigError::TooManyMissions {
                missions: self.mission_count,
                boxes: self.total_boxes,
            });
        }
        Ok(InstanceGenConfig {
            layout,
            mission_count: self.mission_count,
            batch_id: self.batch_id,
            base_time: self.base_time,
            seed: self.seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yard::LayoutError;

    #[test]
    fn default_config_matches_the_stock_instance() {
        let config = InstanceGenConfig::default();
        assert_eq!(config.layout().rows(), 6);
        assert_eq!(config.layout().bays(), 11);
        assert_eq!(config.layout().tiers(), 8);
        assert_eq!(config.total_boxes(), 400);
        assert_eq!(config.mission_count(), 50);
        assert_eq!(config.base_time(), 1_705_363_200);
    }

    #[test]
    fn build_rejects_overfull_yards() {
        let err = InstanceGenConfigBuilder::new()
            .rows(1)
            .bays(1)
            .tiers(2)
            .total_boxes(3)
            .mission_count(1)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            InstanceGenConfigError::Layout(LayoutError::CapacityExceedsSlots { .. })
        ));
    }

    #[test]
    fn build_rejects_more_missions_than_boxes() {
        let err = InstanceGenConfigBuilder::new()
            .total_boxes(10)
            .mission_count(11)
            .build()
            .unwrap_err();
        assert!(matches!(err, InstanceGenConfigError::TooManyMissions { .. }));
    }
}
