use corridor_network::{RoadNetwork, SegmentIdx, newtype_index::EnumerateIdx};

use super::congestion_estimator::CongestionEstimator;

/// Vehicle count per segment, indexed like the network segments.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentLoads {
    loads: Vec<u32>,
}

impl SegmentLoads {
    /// Loads already present on the network before the round.
    pub fn baseline(network: &RoadNetwork) -> Self {
        SegmentLoads {
            loads: network.segments().iter().map(|segment| segment.load()).collect(),
        }
    }

    pub fn load(&self, segment: SegmentIdx) -> u32 {
        self.loads[segment.get()]
    }

    pub fn add_path(&mut self, segments: &[SegmentIdx]) {
        for segment in segments {
            let load = &mut self.loads[segment.get()];
            *load = load.saturating_add(1);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SegmentIdx, u32)> + '_ {
        self.loads
            .iter()
            .enumerate_idx()
            .map(|(segment, &load): (SegmentIdx, &u32)| (segment, load))
    }

    pub fn score(
        &self,
        network: &RoadNetwork,
        estimator: &impl CongestionEstimator,
        segment: SegmentIdx,
    ) -> f64 {
        estimator.estimate(network.segment(segment), self.load(segment))
    }
}
