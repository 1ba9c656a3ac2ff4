use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::{node::NodeIdx, road_network::RoadNetwork, segment::SegmentIdx};

pub type PathNodes = SmallVec<[NodeIdx; 16]>;
pub type PathSegments = SmallVec<[SegmentIdx; 16]>;

/// A route through the network, `nodes.len() == segments.len() + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkPath {
    nodes: PathNodes,
    segments: PathSegments,
    cost: f64,
}

impl NetworkPath {
    /// Builds a path and sums the segment costs from the origin onwards.
    pub fn from_parts(network: &RoadNetwork, nodes: PathNodes, segments: PathSegments) -> Self {
        debug_assert_eq!(nodes.len(), segments.len() + 1);
        let cost = segments
            .iter()
            .fold(0.0, |cost, &segment| cost + network.segment(segment).base_cost());

        NetworkPath {
            nodes,
            segments,
            cost,
        }
    }

    pub fn origin(&self) -> NodeIdx {
        self.nodes[0]
    }

    pub fn destination(&self) -> NodeIdx {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn nodes(&self) -> &[NodeIdx] {
        &self.nodes
    }

    pub fn segments(&self) -> &[SegmentIdx] {
        &self.segments
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn hop_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Concatenates the first `spur_index` segments of `self` with `spur`,
    /// which must start at `self.nodes()[spur_index]`.
    pub(crate) fn join_at(&self, network: &RoadNetwork, spur_index: usize, spur: &NetworkPath) -> Self {
        debug_assert_eq!(self.nodes[spur_index], spur.origin());

        let mut nodes: PathNodes = self.nodes[..spur_index].iter().copied().collect();
        nodes.extend_from_slice(&spur.nodes);

        let mut segments: PathSegments = self.segments[..spur_index].iter().copied().collect();
        segments.extend_from_slice(&spur.segments);

        NetworkPath::from_parts(network, nodes, segments)
    }
}

/// Orders paths by cost, then by their segment sequence.
#[derive(Debug)]
pub(crate) struct RankedPath(pub NetworkPath);

impl PartialEq for RankedPath {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankedPath {}

impl PartialOrd for RankedPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .cost
            .total_cmp(&other.0.cost)
            .then_with(|| self.0.segments.cmp(&other.0.segments))
    }
}
