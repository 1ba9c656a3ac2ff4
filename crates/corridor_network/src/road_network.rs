use fxhash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::{
    error::NetworkError,
    newtype_index::EnumerateIdx,
    node::{Node, NodeIdx},
    routing::{dijkstra::Dijkstra, k_shortest_paths, network_path::NetworkPath},
    segment::{Segment, SegmentIdx},
};

/// Read-only snapshot of a road network.
///
/// Segment indices follow declaration order and are the fixed total order
/// used to break ties between equal-cost paths.
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    nodes: Vec<Node>,
    segments: Vec<Segment>,
    adjacency_list: Vec<Vec<SegmentIdx>>,
    node_lookup: FxHashMap<String, NodeIdx>,
    segment_lookup: FxHashMap<String, SegmentIdx>,
}

impl RoadNetwork {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, node: NodeIdx) -> &Node {
        &self.nodes[node]
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, segment: SegmentIdx) -> &Segment {
        &self.segments[segment]
    }

    pub fn node_idx(&self, external_id: &str) -> Option<NodeIdx> {
        self.node_lookup.get(external_id).copied()
    }

    pub fn segment_idx(&self, external_id: &str) -> Option<SegmentIdx> {
        self.segment_lookup.get(external_id).copied()
    }

    pub fn contains_node(&self, node: NodeIdx) -> bool {
        node.get() < self.nodes.len()
    }

    /// Segments that can be traversed starting at `node`, with the node they lead to.
    pub fn outgoing(&self, node: NodeIdx) -> impl Iterator<Item = (SegmentIdx, NodeIdx)> + '_ {
        self.adjacency_list[node.get()]
            .iter()
            .filter_map(move |&segment_idx| {
                self.segments[segment_idx]
                    .adj_node(node)
                    .map(|adj_node| (segment_idx, adj_node))
            })
    }

    pub fn shortest_path(&self, origin: NodeIdx, destination: NodeIdx) -> Option<NetworkPath> {
        Dijkstra::new(self).calc_path(
            self,
            origin,
            destination,
            &FxHashSet::default(),
            &FxHashSet::default(),
        )
    }

    /// Up to `k` loopless paths in increasing cost order.
    pub fn k_shortest_paths(
        &self,
        origin: NodeIdx,
        destination: NodeIdx,
        k: usize,
    ) -> Vec<NetworkPath> {
        k_shortest_paths::k_shortest_paths(self, origin, destination, k)
    }
}

#[derive(Default)]
pub struct RoadNetworkBuilder {
    nodes: Vec<Node>,
    node_lookup: FxHashMap<String, NodeIdx>,
    segments: Vec<Segment>,
}

impl RoadNetworkBuilder {
    /// Registers a node, returning the existing index when already known.
    pub fn add_node(&mut self, external_id: impl Into<String>) -> NodeIdx {
        let external_id = external_id.into();
        if let Some(&node) = self.node_lookup.get(&external_id) {
            return node;
        }

        let node = NodeIdx::new(self.nodes.len());
        self.nodes.push(Node::new(external_id.clone()));
        self.node_lookup.insert(external_id, node);
        node
    }

    /// Registers a node that must not exist yet.
    pub fn add_unique_node(&mut self, external_id: impl Into<String>) -> Result<NodeIdx, NetworkError> {
        let external_id = external_id.into();
        if self.node_lookup.contains_key(&external_id) {
            return Err(NetworkError::DuplicateNode(external_id));
        }

        Ok(self.add_node(external_id))
    }

    pub fn node_idx(&self, external_id: &str) -> Option<NodeIdx> {
        self.node_lookup.get(external_id).copied()
    }

    pub fn add_segment(&mut self, segment: Segment) -> &mut RoadNetworkBuilder {
        self.segments.push(segment);
        self
    }

    pub fn build(self) -> Result<RoadNetwork, NetworkError> {
        let mut adjacency_list: Vec<Vec<SegmentIdx>> = vec![Vec::new(); self.nodes.len()];
        let mut segment_lookup: FxHashMap<String, SegmentIdx> = FxHashMap::default();

        for (segment_idx, segment) in self.segments.iter().enumerate_idx() {
            for node in [segment.from_node(), segment.to_node()] {
                if node.get() >= self.nodes.len() {
                    return Err(NetworkError::UnknownNode(node.to_string()));
                }
            }

            if segment_lookup
                .insert(segment.external_id().to_owned(), segment_idx)
                .is_some()
            {
                return Err(NetworkError::DuplicateSegment(
                    segment.external_id().to_owned(),
                ));
            }

            adjacency_list[segment.from_node().get()].push(segment_idx);
            if segment.to_node() != segment.from_node() {
                adjacency_list[segment.to_node().get()].push(segment_idx);
            }
        }

        debug!(
            nodes = self.nodes.len(),
            segments = self.segments.len(),
            "Built road network"
        );

        Ok(RoadNetwork {
            nodes: self.nodes,
            segments: self.segments,
            adjacency_list,
            node_lookup: self.node_lookup,
            segment_lookup,
        })
    }
}
