use std::{cmp::Ordering, collections::BinaryHeap};

use fxhash::{FxHashMap, FxHashSet};

use crate::{
    node::NodeIdx,
    road_network::RoadNetwork,
    routing::network_path::{NetworkPath, PathNodes, PathSegments},
    segment::SegmentIdx,
};

#[derive(Copy, Clone, Debug)]
struct HeapItem {
    node: NodeIdx,
    cost: f64,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &HeapItem) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapItem {}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &HeapItem) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flip cost to make this a min-heap
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

struct NodeData {
    cost: f64,
    settled: bool,
    parent: Option<(NodeIdx, SegmentIdx)>,
}

impl NodeData {
    fn new() -> Self {
        NodeData {
            cost: f64::INFINITY,
            settled: false,
            parent: None,
        }
    }
}

/// One-to-one shortest path search over segment base costs.
///
/// The search state is reused between calls so the k-shortest-paths search
/// does not reallocate for every spur node.
pub struct Dijkstra {
    heap: BinaryHeap<HeapItem>,
    data: FxHashMap<NodeIdx, NodeData>,
}

impl Dijkstra {
    pub fn new(network: &RoadNetwork) -> Self {
        let capacity = network.node_count().min(1024);
        Dijkstra {
            heap: BinaryHeap::with_capacity(capacity),
            data: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    fn init(&mut self, start: NodeIdx) {
        self.heap.clear();
        self.data.clear();

        self.heap.push(HeapItem {
            node: start,
            cost: 0.0,
        });
        self.data.insert(
            start,
            NodeData {
                cost: 0.0,
                settled: false,
                parent: None,
            },
        );
    }

    /// Shortest path from `start` to `end` avoiding the given nodes and segments.
    ///
    /// On equal cost the path with the lexicographically smallest segment
    /// index sequence wins, so results do not depend on heap internals.
    pub fn calc_path(
        &mut self,
        network: &RoadNetwork,
        start: NodeIdx,
        end: NodeIdx,
        removed_nodes: &FxHashSet<NodeIdx>,
        removed_segments: &FxHashSet<SegmentIdx>,
    ) -> Option<NetworkPath> {
        if !network.contains_node(start)
            || !network.contains_node(end)
            || removed_nodes.contains(&start)
        {
            return None;
        }

        self.init(start);

        while let Some(HeapItem { node, cost }) = self.heap.pop() {
            {
                let data = self.data.get_mut(&node)?;
                if data.settled || cost > data.cost {
                    continue;
                }
                data.settled = true;
            }

            if node == end {
                return Some(self.build_path(network, start, end));
            }

            for (segment_idx, adj_node) in network.outgoing(node) {
                if removed_segments.contains(&segment_idx) || removed_nodes.contains(&adj_node) {
                    continue;
                }

                let new_cost = cost + network.segment(segment_idx).base_cost();
                let adj_data = self.data.entry(adj_node).or_insert_with(NodeData::new);

                if adj_data.settled {
                    continue;
                }

                if new_cost < adj_data.cost {
                    adj_data.cost = new_cost;
                    adj_data.parent = Some((node, segment_idx));
                    self.heap.push(HeapItem {
                        node: adj_node,
                        cost: new_cost,
                    });
                } else if new_cost == adj_data.cost
                    && let Some(current) = adj_data.parent
                    && self.precedes(start, (node, segment_idx), current)
                    && let Some(adj_data) = self.data.get_mut(&adj_node)
                {
                    adj_data.parent = Some((node, segment_idx));
                }
            }
        }

        None
    }

    /// Whether reaching a node through `parent` orders before reaching it
    /// through `current`. Both parents are settled since costs are positive.
    fn precedes(
        &self,
        start: NodeIdx,
        parent: (NodeIdx, SegmentIdx),
        current: (NodeIdx, SegmentIdx),
    ) -> bool {
        let mut candidate = self.segments_to(start, parent.0);
        candidate.push(parent.1);
        let mut existing = self.segments_to(start, current.0);
        existing.push(current.1);

        candidate < existing
    }

    fn segments_to(&self, start: NodeIdx, end: NodeIdx) -> PathSegments {
        let mut segments = PathSegments::new();
        let mut node = end;

        while node != start {
            let Some((parent, segment_idx)) = self.data.get(&node).and_then(|data| data.parent)
            else {
                break;
            };

            segments.push(segment_idx);
            node = parent;
        }

        segments.reverse();
        segments
    }

    fn build_path(&self, network: &RoadNetwork, start: NodeIdx, end: NodeIdx) -> NetworkPath {
        let mut nodes = PathNodes::new();
        let mut segments = PathSegments::new();

        let mut node = end;
        nodes.push(node);

        while node != start {
            let Some((parent, segment_idx)) = self.data.get(&node).and_then(|data| data.parent)
            else {
                break;
            };

            segments.push(segment_idx);
            nodes.push(parent);
            node = parent;
        }

        nodes.reverse();
        segments.reverse();

        NetworkPath::from_parts(network, nodes, segments)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_network, romania_network};

    use super::*;

    #[test]
    fn test_calc_path() {
        let network = romania_network();
        let mut dijkstra = Dijkstra::new(&network);

        let path = dijkstra
            .calc_path(
                &network,
                network.node_idx("Oradea").unwrap(),
                network.node_idx("Bucharest").unwrap(),
                &FxHashSet::default(),
                &FxHashSet::default(),
            )
            .unwrap();

        assert_eq!(path.cost(), 429.0);
        assert_eq!(path.origin(), network.node_idx("Oradea").unwrap());
        assert_eq!(path.destination(), network.node_idx("Bucharest").unwrap());
    }

    #[test]
    fn test_calc_path_2() {
        let network = romania_network();
        let path = network
            .shortest_path(
                network.node_idx("Iasi").unwrap(),
                network.node_idx("Timisoara").unwrap(),
            )
            .unwrap();

        assert_eq!(path.cost(), 855.0);
    }

    #[test]
    fn test_disconnected() {
        let network = create_test_network(&["a", "b", "c"], &[("a", "b", 1.0, 1)]);
        let path = network.shortest_path(
            network.node_idx("a").unwrap(),
            network.node_idx("c").unwrap(),
        );

        assert!(path.is_none());
    }

    #[test]
    fn test_removed_segment_forces_detour() {
        let network = create_test_network(
            &["a", "b", "c"],
            &[("a", "c", 1.0, 1), ("a", "b", 1.0, 1), ("b", "c", 1.0, 1)],
        );
        let mut dijkstra = Dijkstra::new(&network);
        let removed_segments = [network.segment_idx("a-c").unwrap()]
            .into_iter()
            .collect::<FxHashSet<_>>();

        let path = dijkstra
            .calc_path(
                &network,
                network.node_idx("a").unwrap(),
                network.node_idx("c").unwrap(),
                &FxHashSet::default(),
                &removed_segments,
            )
            .unwrap();

        assert_eq!(path.cost(), 2.0);
        assert_eq!(path.hop_count(), 2);
    }

    #[test]
    fn test_same_origin_and_destination() {
        let network = create_test_network(&["a", "b"], &[("a", "b", 1.0, 1)]);
        let a = network.node_idx("a").unwrap();
        let path = network.shortest_path(a, a).unwrap();

        assert!(path.is_empty());
        assert_eq!(path.cost(), 0.0);
        assert_eq!(path.nodes(), &[a]);
    }

    #[test]
    fn test_equal_cost_prefers_lowest_segment_sequence() {
        let network = create_test_network(
            &["a", "b", "c", "d"],
            &[
                ("a", "b", 1.0, 1),
                ("c", "d", 1.0, 1),
                ("a", "c", 1.0, 1),
                ("b", "d", 1.0, 1),
            ],
        );

        let path = network
            .shortest_path(
                network.node_idx("a").unwrap(),
                network.node_idx("d").unwrap(),
            )
            .unwrap();

        // [0, 3] through b orders before [2, 1] through c despite its higher last hop
        assert_eq!(path.segments(), &[SegmentIdx::new(0), SegmentIdx::new(3)]);
    }

    #[test]
    fn test_equal_cost_compares_whole_prefix() {
        let network = create_test_network(
            &["a", "b", "c", "d", "e"],
            &[
                ("a", "b", 1.0, 1),
                ("c", "d", 1.0, 1),
                ("d", "e", 1.0, 1),
                ("b", "d", 1.0, 1),
                ("a", "c", 1.0, 1),
            ],
        );

        let path = network
            .shortest_path(
                network.node_idx("a").unwrap(),
                network.node_idx("e").unwrap(),
            )
            .unwrap();

        // The tie at d is settled on [0, 3] against [4, 1] and carried on to e
        assert_eq!(
            path.segments(),
            &[SegmentIdx::new(0), SegmentIdx::new(3), SegmentIdx::new(2)]
        );
    }
}
