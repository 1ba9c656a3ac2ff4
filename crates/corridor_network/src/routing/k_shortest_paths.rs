use std::collections::BTreeSet;

use fxhash::FxHashSet;
use tracing::trace;

use crate::{
    node::NodeIdx,
    road_network::RoadNetwork,
    routing::{
        dijkstra::Dijkstra,
        network_path::{NetworkPath, PathSegments, RankedPath},
    },
    segment::SegmentIdx,
};

/// Yen's algorithm for the `k` cheapest loopless paths.
///
/// Paths come out in non-decreasing cost order, equal costs are ordered by
/// their segment index sequence so the result is deterministic.
pub fn k_shortest_paths(
    network: &RoadNetwork,
    origin: NodeIdx,
    destination: NodeIdx,
    k: usize,
) -> Vec<NetworkPath> {
    if k == 0 {
        return Vec::new();
    }

    let mut dijkstra = Dijkstra::new(network);
    let no_nodes = FxHashSet::default();
    let no_segments = FxHashSet::default();

    let Some(shortest) = dijkstra.calc_path(network, origin, destination, &no_nodes, &no_segments)
    else {
        return Vec::new();
    };

    let mut seen: FxHashSet<PathSegments> = FxHashSet::default();
    seen.insert(shortest.segments().iter().copied().collect());

    let mut accepted = vec![shortest];
    let mut candidates: BTreeSet<RankedPath> = BTreeSet::new();

    while accepted.len() < k {
        let previous = accepted[accepted.len() - 1].clone();

        for spur_index in 0..previous.hop_count() {
            let spur_node = previous.nodes()[spur_index];
            let root = &previous.segments()[..spur_index];

            let removed_segments: FxHashSet<SegmentIdx> = accepted
                .iter()
                .filter(|path| path.hop_count() > spur_index && &path.segments()[..spur_index] == root)
                .map(|path| path.segments()[spur_index])
                .collect();

            let removed_nodes: FxHashSet<NodeIdx> =
                previous.nodes()[..spur_index].iter().copied().collect();

            let Some(spur) = dijkstra.calc_path(
                network,
                spur_node,
                destination,
                &removed_nodes,
                &removed_segments,
            ) else {
                continue;
            };

            let candidate = previous.join_at(network, spur_index, &spur);
            if seen.insert(candidate.segments().iter().copied().collect()) {
                candidates.insert(RankedPath(candidate));
            }
        }

        match candidates.pop_first() {
            Some(RankedPath(path)) => accepted.push(path),
            None => break,
        }
    }

    trace!(
        origin = origin.get(),
        destination = destination.get(),
        found = accepted.len(),
        "k shortest paths"
    );

    accepted
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_network, romania_network};

    use super::*;

    fn ids(network: &RoadNetwork, path: &NetworkPath) -> Vec<String> {
        path.nodes()
            .iter()
            .map(|&node| network.node(node).external_id().to_owned())
            .collect()
    }

    #[test]
    fn test_k_shortest_paths_order() {
        let network = create_test_network(
            &["a", "b", "c", "d"],
            &[
                ("a", "d", 10.0, 1),
                ("a", "b", 1.0, 1),
                ("b", "d", 1.0, 1),
                ("a", "c", 2.0, 1),
                ("c", "d", 2.0, 1),
            ],
        );

        let paths = network.k_shortest_paths(
            network.node_idx("a").unwrap(),
            network.node_idx("d").unwrap(),
            3,
        );

        assert_eq!(paths.len(), 3);
        assert_eq!(ids(&network, &paths[0]), vec!["a", "b", "d"]);
        assert_eq!(ids(&network, &paths[1]), vec!["a", "c", "d"]);
        assert_eq!(ids(&network, &paths[2]), vec!["a", "d"]);
        assert_eq!(paths[0].cost(), 2.0);
        assert_eq!(paths[1].cost(), 4.0);
        assert_eq!(paths[2].cost(), 10.0);
    }

    #[test]
    fn test_equal_costs_follow_segment_sequence() {
        let network = create_test_network(
            &["a", "b", "c", "d"],
            &[
                ("a", "b", 1.0, 1),
                ("c", "d", 1.0, 1),
                ("a", "c", 1.0, 1),
                ("b", "d", 1.0, 1),
            ],
        );

        let paths = network.k_shortest_paths(
            network.node_idx("a").unwrap(),
            network.node_idx("d").unwrap(),
            2,
        );

        assert_eq!(paths[0].segments(), &[SegmentIdx::new(0), SegmentIdx::new(3)]);
        assert_eq!(paths[1].segments(), &[SegmentIdx::new(2), SegmentIdx::new(1)]);
    }

    #[test]
    fn test_fewer_paths_than_k() {
        let network = create_test_network(
            &["a", "b", "c"],
            &[("a", "b", 1.0, 1), ("b", "c", 1.0, 1)],
        );

        let paths = network.k_shortest_paths(
            network.node_idx("a").unwrap(),
            network.node_idx("c").unwrap(),
            5,
        );

        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_zero_k_and_disconnected() {
        let network = create_test_network(&["a", "b", "c"], &[("a", "b", 1.0, 1)]);
        let a = network.node_idx("a").unwrap();

        assert!(network.k_shortest_paths(a, network.node_idx("b").unwrap(), 0).is_empty());
        assert!(network.k_shortest_paths(a, network.node_idx("c").unwrap(), 3).is_empty());
    }

    #[test]
    fn test_paths_are_loopless_and_distinct() {
        let network = romania_network();
        let paths = network.k_shortest_paths(
            network.node_idx("Arad").unwrap(),
            network.node_idx("Bucharest").unwrap(),
            6,
        );

        assert_eq!(paths.len(), 6);
        // Arad - Sibiu - Rimnicu Vilcea - Pitesti - Bucharest
        assert_eq!(paths[0].cost(), 418.0);
        // Arad - Sibiu - Fagaras - Bucharest
        assert_eq!(paths[1].cost(), 450.0);

        let mut seen = FxHashSet::default();
        for window in paths.windows(2) {
            assert!(window[0].cost() <= window[1].cost());
        }
        for path in &paths {
            let unique: FxHashSet<_> = path.nodes().iter().collect();
            assert_eq!(unique.len(), path.nodes().len());
            assert!(seen.insert(path.segments().to_vec()));
        }
    }

    #[test]
    fn test_parallel_segments_are_distinct_paths() {
        let network = create_test_network(
            &["a", "b"],
            &[("a", "b", 1.0, 1), ("b", "a", 1.0, 1)],
        );

        let paths = network.k_shortest_paths(
            network.node_idx("a").unwrap(),
            network.node_idx("b").unwrap(),
            3,
        );

        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].segments(), &[SegmentIdx::new(0)]);
        assert_eq!(paths[1].segments(), &[SegmentIdx::new(1)]);
    }
}
