use crate::{
    node::NodeIdx,
    road_network::{RoadNetwork, RoadNetworkBuilder},
    segment::{Segment, SegmentBuilder},
};

pub fn create_segment(
    external_id: &str,
    from: NodeIdx,
    to: NodeIdx,
    base_cost: f64,
    capacity: u32,
) -> Segment {
    let mut builder = SegmentBuilder::default();
    builder
        .set_external_id(external_id)
        .set_endpoints(from, to)
        .set_base_cost(base_cost)
        .set_capacity(capacity);
    builder.build().unwrap()
}

/// Segments are named `from-to`.
pub fn create_test_network(nodes: &[&str], segments: &[(&str, &str, f64, u32)]) -> RoadNetwork {
    let mut builder = RoadNetworkBuilder::default();
    for node in nodes {
        builder.add_unique_node(*node).unwrap();
    }

    for &(from, to, cost, capacity) in segments {
        let from_idx = builder.node_idx(from).unwrap();
        let to_idx = builder.node_idx(to).unwrap();
        builder.add_segment(create_segment(
            &format!("{from}-{to}"),
            from_idx,
            to_idx,
            cost,
            capacity,
        ));
    }

    builder.build().unwrap()
}

pub fn romania_network() -> RoadNetwork {
    create_test_network(
        &[
            "Oradea",
            "Zerind",
            "Arad",
            "Timisoara",
            "Lugoj",
            "Mehadia",
            "Dobreta",
            "Craiova",
            "RimnicuVilcea",
            "Sibiu",
            "Fagaras",
            "Pitesti",
            "Bucharest",
            "Giurgiu",
            "Urziceni",
            "Hirsova",
            "Eforie",
            "Vaslui",
            "Iasi",
            "Neamt",
        ],
        &[
            ("Oradea", "Zerind", 71.0, 1),
            ("Oradea", "Sibiu", 151.0, 1),
            ("Zerind", "Arad", 75.0, 1),
            ("Arad", "Sibiu", 140.0, 1),
            ("Arad", "Timisoara", 118.0, 1),
            ("Timisoara", "Lugoj", 111.0, 1),
            ("Lugoj", "Mehadia", 70.0, 1),
            ("Mehadia", "Dobreta", 75.0, 1),
            ("Dobreta", "Craiova", 120.0, 1),
            ("Craiova", "RimnicuVilcea", 146.0, 1),
            ("Craiova", "Pitesti", 138.0, 1),
            ("RimnicuVilcea", "Pitesti", 97.0, 1),
            ("RimnicuVilcea", "Sibiu", 80.0, 1),
            ("Sibiu", "Fagaras", 99.0, 1),
            ("Fagaras", "Bucharest", 211.0, 1),
            ("Pitesti", "Bucharest", 101.0, 1),
            ("Bucharest", "Giurgiu", 90.0, 1),
            ("Bucharest", "Urziceni", 85.0, 1),
            ("Urziceni", "Hirsova", 98.0, 1),
            ("Hirsova", "Eforie", 86.0, 1),
            ("Urziceni", "Vaslui", 142.0, 1),
            ("Vaslui", "Iasi", 92.0, 1),
            ("Iasi", "Neamt", 87.0, 1),
        ],
    )
}
