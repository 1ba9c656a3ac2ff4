use corridor_network::{
    NodeIdx, RoadNetwork, RoadNetworkBuilder, Segment, SegmentBuilder,
};

use crate::problem::{priority_class::PriorityClass, vehicle_request::VehicleRequest};

pub fn create_segment(base_cost: f64, capacity: u32) -> Segment {
    let mut builder = SegmentBuilder::default();
    builder
        .set_external_id("segment")
        .set_endpoints(NodeIdx::new(0), NodeIdx::new(1))
        .set_base_cost(base_cost)
        .set_capacity(capacity);
    builder.build().unwrap()
}

pub struct TestNetwork {
    builder: RoadNetworkBuilder,
}

impl TestNetwork {
    pub fn new(nodes: &[&str]) -> Self {
        let mut builder = RoadNetworkBuilder::default();
        for node in nodes {
            builder.add_unique_node(*node).unwrap();
        }
        TestNetwork { builder }
    }

    /// Segments are named `from-to`.
    pub fn add_loaded_segment(
        &mut self,
        from: &str,
        to: &str,
        base_cost: f64,
        capacity: u32,
        load: u32,
    ) -> &mut TestNetwork {
        let mut segment = SegmentBuilder::default();
        segment
            .set_external_id(format!("{from}-{to}"))
            .set_endpoints(
                self.builder.node_idx(from).unwrap(),
                self.builder.node_idx(to).unwrap(),
            )
            .set_base_cost(base_cost)
            .set_capacity(capacity)
            .set_load(load);
        self.builder.add_segment(segment.build().unwrap());
        self
    }

    pub fn build(self) -> RoadNetwork {
        self.builder.build().unwrap()
    }
}

pub fn create_test_network(nodes: &[&str], segments: &[(&str, &str, f64, u32)]) -> RoadNetwork {
    let mut network = TestNetwork::new(nodes);
    for &(from, to, base_cost, capacity) in segments {
        network.add_loaded_segment(from, to, base_cost, capacity, 0);
    }
    network.build()
}

/// Route A `s-a-t` costs 10 over 2 segments, route B `s-b1-b2-t` costs 15
/// over 3 segments. Every segment costs 5 and fits a single vehicle.
pub fn two_route_network() -> RoadNetwork {
    create_test_network(
        &["s", "a", "b1", "b2", "t"],
        &[
            ("s", "a", 5.0, 1),
            ("a", "t", 5.0, 1),
            ("s", "b1", 5.0, 1),
            ("b1", "b2", 5.0, 1),
            ("b2", "t", 5.0, 1),
        ],
    )
}

/// Route A `s-a-t` costs 10, route B `s-b-t` costs 15. Both take 2 segments
/// that fit a single vehicle.
pub fn equal_hop_network() -> RoadNetwork {
    create_test_network(
        &["s", "a", "b", "t"],
        &[
            ("s", "a", 5.0, 1),
            ("a", "t", 5.0, 1),
            ("s", "b", 7.5, 1),
            ("b", "t", 7.5, 1),
        ],
    )
}

pub fn create_request(
    network: &RoadNetwork,
    external_id: &str,
    origin: &str,
    destination: &str,
    priority: PriorityClass,
) -> VehicleRequest {
    VehicleRequest::new(
        external_id,
        network.node_idx(origin).unwrap(),
        network.node_idx(destination).unwrap(),
        priority,
    )
}

/// `width` x `height` grid with unit cost segments named `x,y-x,y`.
pub fn grid_network(width: usize, height: usize, capacity: u32) -> RoadNetwork {
    let names = (0..height)
        .flat_map(|y| (0..width).map(move |x| format!("{x},{y}")))
        .collect::<Vec<_>>();
    let nodes = names.iter().map(String::as_str).collect::<Vec<_>>();

    let mut network = TestNetwork::new(&nodes);
    for y in 0..height {
        for x in 0..width {
            if x + 1 < width {
                network.add_loaded_segment(
                    &format!("{x},{y}"),
                    &format!("{},{y}", x + 1),
                    1.0,
                    capacity,
                    0,
                );
            }
            if y + 1 < height {
                network.add_loaded_segment(
                    &format!("{x},{y}"),
                    &format!("{x},{}", y + 1),
                    1.0,
                    capacity,
                    0,
                );
            }
        }
    }
    network.build()
}
