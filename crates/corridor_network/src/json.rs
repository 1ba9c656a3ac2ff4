use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::NetworkError,
    road_network::{RoadNetwork, RoadNetworkBuilder},
    segment::{SegmentBuilder, free_flow_minutes},
};

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "RoadNetwork")]
pub struct JsonRoadNetwork {
    /// Optional explicit node list, nodes are otherwise inferred from segments.
    pub nodes: Option<Vec<String>>,
    pub segments: Vec<JsonSegment>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "Segment")]
pub struct JsonSegment {
    pub id: String,
    pub from: String,
    pub to: String,

    /// Traversal cost, takes precedence over `length_m` and `speed_kmh`.
    pub cost: Option<f64>,
    pub length_m: Option<f64>,
    pub speed_kmh: Option<f64>,

    pub capacity: Option<u32>,
    pub load: Option<u32>,
    pub oneway: Option<bool>,
}

impl JsonSegment {
    fn base_cost(&self) -> Option<f64> {
        match (self.cost, self.length_m, self.speed_kmh) {
            (Some(cost), _, _) => Some(cost),
            (None, Some(length_m), Some(speed_kmh)) => Some(free_flow_minutes(length_m, speed_kmh)),
            _ => None,
        }
    }
}

impl JsonRoadNetwork {
    pub fn build_network(self) -> Result<RoadNetwork, NetworkError> {
        let mut builder = RoadNetworkBuilder::default();

        let declared_nodes = self.nodes.is_some();
        if let Some(nodes) = self.nodes {
            for node in nodes {
                builder.add_unique_node(node)?;
            }
        }

        for segment in self.segments {
            let (from, to) = if declared_nodes {
                (
                    builder
                        .node_idx(&segment.from)
                        .ok_or_else(|| NetworkError::UnknownNode(segment.from.clone()))?,
                    builder
                        .node_idx(&segment.to)
                        .ok_or_else(|| NetworkError::UnknownNode(segment.to.clone()))?,
                )
            } else {
                (
                    builder.add_node(segment.from.as_str()),
                    builder.add_node(segment.to.as_str()),
                )
            };

            let mut segment_builder = SegmentBuilder::default();
            segment_builder
                .set_external_id(segment.id.as_str())
                .set_endpoints(from, to);

            if let Some(base_cost) = segment.base_cost() {
                segment_builder.set_base_cost(base_cost);
            }

            if let Some(capacity) = segment.capacity {
                segment_builder.set_capacity(capacity);
            }

            if let Some(load) = segment.load {
                segment_builder.set_load(load);
            }

            if let Some(oneway) = segment.oneway {
                segment_builder.set_oneway(oneway);
            }

            builder.add_segment(segment_builder.build()?);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_network_from_json() {
        let json = r#"{
            "segments": [
                { "id": "s1", "from": "a", "to": "b", "cost": 2.0, "capacity": 3, "load": 1 },
                { "id": "s2", "from": "b", "to": "c", "length_m": 1000.0, "speed_kmh": 30.0, "oneway": true }
            ]
        }"#;

        let network = serde_json::from_str::<JsonRoadNetwork>(json)
            .unwrap()
            .build_network()
            .unwrap();

        assert_eq!(network.node_count(), 3);
        let s1 = network.segment(network.segment_idx("s1").unwrap());
        assert_eq!(s1.capacity(), 3);
        assert_eq!(s1.load(), 1);

        let s2 = network.segment(network.segment_idx("s2").unwrap());
        assert!((s2.base_cost() - 2.0).abs() < 1e-12);
        assert_eq!(s2.capacity(), 1);
        assert!(s2.is_oneway());
    }

    #[test]
    fn test_declared_nodes_reject_unknown() {
        let json = r#"{
            "nodes": ["a", "b"],
            "segments": [{ "id": "s1", "from": "a", "to": "z", "cost": 1.0 }]
        }"#;

        let result = serde_json::from_str::<JsonRoadNetwork>(json)
            .unwrap()
            .build_network();

        assert_eq!(result.unwrap_err(), NetworkError::UnknownNode("z".to_owned()));
    }

    #[test]
    fn test_missing_cost() {
        let json = r#"{ "segments": [{ "id": "s1", "from": "a", "to": "b", "length_m": 10.0 }] }"#;

        let result = serde_json::from_str::<JsonRoadNetwork>(json)
            .unwrap()
            .build_network();

        assert!(matches!(result, Err(NetworkError::MissingCost { .. })));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let json = r#"{ "segments": [], "lanes": 2 }"#;
        assert!(serde_json::from_str::<JsonRoadNetwork>(json).is_err());
    }
}
