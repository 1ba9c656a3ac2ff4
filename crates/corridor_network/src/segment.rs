use serde::Serialize;

use crate::{define_index_newtype, error::NetworkError, node::NodeIdx};

define_index_newtype!(SegmentIdx, Segment);

/// A road segment between two intersections.
///
/// `base_cost` is the free-flow traversal cost (minutes when derived from
/// length and speed). `load` is the traffic already assigned to the segment
/// before a routing round; it is never capped, estimators decide how to
/// score overload.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Segment {
    external_id: String,
    from: NodeIdx,
    to: NodeIdx,
    base_cost: f64,
    capacity: u32,
    load: u32,
    oneway: bool,
}

impl Segment {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn from_node(&self) -> NodeIdx {
        self.from
    }

    pub fn to_node(&self) -> NodeIdx {
        self.to
    }

    pub fn base_cost(&self) -> f64 {
        self.base_cost
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn load(&self) -> u32 {
        self.load
    }

    pub fn is_oneway(&self) -> bool {
        self.oneway
    }

    /// The node reached when entering the segment from `node`, if the
    /// segment can be traversed in that direction.
    pub fn adj_node(&self, node: NodeIdx) -> Option<NodeIdx> {
        if self.from == node {
            Some(self.to)
        } else if self.to == node && !self.oneway {
            Some(self.from)
        } else {
            None
        }
    }
}

/// Converts a length and a speed into free-flow minutes.
pub fn free_flow_minutes(length_m: f64, speed_kmh: f64) -> f64 {
    let length_km = length_m / 1000.0;
    (length_km / speed_kmh.max(1.0)) * 60.0
}

#[derive(Default)]
pub struct SegmentBuilder {
    external_id: Option<String>,
    from: Option<NodeIdx>,
    to: Option<NodeIdx>,
    base_cost: Option<f64>,
    capacity: Option<u32>,
    load: Option<u32>,
    oneway: Option<bool>,
}

impl SegmentBuilder {
    pub fn set_external_id(&mut self, external_id: impl Into<String>) -> &mut SegmentBuilder {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_endpoints(&mut self, from: NodeIdx, to: NodeIdx) -> &mut SegmentBuilder {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn set_base_cost(&mut self, base_cost: f64) -> &mut SegmentBuilder {
        self.base_cost = Some(base_cost);
        self
    }

    pub fn set_capacity(&mut self, capacity: u32) -> &mut SegmentBuilder {
        self.capacity = Some(capacity);
        self
    }

    pub fn set_load(&mut self, load: u32) -> &mut SegmentBuilder {
        self.load = Some(load);
        self
    }

    pub fn set_oneway(&mut self, oneway: bool) -> &mut SegmentBuilder {
        self.oneway = Some(oneway);
        self
    }

    pub fn build(self) -> Result<Segment, NetworkError> {
        let external_id = self.external_id.unwrap_or_default();

        let (Some(from), Some(to)) = (self.from, self.to) else {
            return Err(NetworkError::IncompleteSegment {
                segment: external_id,
                field: "endpoints",
            });
        };

        let Some(base_cost) = self.base_cost else {
            return Err(NetworkError::MissingCost {
                segment: external_id,
            });
        };

        if !base_cost.is_finite() || base_cost <= 0.0 {
            return Err(NetworkError::InvalidCost {
                segment: external_id,
                cost: base_cost,
            });
        }

        let capacity = self.capacity.unwrap_or(1);
        if capacity == 0 {
            return Err(NetworkError::InvalidCapacity {
                segment: external_id,
            });
        }

        Ok(Segment {
            external_id,
            from,
            to,
            base_cost,
            capacity,
            load: self.load.unwrap_or(0),
            oneway: self.oneway.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> SegmentBuilder {
        let mut builder = SegmentBuilder::default();
        builder
            .set_external_id("a-b")
            .set_endpoints(NodeIdx::new(0), NodeIdx::new(1))
            .set_base_cost(5.0)
            .set_capacity(10);
        builder
    }

    #[test]
    fn test_build_segment() {
        let segment = builder().build().unwrap();

        assert_eq!(segment.external_id(), "a-b");
        assert_eq!(segment.base_cost(), 5.0);
        assert_eq!(segment.capacity(), 10);
        assert_eq!(segment.load(), 0);
        assert!(!segment.is_oneway());
    }

    #[test]
    fn test_rejects_non_positive_cost() {
        let mut builder = builder();
        builder.set_base_cost(0.0);

        assert!(matches!(
            builder.build(),
            Err(NetworkError::InvalidCost { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let mut builder = builder();
        builder.set_capacity(0);

        assert_eq!(
            builder.build(),
            Err(NetworkError::InvalidCapacity {
                segment: "a-b".to_owned()
            })
        );
    }

    #[test]
    fn test_adj_node() {
        let segment = builder().build().unwrap();
        assert_eq!(segment.adj_node(NodeIdx::new(0)), Some(NodeIdx::new(1)));
        assert_eq!(segment.adj_node(NodeIdx::new(1)), Some(NodeIdx::new(0)));
        assert_eq!(segment.adj_node(NodeIdx::new(2)), None);

        let mut oneway = builder();
        oneway.set_oneway(true);
        let oneway = oneway.build().unwrap();
        assert_eq!(oneway.adj_node(NodeIdx::new(1)), None);
    }

    #[test]
    fn test_free_flow_minutes() {
        // 1km at 60km/h
        assert!((free_flow_minutes(1000.0, 60.0) - 1.0).abs() < 1e-12);
        assert!((free_flow_minutes(500.0, 30.0) - 1.0).abs() < 1e-12);
    }
}
