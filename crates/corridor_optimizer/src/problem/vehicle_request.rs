use corridor_network::{NodeIdx, define_index_newtype};

use super::priority_class::PriorityClass;

define_index_newtype!(VehicleIdx, VehicleRequest);

/// A routing request, immutable once submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleRequest {
    external_id: String,
    origin: NodeIdx,
    destination: NodeIdx,
    priority: PriorityClass,
}

impl VehicleRequest {
    pub fn new(
        external_id: impl Into<String>,
        origin: NodeIdx,
        destination: NodeIdx,
        priority: PriorityClass,
    ) -> Self {
        VehicleRequest {
            external_id: external_id.into(),
            origin,
            destination,
            priority,
        }
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn origin(&self) -> NodeIdx {
        self.origin
    }

    pub fn destination(&self) -> NodeIdx {
        self.destination
    }

    pub fn priority(&self) -> PriorityClass {
        self.priority
    }

    pub fn weight(&self) -> f64 {
        self.priority.weight()
    }
}
