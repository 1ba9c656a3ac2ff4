use corridor_network::RoadNetwork;

use crate::config::RoutingConfig;

use super::vehicle_request::VehicleRequest;

/// Everything needed for one routing round.
#[derive(Debug, Clone)]
pub struct RoutingScenario {
    pub network: RoadNetwork,
    pub requests: Vec<VehicleRequest>,
    pub config: RoutingConfig,
}
