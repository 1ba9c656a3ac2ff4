use corridor_network::json::JsonRoadNetwork;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    config::RoutingConfig,
    error::RoutingError,
    problem::{
        priority_class::PriorityClass, routing_scenario::RoutingScenario,
        vehicle_request::VehicleRequest,
    },
};

#[derive(Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "RoutingScenario")]
pub struct JsonRoutingScenario {
    pub network: JsonRoadNetwork,
    pub vehicles: Vec<JsonVehicleRequest>,
    #[serde(default)]
    pub config: RoutingConfig,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "VehicleRequest")]
pub struct JsonVehicleRequest {
    pub id: String,
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub priority: PriorityClass,
}

impl JsonRoutingScenario {
    #[instrument(skip_all, level = "debug")]
    pub fn build_scenario(self) -> Result<RoutingScenario, RoutingError> {
        let network = self.network.build_network()?;

        let requests = self
            .vehicles
            .into_iter()
            .map(|vehicle| {
                let node = |external_id: &str| {
                    network.node_idx(external_id).ok_or_else(|| {
                        RoutingError::UnknownNode(format!(
                            "{external_id} requested by vehicle {}",
                            vehicle.id
                        ))
                    })
                };

                Ok(VehicleRequest::new(
                    vehicle.id.as_str(),
                    node(&vehicle.origin)?,
                    node(&vehicle.destination)?,
                    vehicle.priority,
                ))
            })
            .collect::<Result<Vec<_>, RoutingError>>()?;

        self.config.validate()?;

        Ok(RoutingScenario {
            network,
            requests,
            config: self.config,
        })
    }
}
