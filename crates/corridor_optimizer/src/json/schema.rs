use schemars::schema_for;

use crate::{interpret::routing_outcome::RoutingOutcome, json::types};

pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(types::JsonRoutingScenario))
}

pub fn generate_outcome_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(RoutingOutcome))
}
