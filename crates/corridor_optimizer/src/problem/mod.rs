pub mod priority_class;
pub mod routing_scenario;
pub mod vehicle_request;
