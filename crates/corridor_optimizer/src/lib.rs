mod utils;

pub mod candidate;
pub mod config;
pub mod congestion;
pub mod error;
pub mod interpret;
pub mod problem;
pub mod qubo;
pub mod routing;
pub mod solver;

pub mod json;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::RoutingConfig;
pub use error::RoutingError;
pub use interpret::routing_outcome::RoutingOutcome;
pub use problem::{priority_class::PriorityClass, vehicle_request::VehicleRequest};
pub use routing::{RoutingSolver, SolverStatus, solve_routing};
