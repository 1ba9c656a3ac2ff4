use corridor_network::NetworkError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutingError {
    #[error("No path between origin and destination of vehicle {vehicle}")]
    NoPath { vehicle: String },
    #[error("No vehicle requests to route")]
    EmptyRequest,
    #[error("QUBO model has no variables")]
    DegenerateModel,
    #[error("All {failed_reads} solver reads failed")]
    SolverFailure { failed_reads: usize },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Unknown node {0}")]
    UnknownNode(String),
    #[error("Model has {variables} variables, the exact solver handles at most {max}")]
    ModelTooLarge { variables: usize, max: usize },
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),
    #[error(transparent)]
    Network(#[from] NetworkError),
}
