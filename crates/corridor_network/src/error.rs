use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Unknown node {0}")]
    UnknownNode(String),
    #[error("Node {0} is declared more than once")]
    DuplicateNode(String),
    #[error("Segment {0} is declared more than once")]
    DuplicateSegment(String),
    #[error("Segment {segment} has an invalid base cost {cost}, expected a positive finite value")]
    InvalidCost { segment: String, cost: f64 },
    #[error("Segment {segment} has no cost, expected either `cost` or `length_m` and `speed_kmh`")]
    MissingCost { segment: String },
    #[error("Segment {segment} has a zero capacity")]
    InvalidCapacity { segment: String },
    #[error("Segment {segment} is missing its {field}")]
    IncompleteSegment {
        segment: String,
        field: &'static str,
    },
}
