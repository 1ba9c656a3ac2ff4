use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ordinal vehicle class, `Normal < Emergency`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum PriorityClass {
    #[default]
    Normal,
    Emergency,
}

impl PriorityClass {
    pub fn weight(&self) -> f64 {
        match self {
            PriorityClass::Normal => 1.0,
            PriorityClass::Emergency => 100.0,
        }
    }

    /// Whether the class earns a priority bonus in the objective.
    pub fn is_prioritized(&self) -> bool {
        *self > PriorityClass::Normal
    }
}
