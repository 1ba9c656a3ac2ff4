use crate::config::RoutingConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormulationWeights {
    pub cost_weight: f64,
    pub congestion_weight: f64,
    pub priority_weight: f64,
    /// Derived from the model when `None`.
    pub onehot_penalty: Option<f64>,
}

impl Default for FormulationWeights {
    fn default() -> Self {
        FormulationWeights::from(&RoutingConfig::default())
    }
}

impl From<&RoutingConfig> for FormulationWeights {
    fn from(config: &RoutingConfig) -> Self {
        FormulationWeights {
            cost_weight: config.cost_weight,
            congestion_weight: config.congestion_weight,
            priority_weight: config.priority_weight,
            onehot_penalty: config.onehot_penalty,
        }
    }
}
