use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use corridor_network::Segment;

use super::congestion_estimator::{CongestionEstimator, clamped_load_ratio};

/// Bureau of Public Roads style volume delay curve, `alpha * ratio^beta`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BprEstimator {
    pub alpha: f64,
    pub beta: f64,
}

impl Default for BprEstimator {
    fn default() -> Self {
        BprEstimator {
            alpha: 1.0,
            beta: 2.0,
        }
    }
}

impl CongestionEstimator for BprEstimator {
    fn estimate(&self, segment: &Segment, load: u32) -> f64 {
        self.alpha * clamped_load_ratio(segment, load).powf(self.beta)
    }
}
