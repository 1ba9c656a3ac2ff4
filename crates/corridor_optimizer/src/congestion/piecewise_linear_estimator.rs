use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use corridor_network::Segment;

use super::congestion_estimator::{CongestionEstimator, clamped_load_ratio};

/// Linear up to capacity, then `overload_slope` per unit of overload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PiecewiseLinearEstimator {
    pub overload_slope: f64,
}

impl Default for PiecewiseLinearEstimator {
    fn default() -> Self {
        PiecewiseLinearEstimator {
            overload_slope: 4.0,
        }
    }
}

impl CongestionEstimator for PiecewiseLinearEstimator {
    fn estimate(&self, segment: &Segment, load: u32) -> f64 {
        let ratio = clamped_load_ratio(segment, load);
        if ratio <= 1.0 {
            ratio
        } else {
            1.0 + self.overload_slope * (ratio - 1.0)
        }
    }
}
