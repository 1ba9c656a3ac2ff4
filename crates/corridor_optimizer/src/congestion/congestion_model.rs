use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use corridor_network::Segment;

use super::{
    bpr_estimator::BprEstimator, congestion_estimator::CongestionEstimator,
    piecewise_linear_estimator::PiecewiseLinearEstimator,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CongestionModel {
    Bpr(BprEstimator),
    PiecewiseLinear(PiecewiseLinearEstimator),
}

impl Default for CongestionModel {
    fn default() -> Self {
        CongestionModel::Bpr(BprEstimator::default())
    }
}

impl CongestionEstimator for CongestionModel {
    fn estimate(&self, segment: &Segment, load: u32) -> f64 {
        match self {
            CongestionModel::Bpr(estimator) => estimator.estimate(segment, load),
            CongestionModel::PiecewiseLinear(estimator) => estimator.estimate(segment, load),
        }
    }
}
