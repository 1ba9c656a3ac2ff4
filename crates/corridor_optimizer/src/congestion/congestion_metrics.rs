use schemars::JsonSchema;
use serde::Serialize;

use corridor_network::RoadNetwork;

use super::{congestion_estimator::CongestionEstimator, segment_loads::SegmentLoads};

/// Network-wide congestion summary for one load state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
pub struct CongestionMetrics {
    /// Sum of segment scores.
    pub total_score: f64,
    /// Sum of segment scores weighted by base cost, the expected delay.
    pub weighted_delay: f64,
    pub mean_score: f64,
    pub max_score: f64,
    pub congested_segments: usize,
    pub overloaded_segments: usize,
}

impl CongestionMetrics {
    pub fn compute(
        network: &RoadNetwork,
        loads: &SegmentLoads,
        estimator: &impl CongestionEstimator,
        congested_threshold: f64,
    ) -> Self {
        let mut metrics = CongestionMetrics::default();

        for (segment_idx, load) in loads.iter() {
            let segment = network.segment(segment_idx);
            let score = estimator.estimate(segment, load);

            metrics.total_score += score;
            metrics.weighted_delay += segment.base_cost() * score;
            metrics.max_score = metrics.max_score.max(score);

            if estimator.is_congested(score, congested_threshold) {
                metrics.congested_segments += 1;
            }

            if load > segment.capacity() {
                metrics.overloaded_segments += 1;
            }
        }

        if network.segment_count() > 0 {
            metrics.mean_score = metrics.total_score / network.segment_count() as f64;
        }

        metrics
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        congestion::congestion_model::CongestionModel, test_utils::create_test_network,
    };

    use super::*;

    #[test]
    fn test_compute() {
        let network = create_test_network(
            &["a", "b", "c"],
            &[("a", "b", 2.0, 1), ("b", "c", 1.0, 2)],
        );
        let mut loads = SegmentLoads::baseline(&network);
        loads.add_path(&[corridor_network::SegmentIdx::new(0)]);
        loads.add_path(&[corridor_network::SegmentIdx::new(0)]);

        let metrics =
            CongestionMetrics::compute(&network, &loads, &CongestionModel::default(), 1.0);

        assert_eq!(metrics.total_score, 4.0);
        assert_eq!(metrics.weighted_delay, 8.0);
        assert_eq!(metrics.mean_score, 2.0);
        assert_eq!(metrics.max_score, 4.0);
        assert_eq!(metrics.congested_segments, 1);
        assert_eq!(metrics.overloaded_segments, 1);
    }

    #[test]
    fn test_empty_network() {
        let network = create_test_network(&["a"], &[]);
        let metrics = CongestionMetrics::compute(
            &network,
            &SegmentLoads::baseline(&network),
            &CongestionModel::default(),
            1.0,
        );

        assert_eq!(metrics, CongestionMetrics::default());
    }
}
