use corridor_network::Segment;

/// Load over capacity ratio above which scores stop growing.
pub const MAX_LOAD_RATIO: f64 = 10.0;

/// Scores how congested a segment is under a given load.
///
/// Implementations must be pure, non-decreasing in `load` and convex on
/// `[0, MAX_LOAD_RATIO * capacity]`.
pub trait CongestionEstimator {
    fn estimate(&self, segment: &Segment, load: u32) -> f64;

    /// Extra congestion caused by one more vehicle.
    fn marginal(&self, segment: &Segment, load: u32) -> f64 {
        self.estimate(segment, load.saturating_add(1)) - self.estimate(segment, load)
    }

    /// Extra congestion two more vehicles cause together on top of each of
    /// them alone.
    fn joint(&self, segment: &Segment, load: u32) -> f64 {
        let joint = self.estimate(segment, load.saturating_add(2))
            - 2.0 * self.estimate(segment, load.saturating_add(1))
            + self.estimate(segment, load);

        // Scores flatten past the ratio ceiling
        joint.max(0.0)
    }

    fn is_congested(&self, score: f64, threshold: f64) -> bool {
        score >= threshold
    }
}

pub(crate) fn clamped_load_ratio(segment: &Segment, load: u32) -> f64 {
    (load as f64 / segment.capacity() as f64).min(MAX_LOAD_RATIO)
}
