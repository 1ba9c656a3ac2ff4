use corridor_network::{NetworkPath, SegmentIdx, define_index_newtype};

use crate::problem::vehicle_request::VehicleIdx;

define_index_newtype!(CandidateIdx, CandidatePath);

/// A route option for one vehicle.
///
/// The candidate index in the pool is also the index of its selection
/// variable in the QUBO model.
#[derive(Debug, Clone)]
pub struct CandidatePath {
    vehicle: VehicleIdx,
    rank: usize,
    path: NetworkPath,
    sensitivity: f64,
}

impl CandidatePath {
    pub fn new(vehicle: VehicleIdx, rank: usize, path: NetworkPath, sensitivity: f64) -> Self {
        CandidatePath {
            vehicle,
            rank,
            path,
            sensitivity,
        }
    }

    pub fn vehicle(&self) -> VehicleIdx {
        self.vehicle
    }

    /// Position among the vehicle's own candidates, 0 is the cheapest.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn path(&self) -> &NetworkPath {
        &self.path
    }

    pub fn segments(&self) -> &[SegmentIdx] {
        self.path.segments()
    }

    pub fn base_cost(&self) -> f64 {
        self.path.cost()
    }

    pub fn hop_count(&self) -> usize {
        self.path.hop_count()
    }

    /// Travel time `Σ base_cost · (1 + score)` with one more vehicle on the
    /// baseline load.
    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }
}
