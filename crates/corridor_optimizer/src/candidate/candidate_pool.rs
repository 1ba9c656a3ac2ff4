use std::ops::Range;

use corridor_network::{NetworkPath, RoadNetwork};
use rayon::prelude::*;
use tracing::{debug, instrument, warn};

use crate::{
    congestion::{congestion_estimator::CongestionEstimator, segment_loads::SegmentLoads},
    error::RoutingError,
    problem::vehicle_request::{VehicleIdx, VehicleRequest},
};

use super::candidate_path::{CandidateIdx, CandidatePath};

/// Up to `k` loopless routes for a request, cheapest first.
pub fn generate_candidates(
    network: &RoadNetwork,
    request: &VehicleRequest,
    k: usize,
) -> Result<Vec<NetworkPath>, RoutingError> {
    let paths = network.k_shortest_paths(request.origin(), request.destination(), k);

    if paths.is_empty() {
        return Err(RoutingError::NoPath {
            vehicle: request.external_id().to_owned(),
        });
    }

    Ok(paths)
}

/// Candidate paths of every routed vehicle, stored contiguously in request
/// order.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    candidates: Vec<CandidatePath>,
    ranges: Vec<Range<usize>>,
    excluded: Vec<(VehicleIdx, RoutingError)>,
}

impl CandidatePool {
    #[instrument(skip_all, level = "debug")]
    pub fn generate(
        network: &RoadNetwork,
        requests: &[VehicleRequest],
        k: usize,
        estimator: &impl CongestionEstimator,
        loads: &SegmentLoads,
    ) -> Self {
        let generated = requests
            .par_iter()
            .map(|request| generate_candidates(network, request, k))
            .collect::<Vec<_>>();

        let mut pool = CandidatePool {
            candidates: Vec::with_capacity(requests.len() * k),
            ranges: Vec::with_capacity(requests.len()),
            excluded: Vec::new(),
        };

        for (index, result) in generated.into_iter().enumerate() {
            let vehicle = VehicleIdx::new(index);
            let start = pool.candidates.len();

            match result {
                Ok(paths) => {
                    for (rank, path) in paths.into_iter().enumerate() {
                        let sensitivity = path
                            .segments()
                            .iter()
                            .map(|&segment_idx| {
                                let segment = network.segment(segment_idx);
                                segment.base_cost()
                                    * (1.0
                                        + estimator.estimate(
                                            segment,
                                            loads.load(segment_idx).saturating_add(1),
                                        ))
                            })
                            .sum::<f64>();

                        pool.candidates
                            .push(CandidatePath::new(vehicle, rank, path, sensitivity));
                    }
                }
                Err(error) => {
                    warn!(vehicle = requests[index].external_id(), "{error}");
                    pool.excluded.push((vehicle, error));
                }
            }

            pool.ranges.push(start..pool.candidates.len());
        }

        debug!(
            candidates = pool.candidates.len(),
            excluded = pool.excluded.len(),
            "Generated candidate paths"
        );

        pool
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[CandidatePath] {
        &self.candidates
    }

    pub fn candidate(&self, candidate: CandidateIdx) -> &CandidatePath {
        &self.candidates[candidate]
    }

    /// Variable indices of the vehicle's candidates, empty when excluded.
    pub fn variable_range(&self, vehicle: VehicleIdx) -> Range<usize> {
        self.ranges
            .get(vehicle.get())
            .cloned()
            .unwrap_or_default()
    }

    pub fn vehicle_candidates(&self, vehicle: VehicleIdx) -> &[CandidatePath] {
        &self.candidates[self.variable_range(vehicle)]
    }

    /// Vehicles with at least one candidate, in request order.
    pub fn routed_vehicles(&self) -> impl Iterator<Item = VehicleIdx> + '_ {
        self.ranges
            .iter()
            .enumerate()
            .filter(|(_, range)| !range.is_empty())
            .map(|(index, _)| VehicleIdx::new(index))
    }

    pub fn excluded(&self) -> &[(VehicleIdx, RoutingError)] {
        &self.excluded
    }
}
