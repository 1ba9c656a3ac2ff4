use corridor_network::{RoadNetwork, SegmentIdx};
use smallvec::SmallVec;
use tracing::{debug, instrument};

use crate::{
    candidate::{candidate_path::CandidateIdx, candidate_pool::CandidatePool},
    congestion::{
        congestion_estimator::CongestionEstimator, congestion_metrics::CongestionMetrics,
        segment_loads::SegmentLoads,
    },
    problem::{
        priority_class::PriorityClass,
        vehicle_request::{VehicleIdx, VehicleRequest},
    },
    solver::solution_vector::SolutionVector,
};

use super::routing_outcome::{
    AssignmentStatus, CongestionReport, ConstraintViolation, EmergencyCorridor, ExcludedVehicle,
    OutcomeSummary, RoutingOutcome, VehicleAssignment, ViolationKind,
};

/// Decodes a solver assignment into routes and congestion metrics.
///
/// Interpretation never fails: a vehicle with no selected candidate falls
/// back to its cheapest candidate, one with several selected keeps the
/// cheapest of those. Both cases are reported as violations.
pub struct SolutionInterpreter<'a, E> {
    network: &'a RoadNetwork,
    requests: &'a [VehicleRequest],
    pool: &'a CandidatePool,
    estimator: &'a E,
    congested_threshold: f64,
}

impl<'a, E> SolutionInterpreter<'a, E>
where
    E: CongestionEstimator,
{
    pub fn new(
        network: &'a RoadNetwork,
        requests: &'a [VehicleRequest],
        pool: &'a CandidatePool,
        estimator: &'a E,
        congested_threshold: f64,
    ) -> Self {
        SolutionInterpreter {
            network,
            requests,
            pool,
            estimator,
            congested_threshold,
        }
    }

    /// Candidate kept for `vehicle` and the violation that led to it, if any.
    pub fn select(
        &self,
        vehicle: VehicleIdx,
        solution: &SolutionVector,
    ) -> (CandidateIdx, Option<ViolationKind>) {
        let range = self.pool.variable_range(vehicle);
        let selected = range
            .clone()
            .filter(|&variable| solution.get(variable))
            .collect::<SmallVec<[usize; 8]>>();

        match selected.len() {
            1 => (CandidateIdx::new(selected[0]), None),
            0 => (
                self.cheapest(range),
                Some(ViolationKind::NoneSelected),
            ),
            count => (
                self.cheapest(selected.iter().copied()),
                Some(ViolationKind::MultipleSelected { count }),
            ),
        }
    }

    fn cheapest(&self, variables: impl Iterator<Item = usize>) -> CandidateIdx {
        let variable = variables
            .min_by(|&a, &b| {
                self.pool.candidates()[a]
                    .base_cost()
                    .total_cmp(&self.pool.candidates()[b].base_cost())
            })
            .unwrap_or_default();

        CandidateIdx::new(variable)
    }

    #[instrument(skip_all, level = "debug")]
    pub fn interpret(&self, solution: &SolutionVector) -> RoutingOutcome {
        let baseline = SegmentLoads::baseline(self.network);
        let mut shortest_loads = baseline.clone();
        let mut final_loads = baseline.clone();

        let mut selections = Vec::new();
        let mut violations = Vec::new();

        for vehicle in self.pool.routed_vehicles() {
            let (candidate, violation) = self.select(vehicle, solution);

            if let Some(kind) = violation {
                violations.push(ConstraintViolation {
                    vehicle_id: self.requests[vehicle].external_id().to_owned(),
                    kind,
                });
            }

            if let Some(cheapest) = self.pool.vehicle_candidates(vehicle).first() {
                shortest_loads.add_path(cheapest.segments());
            }

            final_loads.add_path(self.pool.candidate(candidate).segments());
            selections.push((vehicle, candidate));
        }

        let assignments = selections
            .iter()
            .map(|&(vehicle, candidate)| self.assignment(vehicle, candidate, &final_loads))
            .collect::<Vec<_>>();

        let emergency_corridors = selections
            .iter()
            .filter(|&&(vehicle, _)| self.requests[vehicle].priority().is_prioritized())
            .map(|&(vehicle, candidate)| self.corridor(vehicle, candidate, &final_loads))
            .collect::<Vec<_>>();

        let congested_segments = baseline
            .iter()
            .filter(|&(segment, _)| self.is_congested(segment, &baseline))
            .map(|(segment, _)| self.network.segment(segment).external_id().to_owned())
            .collect::<Vec<_>>();

        let excluded = self
            .pool
            .excluded()
            .iter()
            .map(|(vehicle, error)| ExcludedVehicle {
                vehicle_id: self.requests[*vehicle].external_id().to_owned(),
                reason: error.to_string(),
            })
            .collect::<Vec<_>>();

        let congestion = CongestionReport {
            before: self.metrics(&baseline),
            shortest_path: self.metrics(&shortest_loads),
            after: self.metrics(&final_loads),
        };

        let emergency_vehicles = self
            .requests
            .iter()
            .filter(|request| request.priority() == PriorityClass::Emergency)
            .count();

        let summary = OutcomeSummary {
            total_vehicles: self.requests.len(),
            emergency_vehicles,
            normal_vehicles: self.requests.len() - emergency_vehicles,
            routed_vehicles: assignments.len(),
            excluded_vehicles: excluded.len(),
            violations: violations.len(),
        };

        debug!(
            routed = summary.routed_vehicles,
            violations = summary.violations,
            delay_before = congestion.before.weighted_delay,
            delay_after = congestion.after.weighted_delay,
            "Interpreted solution"
        );

        RoutingOutcome {
            status: if violations.is_empty() {
                AssignmentStatus::Valid
            } else {
                AssignmentStatus::Violated
            },
            assignments,
            excluded,
            violations,
            congestion,
            congested_segments,
            emergency_corridors,
            summary,
            ..RoutingOutcome::default()
        }
    }

    fn assignment(
        &self,
        vehicle: VehicleIdx,
        candidate: CandidateIdx,
        loads: &SegmentLoads,
    ) -> VehicleAssignment {
        let request = &self.requests[vehicle];
        let candidate = self.pool.candidate(candidate);

        let estimated_travel_time = candidate
            .segments()
            .iter()
            .map(|&segment| {
                self.network.segment(segment).base_cost()
                    * (1.0 + loads.score(self.network, self.estimator, segment))
            })
            .sum();

        VehicleAssignment {
            vehicle_id: request.external_id().to_owned(),
            priority: request.priority(),
            candidate_rank: candidate.rank(),
            candidates: self.pool.vehicle_candidates(vehicle).len(),
            nodes: candidate
                .path()
                .nodes()
                .iter()
                .map(|&node| self.network.node(node).external_id().to_owned())
                .collect(),
            segments: self.segment_ids(candidate.segments()),
            base_cost: candidate.base_cost(),
            estimated_travel_time,
        }
    }

    fn corridor(
        &self,
        vehicle: VehicleIdx,
        candidate: CandidateIdx,
        loads: &SegmentLoads,
    ) -> EmergencyCorridor {
        let segments = self.pool.candidate(candidate).segments();

        EmergencyCorridor {
            vehicle_id: self.requests[vehicle].external_id().to_owned(),
            segments: self.segment_ids(segments),
            clear: segments
                .iter()
                .all(|&segment| !self.is_congested(segment, loads)),
        }
    }

    fn segment_ids(&self, segments: &[SegmentIdx]) -> Vec<String> {
        segments
            .iter()
            .map(|&segment| self.network.segment(segment).external_id().to_owned())
            .collect()
    }

    fn is_congested(&self, segment: SegmentIdx, loads: &SegmentLoads) -> bool {
        self.estimator.is_congested(
            loads.score(self.network, self.estimator, segment),
            self.congested_threshold,
        )
    }

    fn metrics(&self, loads: &SegmentLoads) -> CongestionMetrics {
        CongestionMetrics::compute(self.network, loads, self.estimator, self.congested_threshold)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        congestion::congestion_model::CongestionModel,
        test_utils::{create_request, two_route_network},
    };

    use super::*;

    fn create_pool(
        network: &RoadNetwork,
        requests: &[VehicleRequest],
    ) -> CandidatePool {
        CandidatePool::generate(
            network,
            requests,
            4,
            &CongestionModel::default(),
            &SegmentLoads::baseline(network),
        )
    }

    #[test]
    fn test_valid_selection() {
        let network = two_route_network();
        let requests = vec![
            create_request(&network, "e1", "s", "t", PriorityClass::Emergency),
            create_request(&network, "v1", "s", "t", PriorityClass::Normal),
        ];
        let pool = create_pool(&network, &requests);
        let estimator = CongestionModel::default();
        let interpreter = SolutionInterpreter::new(&network, &requests, &pool, &estimator, 1.0);

        let outcome = interpreter.interpret(&SolutionVector::from_bits(&[true, false, false, true]));

        assert_eq!(outcome.status(), AssignmentStatus::Valid);
        assert_eq!(outcome.assignment("e1").unwrap().base_cost, 10.0);
        assert_eq!(outcome.assignment("v1").unwrap().base_cost, 15.0);
        assert_eq!(outcome.assignment("v1").unwrap().candidate_rank, 1);
        assert_eq!(outcome.assignment("e1").unwrap().nodes, vec!["s", "a", "t"]);
        // Alone on capacity 1 segments, every segment scores 1
        assert_eq!(outcome.assignment("e1").unwrap().estimated_travel_time, 20.0);

        assert_eq!(outcome.summary().emergency_vehicles, 1);
        assert_eq!(outcome.summary().normal_vehicles, 1);
        assert_eq!(outcome.emergency_corridors().len(), 1);
        assert!(!outcome.emergency_corridors()[0].clear);

        // Shortest path baseline puts both vehicles on the short route
        assert_eq!(outcome.congestion().shortest_path.max_score, 4.0);
        assert_eq!(outcome.congestion().after.max_score, 1.0);
        assert_eq!(outcome.congestion().before.total_score, 0.0);
    }

    #[test]
    fn test_fallbacks_are_reported() {
        let network = two_route_network();
        let requests = vec![
            create_request(&network, "v1", "s", "t", PriorityClass::Normal),
            create_request(&network, "v2", "s", "t", PriorityClass::Normal),
        ];
        let pool = create_pool(&network, &requests);
        let estimator = CongestionModel::default();
        let interpreter = SolutionInterpreter::new(&network, &requests, &pool, &estimator, 1.0);

        let outcome = interpreter.interpret(&SolutionVector::from_bits(&[false, false, true, true]));

        assert_eq!(outcome.status(), AssignmentStatus::Violated);
        assert_eq!(
            outcome.violations(),
            &[
                ConstraintViolation {
                    vehicle_id: "v1".to_owned(),
                    kind: ViolationKind::NoneSelected,
                },
                ConstraintViolation {
                    vehicle_id: "v2".to_owned(),
                    kind: ViolationKind::MultipleSelected { count: 2 },
                },
            ]
        );
        assert_eq!(outcome.assignment("v1").unwrap().candidate_rank, 0);
        assert_eq!(outcome.assignment("v2").unwrap().candidate_rank, 0);
    }

    #[test]
    fn test_congested_segments_from_baseline() {
        let mut network = crate::test_utils::TestNetwork::new(&["a", "b", "c"]);
        network.add_loaded_segment("a", "b", 1.0, 2, 2);
        network.add_loaded_segment("b", "c", 1.0, 2, 1);
        let network = network.build();

        let requests = vec![create_request(&network, "e1", "a", "c", PriorityClass::Emergency)];
        let pool = create_pool(&network, &requests);
        let estimator = CongestionModel::default();
        let interpreter = SolutionInterpreter::new(&network, &requests, &pool, &estimator, 1.0);

        let outcome = interpreter.interpret(&SolutionVector::from_bits(&[true]));

        assert_eq!(outcome.congested_segments(), &["a-b".to_owned()]);
        assert_eq!(outcome.congestion().before.congested_segments, 1);
        // b-c reaches capacity once the vehicle is on it
        assert_eq!(outcome.congestion().after.congested_segments, 2);
        assert!(!outcome.emergency_corridors()[0].clear);
    }
}
