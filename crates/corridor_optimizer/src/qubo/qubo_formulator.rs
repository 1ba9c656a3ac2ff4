use corridor_network::{RoadNetwork, SegmentIdx};
use tracing::{debug, instrument};

use crate::{
    candidate::candidate_pool::CandidatePool,
    congestion::{congestion_estimator::CongestionEstimator, segment_loads::SegmentLoads},
    problem::vehicle_request::VehicleRequest,
};

use super::{
    formulation_weights::FormulationWeights,
    qubo_model::{QuboModel, QuboModelBuilder},
};

/// Factor between the largest objective field and the derived one-hot penalty.
const ONEHOT_PENALTY_FACTOR: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct QuboFormulation {
    pub model: QuboModel,
    pub onehot_penalty: f64,
}

/// Encodes route selection over a candidate pool as a QUBO model.
///
/// Variable `i` selects candidate `i` of the pool. The objective combines
/// travel cost, pairwise congestion between vehicles sharing segments, a
/// bonus for good routes of prioritized vehicles and the one-hot penalty
/// `λ (Σ x - 1)²` per vehicle.
pub struct QuboFormulator<'a, E> {
    network: &'a RoadNetwork,
    estimator: &'a E,
    loads: &'a SegmentLoads,
    weights: FormulationWeights,
}

impl<'a, E> QuboFormulator<'a, E>
where
    E: CongestionEstimator,
{
    pub fn new(
        network: &'a RoadNetwork,
        estimator: &'a E,
        loads: &'a SegmentLoads,
        weights: FormulationWeights,
    ) -> Self {
        QuboFormulator {
            network,
            estimator,
            loads,
            weights,
        }
    }

    #[instrument(skip_all, level = "debug")]
    pub fn formulate(&self, requests: &[VehicleRequest], pool: &CandidatePool) -> QuboFormulation {
        let mut builder = QuboModelBuilder::new(pool.len());

        self.add_cost_terms(&mut builder, pool);
        self.add_congestion_terms(&mut builder, pool);
        self.add_priority_terms(&mut builder, requests, pool);

        let onehot_penalty = self
            .weights
            .onehot_penalty
            .unwrap_or_else(|| (ONEHOT_PENALTY_FACTOR * builder.max_field_bound()).max(1.0));

        self.add_onehot_terms(&mut builder, pool, onehot_penalty);

        let model = builder.build();

        debug!(
            variables = model.num_variables(),
            interactions = model.num_interactions(),
            onehot_penalty,
            "Formulated QUBO model"
        );

        QuboFormulation {
            model,
            onehot_penalty,
        }
    }

    fn add_cost_terms(&self, builder: &mut QuboModelBuilder, pool: &CandidatePool) {
        for (variable, candidate) in pool.candidates().iter().enumerate() {
            let exposure = candidate
                .segments()
                .iter()
                .map(|&segment_idx| {
                    let segment = self.network.segment(segment_idx);
                    segment.base_cost()
                        * self
                            .estimator
                            .marginal(segment, self.loads.load(segment_idx))
                })
                .sum::<f64>();

            builder.add_linear(
                variable,
                self.weights.cost_weight * candidate.base_cost()
                    + self.weights.congestion_weight * exposure,
            );
        }
    }

    fn add_congestion_terms(&self, builder: &mut QuboModelBuilder, pool: &CandidatePool) {
        if self.weights.congestion_weight == 0.0 {
            return;
        }

        let mut users = vec![Vec::new(); self.network.segment_count()];
        for (variable, candidate) in pool.candidates().iter().enumerate() {
            for segment in candidate.segments() {
                users[segment.get()].push(variable);
            }
        }

        for (index, variables) in users.iter().enumerate() {
            if variables.len() < 2 {
                continue;
            }

            let segment_idx = SegmentIdx::new(index);
            let segment = self.network.segment(segment_idx);
            let joint = self.estimator.joint(segment, self.loads.load(segment_idx));
            if joint <= 0.0 {
                continue;
            }

            let value = self.weights.congestion_weight * segment.base_cost() * joint;

            for (position, &a) in variables.iter().enumerate() {
                for &b in &variables[position + 1..] {
                    // Only one candidate per vehicle is ever selected
                    if pool.candidates()[a].vehicle() != pool.candidates()[b].vehicle() {
                        builder.add_quadratic(a, b, value);
                    }
                }
            }
        }
    }

    fn add_priority_terms(
        &self,
        builder: &mut QuboModelBuilder,
        requests: &[VehicleRequest],
        pool: &CandidatePool,
    ) {
        if self.weights.priority_weight == 0.0 {
            return;
        }

        for vehicle in pool.routed_vehicles() {
            let request = &requests[vehicle];
            if !request.priority().is_prioritized() {
                continue;
            }

            let candidates = pool.vehicle_candidates(vehicle);
            let min_sensitivity = candidates
                .iter()
                .map(|candidate| candidate.sensitivity())
                .fold(f64::INFINITY, f64::min);
            let min_hops = candidates
                .iter()
                .map(|candidate| candidate.hop_count())
                .min()
                .unwrap_or(0)
                .max(1);

            for (variable, candidate) in pool.variable_range(vehicle).zip(candidates) {
                let desirability = 0.5 * (1.0 + min_sensitivity) / (1.0 + candidate.sensitivity())
                    + 0.5 * min_hops as f64 / candidate.hop_count().max(1) as f64;

                builder.add_linear(
                    variable,
                    -self.weights.priority_weight * request.weight() * desirability,
                );
            }
        }
    }

    fn add_onehot_terms(&self, builder: &mut QuboModelBuilder, pool: &CandidatePool, penalty: f64) {
        for vehicle in pool.routed_vehicles() {
            let range = pool.variable_range(vehicle);

            for i in range.clone() {
                builder.add_linear(i, -penalty);
                for j in i + 1..range.end {
                    builder.add_quadratic(i, j, 2.0 * penalty);
                }
            }

            builder.add_offset(penalty);
        }
    }
}
