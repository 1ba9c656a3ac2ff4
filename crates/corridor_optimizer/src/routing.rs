use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use corridor_network::RoadNetwork;
use jiff::Timestamp;
use parking_lot::{Mutex, RwLock};
use schemars::JsonSchema;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    candidate::candidate_pool::CandidatePool,
    config::RoutingConfig,
    congestion::segment_loads::SegmentLoads,
    error::RoutingError,
    interpret::{
        routing_outcome::{Diagnostic, OutcomeTiming, RoutingOutcome, SolveStatistics},
        solution_interpreter::SolutionInterpreter,
    },
    problem::vehicle_request::VehicleRequest,
    qubo::{formulation_weights::FormulationWeights, qubo_formulator::QuboFormulator},
    solver::{
        cooling_schedule::CoolingSchedule,
        minimize_qubo::{MinimizeQubo, ReadCallback, SolveControl},
        sample::ReadProgress,
        sampler_params::SamplerParams,
        solution_vector::SolutionVector,
        solver_backend::SolverBackend,
    },
    timer_debug,
};

/// Routes every request over `network` in a single round.
pub fn solve_routing(
    network: &RoadNetwork,
    requests: &[VehicleRequest],
    config: &RoutingConfig,
) -> Result<RoutingOutcome, RoutingError> {
    RoutingSolver::new(config.clone()).solve(network, requests)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, JsonSchema)]
pub enum SolverStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Runs routing rounds with a stop handle, a status and read progress
/// reporting.
pub struct RoutingSolver {
    config: RoutingConfig,
    backend: SolverBackend,
    status: RwLock<SolverStatus>,
    is_stopped: Arc<AtomicBool>,
    on_read_complete: Option<ReadCallback>,
}

impl RoutingSolver {
    pub fn new(config: RoutingConfig) -> Self {
        RoutingSolver {
            backend: SolverBackend::from(config.backend),
            config,
            status: RwLock::new(SolverStatus::Pending),
            is_stopped: Arc::new(AtomicBool::new(false)),
            on_read_complete: None,
        }
    }

    /// Replaces the backend picked from the configuration.
    pub fn set_backend(&mut self, backend: SolverBackend) -> &mut RoutingSolver {
        self.backend = backend;
        self
    }

    pub fn on_read_complete<F>(&mut self, callback: F) -> &mut RoutingSolver
    where
        F: FnMut(&ReadProgress) + Send + 'static,
    {
        self.on_read_complete = Some(Arc::new(Mutex::new(callback)));
        self
    }

    pub fn status(&self) -> SolverStatus {
        *self.status.read()
    }

    /// Stops the running reads at their next sweep, reads not started yet
    /// are skipped. A stop requested between rounds applies to the next one.
    pub fn stop(&self) {
        self.is_stopped.store(true, Ordering::Relaxed);
    }

    pub fn solve(
        &self,
        network: &RoadNetwork,
        requests: &[VehicleRequest],
    ) -> Result<RoutingOutcome, RoutingError> {
        *self.status.write() = SolverStatus::Running;
        let result = self
            .config
            .validate()
            .and_then(|()| self.run(network, requests));

        // The stop request ends with the round it interrupted
        self.is_stopped.store(false, Ordering::Relaxed);
        *self.status.write() = match result {
            Ok(_) => SolverStatus::Completed,
            Err(_) => SolverStatus::Failed,
        };

        result
    }

    #[instrument(skip_all, level = "debug")]
    fn run(
        &self,
        network: &RoadNetwork,
        requests: &[VehicleRequest],
    ) -> Result<RoutingOutcome, RoutingError> {
        let started_at = Timestamp::now();

        for request in requests {
            for node in [request.origin(), request.destination()] {
                if !network.contains_node(node) {
                    return Err(RoutingError::UnknownNode(format!(
                        "{node} requested by vehicle {}",
                        request.external_id()
                    )));
                }
            }
        }

        let mut diagnostics = Vec::new();
        if requests.is_empty() {
            diagnostics.push(Diagnostic::info(RoutingError::EmptyRequest.to_string()));
        }

        let estimator = self.config.congestion_model;
        let loads = SegmentLoads::baseline(network);

        let pool = timer_debug!(
            "Candidate generation",
            CandidatePool::generate(network, requests, self.config.k_paths, &estimator, &loads)
        );

        for (_, error) in pool.excluded() {
            diagnostics.push(Diagnostic::warning(error.to_string()));
        }

        let formulation = timer_debug!(
            "Formulation",
            QuboFormulator::new(
                network,
                &estimator,
                &loads,
                FormulationWeights::from(&self.config)
            )
            .formulate(requests, &pool)
        );
        let model = &formulation.model;

        let params = SamplerParams::from(&self.config);
        let mut statistics = SolveStatistics {
            backend: self.backend.name().to_owned(),
            variables: model.num_variables(),
            interactions: model.num_interactions(),
            onehot_penalty: formulation.onehot_penalty,
            ..SolveStatistics::default()
        };

        let mut interrupted = false;
        let solution = if model.is_degenerate() {
            if !requests.is_empty() {
                diagnostics.push(Diagnostic::info(RoutingError::DegenerateModel.to_string()));
            }
            statistics.energy = Some(model.offset());
            SolutionVector::new(0)
        } else {
            if let SolverBackend::SimulatedAnnealing(_) = self.backend {
                let schedule = params
                    .cooling_schedule
                    .unwrap_or_else(|| CoolingSchedule::from_model(model));
                statistics.initial_temp = Some(schedule.initial_temp);
                statistics.final_temp = Some(schedule.final_temp);
            }

            let deadline = self
                .config
                .time_limit
                .and_then(|time_limit| started_at.checked_add(time_limit).ok());
            let control = SolveControl::new(Arc::clone(&self.is_stopped), deadline)
                .with_read_callback(self.on_read_complete.clone());

            let samples = timer_debug!(
                "Minimization",
                self.backend.minimize(model, &params, &control)
            )?;

            statistics.reads = params.num_reads;
            statistics.completed_reads = samples.len();
            statistics.failed_reads = samples.failed_reads();
            statistics.skipped_reads = samples.skipped_reads();
            interrupted = samples.interrupted();

            if samples.failed_reads() > 0 {
                diagnostics.push(Diagnostic::warning(format!(
                    "{} solver reads failed and were discarded",
                    samples.failed_reads()
                )));
            }

            if interrupted {
                warn!("Solve interrupted, using the best sample found so far");
                diagnostics.push(Diagnostic::warning(
                    "Solve interrupted before every read completed",
                ));
            }

            match samples.best() {
                Some(best) => {
                    statistics.energy = Some(best.energy);
                    statistics.best_read = Some(best.read_index);
                    best.assignment.clone()
                }
                None => SolutionVector::new(model.num_variables()),
            }
        };

        let interpreter = SolutionInterpreter::new(
            network,
            requests,
            &pool,
            &estimator,
            self.config.congested_threshold,
        );
        let mut outcome = timer_debug!("Interpretation", interpreter.interpret(&solution));

        for violation in &outcome.violations {
            diagnostics.push(Diagnostic::warning(format!(
                "Vehicle {} violated its one-hot constraint ({:?})",
                violation.vehicle_id, violation.kind
            )));
        }

        for corridor in outcome.emergency_corridors.iter().filter(|corridor| !corridor.clear) {
            diagnostics.push(Diagnostic::info(format!(
                "Corridor of vehicle {} crosses congested segments",
                corridor.vehicle_id
            )));
        }

        outcome.statistics = statistics;
        outcome.interrupted = interrupted;
        outcome.diagnostics = diagnostics;
        outcome.timing = OutcomeTiming {
            started_at,
            duration: Timestamp::now().duration_since(started_at),
        };

        info!(
            routed = outcome.summary.routed_vehicles,
            excluded = outcome.summary.excluded_vehicles,
            violations = outcome.summary.violations,
            energy = outcome.statistics.energy,
            delay_before = outcome.congestion.before.weighted_delay,
            delay_after = outcome.congestion.after.weighted_delay,
            "Routing round done in {}",
            outcome.timing.duration
        );

        Ok(outcome)
    }
}
