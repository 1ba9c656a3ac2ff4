use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc,
    },
};

use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{debug, instrument, warn};

use crate::{error::RoutingError, qubo::qubo_model::QuboModel};

use super::{
    cooling_schedule::CoolingSchedule,
    minimize_qubo::{MinimizeQubo, SolveControl, degenerate_sample_set},
    sample::{ReadProgress, Sample, SampleSet},
    sampler_params::{FlipOrder, SamplerParams},
    solution_vector::SolutionVector,
};

enum ReadResult {
    Completed(Sample),
    Failed,
    Skipped,
}

/// Simulated annealing over single bit flips.
///
/// Every read starts from a random assignment and owns its random number
/// generator, derived in read order from the configured seed. A read's
/// result therefore never depends on the number of reads or threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedAnnealingSampler;

impl MinimizeQubo for SimulatedAnnealingSampler {
    fn name(&self) -> &str {
        "simulated_annealing"
    }

    #[instrument(skip_all, level = "debug")]
    fn minimize(
        &self,
        model: &QuboModel,
        params: &SamplerParams,
        control: &SolveControl,
    ) -> Result<SampleSet, RoutingError> {
        if model.is_degenerate() {
            return Ok(degenerate_sample_set(model));
        }

        let schedule = params
            .cooling_schedule
            .unwrap_or_else(|| CoolingSchedule::from_model(model));

        debug!(
            initial_temp = schedule.initial_temp,
            final_temp = schedule.final_temp,
            reads = params.num_reads,
            sweeps = params.sweeps_per_read,
            "Annealing"
        );

        let mut rng = SmallRng::seed_from_u64(params.random_seed);
        let read_rngs = (0..params.num_reads)
            .map(|_| SmallRng::from_rng(&mut rng))
            .collect::<Vec<_>>();

        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(params.threads.number_of_threads())
            .build()
            .map_err(|error| RoutingError::ThreadPool(error.to_string()))?;

        let (sender, receiver) = mpsc::channel();
        let completed_reads = AtomicUsize::new(0);
        let best_energy = Mutex::new(f64::INFINITY);

        thread_pool.scope(|scope| {
            for (read_index, read_rng) in read_rngs.into_iter().enumerate() {
                let sender = sender.clone();
                let completed_reads = &completed_reads;
                let best_energy = &best_energy;

                scope.spawn(move |_| {
                    if control.should_stop() {
                        let _ = sender.send(ReadResult::Skipped);
                        return;
                    }

                    let sample = match guarded_read(read_index, || {
                        anneal(model, &schedule, params, read_rng, read_index, control)
                    }) {
                        ReadResult::Completed(sample) => sample,
                        result => {
                            let _ = sender.send(result);
                            return;
                        }
                    };

                    let progress = {
                        let mut best_energy = best_energy.lock();
                        *best_energy = best_energy.min(sample.energy);
                        ReadProgress {
                            read_index,
                            completed_reads: completed_reads.fetch_add(1, Ordering::Relaxed) + 1,
                            total_reads: params.num_reads,
                            energy: sample.energy,
                            best_energy: *best_energy,
                        }
                    };
                    control.report_read(&progress);

                    let _ = sender.send(ReadResult::Completed(sample));
                });
            }
        });

        drop(sender);

        let sample_set = collect_reads(receiver, params.num_reads)?;

        debug!(
            samples = sample_set.len(),
            failed_reads = sample_set.failed_reads(),
            skipped_reads = sample_set.skipped_reads(),
            best_energy = sample_set.best().map(|sample| sample.energy),
            "Annealing done"
        );

        Ok(sample_set)
    }
}

/// Runs a read, turning a panic into [`ReadResult::Failed`].
fn guarded_read(read_index: usize, read: impl FnOnce() -> Sample) -> ReadResult {
    match panic::catch_unwind(AssertUnwindSafe(read)) {
        Ok(sample) => ReadResult::Completed(sample),
        Err(_) => {
            warn!(read_index, "Annealing read panicked, discarding it");
            ReadResult::Failed
        }
    }
}

/// Fails only when no read completed and at least one read failed.
fn collect_reads(
    results: impl IntoIterator<Item = ReadResult>,
    num_reads: usize,
) -> Result<SampleSet, RoutingError> {
    let mut samples = Vec::with_capacity(num_reads);
    let mut failed_reads = 0;
    let mut skipped_reads = 0;

    for result in results {
        match result {
            ReadResult::Completed(sample) => samples.push(sample),
            ReadResult::Failed => failed_reads += 1,
            ReadResult::Skipped => skipped_reads += 1,
        }
    }

    if samples.is_empty() && failed_reads > 0 {
        return Err(RoutingError::SolverFailure { failed_reads });
    }

    Ok(SampleSet::new(samples, failed_reads, skipped_reads))
}

/// One annealing read, returning the lowest energy state it visited.
fn anneal(
    model: &QuboModel,
    schedule: &CoolingSchedule,
    params: &SamplerParams,
    mut rng: SmallRng,
    read_index: usize,
    control: &SolveControl,
) -> Sample {
    let num_variables = model.num_variables();
    let sweeps = params.sweeps_per_read;

    let mut state = SolutionVector::random(num_variables, &mut rng);
    let mut fields = (0..num_variables)
        .map(|variable| model.local_field(variable, &state))
        .collect::<Vec<_>>();
    let mut energy = model.energy(&state);

    let mut best_state = state.clone();
    let mut best_energy = energy;
    let mut interrupted = false;

    for sweep in 0..sweeps {
        if control.should_stop() {
            interrupted = true;
            break;
        }

        let temperature = schedule.temperature(sweep, sweeps);

        for step in 0..num_variables {
            let variable = match params.flip_order {
                FlipOrder::Sequential => step,
                FlipOrder::Random => rng.random_range(0..num_variables),
            };

            let delta = if state.get(variable) {
                -fields[variable]
            } else {
                fields[variable]
            };

            if delta > 0.0 && rng.random::<f64>() >= (-delta / temperature).exp() {
                continue;
            }

            state.flip(variable);
            energy += delta;

            let sign = if state.get(variable) { 1.0 } else { -1.0 };
            for &(neighbor, value) in model.neighbors(variable) {
                fields[neighbor] += sign * value;
            }

            if energy < best_energy {
                best_energy = energy;
                best_state.clone_from(&state);
            }
        }
    }

    Sample {
        // Recomputed to drop the drift of the incremental updates
        energy: model.energy(&best_state),
        assignment: best_state,
        read_index,
        interrupted,
    }
}
