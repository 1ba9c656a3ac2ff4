use tracing::{debug, instrument};

use crate::{error::RoutingError, qubo::qubo_model::QuboModel};

use super::{
    minimize_qubo::{MinimizeQubo, SolveControl, degenerate_sample_set},
    sample::{ReadProgress, Sample, SampleSet},
    sampler_params::SamplerParams,
    solution_vector::SolutionVector,
};

pub const MAX_EXACT_VARIABLES: usize = 20;

/// Steps between two cancellation checks.
const STOP_CHECK_INTERVAL: u64 = 4096;

/// Brute force over every assignment in Gray code order, one flip per step.
///
/// Ties keep the first assignment reached.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactSampler;

impl MinimizeQubo for ExactSampler {
    fn name(&self) -> &str {
        "exact"
    }

    #[instrument(skip_all, level = "debug")]
    fn minimize(
        &self,
        model: &QuboModel,
        _params: &SamplerParams,
        control: &SolveControl,
    ) -> Result<SampleSet, RoutingError> {
        if model.is_degenerate() {
            return Ok(degenerate_sample_set(model));
        }

        let num_variables = model.num_variables();
        if num_variables > MAX_EXACT_VARIABLES {
            return Err(RoutingError::ModelTooLarge {
                variables: num_variables,
                max: MAX_EXACT_VARIABLES,
            });
        }

        let mut state = SolutionVector::new(num_variables);
        let mut fields = (0..num_variables)
            .map(|variable| model.linear(variable))
            .collect::<Vec<_>>();
        let mut energy = model.offset();

        let mut best_state = state.clone();
        let mut best_energy = energy;
        let mut interrupted = false;

        for step in 1..(1u64 << num_variables) {
            if step % STOP_CHECK_INTERVAL == 0 && control.should_stop() {
                interrupted = true;
                break;
            }

            let variable = step.trailing_zeros() as usize;
            let delta = if state.get(variable) {
                -fields[variable]
            } else {
                fields[variable]
            };

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

        let energy = model.energy(&best_state);
        debug!(energy, interrupted, "Exact minimum");

        control.report_read(&ReadProgress {
            read_index: 0,
            completed_reads: 1,
            total_reads: 1,
            energy,
            best_energy: energy,
        });

        Ok(SampleSet::new(
            vec![Sample {
                assignment: best_state,
                energy,
                read_index: 0,
                interrupted,
            }],
            0,
            0,
        ))
    }
}
