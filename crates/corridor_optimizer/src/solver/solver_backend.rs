use std::{fmt, sync::Arc};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{error::RoutingError, qubo::qubo_model::QuboModel};

use super::{
    exact::ExactSampler,
    minimize_qubo::{MinimizeQubo, SolveControl},
    sample::SampleSet,
    sampler_params::SamplerParams,
    simulated_annealing::SimulatedAnnealingSampler,
};

/// Backends selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackendKind {
    #[default]
    SimulatedAnnealing,
    Exact,
}

#[derive(Clone)]
pub enum SolverBackend {
    SimulatedAnnealing(SimulatedAnnealingSampler),
    Exact(ExactSampler),
    /// Any external minimizer, e.g. a client for a hybrid or quantum service.
    Custom(Arc<dyn MinimizeQubo + Send + Sync>),
}

impl From<SolverBackendKind> for SolverBackend {
    fn from(kind: SolverBackendKind) -> Self {
        match kind {
            SolverBackendKind::SimulatedAnnealing => {
                SolverBackend::SimulatedAnnealing(SimulatedAnnealingSampler)
            }
            SolverBackendKind::Exact => SolverBackend::Exact(ExactSampler),
        }
    }
}

impl fmt::Debug for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SolverBackend({})", self.name())
    }
}

impl MinimizeQubo for SolverBackend {
    fn name(&self) -> &str {
        match self {
            SolverBackend::SimulatedAnnealing(sampler) => sampler.name(),
            SolverBackend::Exact(sampler) => sampler.name(),
            SolverBackend::Custom(sampler) => sampler.name(),
        }
    }

    fn minimize(
        &self,
        model: &QuboModel,
        params: &SamplerParams,
        control: &SolveControl,
    ) -> Result<SampleSet, RoutingError> {
        match self {
            SolverBackend::SimulatedAnnealing(sampler) => sampler.minimize(model, params, control),
            SolverBackend::Exact(sampler) => sampler.minimize(model, params, control),
            SolverBackend::Custom(sampler) => sampler.minimize(model, params, control),
        }
    }
}
