use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::RoutingConfig;

use super::cooling_schedule::CoolingSchedule;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Threads {
    Single,
    Auto,
    Multi(usize),
}

impl Threads {
    pub fn number_of_threads(&self) -> usize {
        match self {
            Threads::Single => 1,
            Threads::Multi(num) => (*num).max(1),
            Threads::Auto => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

/// Order in which a sweep visits the variables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FlipOrder {
    #[default]
    Sequential,
    Random,
}

/// Sampling parameters shared by every backend.
#[derive(Clone, Debug)]
pub struct SamplerParams {
    pub num_reads: usize,
    pub sweeps_per_read: usize,
    pub cooling_schedule: Option<CoolingSchedule>,
    pub random_seed: u64,
    pub flip_order: FlipOrder,
    pub threads: Threads,
}

impl Default for SamplerParams {
    fn default() -> Self {
        SamplerParams::from(&RoutingConfig::default())
    }
}

impl From<&RoutingConfig> for SamplerParams {
    fn from(config: &RoutingConfig) -> Self {
        SamplerParams {
            num_reads: config.num_reads,
            sweeps_per_read: config.sweeps_per_read,
            cooling_schedule: config.cooling_schedule,
            random_seed: config.random_seed,
            flip_order: config.flip_order,
            threads: config.threads.clone(),
        }
    }
}
