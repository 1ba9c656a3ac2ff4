use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    congestion::congestion_model::CongestionModel,
    error::RoutingError,
    solver::{
        cooling_schedule::CoolingSchedule,
        sampler_params::{FlipOrder, Threads},
        solver_backend::SolverBackendKind,
    },
};

pub const DEFAULT_RANDOM_SEED: u64 = 2427121;

/// Options of a routing round, every field has a default.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct RoutingConfig {
    /// Candidate paths per vehicle.
    pub k_paths: usize,
    pub cost_weight: f64,
    pub congestion_weight: f64,
    pub priority_weight: f64,
    /// One-hot penalty `λ`, derived from the model when absent.
    pub onehot_penalty: Option<f64>,

    pub num_reads: usize,
    pub sweeps_per_read: usize,
    /// Annealing temperatures, derived from the model when absent.
    pub cooling_schedule: Option<CoolingSchedule>,
    pub random_seed: u64,
    pub backend: SolverBackendKind,
    pub threads: Threads,
    pub flip_order: FlipOrder,
    /// Reads still running past this limit stop at their next sweep.
    pub time_limit: Option<SignedDuration>,

    pub congestion_model: CongestionModel,
    /// Score from which a segment counts as congested.
    pub congested_threshold: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        RoutingConfig {
            k_paths: 4,
            cost_weight: 1.0,
            congestion_weight: 1.0,
            priority_weight: 1.0,
            onehot_penalty: None,
            num_reads: 10,
            sweeps_per_read: 1000,
            cooling_schedule: None,
            random_seed: DEFAULT_RANDOM_SEED,
            backend: SolverBackendKind::default(),
            threads: Threads::Auto,
            flip_order: FlipOrder::default(),
            time_limit: None,
            congestion_model: CongestionModel::default(),
            congested_threshold: 1.0,
        }
    }
}

impl RoutingConfig {
    pub fn validate(&self) -> Result<(), RoutingError> {
        if self.k_paths == 0 {
            return Err(invalid("k_paths must be at least 1"));
        }

        if self.num_reads == 0 {
            return Err(invalid("num_reads must be at least 1"));
        }

        if self.sweeps_per_read == 0 {
            return Err(invalid("sweeps_per_read must be at least 1"));
        }

        for (name, weight) in [
            ("cost_weight", self.cost_weight),
            ("congestion_weight", self.congestion_weight),
            ("priority_weight", self.priority_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid(format!(
                    "{name} must be a non-negative number, got {weight}"
                )));
            }
        }

        if let Some(penalty) = self.onehot_penalty
            && (!penalty.is_finite() || penalty <= 0.0)
        {
            return Err(invalid(format!(
                "onehot_penalty must be positive, got {penalty}"
            )));
        }

        if let Some(schedule) = &self.cooling_schedule {
            schedule.validate()?;
        }

        if let Threads::Multi(0) = self.threads {
            return Err(invalid("threads must be at least 1"));
        }

        if let Some(time_limit) = self.time_limit
            && time_limit.is_negative()
        {
            return Err(invalid("time_limit must not be negative"));
        }

        match self.congestion_model {
            CongestionModel::Bpr(bpr) => {
                if !bpr.alpha.is_finite() || bpr.alpha < 0.0 {
                    return Err(invalid("bpr alpha must be non-negative"));
                }
                if !bpr.beta.is_finite() || bpr.beta < 1.0 {
                    return Err(invalid("bpr beta must be at least 1"));
                }
            }
            CongestionModel::PiecewiseLinear(piecewise) => {
                if !piecewise.overload_slope.is_finite() || piecewise.overload_slope < 1.0 {
                    return Err(invalid("overload_slope must be at least 1"));
                }
            }
        }

        if !self.congested_threshold.is_finite() || self.congested_threshold < 0.0 {
            return Err(invalid("congested_threshold must be non-negative"));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> RoutingError {
    RoutingError::InvalidConfig(message.into())
}

#[cfg(test)]
mod tests {
    use crate::congestion::bpr_estimator::BprEstimator;

    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(RoutingConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RoutingConfig = serde_json::from_str(
            r#"{ "num_reads": 3, "threads": { "multi": 2 }, "time_limit": "PT2S" }"#,
        )
        .unwrap();

        assert_eq!(config.num_reads, 3);
        assert_eq!(config.k_paths, 4);
        assert_eq!(config.threads, Threads::Multi(2));
        assert_eq!(config.time_limit, Some(SignedDuration::from_secs(2)));
        assert_eq!(config.random_seed, DEFAULT_RANDOM_SEED);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let cases = [
            RoutingConfig {
                k_paths: 0,
                ..RoutingConfig::default()
            },
            RoutingConfig {
                num_reads: 0,
                ..RoutingConfig::default()
            },
            RoutingConfig {
                sweeps_per_read: 0,
                ..RoutingConfig::default()
            },
            RoutingConfig {
                priority_weight: -1.0,
                ..RoutingConfig::default()
            },
            RoutingConfig {
                onehot_penalty: Some(0.0),
                ..RoutingConfig::default()
            },
            RoutingConfig {
                cooling_schedule: Some(CoolingSchedule {
                    initial_temp: 1.0,
                    final_temp: 2.0,
                }),
                ..RoutingConfig::default()
            },
            RoutingConfig {
                congestion_model: CongestionModel::Bpr(BprEstimator {
                    alpha: 1.0,
                    beta: 0.5,
                }),
                ..RoutingConfig::default()
            },
        ];

        for config in cases {
            assert!(matches!(
                config.validate(),
                Err(RoutingError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(serde_json::from_str::<RoutingConfig>(r#"{ "reads": 3 }"#).is_err());
    }
}
