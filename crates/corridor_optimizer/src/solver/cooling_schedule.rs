use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{error::RoutingError, qubo::qubo_model::QuboModel};

/// Geometric cooling from `initial_temp` to `final_temp`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CoolingSchedule {
    pub initial_temp: f64,
    pub final_temp: f64,
}

impl CoolingSchedule {
    /// Derives the temperatures from the model fields.
    ///
    /// The largest possible move is accepted with probability ½ at the start
    /// and the smallest non-zero one with probability 1/100 at the end.
    pub fn from_model(model: &QuboModel) -> Self {
        let max_field = model.max_field_bound();
        if max_field <= 0.0 {
            return CoolingSchedule {
                initial_temp: 1.0,
                final_temp: 1.0,
            };
        }

        let initial_temp = max_field / 2.0_f64.ln();
        let final_temp = model
            .min_nonzero_coefficient()
            .map_or(initial_temp, |min_field| min_field / 100.0_f64.ln())
            .min(initial_temp);

        CoolingSchedule {
            initial_temp,
            final_temp,
        }
    }

    pub fn validate(&self) -> Result<(), RoutingError> {
        if !self.initial_temp.is_finite()
            || !self.final_temp.is_finite()
            || self.initial_temp <= 0.0
            || self.final_temp <= 0.0
        {
            return Err(RoutingError::InvalidConfig(
                "cooling temperatures must be positive".to_owned(),
            ));
        }

        if self.initial_temp < self.final_temp {
            return Err(RoutingError::InvalidConfig(format!(
                "initial_temp {} is below final_temp {}",
                self.initial_temp, self.final_temp
            )));
        }

        Ok(())
    }

    /// Temperature of `sweep` out of `sweeps`.
    pub fn temperature(&self, sweep: usize, sweeps: usize) -> f64 {
        if sweeps <= 1 {
            return self.final_temp;
        }

        let progress = sweep as f64 / (sweeps - 1) as f64;
        self.initial_temp * (self.final_temp / self.initial_temp).powf(progress)
    }
}

#[cfg(test)]
mod tests {
    use crate::qubo::qubo_model::QuboModelBuilder;

    use super::*;

    #[test]
    fn test_temperature_is_geometric() {
        let schedule = CoolingSchedule {
            initial_temp: 100.0,
            final_temp: 1.0,
        };

        assert_eq!(schedule.temperature(0, 3), 100.0);
        assert!((schedule.temperature(1, 3) - 10.0).abs() < 1e-9);
        assert!((schedule.temperature(2, 3) - 1.0).abs() < 1e-9);
        assert_eq!(schedule.temperature(0, 1), 1.0);
    }

    #[test]
    fn test_from_model() {
        let mut builder = QuboModelBuilder::new(2);
        builder
            .add_linear(0, -2.0)
            .add_linear(1, 1.0)
            .add_quadratic(0, 1, 4.0);
        let schedule = CoolingSchedule::from_model(&builder.build());

        assert!((schedule.initial_temp - 6.0 / 2.0_f64.ln()).abs() < 1e-9);
        assert!((schedule.final_temp - 1.0 / 100.0_f64.ln()).abs() < 1e-9);
        assert_eq!(schedule.validate(), Ok(()));
    }
}
