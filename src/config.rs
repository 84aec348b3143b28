use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::problem::{Point, DEFAULT_SPEED};

pub const DEFAULT_TIME_SAFETY_FACTOR: f64 = 1.2;

/// Parameters of one optimizer run.
///
/// `time_safety_factor` has no default and must be set explicitly.
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate", error = "ConfigError"))]
pub struct OptimizerConfig {
    /// depot of the vehicle, used as origin of the first empty drive
    #[builder(default = "0")]
    pub start_point: Point,
    /// multiplier on travel times between consecutive jobs
    pub time_safety_factor: f64,
    /// distance units per second
    #[builder(default = "DEFAULT_SPEED")]
    pub speed: f64,
    /// generate shared-ride variants
    #[builder(default = "true")]
    pub sharing: bool,
}

fn check_time_safety_factor(time_safety_factor: f64) -> Result<(), ConfigError> {
    if !time_safety_factor.is_finite() {
        Err(ConfigError::NonFiniteTimeSafetyFactor(time_safety_factor))
    } else if time_safety_factor < 0.0 {
        Err(ConfigError::NegativeTimeSafetyFactor(time_safety_factor))
    } else {
        Ok(())
    }
}

fn check_speed(speed: f64) -> Result<(), ConfigError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveSpeed(speed))
    }
}

impl OptimizerConfigBuilder {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(time_safety_factor) = self.time_safety_factor {
            check_time_safety_factor(time_safety_factor)?;
        }
        if let Some(speed) = self.speed {
            check_speed(speed)?;
        }
        Ok(())
    }
}

impl OptimizerConfig {
    pub fn validate_parameters(&self) -> Result<(), ConfigError> {
        check_time_safety_factor(self.time_safety_factor)?;
        check_speed(self.speed)
    }

    /// Checks the configuration against a travel matrix with `num_points` points.
    pub fn validate(&self, num_points: usize) -> Result<(), ConfigError> {
        self.validate_parameters()?;
        if self.start_point >= num_points {
            return Err(ConfigError::StartPointOutOfRange {
                start_point: self.start_point,
                num_points,
            });
        }
        Ok(())
    }
}
