use thiserror::Error;

use crate::problem::{Point, RequestId};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("time safety factor must not be negative (got {0})")]
    NegativeTimeSafetyFactor(f64),
    #[error("time safety factor must be finite (got {0})")]
    NonFiniteTimeSafetyFactor(f64),
    #[error("speed must be positive and finite (got {0})")]
    NonPositiveSpeed(f64),
    #[error("start point {start_point} is outside of the travel matrix ({num_points} points)")]
    StartPointOutOfRange { start_point: Point, num_points: usize },
    #[error("missing configuration value: {0}")]
    Missing(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OptimizerError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("request {id} is invalid: {reason}")]
    InvalidRequest { id: RequestId, reason: String },
    #[error("no route from point {from} to point {to}")]
    UnreachableTrip { from: Point, to: Point },
    #[error("jobs are not sorted by latest finish time (first violation at index {index})")]
    UnsortedJobs { index: usize },
    #[error("invalid request catalog: {0}")]
    InvalidCatalog(String),
    #[error("invalid travel matrix: {0}")]
    InvalidTravelMatrix(String),
}

pub type Result<T> = std::result::Result<T, OptimizerError>;

impl From<derive_builder::UninitializedFieldError> for ConfigError {
    fn from(err: derive_builder::UninitializedFieldError) -> Self {
        Self::Missing(err.field_name().to_string())
    }
}
