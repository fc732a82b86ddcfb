//! Error types for gridnav

use thiserror::Error;

use crate::infra::Position;
use crate::navigation::RouteStep;

/// Why a navigation request ended without reaching its target.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("current location could not be read")]
    LocationUnavailable,

    #[error("step {index} ({}) failed to execute", .step.as_str_name())]
    StepExecutionFailure { index: usize, step: RouteStep },

    #[error("obstacle recovery before step {index} failed to execute")]
    RerouteFailure { index: usize },

    #[error("arrival check failed: expected {target}, found {}", describe(.actual))]
    ArrivalVerificationFailure {
        target: Position,
        actual: Option<Position>,
    },
}

fn describe(actual: &Option<Position>) -> String {
    actual.map_or_else(|| "no readable position".to_string(), |p| p.to_string())
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },

    #[error("configuration error: {0}")]
    Invalid(String),
}
