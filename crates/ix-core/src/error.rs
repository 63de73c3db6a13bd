//! Configuration error type.
//!
//! Every error here is raised by [`IntersectionConfig::validate`][crate::IntersectionConfig::validate]
//! before any simulation state exists.  A constructed simulation has no
//! runtime error paths.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("road length must be positive")]
    NonPositiveLength,

    #[error("road length {length} leaves no approach cells before the stop line")]
    RoadTooShort { length: u32 },

    #[error("green period must be positive")]
    NonPositiveGreenPeriod,

    #[error("maximum velocity must be positive")]
    ZeroMaxVelocity,

    #[error("probability `{name}` = {value} is outside [0, 1]")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
}

/// Shorthand result type for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;
