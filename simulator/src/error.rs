//! Error types for the light-curve simulator.
//!
//! Physics, noise and normalization never fail for finite input; errors
//! arise only from bad configuration, wrong call order and I/O.

use thiserror::Error;

/// Result alias for simulator operations.
pub type SimResult<T> = Result<T, SimulationError>;

#[derive(Debug, Error)]
pub enum SimulationError {
    /// A configuration value is outside its valid domain.
    #[error("Invalid configuration: {parameter} {reason}")]
    InvalidConfig {
        parameter: &'static str,
        reason: String,
    },

    /// An output operation was requested before any curve was simulated.
    #[error("No simulation available: call simulate() before {operation}()")]
    NotSimulated { operation: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] serde_json::Error),

    #[error("Plot rendering failed: {0}")]
    Plot(String),

    /// Malformed line in a light-curve data file.
    #[error("Parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

impl SimulationError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        SimulationError::InvalidConfig {
            parameter,
            reason: reason.into(),
        }
    }
}

/// Require a strictly positive, finite value.
pub(crate) fn require_positive(parameter: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::invalid(
            parameter,
            format!("must be positive and finite, got {value}"),
        ))
    }
}

/// Require a non-negative, finite value.
pub(crate) fn require_non_negative(parameter: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::invalid(
            parameter,
            format!("must be non-negative and finite, got {value}"),
        ))
    }
}
