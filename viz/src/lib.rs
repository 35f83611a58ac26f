//! ASCII visualization of photometric time series.
//!
//! Text rendering keeps light-curve inspection usable in terminals, over SSH
//! and inside log files, where no graphical display is available.
//!
//! # Core Modules
//!
//! ## Curve rendering (`curve`)
//! Column-binned rendering of y(x) series such as normalized flux against
//! time, with value labels on the vertical axis.

use std::fmt;
use thiserror::Error;

/// Error types for visualization operations.
#[derive(Debug, Error)]
pub enum VizError {
    /// Input data cannot be rendered (mismatched lengths, no finite samples).
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Rendering configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Text formatting error.
    #[error("Formatting error: {0}")]
    FmtError(#[from] fmt::Error),
}

/// Standard Result type for all visualization operations.
pub type Result<T> = std::result::Result<T, VizError>;

pub mod curve;
