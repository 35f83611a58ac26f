//! Numerical algorithms used by the light-curve simulator
//!
//! Special functions (Fresnel integrals) and robust statistics for
//! baseline estimation.

pub mod fresnel;
pub mod stats;

pub use fresnel::{ContinuedFraction, FresnelIntegrals, FresnelMethod, SeriesAsymptotic};
pub use stats::{finite_median, finite_values, mean, mean_of_top, median, segment_means};
