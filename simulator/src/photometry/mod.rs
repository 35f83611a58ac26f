//! Photometry models and utilities

pub mod stellar;

pub use stellar::{combined_magnitude, magnitude_to_relative_flux, relative_flux_to_magnitude};
