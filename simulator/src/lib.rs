//! Stellar-occultation light-curve simulation
//!
//! This crate models the light curve seen when a solar-system body passes in
//! front of a star: Fresnel diffraction at the body's limb, partially opaque
//! ring segments, satellites, and a layered photometric noise model, followed
//! by the baseline normalization used on observed curves.
//!
//! The entry point is [`SyntheticLightCurveSimulator`], built from a
//! [`SimulationConfig`] or one of the [`Scenario`] presets.

pub mod error;
pub mod geometry;
pub mod hardware;
pub mod io;
pub mod photometry;
pub mod physics;
pub mod plots;
pub mod scenarios;
pub mod shared_args;
pub mod sims;
pub mod units;

// Re-exports for easier access
pub use error::{SimResult, SimulationError};
pub use geometry::{OccultationGeometry, RingSegment, Satellite};
pub use hardware::noise_model::{NoiseConfig, NoiseModel};
pub use io::dat::read_light_curve;
pub use occult_shared::algo::fresnel::FresnelMethod;
pub use photometry::stellar::{combined_magnitude, magnitude_to_relative_flux};
pub use physics::fresnel::{fresnel_scale_km, FresnelPhysics};
pub use scenarios::Scenario;
pub use sims::config::{DetectorConfig, SimulationConfig};
pub use sims::light_curve::{LightCurve, PlotOptions, SyntheticLightCurveSimulator};
pub use sims::normalize::{normalize, NormalizeMethod};
