//! Simulation configuration, normalization and orchestration

pub mod config;
pub mod light_curve;
pub mod normalize;

pub use config::{DetectorConfig, SimulationConfig};
pub use light_curve::{LightCurve, PlotOptions, SyntheticLightCurveSimulator};
pub use normalize::{normalize, NormalizeMethod};
