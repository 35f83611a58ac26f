//! Detector and atmosphere noise models

pub mod noise_model;

pub use noise_model::{NoiseConfig, NoiseModel};
