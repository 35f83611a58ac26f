//! Diffraction physics of occulting edges and strips

pub mod fresnel;

pub use fresnel::{fresnel_scale_km, FresnelPhysics};
