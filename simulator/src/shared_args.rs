use std::path::PathBuf;

use clap::Parser;
use occult_shared::algo::fresnel::FresnelMethod;

use crate::geometry::{RingSegment, Satellite};
use crate::sims::config::SimulationConfig;
use crate::sims::normalize::NormalizeMethod;

fn parse_values<const N: usize>(s: &str, format: &str) -> Result<[f64; N], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != N {
        return Err(format!("Value must be in format '{format}'"));
    }
    let mut values = [0.0; N];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("Invalid number '{}' in '{format}'", part.trim()))?;
    }
    Ok(values)
}

/// Parse a ring in format "offset_km,width_km,opacity"
pub fn parse_ring(s: &str) -> Result<RingSegment, String> {
    let [offset, width, opacity] = parse_values(s, "offset_km,width_km,opacity")?;
    let ring = RingSegment::new(offset, width, opacity);
    ring.validate().map_err(|e| e.to_string())?;
    Ok(ring)
}

/// Parse a satellite in format "offset_km,diameter_km"
pub fn parse_satellite(s: &str) -> Result<Satellite, String> {
    let [offset, diameter] = parse_values(s, "offset_km,diameter_km")?;
    let satellite = Satellite::new(offset, diameter);
    satellite.validate().map_err(|e| e.to_string())?;
    Ok(satellite)
}

/// Simulation parameters that override a preset or config file
#[derive(Parser, Debug, Clone, Default)]
pub struct SharedSimulationArgs {
    /// Apparent magnitude of the occulted star
    #[arg(long)]
    pub mag_star: Option<f64>,

    /// Apparent magnitude of the occulting body itself
    #[arg(long)]
    pub mag_body: Option<f64>,

    /// Observer to body distance in km
    #[arg(long)]
    pub distance_km: Option<f64>,

    /// Body diameter along the chord in km
    #[arg(long)]
    pub diameter_km: Option<f64>,

    /// Shadow velocity in km/s
    #[arg(long)]
    pub velocity_kms: Option<f64>,

    /// Exposure time per sample in seconds
    #[arg(long)]
    pub exposure: Option<f64>,

    /// Total window length in seconds (default: three crossing times)
    #[arg(long)]
    pub duration: Option<f64>,

    /// Effective wavelength in nanometers
    #[arg(long)]
    pub wavelength: Option<f64>,

    /// Atmospheric seeing in arcseconds
    #[arg(long)]
    pub seeing: Option<f64>,

    /// Ring segment "offset_km,width_km,opacity"; repeat for several.
    /// Replaces the preset's rings.
    #[arg(long = "ring", value_parser = parse_ring, allow_hyphen_values = true)]
    pub rings: Vec<RingSegment>,

    /// Satellite "offset_km,diameter_km"; repeat for several
    #[arg(long = "satellite", value_parser = parse_satellite, allow_hyphen_values = true)]
    pub satellites: Vec<Satellite>,

    /// Baseline normalization method
    #[arg(long, value_enum)]
    pub normalize: Option<NormalizeMethod>,

    /// Random seed for reproducible noise
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fresnel integral backend (auto, accurate, approximate)
    #[arg(long)]
    pub fresnel: Option<FresnelMethod>,

    /// Directory for data files; plots go to its curves/ subdirectory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

impl SharedSimulationArgs {
    /// Overwrite every field of `config` that was given on the command line.
    pub fn apply_to(&self, config: &mut SimulationConfig) {
        let overrides = [
            (self.mag_star, &mut config.mag_star),
            (self.distance_km, &mut config.distance_km),
            (self.diameter_km, &mut config.diameter_km),
            (self.velocity_kms, &mut config.velocity_kms),
            (self.exposure, &mut config.exposure_time_s),
            (self.wavelength, &mut config.wavelength_nm),
            (self.seeing, &mut config.seeing_arcsec),
        ];
        for (value, field) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }

        if self.mag_body.is_some() {
            config.mag_body = self.mag_body;
        }
        if self.duration.is_some() {
            config.duration_s = self.duration;
        }
        if !self.rings.is_empty() {
            config.rings = self.rings.clone();
        }
        if !self.satellites.is_empty() {
            config.satellites = self.satellites.clone();
        }
        if let Some(method) = self.normalize {
            config.normalize_method = method;
        }
        if self.seed.is_some() {
            config.random_seed = self.seed;
        }
        if let Some(method) = self.fresnel {
            config.fresnel_method = method;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
    }
}
