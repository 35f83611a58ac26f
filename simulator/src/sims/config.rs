//! Simulation configuration with JSON persistence.

use std::fs;
use std::path::{Path, PathBuf};

use occult_shared::algo::fresnel::FresnelMethod;
use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, SimResult, SimulationError};
use crate::geometry::{OccultationGeometry, RingSegment, Satellite};
use crate::hardware::noise_model::NoiseConfig;
use crate::photometry::stellar::combined_magnitude;
use crate::sims::normalize::NormalizeMethod;

/// Default directory for data files; plots go to its `curves/` subdirectory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Default file name prefix for numbered outputs.
pub const DEFAULT_FILE_PREFIX: &str = "synthetic_curve";

/// Detector parameters of the noise model.
///
/// Seeing and exposure are shared with the geometry and live on
/// [`SimulationConfig`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub gain_counts_per_flux: f64,
    pub sky_bg_rate_counts_per_s: f64,
    pub bias_offset_counts: f64,
    pub read_noise_sigma_counts: f64,
    pub subtract_background: bool,
    pub bg_subtract_noise_frac: f64,
    pub allow_negative: bool,
    pub shot_noise: bool,
    pub scintillation_coeff: f64,
}

impl From<NoiseConfig> for DetectorConfig {
    fn from(noise: NoiseConfig) -> Self {
        Self {
            gain_counts_per_flux: noise.gain_counts_per_flux,
            sky_bg_rate_counts_per_s: noise.sky_bg_rate_counts_per_s,
            bias_offset_counts: noise.bias_offset_counts,
            read_noise_sigma_counts: noise.read_noise_sigma_counts,
            subtract_background: noise.subtract_background,
            bg_subtract_noise_frac: noise.bg_subtract_noise_frac,
            allow_negative: noise.allow_negative,
            shot_noise: noise.shot_noise,
            scintillation_coeff: noise.scintillation_coeff,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        NoiseConfig::default().into()
    }
}

impl DetectorConfig {
    /// A detector that adds no noise.
    pub fn noiseless() -> Self {
        NoiseConfig::noiseless(NoiseConfig::default().exposure_time_s).into()
    }
}

/// Everything one simulation run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Apparent magnitude of the occulted star
    pub mag_star: f64,
    /// Apparent magnitude of the occulting body's own reflected light;
    /// `None` treats the body as dark
    pub mag_body: Option<f64>,
    pub distance_km: f64,
    pub diameter_km: f64,
    pub velocity_kms: f64,
    pub exposure_time_s: f64,
    /// Window length; `None` uses three crossing times
    pub duration_s: Option<f64>,
    pub wavelength_nm: f64,
    pub seeing_arcsec: f64,
    pub rings: Vec<RingSegment>,
    pub satellites: Vec<Satellite>,
    pub normalize_method: NormalizeMethod,
    /// Seed for the noise generator; `None` draws one from entropy
    pub random_seed: Option<u64>,
    pub fresnel_method: FresnelMethod,
    pub detector: DetectorConfig,
    pub output_dir: PathBuf,
    pub file_prefix: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mag_star: 12.0,
            mag_body: None,
            distance_km: 4_000.0,
            diameter_km: 1_200.0,
            velocity_kms: 20.0,
            exposure_time_s: 0.1,
            duration_s: None,
            wavelength_nm: 550.0,
            seeing_arcsec: 1.0,
            rings: Vec::new(),
            satellites: Vec::new(),
            normalize_method: NormalizeMethod::default(),
            random_seed: None,
            fresnel_method: FresnelMethod::default(),
            detector: DetectorConfig::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

impl SimulationConfig {
    pub fn geometry(&self) -> OccultationGeometry {
        OccultationGeometry {
            distance_km: self.distance_km,
            diameter_km: self.diameter_km,
            velocity_kms: self.velocity_kms,
            exposure_time_s: self.exposure_time_s,
            duration_s: self.duration_s,
            wavelength_nm: self.wavelength_nm,
        }
    }

    pub fn noise_config(&self) -> NoiseConfig {
        let d = &self.detector;
        NoiseConfig {
            seeing_arcsec: self.seeing_arcsec,
            exposure_time_s: self.exposure_time_s,
            gain_counts_per_flux: d.gain_counts_per_flux,
            sky_bg_rate_counts_per_s: d.sky_bg_rate_counts_per_s,
            bias_offset_counts: d.bias_offset_counts,
            read_noise_sigma_counts: d.read_noise_sigma_counts,
            subtract_background: d.subtract_background,
            bg_subtract_noise_frac: d.bg_subtract_noise_frac,
            allow_negative: d.allow_negative,
            shot_noise: d.shot_noise,
            scintillation_coeff: d.scintillation_coeff,
        }
    }

    /// Magnitude of the unocculted star and body blended together.
    pub fn baseline_magnitude(&self) -> f64 {
        match self.mag_body {
            Some(mag_body) => combined_magnitude(self.mag_star, mag_body),
            None => self.mag_star,
        }
    }

    /// Directory for PNG plots.
    pub fn curves_dir(&self) -> PathBuf {
        self.output_dir.join("curves")
    }

    /// Check every parameter before any computation happens.
    pub fn validate(&self) -> SimResult<()> {
        if !self.mag_star.is_finite() {
            return Err(SimulationError::invalid("mag_star", "must be finite"));
        }
        if self.mag_body.is_some_and(|mag| !mag.is_finite()) {
            return Err(SimulationError::invalid("mag_body", "must be finite"));
        }
        self.geometry().validate()?;
        require_non_negative("seeing_arcsec", self.seeing_arcsec)?;
        for ring in &self.rings {
            ring.validate()?;
        }
        for satellite in &self.satellites {
            satellite.validate()?;
        }
        self.noise_config().validate()?;
        if self.file_prefix.is_empty() || self.file_prefix.contains(&['/', '\\'][..]) {
            return Err(SimulationError::invalid(
                "file_prefix",
                format!("must be a plain non-empty name, got {:?}", self.file_prefix),
            ));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load_from_file(path: &Path) -> SimResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        log::debug!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Save as pretty-printed JSON, creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> SimResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Saved simulation config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_validate() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.curves_dir(), PathBuf::from("output").join("curves"));
    }

    #[test]
    fn test_noise_config_shares_seeing_and_exposure() {
        let config = SimulationConfig {
            seeing_arcsec: 1.7,
            exposure_time_s: 0.25,
            ..SimulationConfig::default()
        };
        let noise = config.noise_config();
        assert_eq!(noise.seeing_arcsec, 1.7);
        assert_eq!(noise.exposure_time_s, 0.25);
        assert_eq!(noise.gain_counts_per_flux, 1e9);
    }

    #[test]
    fn test_baseline_magnitude_blends_body() {
        let star_only = SimulationConfig::default();
        assert_eq!(star_only.baseline_magnitude(), star_only.mag_star);

        let blended = SimulationConfig {
            mag_star: 12.0,
            mag_body: Some(12.0),
            ..SimulationConfig::default()
        };
        assert!((blended.baseline_magnitude() - (12.0 - 2.5 * 2f64.log10())).abs() < 1e-12);

        let bad = SimulationConfig {
            mag_body: Some(f64::NAN),
            ..SimulationConfig::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(SimulationError::InvalidConfig {
                parameter: "mag_body",
                ..
            })
        ));
    }

    #[test]
    fn test_noiseless_detector() {
        let config = SimulationConfig {
            detector: DetectorConfig::noiseless(),
            ..SimulationConfig::default()
        };
        let noise = config.noise_config();
        assert_eq!(noise, NoiseConfig::noiseless(config.exposure_time_s));
    }

    #[test]
    fn test_validation_errors() {
        let bad_ring = SimulationConfig {
            rings: vec![RingSegment::new(400.0, 5.0, 2.0)],
            ..SimulationConfig::default()
        };
        assert!(matches!(
            bad_ring.validate(),
            Err(SimulationError::InvalidConfig {
                parameter: "ring opacity",
                ..
            })
        ));

        let bad_diameter = SimulationConfig {
            diameter_km: 0.0,
            ..SimulationConfig::default()
        };
        assert!(bad_diameter.validate().is_err());

        let bad_prefix = SimulationConfig {
            file_prefix: "../escape".to_string(),
            ..SimulationConfig::default()
        };
        assert!(bad_prefix.validate().is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let config = SimulationConfig {
            rings: vec![RingSegment::new(-391.0, 7.0, 0.33)],
            satellites: vec![Satellite::new(900.0, 40.0)],
            random_seed: Some(7),
            normalize_method: NormalizeMethod::Median,
            ..SimulationConfig::default()
        };
        config.save_to_file(&path).unwrap();
        let loaded = SimulationConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "mag_star": 14.0, "normalize_method": "median",
                        "detector": { "read_noise_sigma_counts": 5.0 } }"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.mag_star, 14.0);
        assert_eq!(config.normalize_method, NormalizeMethod::Median);
        assert_eq!(config.detector.read_noise_sigma_counts, 5.0);
        assert_eq!(config.detector.gain_counts_per_flux, 1e9);
        assert_eq!(config.diameter_km, 1_200.0);
        assert!(config.rings.is_empty());
    }

    #[test]
    fn test_load_errors() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(
            SimulationConfig::load_from_file(&missing),
            Err(SimulationError::Io(_))
        ));

        let broken = temp_dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            SimulationConfig::load_from_file(&broken),
            Err(SimulationError::ConfigFile(_))
        ));
    }
}
