//! Photometric noise for occultation light curves.
//!
//! Turns a noiseless relative-flux signal into what a photometer would
//! report, working in detector counts and converting back to relative flux:
//!
//! - **Shot noise**: Poisson draw of the star counts
//! - **Sky background**: Poisson counts independent of the star
//! - **Read noise**: additive Gaussian
//! - **Scintillation**: log-normal factor on the star term only
//! - **Bias / background subtraction**: the estimated `sky + bias` level is
//!   removed with its own relative error, which can leave negative flux
//!
//! The scintillation width is a heuristic. It grows with seeing and shrinks
//! as `1/sqrt(exposure)`, but it is not derived from any turbulence profile.
//!
//! Randomness is always supplied by the caller, so a seeded generator makes
//! every draw reproducible.

use ndarray::{Array1, Zip};
use rand::Rng;
use rand_distr::{Distribution, Normal, Poisson};
use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, require_positive, SimResult, SimulationError};

/// Upper bound on expected star counts per sample.
pub const MAX_EXPECTED_COUNTS: f64 = 1e12;

/// Scintillation log-sigma never drops below this when enabled.
pub const MIN_SCINTILLATION_SIGMA: f64 = 0.001;

/// Reference exposure for the scintillation heuristic, seconds.
const SCINTILLATION_REFERENCE_EXPOSURE_S: f64 = 0.1;

/// Shortest exposure the scintillation heuristic will scale to, seconds.
const SCINTILLATION_MIN_EXPOSURE_S: f64 = 1e-3;

/// Detector and atmosphere parameters for [`NoiseModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Atmospheric seeing in arcseconds
    pub seeing_arcsec: f64,
    /// Integration time per sample in seconds
    pub exposure_time_s: f64,
    /// Counts per second produced by a relative flux of 1
    pub gain_counts_per_flux: f64,
    /// Sky background rate in counts per second
    pub sky_bg_rate_counts_per_s: f64,
    /// Constant detector offset in counts
    pub bias_offset_counts: f64,
    /// Read noise RMS in counts
    pub read_noise_sigma_counts: f64,
    /// Remove the estimated `sky + bias` level after the draw
    pub subtract_background: bool,
    /// Relative 1σ error of the background estimate
    pub bg_subtract_noise_frac: f64,
    /// Keep negative flux produced by background subtraction
    pub allow_negative: bool,
    /// Draw Poisson star counts instead of using the expectation
    pub shot_noise: bool,
    /// Scintillation strength at 1" seeing and 0.1 s; 0 disables it
    pub scintillation_coeff: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seeing_arcsec: 1.0,
            exposure_time_s: 0.1,
            gain_counts_per_flux: 1e9,
            sky_bg_rate_counts_per_s: 300.0,
            bias_offset_counts: 100.0,
            read_noise_sigma_counts: 20.0,
            subtract_background: true,
            bg_subtract_noise_frac: 0.05,
            allow_negative: true,
            shot_noise: true,
            scintillation_coeff: 0.005,
        }
    }
}

impl NoiseConfig {
    /// A configuration that adds no noise at all.
    pub fn noiseless(exposure_time_s: f64) -> Self {
        Self {
            exposure_time_s,
            sky_bg_rate_counts_per_s: 0.0,
            bias_offset_counts: 0.0,
            read_noise_sigma_counts: 0.0,
            subtract_background: false,
            bg_subtract_noise_frac: 0.0,
            shot_noise: false,
            scintillation_coeff: 0.0,
            ..Self::default()
        }
    }

    /// Reject parameters the model cannot draw from.
    pub fn validate(&self) -> SimResult<()> {
        require_positive("exposure_time_s", self.exposure_time_s)?;
        require_positive("gain_counts_per_flux", self.gain_counts_per_flux)?;
        require_non_negative("seeing_arcsec", self.seeing_arcsec)?;
        require_non_negative("sky_bg_rate_counts_per_s", self.sky_bg_rate_counts_per_s)?;
        require_non_negative("read_noise_sigma_counts", self.read_noise_sigma_counts)?;
        require_non_negative("bg_subtract_noise_frac", self.bg_subtract_noise_frac)?;
        require_non_negative("scintillation_coeff", self.scintillation_coeff)?;
        if !self.bias_offset_counts.is_finite() {
            return Err(SimulationError::invalid("bias_offset_counts", "must be finite"));
        }
        Ok(())
    }

    /// Log-normal sigma of the scintillation factor, `None` when disabled.
    pub fn scintillation_sigma(&self) -> Option<f64> {
        if self.scintillation_coeff <= 0.0 {
            return None;
        }
        let exposure = self.exposure_time_s.max(SCINTILLATION_MIN_EXPOSURE_S);
        let sigma = self.scintillation_coeff
            * self.seeing_arcsec
            * (SCINTILLATION_REFERENCE_EXPOSURE_S / exposure).sqrt();
        Some(sigma.max(MIN_SCINTILLATION_SIGMA))
    }

    /// Mean sky counts per sample.
    pub fn background_mean_counts(&self) -> f64 {
        self.sky_bg_rate_counts_per_s * self.exposure_time_s
    }

    /// Counts produced by a relative flux of 1 in one exposure.
    pub fn counts_per_unit_flux(&self) -> f64 {
        self.gain_counts_per_flux * self.exposure_time_s
    }
}

/// Applies a [`NoiseConfig`] to expected-flux arrays.
#[derive(Debug, Clone)]
pub struct NoiseModel {
    config: NoiseConfig,
    read_noise: Option<Normal<f64>>,
    scintillation: Option<Normal<f64>>,
    background_error: Option<Normal<f64>>,
    background: Option<Poisson<f64>>,
}

impl NoiseModel {
    /// Build a model, validating the configuration.
    pub fn new(config: NoiseConfig) -> SimResult<Self> {
        config.validate()?;

        let read_noise = gaussian("read_noise_sigma_counts", config.read_noise_sigma_counts)?;
        let scintillation = match config.scintillation_sigma() {
            Some(sigma) => gaussian("scintillation_coeff", sigma)?,
            None => None,
        };
        let background_error = if config.subtract_background {
            gaussian("bg_subtract_noise_frac", config.bg_subtract_noise_frac)?
        } else {
            None
        };
        let background = poisson(config.background_mean_counts());

        log::debug!(
            "Noise model: {:.3e} counts/flux, sky {:.1} counts, read σ {:.1}, scint σ_ln {:?}",
            config.counts_per_unit_flux(),
            config.background_mean_counts(),
            config.read_noise_sigma_counts,
            config.scintillation_sigma()
        );

        Ok(Self {
            config,
            read_noise,
            scintillation,
            background_error,
            background,
        })
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// Observed relative flux for the given expected relative flux.
    ///
    /// Output length always equals input length.
    pub fn apply<R: Rng + ?Sized>(&self, expected: &Array1<f64>, rng: &mut R) -> Array1<f64> {
        let cfg = &self.config;
        let counts_per_flux = cfg.counts_per_unit_flux();
        let background_estimate = cfg.background_mean_counts() + cfg.bias_offset_counts;

        let mut observed = Array1::zeros(expected.len());
        Zip::from(&mut observed)
            .and(expected)
            .for_each(|out, &expected| {
                let expected = if expected.is_finite() {
                    expected.max(0.0)
                } else {
                    0.0
                };
                let lambda_star = (expected * counts_per_flux).clamp(0.0, MAX_EXPECTED_COUNTS);

                // Draw order is fixed so a seed always yields the same curve
                let star = if cfg.shot_noise {
                    poisson(lambda_star).map_or(0.0, |p| p.sample(rng))
                } else {
                    lambda_star
                };
                let background = self.background.as_ref().map_or(0.0, |p| p.sample(rng));
                let read = self.read_noise.as_ref().map_or(0.0, |n| n.sample(rng));
                let scint = self
                    .scintillation
                    .as_ref()
                    .map_or(1.0, |n| n.sample(rng).exp());

                let mut total = star * scint + background + read + cfg.bias_offset_counts;
                if cfg.subtract_background {
                    let error = self.background_error.as_ref().map_or(0.0, |n| n.sample(rng));
                    total -= background_estimate * (1.0 + error);
                }

                let flux = total / counts_per_flux;
                *out = if cfg.allow_negative { flux } else { flux.max(0.0) };
            });
        observed
    }
}

/// Zero-mean Gaussian, or `None` for a zero sigma.
fn gaussian(parameter: &'static str, sigma: f64) -> SimResult<Option<Normal<f64>>> {
    if sigma == 0.0 {
        return Ok(None);
    }
    Normal::new(0.0, sigma)
        .map(Some)
        .map_err(|e| SimulationError::invalid(parameter, e.to_string()))
}

/// Poisson with the given mean; `None` when the mean is not positive.
fn poisson(lambda: f64) -> Option<Poisson<f64>> {
    if lambda > 0.0 {
        Poisson::new(lambda).ok()
    } else {
        None
    }
}
