//! Synthetic occultation light curves.
//!
//! [`SyntheticLightCurveSimulator`] owns one configuration and produces one
//! [`LightCurve`] per [`simulate`](SyntheticLightCurveSimulator::simulate)
//! call. A run:
//!
//! 1. samples the event window and maps time onto the chord, centred on the
//!    body
//! 2. multiplies the diffraction transmissions of body, rings and satellites
//! 3. scales by the star's relative flux and applies photometric noise
//! 4. normalizes to the out-of-event baseline
//!
//! Plotting and export read the latest result and fail until one exists.

use std::path::PathBuf;

use ndarray::Array1;
use occult_viz::curve::{render_curve, CurvePlotConfig};
use rand::rngs::StdRng;
use rand::{thread_rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{SimResult, SimulationError};
use crate::geometry::OccultationGeometry;
use crate::hardware::noise_model::NoiseModel;
use crate::io::dat::save_light_curve;
use crate::photometry::stellar::{magnitude_to_relative_flux, relative_flux_to_magnitude};
use crate::physics::fresnel::FresnelPhysics;
use crate::plots::{default_title, save_light_curve_plot, X_LABEL, Y_LABEL};
use crate::sims::config::SimulationConfig;
use crate::sims::normalize::normalize;

/// Terminal preview size in characters.
const PREVIEW_SIZE: (usize, usize) = (100, 24);

/// The three output columns of a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightCurve {
    /// Sample times in seconds from the window start
    pub time_s: Array1<f64>,
    /// Noisy relative flux; may be negative after background subtraction
    pub flux: Array1<f64>,
    /// Flux divided by the out-of-event baseline
    pub flux_norm: Array1<f64>,
}

impl LightCurve {
    pub fn len(&self) -> usize {
        self.time_s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_s.is_empty()
    }

    /// Index of the smallest finite normalized flux.
    pub fn min_index(&self) -> Option<usize> {
        self.flux_norm
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
    }
}

/// What [`SyntheticLightCurveSimulator::plot_curve`] should do.
#[derive(Debug, Clone, Default)]
pub struct PlotOptions {
    /// Write a numbered PNG under the curves directory
    pub save: bool,
    /// Print a text preview to stdout
    pub show: bool,
    /// Title override; defaults to one naming the wavelength
    pub title: Option<String>,
}

impl PlotOptions {
    pub fn save() -> Self {
        Self {
            save: true,
            ..Self::default()
        }
    }
}

/// Simulator for one occultation configuration.
#[derive(Debug)]
pub struct SyntheticLightCurveSimulator {
    config: SimulationConfig,
    geometry: OccultationGeometry,
    physics: FresnelPhysics,
    noise: NoiseModel,
    seed: u64,
    rng: StdRng,
    result: Option<LightCurve>,
}

impl SyntheticLightCurveSimulator {
    /// Validate `config` and prepare the physics and noise stages.
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;

        let seed = config.random_seed.unwrap_or_else(|| thread_rng().next_u64());
        let geometry = config.geometry();
        let physics = FresnelPhysics::new(
            config.distance_km,
            config.wavelength_nm,
            config.fresnel_method,
        );
        let noise = NoiseModel::new(config.noise_config())?;

        log::debug!(
            "Simulator ready: F = {:.4} km, {} rings, {} satellites, seed {seed}",
            physics.scale_km(),
            config.rings.len(),
            config.satellites.len()
        );

        Ok(Self {
            config,
            geometry,
            physics,
            noise,
            seed,
            rng: StdRng::seed_from_u64(seed),
            result: None,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Seed the noise generator started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn physics(&self) -> &FresnelPhysics {
        &self.physics
    }

    /// The latest simulated curve, if any.
    pub fn result(&self) -> Option<&LightCurve> {
        self.result.as_ref()
    }

    /// Combined transmission of body, rings and satellites at each chord
    /// position, clipped to [0, 1].
    pub fn transmission(&self, x_km: &Array1<f64>) -> Array1<f64> {
        let body = self
            .physics
            .opaque_strip_transmission(x_km, 0.0, self.config.diameter_km);

        let rings = self
            .config
            .rings
            .iter()
            .fold(Array1::<f64>::ones(x_km.len()), |acc, ring| {
                acc * self.physics.partial_strip_transmission(
                    x_km,
                    ring.offset_km,
                    ring.width_km,
                    ring.opacity,
                )
            });

        let satellites = self
            .config
            .satellites
            .iter()
            .fold(Array1::<f64>::ones(x_km.len()), |acc, satellite| {
                acc * self.physics.opaque_strip_transmission(
                    x_km,
                    satellite.offset_km,
                    satellite.diameter_km,
                )
            });

        (body * rings * satellites).mapv(|t| t.clamp(0.0, 1.0))
    }

    /// Noiseless relative flux at each sample time.
    ///
    /// The star is attenuated by the transmission; the body's own light, if
    /// configured, is added unattenuated.
    pub fn expected_flux(&self, time_s: &Array1<f64>) -> Array1<f64> {
        let x_km = self.geometry.chord_positions(time_s);
        let star_flux = magnitude_to_relative_flux(self.config.mag_star);
        let body_flux = self
            .config
            .mag_body
            .map_or(0.0, magnitude_to_relative_flux);
        self.transmission(&x_km) * star_flux + body_flux
    }

    /// Run one simulation, replacing any previous result.
    pub fn simulate(&mut self) -> &LightCurve {
        let time_s = self.geometry.time_axis();
        let expected = self.expected_flux(&time_s);
        let deepest = expected.iter().copied().fold(f64::INFINITY, f64::min);
        log::debug!(
            "Baseline magnitude {:.3}, deepest expected magnitude {:?}",
            self.config.baseline_magnitude(),
            relative_flux_to_magnitude(deepest)
        );
        let flux = self.noise.apply(&expected, &mut self.rng);
        let flux_norm = normalize(&flux, self.config.normalize_method);

        let curve = LightCurve {
            time_s,
            flux,
            flux_norm,
        };
        log::debug!(
            "Simulated {} samples over {:.1} s, minimum normalized flux at index {:?}",
            curve.len(),
            self.geometry.total_duration_s(),
            curve.min_index()
        );
        self.result.insert(curve)
    }

    fn require_result(&self, operation: &'static str) -> SimResult<&LightCurve> {
        self.result
            .as_ref()
            .ok_or(SimulationError::NotSimulated { operation })
    }

    /// Plot normalized flux against time.
    ///
    /// Returns the PNG path when `options.save` is set.
    pub fn plot_curve(&self, options: &PlotOptions) -> SimResult<Option<PathBuf>> {
        let curve = self.require_result("plot_curve")?;
        let title = options
            .title
            .clone()
            .unwrap_or_else(|| default_title(self.config.wavelength_nm));

        let path = if options.save {
            Some(save_light_curve_plot(
                &self.config.curves_dir(),
                &self.config.file_prefix,
                curve,
                &title,
            )?)
        } else {
            None
        };

        if options.show {
            println!("{}", self.preview(curve, &title)?);
        }
        Ok(path)
    }

    fn preview(&self, curve: &LightCurve, title: &str) -> SimResult<String> {
        let (width, height) = PREVIEW_SIZE;
        let config = CurvePlotConfig {
            title: Some(title),
            x_label: Some(X_LABEL),
            y_label: Some(Y_LABEL),
            width,
            height,
            ..Default::default()
        };
        let time = curve.time_s.to_vec();
        let flux = curve.flux_norm.to_vec();
        render_curve(&time, &flux, &config).map_err(|e| SimulationError::Plot(e.to_string()))
    }

    /// The current curve, optionally written to the next numbered `.dat`.
    pub fn export_data(&self, save: bool) -> SimResult<(LightCurve, Option<PathBuf>)> {
        let curve = self.require_result("export_data")?;
        let path = if save {
            Some(save_light_curve(
                &self.config.output_dir,
                &self.config.file_prefix,
                curve,
            )?)
        } else {
            None
        };
        Ok((curve.clone(), path))
    }
}
