//! Occultation geometry: the observed body, its rings and its satellites.
//!
//! All positions are measured along the chord the star traces behind the
//! body, in km, with 0 at the body's centre.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, require_positive, SimResult, SimulationError};
use crate::units::crossing_time_s;

/// Whole-event duration as a multiple of the body crossing time when no
/// duration is configured.
pub const DEFAULT_DURATION_CROSSINGS: f64 = 3.0;

/// Fewest samples a time axis may have.
pub const MIN_SAMPLES: usize = 2;

/// Most samples a time axis may have.
pub const MAX_SAMPLES: usize = 100_000_000;

/// Observer/body distances, body size and sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccultationGeometry {
    /// Observer to body distance in km
    pub distance_km: f64,
    /// Body diameter along the chord in km
    pub diameter_km: f64,
    /// Shadow velocity relative to the observer in km/s
    pub velocity_kms: f64,
    /// Sample spacing in seconds
    pub exposure_time_s: f64,
    /// Window length in seconds; `None` derives it from the crossing time
    pub duration_s: Option<f64>,
    /// Effective wavelength in nm
    pub wavelength_nm: f64,
}

impl OccultationGeometry {
    pub fn validate(&self) -> SimResult<()> {
        require_positive("distance_km", self.distance_km)?;
        require_positive("diameter_km", self.diameter_km)?;
        require_positive("velocity_kms", self.velocity_kms)?;
        require_positive("exposure_time_s", self.exposure_time_s)?;
        require_positive("wavelength_nm", self.wavelength_nm)?;
        if let Some(duration) = self.duration_s {
            require_positive("duration_s", duration)?;
        }
        let samples = self.total_duration_s() / self.exposure_time_s;
        if !samples.is_finite() || samples > MAX_SAMPLES as f64 {
            return Err(SimulationError::invalid(
                "duration_s",
                format!(
                    "window of {} s at {} s per exposure exceeds {MAX_SAMPLES} samples",
                    self.total_duration_s(),
                    self.exposure_time_s
                ),
            ));
        }
        Ok(())
    }

    /// Time for the shadow to cross the body diameter.
    pub fn crossing_time_s(&self) -> f64 {
        crossing_time_s(self.diameter_km, self.velocity_kms)
    }

    /// Configured duration, or three crossing times centred on the event.
    pub fn total_duration_s(&self) -> f64 {
        self.duration_s
            .unwrap_or_else(|| DEFAULT_DURATION_CROSSINGS * self.crossing_time_s())
    }

    /// Number of exposures covering the window, at least [`MIN_SAMPLES`].
    pub fn sample_count(&self) -> usize {
        let n = (self.total_duration_s() / self.exposure_time_s).ceil();
        if n.is_finite() {
            (n as usize).max(MIN_SAMPLES)
        } else {
            MIN_SAMPLES
        }
    }

    /// Evenly spaced sample times from 0 to the total duration inclusive.
    pub fn time_axis(&self) -> Array1<f64> {
        Array1::linspace(0.0, self.total_duration_s(), self.sample_count())
    }

    /// Chord position for each time, zero at the middle of the window.
    pub fn chord_positions(&self, time_s: &Array1<f64>) -> Array1<f64> {
        let t_center = match (time_s.first(), time_s.last()) {
            (Some(first), Some(last)) => 0.5 * (first + last),
            _ => 0.0,
        };
        time_s.mapv(|t| self.velocity_kms * (t - t_center))
    }
}

/// A partially opaque ring segment crossed by the chord.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingSegment {
    /// Centre of the segment along the chord, km from the body centre
    pub offset_km: f64,
    /// Radial width in km
    pub width_km: f64,
    /// Fraction of light blocked, 0 to 1
    pub opacity: f64,
}

impl RingSegment {
    pub fn new(offset_km: f64, width_km: f64, opacity: f64) -> Self {
        Self {
            offset_km,
            width_km,
            opacity,
        }
    }

    /// Segment whose opacity follows from normal optical depth, `1 - e^-τ`.
    pub fn from_optical_depth(offset_km: f64, width_km: f64, tau: f64) -> Self {
        Self::new(offset_km, width_km, 1.0 - (-tau.max(0.0)).exp())
    }

    /// The ingress and egress crossings of one ring on a central chord.
    pub fn symmetric_pair(radius_km: f64, width_km: f64, opacity: f64) -> [Self; 2] {
        [
            Self::new(-radius_km, width_km, opacity),
            Self::new(radius_km, width_km, opacity),
        ]
    }

    pub fn validate(&self) -> SimResult<()> {
        if !self.offset_km.is_finite() {
            return Err(SimulationError::invalid("ring offset_km", "must be finite"));
        }
        require_non_negative("ring width_km", self.width_km)?;
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(SimulationError::invalid(
                "ring opacity",
                format!("must be within [0, 1], got {}", self.opacity),
            ));
        }
        Ok(())
    }
}

/// An opaque companion body crossed by the chord.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Satellite {
    /// Centre along the chord, km from the primary's centre
    pub offset_km: f64,
    /// Diameter along the chord in km
    pub diameter_km: f64,
}

impl Satellite {
    pub fn new(offset_km: f64, diameter_km: f64) -> Self {
        Self {
            offset_km,
            diameter_km,
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        if !self.offset_km.is_finite() {
            return Err(SimulationError::invalid(
                "satellite offset_km",
                "must be finite",
            ));
        }
        require_non_negative("satellite diameter_km", self.diameter_km)
    }
}
