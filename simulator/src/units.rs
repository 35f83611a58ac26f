//! Type-safe physical units for occultation geometry
//!
//! Wraps the `uom` crate so that wavelength and distance conversions
//! (nanometers to kilometers in particular) live in one place.

use uom::si::f64::*;
use uom::si::length::{kilometer, meter, nanometer};
use uom::si::time::second;
use uom::si::velocity::kilometer_per_second;

/// Type alias for length measurements with convenient methods
pub type Length = uom::si::f64::Length;

/// Extension trait for length conversions used in occultation work
pub trait LengthExt {
    /// Create length from nanometers (wavelengths)
    fn from_nanometers(nm: f64) -> Self;

    /// Get length in nanometers
    fn as_nanometers(&self) -> f64;

    /// Create length from kilometers (distances, chord positions)
    fn from_kilometers(km: f64) -> Self;

    /// Get length in kilometers
    fn as_kilometers(&self) -> f64;

    /// Get length in meters
    fn as_meters(&self) -> f64;
}

impl LengthExt for Length {
    fn from_nanometers(nm: f64) -> Self {
        Length::new::<nanometer>(nm)
    }

    fn as_nanometers(&self) -> f64 {
        self.get::<nanometer>()
    }

    fn from_kilometers(km: f64) -> Self {
        Length::new::<kilometer>(km)
    }

    fn as_kilometers(&self) -> f64 {
        self.get::<kilometer>()
    }

    fn as_meters(&self) -> f64 {
        self.get::<meter>()
    }
}

/// Convert a wavelength in nanometers to kilometers.
pub fn nanometers_to_kilometers(nm: f64) -> f64 {
    Length::from_nanometers(nm).as_kilometers()
}

/// Time for a shadow moving at `velocity_kms` to sweep `length_km`.
pub fn crossing_time_s(length_km: f64, velocity_kms: f64) -> f64 {
    let length = Length::from_kilometers(length_km);
    let velocity = Velocity::new::<kilometer_per_second>(velocity_kms);
    let time: Time = length / velocity;
    time.get::<second>()
}
