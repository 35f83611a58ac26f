//! Relative stellar photometry.
//!
//! Fluxes here are relative to a zero point of 1 at magnitude 0; no absolute
//! calibration is attempted, matching how occultation curves are normalized
//! to their own baseline anyway.

/// Convert an apparent magnitude to relative flux: F = 10^(-0.4 m).
pub fn magnitude_to_relative_flux(magnitude: f64) -> f64 {
    10f64.powf(-0.4 * magnitude)
}

/// Inverse of [`magnitude_to_relative_flux`]; `None` for non-positive flux.
pub fn relative_flux_to_magnitude(flux: f64) -> Option<f64> {
    (flux > 0.0 && flux.is_finite()).then(|| -2.5 * flux.log10())
}

/// Magnitude of two unresolved sources observed together.
///
/// Used for the blended star + occulting body brightness before and after
/// the event.
pub fn combined_magnitude(mag1: f64, mag2: f64) -> f64 {
    -2.5 * (magnitude_to_relative_flux(mag1) + magnitude_to_relative_flux(mag2)).log10()
}
