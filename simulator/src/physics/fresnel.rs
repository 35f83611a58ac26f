//! Fresnel diffraction transmission profiles.
//!
//! Converts positions along the occultation chord into a transmitted
//! intensity fraction, rendering diffraction fringes at every edge instead
//! of a sharp geometric shadow.
//!
//! # Model
//!
//! All profiles are expressed in the dimensionless Fresnel coordinate
//! `u = (x - x_edge) / F`, with the Fresnel scale `F = sqrt(λ D / 2)`.
//!
//! - **Knife edge**: `I(u) = ½[(C(u) + ½)² + (S(u) + ½)²]`, occulted for
//!   `x < x_edge`.
//! - **Opaque strip**: two opposing edges combined at amplitude level
//!   (Babinet), `A = 1 - (1 - i)/2 · [ΔC + iΔS]`, `T = |A|²`. For widths well
//!   above F the centre is dark; as the width goes to zero `ΔC, ΔS → 0` and
//!   the transmission tends to exactly 1.
//! - **Partial strip**: `T = 1 - opacity · (1 - T_opaque)`.
//!
//! Nothing here returns an error. The Fresnel scale is clamped away from
//! zero, non-finite intermediate results are treated as unattenuated light,
//! and outputs are clipped to a bounded range.

use std::fmt;

use ndarray::{Array1, Zip};
use occult_shared::algo::fresnel::{FresnelIntegrals, FresnelMethod};

use crate::units::nanometers_to_kilometers;

/// Lower bound for `λ D / 2` before the square root, in km².
const MIN_SCALE_SQUARED_KM2: f64 = 1e-30;

/// Lower bound for the Fresnel scale when used as a divisor, in km.
pub const MIN_FRESNEL_SCALE_KM: f64 = 1e-12;

/// Upper clip for strip transmission. The brightest diffraction fringe of a
/// straight edge reaches about 1.37.
pub const MAX_STRIP_TRANSMISSION: f64 = 1.4;

/// Fresnel scale `F = sqrt(λ D / 2)` in km.
///
/// # Arguments
/// * `distance_km` - Observer to occulting body distance
/// * `wavelength_nm` - Effective wavelength, converted to km internally
pub fn fresnel_scale_km(distance_km: f64, wavelength_nm: f64) -> f64 {
    let lambda_km = nanometers_to_kilometers(wavelength_nm);
    (lambda_km * distance_km / 2.0)
        .max(MIN_SCALE_SQUARED_KM2)
        .sqrt()
}

/// Diffraction calculator bound to one observing geometry.
pub struct FresnelPhysics {
    distance_km: f64,
    wavelength_nm: f64,
    scale_km: f64,
    method: FresnelMethod,
    backend: Box<dyn FresnelIntegrals + Send + Sync>,
}

impl fmt::Debug for FresnelPhysics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FresnelPhysics")
            .field("distance_km", &self.distance_km)
            .field("wavelength_nm", &self.wavelength_nm)
            .field("scale_km", &self.scale_km)
            .field("method", &self.method)
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl FresnelPhysics {
    /// Create a calculator for the given distance and wavelength.
    ///
    /// `method` is resolved immediately, so `FresnelMethod::Auto` consults
    /// the environment once per calculator.
    pub fn new(distance_km: f64, wavelength_nm: f64, method: FresnelMethod) -> Self {
        let resolved = method.resolve();
        let backend = resolved.backend();
        log::debug!(
            "Fresnel physics: D = {distance_km} km, λ = {wavelength_nm} nm, backend {}",
            backend.name()
        );
        Self {
            distance_km,
            wavelength_nm,
            scale_km: fresnel_scale_km(distance_km, wavelength_nm),
            method: resolved,
            backend,
        }
    }

    /// Fresnel scale in km.
    pub fn scale_km(&self) -> f64 {
        self.scale_km
    }

    /// Resolved backend selection.
    pub fn method(&self) -> FresnelMethod {
        self.method
    }

    /// Name of the backend evaluating the integrals.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Fresnel integrals `(C(u), S(u))` evaluated element-wise.
    pub fn fresnel_integrals(&self, u: &Array1<f64>) -> (Array1<f64>, Array1<f64>) {
        let mut c = Array1::zeros(u.len());
        let mut s = Array1::zeros(u.len());
        Zip::from(&mut c)
            .and(&mut s)
            .and(u)
            .for_each(|c, s, &u| {
                (*c, *s) = self.backend.evaluate(u);
            });
        (c, s)
    }

    fn to_fresnel_units(&self, x_km: &Array1<f64>, edge_km: f64) -> Array1<f64> {
        let scale = self.scale_km.max(MIN_FRESNEL_SCALE_KM);
        x_km.mapv(|x| (x - edge_km) / scale)
    }

    /// Intensity behind a single straight edge at `edge_km`.
    ///
    /// ≈0 far on the occulted side (`x < edge`), 0.25 at the geometric edge,
    /// ≈1 far on the open side. Clipped to [0, 1].
    pub fn knife_edge_transmission(&self, x_km: &Array1<f64>, edge_km: f64) -> Array1<f64> {
        let u = self.to_fresnel_units(x_km, edge_km);
        let (c, s) = self.fresnel_integrals(&u);
        let mut intensity = Array1::zeros(u.len());
        Zip::from(&mut intensity)
            .and(&c)
            .and(&s)
            .for_each(|out, &c, &s| {
                let value = 0.5 * ((c + 0.5).powi(2) + (s + 0.5).powi(2));
                *out = sanitize(value, 1.0);
            });
        intensity
    }

    /// Transmission of an opaque strip `[center - width/2, center + width/2]`.
    ///
    /// Negative widths are treated as zero (no attenuation).
    pub fn opaque_strip_transmission(
        &self,
        x_km: &Array1<f64>,
        center_km: f64,
        width_km: f64,
    ) -> Array1<f64> {
        let half = 0.5 * width_km.max(0.0);
        let u1 = self.to_fresnel_units(x_km, center_km - half);
        let u2 = self.to_fresnel_units(x_km, center_km + half);
        let (c1, s1) = self.fresnel_integrals(&u1);
        let (c2, s2) = self.fresnel_integrals(&u2);

        let mut transmission = Array1::zeros(x_km.len());
        Zip::from(&mut transmission)
            .and(&c1)
            .and(&s1)
            .and(&c2)
            .and(&s2)
            .for_each(|out, &c1, &s1, &c2, &s2| {
                let dc = c1 - c2;
                let ds = s1 - s2;
                let re = 1.0 - 0.5 * (dc + ds);
                let im = 0.5 * (dc - ds);
                *out = sanitize(re * re + im * im, MAX_STRIP_TRANSMISSION);
            });
        transmission
    }

    /// Transmission of a partially opaque strip such as a ring segment.
    ///
    /// `opacity` 0 leaves the light untouched; 1 is the opaque strip.
    pub fn partial_strip_transmission(
        &self,
        x_km: &Array1<f64>,
        center_km: f64,
        width_km: f64,
        opacity: f64,
    ) -> Array1<f64> {
        let opaque = self.opaque_strip_transmission(x_km, center_km, width_km);
        opaque.mapv(|t| sanitize(1.0 - opacity * (1.0 - t), MAX_STRIP_TRANSMISSION))
    }
}

/// Clip to `[0, upper]`; non-finite values count as unattenuated light.
fn sanitize(value: f64, upper: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, upper)
    } else {
        1.0
    }
}
