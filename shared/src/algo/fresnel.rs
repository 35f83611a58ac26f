//! Fresnel integrals C(u) and S(u)
//!
//! Normalized convention used throughout:
//!
//! ```text
//! C(u) = ∫₀ᵘ cos(π t² / 2) dt        S(u) = ∫₀ᵘ sin(π t² / 2) dt
//! ```
//!
//! Both are odd functions tending to ±0.5 as u → ±∞.
//!
//! Two interchangeable backends implement [`FresnelIntegrals`]:
//!
//! - [`ContinuedFraction`]: power series for small |u| and a complex continued
//!   fraction (modified Lentz) above, accurate to near machine precision.
//! - [`SeriesAsymptotic`]: fixed-budget power series plus the two-term
//!   asymptotic expansion. Good to about 1e-2 absolute everywhere and meant
//!   for fringe-shape fidelity in plots, not metrology.
//!
//! [`FresnelMethod`] picks a backend at runtime.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

/// Environment variable consulted by [`FresnelMethod::Auto`].
pub const FRESNEL_ENV_VAR: &str = "OCCULT_FRESNEL";

/// Capability interface: evaluate the Fresnel integrals at one argument.
pub trait FresnelIntegrals {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Returns `(C(u), S(u))`.
    fn evaluate(&self, u: f64) -> (f64, f64);

    /// Element-wise evaluation, returning separate C and S vectors.
    fn evaluate_all(&self, u: &[f64]) -> (Vec<f64>, Vec<f64>) {
        u.iter().map(|&v| self.evaluate(v)).unzip()
    }
}

const SERIES_CROSSOVER: f64 = 1.5;
const MAX_ITERATIONS: usize = 200;
const EPS: f64 = 1e-15;
const FPMIN: f64 = 1e-300;
/// Beyond this both integrals equal 0.5 to double precision.
const SATURATION_ARG: f64 = 1e8;

/// High-accuracy backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinuedFraction;

impl ContinuedFraction {
    /// Evaluate, reporting `None` if the iteration fails to converge or the
    /// input is not finite.
    pub fn try_evaluate(&self, u: f64) -> Option<(f64, f64)> {
        if u.is_nan() {
            return None;
        }
        let ax = u.abs();
        let (c, s) = if ax < FPMIN.sqrt() {
            (ax, 0.0)
        } else if ax >= SATURATION_ARG {
            (0.5, 0.5)
        } else if ax <= SERIES_CROSSOVER {
            power_series(ax, MAX_ITERATIONS, EPS)?
        } else {
            lentz_continued_fraction(ax)?
        };
        Some(apply_sign(u, c, s))
    }
}

impl FresnelIntegrals for ContinuedFraction {
    fn name(&self) -> &'static str {
        "continued-fraction"
    }

    fn evaluate(&self, u: f64) -> (f64, f64) {
        self.try_evaluate(u).unwrap_or_else(|| {
            if !u.is_nan() {
                log::warn!("Continued fraction did not converge at u = {u}, using approximation");
            }
            SeriesAsymptotic.evaluate(u)
        })
    }
}

const APPROX_CROSSOVER: f64 = 2.0;
/// Power-series terms per integral in the approximate backend.
const APPROX_SERIES_TERMS: usize = 12;

/// Lightweight approximation: truncated series + asymptotic expansion.
///
/// Agreement with [`ContinuedFraction`] is within about 1e-2 absolute,
/// which keeps diffraction fringe positions and shapes visually correct.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesAsymptotic;

impl FresnelIntegrals for SeriesAsymptotic {
    fn name(&self) -> &'static str {
        "series-asymptotic"
    }

    fn evaluate(&self, u: f64) -> (f64, f64) {
        if !u.is_finite() {
            return if u.is_nan() {
                (0.0, 0.0)
            } else {
                apply_sign(u, 0.5, 0.5)
            };
        }
        let ax = u.abs();
        let (c, s) = if ax <= APPROX_CROSSOVER {
            truncated_series(ax, APPROX_SERIES_TERMS)
        } else {
            asymptotic(ax)
        };
        apply_sign(u, c, s)
    }
}

fn apply_sign(u: f64, c: f64, s: f64) -> (f64, f64) {
    if u < 0.0 {
        (-c, -s)
    } else {
        (c, s)
    }
}

/// Alternating power series for both integrals, interleaved.
///
/// term_k = x (πx²/2)^k / k!, contributing to C for even k and S for odd k
/// with denominator (2k + 1).
fn power_series(ax: f64, max_terms: usize, eps: f64) -> Option<(f64, f64)> {
    let fact = FRAC_PI_2 * ax * ax;
    let mut term = ax;
    let mut sum_c = ax;
    let mut sum_s = 0.0;

    for k in 1..=max_terms {
        term *= fact / k as f64;
        let contribution = term / (2 * k + 1) as f64;
        // k mod 4: 1 -> +S, 2 -> -C, 3 -> -S, 0 -> +C
        match k % 4 {
            1 => sum_s += contribution,
            2 => sum_c -= contribution,
            3 => sum_s -= contribution,
            _ => sum_c += contribution,
        }
        let reference = if k % 2 == 0 { sum_c } else { sum_s };
        if term < reference.abs() * eps {
            return Some((sum_c, sum_s));
        }
    }
    None
}

fn truncated_series(ax: f64, terms_per_integral: usize) -> (f64, f64) {
    let fact = FRAC_PI_2 * ax * ax;
    let mut term = ax;
    let mut sum_c = ax;
    let mut sum_s = 0.0;
    for k in 1..=(2 * terms_per_integral) {
        term *= fact / k as f64;
        let contribution = term / (2 * k + 1) as f64;
        match k % 4 {
            1 => sum_s += contribution,
            2 => sum_c -= contribution,
            3 => sum_s -= contribution,
            _ => sum_c += contribution,
        }
    }
    (sum_c, sum_s)
}

/// Two-term auxiliary functions f, g of the large-argument expansion.
fn asymptotic(ax: f64) -> (f64, f64) {
    let y = PI * ax * ax;
    let y2 = y * y;
    let f = (1.0 - 3.0 / y2) / (PI * ax);
    let g = (1.0 - 15.0 / y2) / (PI * PI * ax * ax * ax);
    let phase = 0.5 * y;
    let (sin, cos) = phase.sin_cos();
    (0.5 + f * sin - g * cos, 0.5 - f * cos - g * sin)
}

fn lentz_continued_fraction(ax: f64) -> Option<(f64, f64)> {
    let pix2 = PI * ax * ax;
    let one = Complex64::new(1.0, 0.0);
    let mut b = Complex64::new(1.0, -pix2);
    let mut cc = Complex64::new(1.0 / FPMIN, 0.0);
    let mut d = one / b;
    let mut h = d;
    let mut n = -1.0_f64;

    let mut converged = false;
    for _ in 2..=MAX_ITERATIONS {
        n += 2.0;
        let a = -n * (n + 1.0);
        b += Complex64::new(4.0, 0.0);
        d = one / (d * a + b);
        cc = b + Complex64::new(a, 0.0) / cc;
        let del = cc * d;
        h *= del;
        if (del.re - 1.0).abs() + del.im.abs() < EPS {
            converged = true;
            break;
        }
    }
    if !converged {
        return None;
    }

    h *= Complex64::new(ax, -ax);
    let phase = Complex64::from_polar(1.0, 0.5 * pix2);
    let cs = Complex64::new(0.5, 0.5) * (one - phase * h);
    Some((cs.re, cs.im))
}

/// Runtime choice of Fresnel backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FresnelMethod {
    /// Environment override if set, otherwise the accurate backend with a
    /// per-sample fallback to the approximation.
    #[default]
    Auto,
    /// Always the continued-fraction backend.
    Accurate,
    /// Always the series/asymptotic approximation.
    Approximate,
}

impl FresnelMethod {
    /// Resolve `Auto` against the environment.
    pub fn resolve(self) -> FresnelMethod {
        self.resolve_with(std::env::var(FRESNEL_ENV_VAR).ok().as_deref())
    }

    /// Resolve `Auto` against an override value as read from
    /// `OCCULT_FRESNEL`. Explicit methods ignore the override.
    pub fn resolve_with(self, env_value: Option<&str>) -> FresnelMethod {
        match (self, env_value) {
            (FresnelMethod::Auto, Some(value)) => match value.parse::<FresnelMethod>() {
                Ok(FresnelMethod::Auto) | Err(_) => {
                    log::warn!(
                        "Ignoring {FRESNEL_ENV_VAR}={value:?}; using accurate Fresnel integrals"
                    );
                    FresnelMethod::Accurate
                }
                Ok(method) => method,
            },
            (FresnelMethod::Auto, None) => FresnelMethod::Accurate,
            (other, _) => other,
        }
    }

    /// Backend implementing this method (after resolution).
    pub fn backend(self) -> Box<dyn FresnelIntegrals + Send + Sync> {
        match self.resolve() {
            FresnelMethod::Approximate => Box::new(SeriesAsymptotic),
            _ => Box::new(ContinuedFraction),
        }
    }
}

impl fmt::Display for FresnelMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FresnelMethod::Auto => "auto",
            FresnelMethod::Accurate => "accurate",
            FresnelMethod::Approximate => "approximate",
        };
        f.write_str(name)
    }
}

impl FromStr for FresnelMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(FresnelMethod::Auto),
            "accurate" | "exact" => Ok(FresnelMethod::Accurate),
            "approximate" | "approx" => Ok(FresnelMethod::Approximate),
            other => Err(format!("Unknown Fresnel method '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // Reference values (Abramowitz & Stegun table 7.7)
    const REFERENCE: [(f64, f64, f64); 5] = [
        (0.5, 0.492_344_225_871_446_8, 0.064_732_432_859_999_29),
        (1.0, 0.779_893_400_376_822_8, 0.438_259_147_390_354_8),
        (1.5, 0.445_261_176_039_821_4, 0.697_504_960_082_093_1),
        (2.0, 0.488_253_406_075_340_8, 0.343_415_678_363_698_2),
        (3.0, 0.605_720_789_297_686_6, 0.496_312_998_050_412_5),
    ];

    #[test]
    fn test_accurate_matches_reference_table() {
        for &(u, c_ref, s_ref) in &REFERENCE {
            let (c, s) = ContinuedFraction.evaluate(u);
            assert_abs_diff_eq!(c, c_ref, epsilon = 1e-9);
            assert_abs_diff_eq!(s, s_ref, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_approximate_matches_reference_table() {
        for &(u, c_ref, s_ref) in &REFERENCE {
            let (c, s) = SeriesAsymptotic.evaluate(u);
            assert_abs_diff_eq!(c, c_ref, epsilon = 1e-2);
            assert_abs_diff_eq!(s, s_ref, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_backends_agree_across_range() {
        let mut u = -12.0;
        while u <= 12.0 {
            let (c_a, s_a) = ContinuedFraction.evaluate(u);
            let (c_b, s_b) = SeriesAsymptotic.evaluate(u);
            assert_abs_diff_eq!(c_a, c_b, epsilon = 1e-2);
            assert_abs_diff_eq!(s_a, s_b, epsilon = 1e-2);
            u += 0.037;
        }
    }

    #[test]
    fn test_odd_symmetry() {
        let samples = [0.0, 1e-9, 0.01, 0.3, 1.49, 1.51, 2.5, 7.0, 150.0, 1e9];
        for backend in [
            &ContinuedFraction as &dyn FresnelIntegrals,
            &SeriesAsymptotic as &dyn FresnelIntegrals,
        ] {
            for &u in &samples {
                let (c_pos, s_pos) = backend.evaluate(u);
                let (c_neg, s_neg) = backend.evaluate(-u);
                assert_abs_diff_eq!(c_neg, -c_pos, epsilon = 1e-14);
                assert_abs_diff_eq!(s_neg, -s_pos, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_asymptotic_limits() {
        for &u in &[50.0, 200.0, 1e4] {
            let (c, s) = ContinuedFraction.evaluate(u);
            assert_abs_diff_eq!(c, 0.5, epsilon = 1e-2);
            assert_abs_diff_eq!(s, 0.5, epsilon = 1e-2);
            let (c, s) = ContinuedFraction.evaluate(-u);
            assert_abs_diff_eq!(c, -0.5, epsilon = 1e-2);
            assert_abs_diff_eq!(s, -0.5, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_zero_and_nan() {
        assert_eq!(ContinuedFraction.evaluate(0.0), (0.0, 0.0));
        assert!(ContinuedFraction.try_evaluate(f64::NAN).is_none());
        assert_eq!(SeriesAsymptotic.evaluate(f64::NAN), (0.0, 0.0));
        assert_eq!(SeriesAsymptotic.evaluate(f64::INFINITY), (0.5, 0.5));
    }

    #[test]
    fn test_evaluate_all_preserves_length() {
        let u = vec![-3.0, 0.0, 0.5, 4.0];
        let (c, s) = ContinuedFraction.evaluate_all(&u);
        assert_eq!(c.len(), 4);
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_method_parsing_and_display() {
        assert_eq!("approx".parse::<FresnelMethod>(), Ok(FresnelMethod::Approximate));
        assert_eq!("Accurate".parse::<FresnelMethod>(), Ok(FresnelMethod::Accurate));
        assert!("fast".parse::<FresnelMethod>().is_err());
        assert_eq!(FresnelMethod::Auto.to_string(), "auto");
        assert_eq!(FresnelMethod::Approximate.resolve(), FresnelMethod::Approximate);
    }

    #[test]
    fn test_auto_honours_override_value() {
        let auto = FresnelMethod::Auto;
        assert_eq!(auto.resolve_with(None), FresnelMethod::Accurate);
        assert_eq!(auto.resolve_with(Some("approximate")), FresnelMethod::Approximate);
        assert_eq!(auto.resolve_with(Some(" ACCURATE ")), FresnelMethod::Accurate);
        // Unknown or circular values fall back to the accurate backend
        assert_eq!(auto.resolve_with(Some("garbage")), FresnelMethod::Accurate);
        assert_eq!(auto.resolve_with(Some("auto")), FresnelMethod::Accurate);
        // Explicit choices are never overridden
        assert_eq!(
            FresnelMethod::Accurate.resolve_with(Some("approximate")),
            FresnelMethod::Accurate
        );
        assert_eq!(
            FresnelMethod::Approximate.resolve_with(Some("accurate")),
            FresnelMethod::Approximate
        );
    }
}
