//! Baseline normalization of light curves.
//!
//! Both methods estimate the out-of-event flux level and divide by it, so the
//! unocculted star sits near 1. Degenerate inputs never produce a division by
//! zero:
//!
//! 1. fewer than [`QUARTILE_SEGMENTS`] finite samples: baseline is their mean
//! 2. baseline non-finite or ≤ 0: baseline is the median of the finite samples
//! 3. median also unusable: the curve is returned unchanged

use std::fmt;
use std::str::FromStr;

use ndarray::Array1;
use occult_shared::algo::stats::{finite_median, mean, mean_of_top, segment_means};
use serde::{Deserialize, Serialize};

/// Number of contiguous segments for the top-quartiles baseline.
pub const QUARTILE_SEGMENTS: usize = 4;

/// How many of the brightest segments form the baseline.
const BASELINE_SEGMENTS: usize = 2;

/// Baseline estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeMethod {
    /// Mean of the two brightest of four time-ordered segments
    #[default]
    TopQuartiles,
    /// Median of the whole curve
    Median,
}

impl fmt::Display for NormalizeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeMethod::TopQuartiles => write!(f, "top_quartiles"),
            NormalizeMethod::Median => write!(f, "median"),
        }
    }
}

impl FromStr for NormalizeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "top_quartiles" => Ok(NormalizeMethod::TopQuartiles),
            "median" => Ok(NormalizeMethod::Median),
            other => Err(format!(
                "unknown normalization method '{other}' (expected top_quartiles or median)"
            )),
        }
    }
}

/// Divide `flux` by its baseline as estimated by `method`.
pub fn normalize(flux: &Array1<f64>, method: NormalizeMethod) -> Array1<f64> {
    match method {
        NormalizeMethod::TopQuartiles => normalize_top_quartiles(flux),
        NormalizeMethod::Median => normalize_median(flux),
    }
}

/// Baseline from the brightest half of four contiguous segments.
///
/// The two dimmest segments are assumed to contain the event, wherever it
/// falls in the window.
pub fn normalize_top_quartiles(flux: &Array1<f64>) -> Array1<f64> {
    let finite = finite_samples(flux);
    let baseline = if finite.len() < QUARTILE_SEGMENTS {
        log::warn!(
            "Only {} finite samples, using their mean as baseline",
            finite.len()
        );
        mean(&finite)
    } else {
        let means = segment_means(&finite, QUARTILE_SEGMENTS);
        mean_of_top(&means, BASELINE_SEGMENTS)
    };
    divide_by_baseline(flux, baseline, &finite)
}

/// Baseline from the median of the finite samples.
pub fn normalize_median(flux: &Array1<f64>) -> Array1<f64> {
    let finite = finite_samples(flux);
    let baseline = finite_median(&finite);
    divide_by_baseline(flux, baseline, &finite)
}

fn finite_samples(flux: &Array1<f64>) -> Vec<f64> {
    flux.iter().copied().filter(|v| v.is_finite()).collect()
}

fn usable(baseline: Option<f64>) -> Option<f64> {
    baseline.filter(|b| b.is_finite() && *b > 0.0)
}

fn divide_by_baseline(flux: &Array1<f64>, baseline: Option<f64>, finite: &[f64]) -> Array1<f64> {
    let baseline = usable(baseline).or_else(|| {
        log::warn!("Baseline {baseline:?} unusable, falling back to median");
        usable(finite_median(finite))
    });

    match baseline {
        Some(b) => {
            log::debug!("Normalizing by baseline {b:.6e}");
            flux / b
        }
        None => {
            log::warn!("No positive baseline available, curve left unnormalized");
            flux.clone()
        }
    }
}
