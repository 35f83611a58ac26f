//! ASCII rendering of y(x) curves.
//!
//! Samples are binned into character columns along x; each column shows the
//! mean y of its samples as a marker in one of `height` rows. Rows cover
//! either a configured y range or the finite data range. Non-finite samples
//! are skipped.
//!
//! ```rust
//! use occult_viz::curve::{render_curve, CurvePlotConfig};
//!
//! let time: Vec<f64> = (0..100).map(f64::from).collect();
//! let flux: Vec<f64> = time
//!     .iter()
//!     .map(|t| if (40.0..60.0).contains(t) { 0.0 } else { 1.0 })
//!     .collect();
//!
//! let config = CurvePlotConfig {
//!     title: Some("Occultation"),
//!     width: 50,
//!     height: 10,
//!     ..Default::default()
//! };
//! let text = render_curve(&time, &flux, &config).unwrap();
//! assert!(text.contains("Occultation"));
//! ```

use crate::{Result, VizError};
use std::fmt::Write;

/// Configuration for ASCII curve rendering.
#[derive(Debug, Clone)]
pub struct CurvePlotConfig<'a> {
    /// Optional title, underlined with `=`.
    pub title: Option<&'a str>,
    /// Label printed under the plot for the horizontal axis.
    pub x_label: Option<&'a str>,
    /// Label printed above the plot for the vertical axis.
    pub y_label: Option<&'a str>,
    /// Marker character for occupied cells.
    pub marker: char,
    /// Plot width in character columns.
    pub width: usize,
    /// Plot height in character rows.
    pub height: usize,
    /// Fixed vertical range; `None` uses the finite data range.
    pub y_range: Option<(f64, f64)>,
}

impl Default for CurvePlotConfig<'_> {
    fn default() -> Self {
        Self {
            title: None,
            x_label: None,
            y_label: None,
            marker: '*',
            width: 80,
            height: 20,
            y_range: None,
        }
    }
}

/// Render `y` against `x` as an ASCII plot.
///
/// # Errors
/// * `InvalidData` when the slices differ in length or hold no finite pair
/// * `InvalidConfig` for a zero-sized plot or an empty/inverted `y_range`
pub fn render_curve(x: &[f64], y: &[f64], config: &CurvePlotConfig) -> Result<String> {
    if x.len() != y.len() {
        return Err(VizError::InvalidData(format!(
            "x and y lengths differ ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    if config.width == 0 || config.height == 0 {
        return Err(VizError::InvalidConfig(
            "plot width and height must be non-zero".to_string(),
        ));
    }

    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .collect();
    if pairs.is_empty() {
        return Err(VizError::InvalidData(
            "no finite samples to render".to_string(),
        ));
    }

    let (x_min, x_max) = bounds(pairs.iter().map(|p| p.0));
    let (y_min, y_max) = match config.y_range {
        Some((lo, hi)) if lo < hi => (lo, hi),
        Some((lo, hi)) => {
            return Err(VizError::InvalidConfig(format!(
                "y range [{lo}, {hi}] is empty"
            )))
        }
        None => bounds(pairs.iter().map(|p| p.1)),
    };

    // Column means
    let mut sums = vec![0.0; config.width];
    let mut counts = vec![0usize; config.width];
    for &(px, py) in &pairs {
        let col = scale_to_cell(px, x_min, x_max, config.width);
        sums[col] += py;
        counts[col] += 1;
    }

    let mut grid = vec![vec![' '; config.width]; config.height];
    for col in 0..config.width {
        if counts[col] == 0 {
            continue;
        }
        let value = sums[col] / counts[col] as f64;
        let row_from_bottom = scale_to_cell(value, y_min, y_max, config.height);
        grid[config.height - 1 - row_from_bottom][col] = config.marker;
    }

    let mut output = String::new();
    if let Some(title) = config.title {
        writeln!(output, "{title}")?;
        writeln!(output, "{}", "=".repeat(title.chars().count()))?;
    }
    if let Some(y_label) = config.y_label {
        writeln!(output, "{y_label}")?;
    }

    let top_label = format!("{y_max:.3}");
    let bottom_label = format!("{y_min:.3}");
    let gutter = top_label.len().max(bottom_label.len());

    writeln!(output, "{} +{}+", " ".repeat(gutter), "-".repeat(config.width))?;
    for (i, row) in grid.iter().enumerate() {
        let label = if i == 0 {
            top_label.as_str()
        } else if i == config.height - 1 {
            bottom_label.as_str()
        } else {
            ""
        };
        let line: String = row.iter().collect();
        writeln!(output, "{label:>gutter$} |{line}|")?;
    }
    writeln!(output, "{} +{}+", " ".repeat(gutter), "-".repeat(config.width))?;
    writeln!(
        output,
        "{} {x_min:<half$.3}{x_max:>rest$.3}",
        " ".repeat(gutter),
        half = config.width / 2 + 1,
        rest = config.width - config.width / 2 + 1,
    )?;
    if let Some(x_label) = config.x_label {
        writeln!(output, "{} {x_label}", " ".repeat(gutter))?;
    }

    Ok(output)
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if hi > lo {
        (lo, hi)
    } else {
        // Flat data still needs a non-degenerate axis
        (lo - 0.5, hi + 0.5)
    }
}

fn scale_to_cell(value: f64, lo: f64, hi: f64, cells: usize) -> usize {
    let fraction = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    ((fraction * cells as f64) as usize).min(cells - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dip_curve(n: usize) -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let y = x
            .iter()
            .map(|&t| {
                if t > n as f64 * 0.4 && t < n as f64 * 0.6 {
                    0.0
                } else {
                    1.0
                }
            })
            .collect();
        (x, y)
    }

    #[test]
    fn test_dip_is_drawn_in_bottom_row() {
        let (x, y) = dip_curve(200);
        let config = CurvePlotConfig {
            width: 20,
            height: 5,
            ..Default::default()
        };
        let text = render_curve(&x, &y, &config).unwrap();
        let rows: Vec<&str> = text.lines().filter(|l| l.contains('|')).collect();
        assert_eq!(rows.len(), 5);
        // Baseline on top, dip on the bottom, centered
        assert!(rows[0].starts_with("1.000"));
        assert!(rows[4].starts_with("0.000"));
        assert!(rows[4].contains('*'));
        let bottom = rows[4].split('|').nth(1).unwrap();
        let first_star = bottom.find('*').unwrap();
        assert!((6..=12).contains(&first_star), "dip starts at column {first_star}");
    }

    #[test]
    fn test_labels_and_title() {
        let (x, y) = dip_curve(50);
        let config = CurvePlotConfig {
            title: Some("Light curve"),
            x_label: Some("Time [s]"),
            y_label: Some("Normalized flux"),
            width: 30,
            height: 6,
            ..Default::default()
        };
        let text = render_curve(&x, &y, &config).unwrap();
        assert!(text.starts_with("Light curve\n===========\n"));
        assert!(text.contains("Time [s]"));
        assert!(text.contains("Normalized flux"));
    }

    #[test]
    fn test_non_finite_samples_are_skipped() {
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let y = vec![1.0, f64::NAN, f64::INFINITY, 0.5];
        let text = render_curve(&x, &y, &CurvePlotConfig::default()).unwrap();
        assert_eq!(text.matches('*').count(), 2);
    }

    #[test]
    fn test_flat_curve_renders() {
        let x = vec![0.0, 1.0, 2.0];
        let y = vec![1.0, 1.0, 1.0];
        let text = render_curve(&x, &y, &CurvePlotConfig::default()).unwrap();
        assert!(text.contains('*'));
    }

    #[test]
    fn test_errors() {
        let config = CurvePlotConfig::default();
        assert!(matches!(
            render_curve(&[0.0, 1.0], &[1.0], &config),
            Err(VizError::InvalidData(_))
        ));
        assert!(matches!(
            render_curve(&[f64::NAN], &[1.0], &config),
            Err(VizError::InvalidData(_))
        ));
        let zero = CurvePlotConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            render_curve(&[0.0], &[1.0], &zero),
            Err(VizError::InvalidConfig(_))
        ));
        let inverted = CurvePlotConfig {
            y_range: Some((1.0, 0.0)),
            ..Default::default()
        };
        assert!(matches!(
            render_curve(&[0.0], &[1.0], &inverted),
            Err(VizError::InvalidConfig(_))
        ));
    }
}
