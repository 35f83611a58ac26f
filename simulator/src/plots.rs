//! PNG plots of simulated light curves.

use std::path::{Path, PathBuf};

use occult_shared::output_index::write_next_file;
use plotters::prelude::*;

use crate::error::{SimResult, SimulationError};
use crate::sims::light_curve::LightCurve;

/// 10 x 4.2 inches at 180 dpi.
pub const PLOT_SIZE: (u32, u32) = (1800, 756);

/// File extension for plots.
pub const PNG_EXTENSION: &str = "png";

/// Axis labels shared by the PNG plot and the terminal preview.
pub const X_LABEL: &str = "Time [s]";
pub const Y_LABEL: &str = "Normalized flux";

/// Default title naming the observing band.
pub fn default_title(wavelength_nm: f64) -> String {
    format!(
        "Synthetic occultation with diffraction and seeing, {} nm",
        wavelength_nm.round() as i64
    )
}

/// Draw normalized flux against time into `path`, replacing its contents.
pub fn render_light_curve_png(path: &Path, curve: &LightCurve, title: &str) -> SimResult<()> {
    draw(path, curve, title).map_err(|e| SimulationError::Plot(e.to_string()))
}

/// Render into the next free `<prefix>_<N>.png` in `dir`.
pub fn save_light_curve_plot(
    dir: &Path,
    prefix: &str,
    curve: &LightCurve,
    title: &str,
) -> SimResult<PathBuf> {
    // Reserve the name first so a concurrent writer cannot claim it
    let path = write_next_file(dir, prefix, PNG_EXTENSION, |path, file| {
        drop(file);
        render_light_curve_png(path, curve, title)
    })?;
    log::info!("Saved light-curve plot to {}", path.display());
    Ok(path)
}

fn draw(path: &Path, curve: &LightCurve, title: &str) -> Result<(), Box<dyn std::error::Error>> {
    let points: Vec<(f64, f64)> = curve
        .time_s
        .iter()
        .zip(curve.flux_norm.iter())
        .filter(|(t, f)| t.is_finite() && f.is_finite())
        .map(|(&t, &f)| (t, f))
        .collect();
    if points.is_empty() {
        return Err("no finite samples to plot".into());
    }

    let (x_min, x_max) = padded_range(points.iter().map(|p| p.0), 0.0);
    let (y_min, y_max) = padded_range(points.iter().map(|p| p.1), 0.05);

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .x_label_formatter(&|x| format!("{x:.0}"))
        .y_label_formatter(&|y| format!("{y:.2}"))
        .axis_desc_style(("sans-serif", 20))
        .draw()?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), BLACK.stroke_width(1)))?
        .label(Y_LABEL)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));
    chart.draw_series(
        points
            .iter()
            .map(|&point| Circle::new(point, 2, BLACK.filled())),
    )?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Finite data range widened by `fraction` of its span on both sides.
fn padded_range(values: impl Iterator<Item = f64>, fraction: f64) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let span = hi - lo;
    if span > 0.0 {
        (lo - fraction * span, hi + fraction * span)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}
