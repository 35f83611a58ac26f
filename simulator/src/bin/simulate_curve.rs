//! Simulate a stellar-occultation light curve and write its artifacts
//!
//! Starts from a named preset, optionally replaces it with a JSON config
//! file, then applies individual command-line overrides. Writes a numbered
//! `.dat` table and PNG plot unless told otherwise.
//!
//! Usage:
//! ```
//! cargo run --bin simulate_curve -- --preset chariklo --show
//! RUST_LOG=debug cargo run --bin simulate_curve -- --ring -800,40,0.6 --ring 800,40,0.6
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use occult_sim::scenarios::Scenario;
use occult_sim::shared_args::SharedSimulationArgs;
use occult_sim::sims::{PlotOptions, SimulationConfig, SyntheticLightCurveSimulator};

#[derive(Parser, Debug)]
#[command(
    name = "simulate_curve",
    about = "Synthetic stellar-occultation light curves with Fresnel diffraction and noise",
    long_about = None
)]
struct Args {
    /// Starting parameter set
    #[arg(long, value_enum, default_value_t = Scenario::Default)]
    preset: Scenario,

    /// JSON configuration file; replaces the preset
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    shared: SharedSimulationArgs,

    /// Skip writing the PNG plot
    #[arg(long, default_value_t = false)]
    no_plot: bool,

    /// Skip writing the data table
    #[arg(long, default_value_t = false)]
    no_export: bool,

    /// Print a text preview of the curve
    #[arg(long, default_value_t = false)]
    show: bool,

    /// Plot title
    #[arg(long)]
    title: Option<String>,

    /// Write the effective configuration as JSON to this path
    #[arg(long)]
    dump_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => args.preset.config(),
    };
    args.shared.apply_to(&mut config);

    if let Some(path) = &args.dump_config {
        config
            .save_to_file(path)
            .with_context(|| format!("writing config {}", path.display()))?;
    }

    let mut simulator =
        SyntheticLightCurveSimulator::new(config).context("invalid simulation parameters")?;
    let seed = simulator.seed();
    let curve = simulator.simulate();
    let (min, max) = curve
        .flux_norm
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    log::info!(
        "{} samples (seed {seed}), normalized flux min {min:.4} max {max:.4}",
        curve.len()
    );

    // Data first so a plotting failure cannot lose it
    let (_, data_path) = simulator
        .export_data(!args.no_export)
        .context("exporting light curve")?;
    if let Some(path) = data_path {
        println!("Data saved to: {}", path.display());
    }

    let title = args
        .title
        .clone()
        .or_else(|| match args.config {
            Some(_) => None,
            None => args.preset.title().map(str::to_string),
        });
    let plot_options = PlotOptions {
        save: !args.no_plot,
        show: args.show,
        title,
    };
    if let Some(path) = simulator
        .plot_curve(&plot_options)
        .context("plotting light curve")?
    {
        println!("Plot saved to: {}", path.display());
    }

    Ok(())
}
