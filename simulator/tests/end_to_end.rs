use std::fs;

use occult_sim::{
    read_light_curve, LightCurve, PlotOptions, RingSegment, Scenario, SimulationConfig,
    SimulationError, SyntheticLightCurveSimulator,
};
use tempfile::TempDir;

fn scenario_a(output: &TempDir) -> SimulationConfig {
    SimulationConfig {
        output_dir: output.path().to_path_buf(),
        ..Scenario::Default.config()
    }
}

fn run(config: SimulationConfig) -> LightCurve {
    let mut simulator = SyntheticLightCurveSimulator::new(config).unwrap();
    simulator.simulate().clone()
}

/// Chord position of every sample for a config.
fn chord(config: &SimulationConfig, curve: &LightCurve) -> Vec<f64> {
    config
        .geometry()
        .chord_positions(&curve.time_s)
        .to_vec()
}

#[test]
fn scenario_a_dip_is_centred_and_deep() {
    let output = TempDir::new().unwrap();
    let config = scenario_a(&output);
    let geometry = config.geometry();
    let curve = run(config.clone());

    let total = geometry.total_duration_s();
    assert!((total - 180.0).abs() < 1e-6);
    assert_eq!(curve.len(), (total / 0.1).ceil() as usize);
    assert_eq!(curve.flux.len(), curve.len());
    assert_eq!(curve.flux_norm.len(), curve.len());

    let n = curve.len();
    let min_index = curve.min_index().unwrap();
    assert!(
        (n / 3..=2 * n / 3).contains(&min_index),
        "minimum at {min_index} of {n}"
    );
    assert!(curve.flux_norm[min_index] < 0.5);

    for (x, f) in chord(&config, &curve).iter().zip(curve.flux_norm.iter()) {
        if x.abs() > 700.0 {
            assert!((f - 1.0).abs() < 0.3, "baseline sample {f} at x = {x}");
        }
    }
}

#[test]
fn same_seed_reproduces_curve() {
    let output = TempDir::new().unwrap();
    let a = run(scenario_a(&output));
    let b = run(scenario_a(&output));
    assert_eq!(a.flux, b.flux);
    assert_eq!(a.flux_norm, b.flux_norm);

    let c = run(SimulationConfig {
        random_seed: Some(43),
        ..scenario_a(&output)
    });
    assert_ne!(a.flux, c.flux);
}

#[test]
fn scenario_b_opaque_ring_deepens_dip() {
    let output = TempDir::new().unwrap();
    let with_ring = |opacity: f64| SimulationConfig {
        rings: vec![RingSegment::new(900.0, 60.0, opacity)],
        ..scenario_a(&output)
    };

    let clear_config = with_ring(0.0);
    let clear = run(clear_config.clone());
    let opaque = run(with_ring(1.0));
    let no_ring = run(scenario_a(&output));

    // A fully transparent ring is the same run as no ring at all
    assert_eq!(clear.flux, no_ring.flux);

    let x = chord(&clear_config, &clear);
    let in_ring: Vec<usize> = (0..x.len()).filter(|&i| (x[i] - 900.0).abs() < 25.0).collect();
    assert!(in_ring.len() > 10);

    let mean = |curve: &LightCurve| {
        in_ring.iter().map(|&i| curve.flux_norm[i]).sum::<f64>() / in_ring.len() as f64
    };
    assert!(mean(&opaque) < 0.2, "opaque ring mean {}", mean(&opaque));
    assert!(mean(&clear) > 0.8, "clear ring mean {}", mean(&clear));

    let below_half = |curve: &LightCurve| curve.flux_norm.iter().filter(|&&f| f < 0.5).count();
    assert!(below_half(&opaque) > below_half(&clear) + 10);
}

#[test]
fn scenario_c_export_round_trip() {
    let output = TempDir::new().unwrap();
    let mut simulator = SyntheticLightCurveSimulator::new(scenario_a(&output)).unwrap();
    simulator.simulate();

    let (table, path) = simulator.export_data(true).unwrap();
    let path = path.unwrap();
    assert_eq!(path, output.path().join("synthetic_curve_1.dat"));

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), table.len() + 1);
    assert_eq!(text.lines().next(), Some("time_s flux flux_norm"));

    let loaded = read_light_curve(&path).unwrap();
    assert_eq!(loaded.len(), table.len());
    let columns = [
        (&loaded.time_s, &table.time_s),
        (&loaded.flux, &table.flux),
        (&loaded.flux_norm, &table.flux_norm),
    ];
    for (read, written) in columns {
        for (r, w) in read.iter().zip(written.iter()) {
            assert!((r - w).abs() <= 5.1e-9, "{r} vs {w}");
        }
    }
}

#[test]
fn repeated_exports_never_overwrite() {
    let output = TempDir::new().unwrap();
    let mut simulator = SyntheticLightCurveSimulator::new(scenario_a(&output)).unwrap();

    simulator.simulate();
    let (_, first) = simulator.export_data(true).unwrap();
    let first = first.unwrap();
    let first_contents = fs::read_to_string(&first).unwrap();

    // A second run, and a second simulator on the same directory
    simulator.simulate();
    let (_, second) = simulator.export_data(true).unwrap();

    let mut other = SyntheticLightCurveSimulator::new(scenario_a(&output)).unwrap();
    other.simulate();
    let (_, third) = other.export_data(true).unwrap();

    assert_eq!(second.unwrap(), output.path().join("synthetic_curve_2.dat"));
    assert_eq!(third.unwrap(), output.path().join("synthetic_curve_3.dat"));
    assert_eq!(fs::read_to_string(&first).unwrap(), first_contents);
}

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

#[test]
fn saved_plots_are_numbered_pngs_under_curves() {
    let output = TempDir::new().unwrap();
    let mut simulator = SyntheticLightCurveSimulator::new(scenario_a(&output)).unwrap();
    simulator.simulate();

    let first = simulator.plot_curve(&PlotOptions::save()).unwrap().unwrap();
    let second = simulator.plot_curve(&PlotOptions::save()).unwrap().unwrap();

    let curves = output.path().join("curves");
    assert_eq!(first, curves.join("synthetic_curve_1.png"));
    assert_eq!(second, curves.join("synthetic_curve_2.png"));
    for path in [&first, &second] {
        let bytes = fs::read(path).unwrap();
        assert!(bytes.starts_with(&PNG_SIGNATURE), "{} is not a PNG", path.display());
    }

    // Plots do not consume data file indices
    let (_, data) = simulator.export_data(true).unwrap();
    assert_eq!(data.unwrap(), output.path().join("synthetic_curve_1.dat"));
    let data_files: Vec<_> = fs::read_dir(output.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(data_files.len(), 2, "{data_files:?}");
}

#[test]
fn outputs_before_simulate_are_rejected() {
    let output = TempDir::new().unwrap();
    let simulator = SyntheticLightCurveSimulator::new(scenario_a(&output)).unwrap();

    let err = simulator.export_data(true).unwrap_err();
    assert!(matches!(err, SimulationError::NotSimulated { .. }));
    assert!(err.to_string().contains("simulate()"));
    // Nothing was written
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
}

#[test]
fn invalid_configs_are_rejected_at_construction() {
    for config in [
        SimulationConfig {
            distance_km: -1.0,
            ..SimulationConfig::default()
        },
        SimulationConfig {
            exposure_time_s: 0.0,
            ..SimulationConfig::default()
        },
        SimulationConfig {
            rings: vec![RingSegment::new(100.0, 5.0, -0.1)],
            ..SimulationConfig::default()
        },
        SimulationConfig {
            duration_s: Some(1e13),
            exposure_time_s: 1e-3,
            ..Scenario::Default.config()
        },
    ] {
        assert!(matches!(
            SyntheticLightCurveSimulator::new(config),
            Err(SimulationError::InvalidConfig { .. })
        ));
    }
}

#[test]
fn presets_survive_json_round_trip() {
    let output = TempDir::new().unwrap();
    for scenario in Scenario::ALL {
        let path = output.path().join(format!("{scenario}.json"));
        let config = scenario.config();
        config.save_to_file(&path).unwrap();
        assert_eq!(SimulationConfig::load_from_file(&path).unwrap(), config);
    }
}

#[test]
fn chariklo_rings_appear_in_noiseless_curve() {
    let output = TempDir::new().unwrap();
    let config = SimulationConfig {
        output_dir: output.path().to_path_buf(),
        detector: occult_sim::DetectorConfig::noiseless(),
        ..Scenario::Chariklo.config()
    };
    let curve = run(config.clone());
    let x = chord(&config, &curve);

    // C1R blocks about a third of the light across its 7 km width
    let ring_min = (0..x.len())
        .filter(|&i| (x[i] - 391.0).abs() < 2.0)
        .map(|i| curve.flux_norm[i])
        .fold(f64::INFINITY, f64::min);
    assert!(ring_min < 0.85, "ring minimum {ring_min}");

    let between = (0..x.len())
        .filter(|&i| (x[i] - 200.0).abs() < 20.0)
        .map(|i| curve.flux_norm[i])
        .fold(f64::INFINITY, f64::min);
    assert!(between > 0.9, "clear gap minimum {between}");
}
