//! Named occultation scenarios.
//!
//! Parameters are order-of-magnitude values for illustration, not fitted
//! event solutions.

use std::fmt;

use crate::geometry::RingSegment;
use crate::sims::config::SimulationConfig;

/// Chariklo's C1R ring: radius, width (km) and normal optical depth.
const CHARIKLO_C1R: (f64, f64, f64) = (391.0, 7.0, 0.4);

/// Chariklo's C2R ring: radius, width (km) and normal optical depth.
const CHARIKLO_C2R: (f64, f64, f64) = (405.0, 3.0, 0.06);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Scenario {
    /// Nearby 1200 km body, no rings
    #[default]
    Default,
    /// Uranian moon Umbriel at ~2.9e9 km
    Umbriel,
    /// Centaur Chariklo with its two rings in the R band
    Chariklo,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Default, Scenario::Umbriel, Scenario::Chariklo];

    pub fn config(self) -> SimulationConfig {
        match self {
            Scenario::Default => SimulationConfig {
                mag_star: 12.5,
                distance_km: 4_000.0,
                diameter_km: 1_200.0,
                velocity_kms: 20.0,
                exposure_time_s: 0.1,
                wavelength_nm: 550.0,
                seeing_arcsec: 1.0,
                random_seed: Some(42),
                ..SimulationConfig::default()
            },
            Scenario::Umbriel => SimulationConfig {
                mag_star: 12.5,
                distance_km: 2.9e9,
                diameter_km: 1_169.0,
                velocity_kms: 20.0,
                exposure_time_s: 0.1,
                wavelength_nm: 550.0,
                seeing_arcsec: 1.0,
                random_seed: Some(123),
                file_prefix: "umbriel".to_string(),
                ..SimulationConfig::default()
            },
            Scenario::Chariklo => SimulationConfig {
                mag_star: 13.0,
                distance_km: 2.1e9,
                diameter_km: 250.0,
                velocity_kms: 25.0,
                exposure_time_s: 0.1,
                duration_s: Some(1_000.0),
                wavelength_nm: 650.0,
                seeing_arcsec: 1.2,
                rings: chariklo_rings(),
                random_seed: Some(321),
                file_prefix: "chariklo".to_string(),
                ..SimulationConfig::default()
            },
        }
    }

    /// Plot title for the scenario.
    pub fn title(self) -> Option<&'static str> {
        match self {
            Scenario::Default => None,
            Scenario::Umbriel => Some("Umbriel, V ~ 550 nm"),
            Scenario::Chariklo => Some("Chariklo with rings, R ~ 650 nm"),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scenario::Default => "default",
            Scenario::Umbriel => "umbriel",
            Scenario::Chariklo => "chariklo",
        };
        f.write_str(name)
    }
}

/// Both Chariklo rings on an idealized equatorial chord.
fn chariklo_rings() -> Vec<RingSegment> {
    [CHARIKLO_C1R, CHARIKLO_C2R]
        .into_iter()
        .flat_map(|(radius, width, tau)| {
            let ring = RingSegment::from_optical_depth(radius, width, tau);
            RingSegment::symmetric_pair(radius, width, ring.opacity)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_all_presets_validate() {
        for scenario in Scenario::ALL {
            assert!(scenario.config().validate().is_ok(), "{scenario}");
        }
    }

    #[test]
    fn test_chariklo_rings() {
        let rings = Scenario::Chariklo.config().rings;
        assert_eq!(rings.len(), 4);
        assert_eq!(rings[0].offset_km, -391.0);
        assert_eq!(rings[1].offset_km, 391.0);
        assert_relative_eq!(rings[0].opacity, 1.0 - (-0.4f64).exp());
        assert_relative_eq!(rings[3].opacity, 1.0 - (-0.06f64).exp());
        // Rings lie well inside the 1000 s window at 25 km/s
        assert!(rings.iter().all(|r| r.offset_km.abs() < 0.5 * 1_000.0 * 25.0));
    }
}
