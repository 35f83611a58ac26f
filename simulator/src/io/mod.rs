//! Light-curve data export and import

pub mod dat;

pub use dat::{read_light_curve, save_light_curve, write_light_curve};
