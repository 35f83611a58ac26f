//! Shared numerical components for the occultation light-curve simulator.
//!
//! This crate holds the pieces that do not depend on any particular
//! observing setup: robust statistics, Fresnel-integral backends and the
//! on-disk numbering scheme for output artifacts.

pub mod algo;
pub mod output_index;
