//! Seeded coherent noise fields and ratio calibration over sampled regions.
//!
//! A [`NoiseField`] yields a deterministic scalar per voxel from its seed and
//! [`NoiseSettings`](crate::core::NoiseSettings) alone, so a value sampled in
//! bulk can be recomputed later at the same coordinate. [`Calibration`] turns
//! one bulk sample into normalization constants plus per-block thresholds.

pub mod fractal;
pub mod calibration;

pub use fractal::NoiseField;
pub use calibration::{Calibration, Normalization, Transform};
