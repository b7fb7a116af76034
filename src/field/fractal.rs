//! Multi-octave gradient noise sampled on the voxel lattice

use glam::I64Vec3;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::core::config::NoiseSettings;
use crate::core::types::IVec3;
use crate::math::BoundingBox;

/// Upper bound on octaves; more add nothing visible at voxel resolution
pub const MAX_OCTAVES: u32 = 16;

/// Frequency multiplier between successive octaves
pub const LACUNARITY: f64 = 2.0;

/// Most samples a calibration pass takes; larger regions are thinned
pub const MAX_CALIBRATION_SAMPLES: u64 = 1 << 21;

/// Seeded fractal Brownian motion over Perlin noise.
///
/// Octave `k` samples at `frequency * 2^k` with amplitude `persistence^k`.
#[derive(Clone, Debug)]
pub struct NoiseField {
    seed: u32,
    settings: NoiseSettings,
    noise: Fbm<Perlin>,
}

impl NoiseField {
    pub fn new(seed: u32, settings: NoiseSettings) -> Self {
        let octaves = settings.octaves.clamp(1, MAX_OCTAVES);
        let noise = Fbm::<Perlin>::new(seed)
            .set_octaves(octaves as usize)
            .set_frequency(settings.frequency as f64)
            .set_persistence(settings.persistence as f64)
            .set_lacunarity(LACUNARITY);

        Self { seed, settings, noise }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn settings(&self) -> &NoiseSettings {
        &self.settings
    }

    /// Raw noise at a lattice point
    pub fn sample(&self, p: IVec3) -> f32 {
        self.noise.get([p.x as f64, p.y as f64, p.z as f64]) as f32
    }

    fn sample_offset(&self, p: I64Vec3) -> f32 {
        self.noise.get([p.x as f64, p.y as f64, p.z as f64]) as f32
    }

    /// Raw noise for every voxel of `region`, addressed relative to its min
    /// vertex, in the region's raster order.
    pub fn sample_region(&self, region: &BoundingBox) -> Vec<f32> {
        let mut values = Vec::with_capacity(region.volume() as usize);
        for p in region.iter() {
            values.push(self.sample(region.relative(p)));
        }
        values
    }

    /// Raw noise over `region` for calibration. Regions holding more than
    /// `max_samples` voxels are sampled on an evenly strided sub-lattice
    /// anchored at the min vertex, so the buffer never exceeds `max_samples`.
    pub fn sample_calibration(&self, region: &BoundingBox, max_samples: u64) -> Vec<f32> {
        let extent = region.extent();
        let stride = lattice_stride(extent, max_samples.max(1));
        if stride == 1 {
            return self.sample_region(region);
        }
        log::debug!("calibrating {} voxels on a stride {} lattice", region.volume(), stride);

        let counts = (extent + I64Vec3::splat(stride - 1)) / stride;
        let mut values = Vec::with_capacity((counts.x * counts.y * counts.z) as usize);
        for z in 0..counts.z {
            for y in 0..counts.y {
                for x in 0..counts.x {
                    values.push(self.sample_offset(I64Vec3::new(x, y, z) * stride));
                }
            }
        }
        values
    }
}

/// Smallest per-axis step keeping the strided sample count within `max_samples`
fn lattice_stride(extent: I64Vec3, max_samples: u64) -> i64 {
    let count = |stride: i64| {
        let c = (extent + I64Vec3::splat(stride - 1)) / stride;
        c.x as u128 * c.y as u128 * c.z as u128
    };
    let mut stride = 1;
    while count(stride) > max_samples as u128 {
        stride *= 2;
    }
    stride
}
