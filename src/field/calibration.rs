//! Normalization and ratio thresholds over a sampled noise field

use serde::{Deserialize, Serialize};

/// Linear map `v * multiplier + offset` taking a sampled range onto [0, 1]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normalization {
    pub multiplier: f32,
    pub offset: f32,
}

impl Normalization {
    pub const IDENTITY: Normalization = Normalization { multiplier: 1.0, offset: 0.0 };

    /// Fit the min/max of `values` onto [0, 1]. A flat field maps to 0.
    pub fn fit(values: &[f32]) -> Self {
        let (min, max) = values.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(lo, hi), v| (lo.min(*v), hi.max(*v)),
        );
        if !(max > min) {
            return Normalization { multiplier: 0.0, offset: 0.0 };
        }
        let multiplier = 1.0 / (max - min);
        Normalization { multiplier, offset: -min * multiplier }
    }

    pub fn apply(&self, value: f32) -> f32 {
        value * self.multiplier + self.offset
    }

    /// Normalize every value in place
    pub fn apply_all(&self, values: &mut [f32]) {
        for v in values {
            *v = self.apply(*v);
        }
    }
}

/// Pointwise reshaping applied after the first normalization
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transform {
    #[default]
    Identity,
    /// `|2v - 1|`: folds the field around its midpoint into bands
    Fold,
}

impl Transform {
    pub fn apply(self, value: f32) -> f32 {
        match self {
            Transform::Identity => value,
            Transform::Fold => (2.0 * value - 1.0).abs(),
        }
    }
}

/// Calibrated mapping from raw noise to a block index.
///
/// `thresholds[i]` is the value below which the sampled fraction of voxels
/// equals the cumulative ratio share of blocks `0..i`. `thresholds[0]` is 0.
#[derive(Clone, Debug, PartialEq)]
pub struct Calibration {
    first: Normalization,
    transform: Transform,
    second: Normalization,
    thresholds: Vec<f32>,
}

impl Calibration {
    /// Calibrate against raw `samples` of a region for blocks with
    /// the given `ratios`. Consumes the samples; they are partially sorted.
    pub fn calibrate(mut samples: Vec<f32>, ratios: &[u32], transform: Transform) -> Self {
        let first = Normalization::fit(&samples);
        first.apply_all(&mut samples);

        let second = if transform == Transform::Identity {
            Normalization::IDENTITY
        } else {
            for v in samples.iter_mut() {
                *v = transform.apply(*v);
            }
            let second = Normalization::fit(&samples);
            second.apply_all(&mut samples);
            second
        };

        let thresholds = quantile_thresholds(&mut samples, ratios);
        Self { first, transform, second, thresholds }
    }

    /// Map a raw sample into the calibrated comparison range
    pub fn normalize(&self, raw: f32) -> f32 {
        self.second.apply(self.transform.apply(self.first.apply(raw)))
    }

    /// Block index for a raw sample
    pub fn pick(&self, raw: f32) -> usize {
        let value = self.normalize(raw);
        self.thresholds
            .iter()
            .skip(1)
            .position(|t| *t > value)
            .unwrap_or(self.thresholds.len().saturating_sub(1))
    }

    pub fn thresholds(&self) -> &[f32] {
        &self.thresholds
    }
}

/// Order-statistic thresholds: `t[i]` is the sample of rank
/// `floor(share_i * n)` where `share_i` is the cumulative ratio of blocks before `i`.
fn quantile_thresholds(values: &mut [f32], ratios: &[u32]) -> Vec<f32> {
    let mut thresholds = vec![0.0; ratios.len()];
    let n = values.len();
    let total: u64 = ratios.iter().map(|r| *r as u64).sum();
    if n == 0 || total == 0 {
        return thresholds;
    }

    let mut cumulative = 0u64;
    let mut lower = 0usize;
    for i in 1..ratios.len() {
        cumulative += ratios[i - 1] as u64;
        let rank = ((cumulative as f64 / total as f64) * n as f64).floor() as usize;
        let rank = rank.clamp(lower, n - 1);

        // Everything left of `lower` already ranks below it
        let (_, nth, _) = values[lower..].select_nth_unstable_by(rank - lower, f32::total_cmp);
        thresholds[i] = *nth;
        lower = rank;
    }
    thresholds
}
