//! Noise-driven brushes (Marbled, Cloudy)
//!
//! Both variants share the same calibration: the operation's region is
//! sampled once at `begin` (thinned to a strided lattice when large) to fit
//! normalization constants and per-block thresholds, then every voxel
//! recomputes its own noise value at paint time.
//! Only the pointwise [`Transform`] differs between variants.

use serde::{Deserialize, Serialize};

use crate::core::config::NoiseSettings;
use crate::field::fractal::MAX_CALIBRATION_SAMPLES;
use crate::field::{Calibration, NoiseField, Transform};
use crate::session::Actor;
use crate::voxel::block::Block;
use crate::voxel::edit::DrawInfo;
use super::factory::{BlockArg, ParsedArgs};
use super::{BrushError, BrushInstance, PaintContext};

/// Configuration shared by the noise brushes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseBrush {
    pub blocks: Vec<BlockArg>,
    pub transform: Transform,
    pub settings: NoiseSettings,
    /// None = derived from the operation seed
    pub seed: Option<u32>,
}

impl NoiseBrush {
    /// Banded pattern: the field is folded around its midpoint
    pub(crate) fn marbled(args: &ParsedArgs, defaults: NoiseSettings) -> Result<Self, BrushError> {
        Self::from_args(args, Transform::Fold, defaults)
    }

    /// Soft blobs: the field is used as-is
    pub(crate) fn cloudy(args: &ParsedArgs, defaults: NoiseSettings) -> Result<Self, BrushError> {
        Self::from_args(args, Transform::Identity, defaults)
    }

    /// A single block is paired with Air at equal weight.
    pub fn new(mut blocks: Vec<BlockArg>, transform: Transform, settings: NoiseSettings) -> Result<Self, BrushError> {
        match blocks.len() {
            0 => return Err(BrushError::NoBlocks),
            1 => blocks.push(BlockArg::new(Block::Air)),
            _ => {}
        }
        Ok(Self { blocks, transform, settings, seed: None })
    }

    fn from_args(args: &ParsedArgs, transform: Transform, defaults: NoiseSettings) -> Result<Self, BrushError> {
        let mut brush = Self::new(args.blocks.clone(), transform, defaults)?;
        for (key, value) in &args.options {
            let malformed = || BrushError::MalformedArgument(format!("{key}={value}"));
            match key.as_str() {
                "seed" => brush.seed = Some(value.parse().map_err(|_| malformed())?),
                "frequency" | "freq" => {
                    let frequency: f32 = value.parse().map_err(|_| malformed())?;
                    if !(frequency > 0.0 && frequency.is_finite()) {
                        return Err(malformed());
                    }
                    brush.settings.frequency = frequency;
                }
                "octaves" => {
                    let octaves: u32 = value.parse().map_err(|_| malformed())?;
                    if !(1..=crate::field::fractal::MAX_OCTAVES).contains(&octaves) {
                        return Err(malformed());
                    }
                    brush.settings.octaves = octaves;
                }
                "persistence" => {
                    let persistence: f32 = value.parse().map_err(|_| malformed())?;
                    if !(persistence > 0.0 && persistence.is_finite()) {
                        return Err(malformed());
                    }
                    brush.settings.persistence = persistence;
                }
                _ => return Err(malformed()),
            }
        }
        Ok(brush)
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn instance(&self) -> NoiseInstance {
        NoiseInstance {
            brush: self.clone(),
            field: None,
            calibration: None,
        }
    }

    fn name(&self) -> &'static str {
        match self.transform {
            Transform::Fold => "Marbled",
            Transform::Identity => "Cloudy",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NoiseInstance {
    brush: NoiseBrush,
    field: Option<NoiseField>,
    calibration: Option<Calibration>,
}

impl NoiseInstance {
    /// Thresholds fitted at `begin`
    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }
}

impl BrushInstance for NoiseInstance {
    fn name(&self) -> &'static str {
        self.brush.name()
    }

    fn description(&self) -> String {
        let blocks: Vec<String> = self.brush.blocks.iter().map(|b| b.to_string()).collect();
        format!("{}({})", self.name(), blocks.join(", "))
    }

    fn begin(&mut self, _actor: &dyn Actor, info: &DrawInfo) -> Result<(), BrushError> {
        if self.brush.blocks.is_empty() {
            return Err(BrushError::NoBlocks);
        }
        let seed = self
            .brush
            .seed
            .unwrap_or((info.seed ^ (info.seed >> 32)) as u32);
        let field = NoiseField::new(seed, self.brush.settings);

        let samples = field.sample_calibration(&info.bounds, MAX_CALIBRATION_SAMPLES);
        let sampled = samples.len();
        let ratios: Vec<u32> = self.brush.blocks.iter().map(|b| b.weight()).collect();
        let calibration = Calibration::calibrate(samples, &ratios, self.brush.transform);
        log::debug!(
            "{} brush calibrated from {} samples over {} voxels, thresholds {:?}",
            self.name(),
            sampled,
            info.bounds.volume(),
            calibration.thresholds()
        );

        self.field = Some(field);
        self.calibration = Some(calibration);
        Ok(())
    }

    fn next_block(&mut self, ctx: &PaintContext<'_>) -> Option<Block> {
        let (field, calibration) = (self.field.as_ref()?, self.calibration.as_ref()?);
        let raw = field.sample(ctx.info.bounds.relative(ctx.coord));
        Some(self.brush.blocks[calibration.pick(raw)].block)
    }

    fn end(&mut self) {
        self.field = None;
        self.calibration = None;
    }
}
