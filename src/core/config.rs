//! Draw engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::types::Result;

/// Default undo ledger capacity per edit.
pub const DEFAULT_UNDO_CAPACITY: usize = 2_000_000;

/// Default number of mutations a driver should allow per batch.
pub const DEFAULT_BATCH_QUOTA: usize = 2048;

/// Parameters of a seeded multi-octave noise function.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseSettings {
    /// Base frequency (first octave).
    pub frequency: f32,
    /// Number of octaves summed.
    pub octaves: u32,
    /// Amplitude falloff per octave.
    pub persistence: f32,
}

/// Per-brush noise defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseDefaults {
    pub cloudy: NoiseSettings,
    pub marbled: NoiseSettings,
}

impl Default for NoiseDefaults {
    fn default() -> Self {
        Self {
            cloudy: NoiseSettings {
                frequency: 0.08,
                octaves: 3,
                persistence: 0.75,
            },
            marbled: NoiseSettings {
                frequency: 0.1,
                octaves: 3,
                persistence: 0.75,
            },
        }
    }
}

/// Configuration for draw operations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Maximum undo entries kept per edit before the edit becomes non-restorable.
    pub undo_capacity: usize,
    /// Mutations per `run_batch` call the driver should use.
    pub batch_quota: usize,
    /// Largest estimated voxel count an operation may touch. None = unlimited.
    pub max_volume: Option<u64>,
    /// Base seed for per-operation generators. None = fresh entropy per operation.
    pub seed: Option<u64>,
    /// Noise brush defaults.
    pub noise: NoiseDefaults,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            undo_capacity: DEFAULT_UNDO_CAPACITY,
            batch_quota: DEFAULT_BATCH_QUOTA,
            max_volume: None,
            seed: None,
            noise: NoiseDefaults::default(),
        }
    }
}

impl DrawConfig {
    /// Parse configuration from a JSON string. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&data)?;
        log::debug!("Loaded draw config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Write configuration as JSON to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Seed for a new operation: the configured seed, or fresh entropy.
    pub fn operation_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
