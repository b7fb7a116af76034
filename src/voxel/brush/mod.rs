//! Brush system deciding which block each voxel of an edit receives.
//!
//! A [`BrushKind`] parses actor arguments into a [`Brush`] descriptor, which
//! can be stored and reused. Each edit gets a fresh [`BrushInstance`] from the
//! descriptor; the instance is prepared once in [`BrushInstance::begin`] and
//! then asked for one block per visited voxel.

pub mod factory;
pub mod solid;
pub mod random;
pub mod replace;
pub mod noise_family;
pub mod pattern;
pub mod restore;

use std::fmt;

use thiserror::Error;

use crate::core::types::IVec3;
use crate::session::Actor;
use crate::voxel::block::Block;
use crate::voxel::edit::DrawInfo;
use crate::voxel::grid::Grid;

// Re-exports
pub use factory::{BlockArg, Brush, BrushKind, MAX_BRUSH_BLOCKS, MAX_RATIO};
pub use solid::SolidBrush;
pub use random::RandomBrush;
pub use replace::ReplaceBrush;
pub use noise_family::NoiseBrush;
pub use pattern::CheckeredBrush;
pub use restore::RestoreInstance;

/// Why a brush could not be configured or could not begin an edit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrushError {
    #[error("unknown brush \"{0}\"")]
    UnknownBrush(String),

    #[error("unknown block \"{0}\"")]
    UnknownBlock(String),

    #[error("ratio for {block} must be between 1 and 1000, got {ratio}")]
    RatioOutOfRange { block: Block, ratio: i64 },

    #[error("could not parse argument \"{0}\"")]
    MalformedArgument(String),

    #[error("at least one block must be specified")]
    NoBlocks,

    #[error("at least one block to replace must be specified")]
    MissingTarget,

    #[error("no block specified and no previously used block to default to")]
    NoDefaultBlock,

    #[error("a secondary block must be specified to use the alternate action")]
    MissingAlternate,

    #[error("too many blocks: at most {max} allowed, got {got}")]
    TooManyBlocks { max: usize, got: usize },
}

/// What a brush sees when asked for one voxel's block
pub struct PaintContext<'a> {
    /// Voxel being resolved
    pub coord: IVec3,
    /// The running operation
    pub info: &'a DrawInfo,
    /// Grid as it is before this voxel is written
    pub grid: &'a dyn Grid,
}

/// A brush bound to one edit.
pub trait BrushInstance: fmt::Debug {
    /// Short brush name for logs and messages
    fn name(&self) -> &'static str;

    /// Human-readable configuration, e.g. `Random(Stone/3, Dirt)`
    fn description(&self) -> String;

    /// Prepare for the operation. An error aborts the whole edit before any mutation.
    fn begin(&mut self, actor: &dyn Actor, info: &DrawInfo) -> Result<(), BrushError>;

    /// Block to place at `ctx.coord`, or None to leave the voxel untouched.
    fn next_block(&mut self, ctx: &PaintContext<'_>) -> Option<Block>;

    /// Release per-edit state
    fn end(&mut self) {}
}
