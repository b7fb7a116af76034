//! Draw operation engine.
//!
//! An edit is a [`DrawOperation`] driven through `prepare → run_batch* →
//! finish`. Each batch resumes a [`Traversal`] cursor and resolves voxels
//! through the per-voxel protocol until its mutation quota is spent, so an
//! edit of any size never stalls the caller's tick loop. Every overwritten
//! voxel is recorded in a bounded [`UndoLedger`].

pub mod ledger;
pub mod shape;
pub mod operation;

use thiserror::Error;

use crate::math::BoundingBox;
use crate::voxel::brush::BrushError;

pub use ledger::{UndoEntry, UndoLedger, UndoRecord};
pub use shape::{DrawKind, Shape, Traversal};
pub use operation::{CancelToken, DrawContext, DrawOperation, DrawState, DrawStats, DrawSummary};

/// Whole-operation precondition failures. Nothing has been mutated when
/// one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("expected {expected} marks, got {got}")]
    WrongMarkCount { expected: usize, got: usize },

    #[error("the marked region lies entirely outside the world")]
    OutsideWorld,

    #[error("edit would touch about {estimate} blocks, the limit is {limit}")]
    TooLarge { estimate: u64, limit: u64 },

    #[error("the last edit was too large to be undone")]
    NotRestorable,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error(transparent)]
    Brush(#[from] BrushError),

    #[error("invalid operation state: {0}")]
    InvalidState(&'static str),
}

/// What a brush knows about the operation it paints for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawInfo {
    /// Operation kind name
    pub name: &'static str,
    /// Region being traversed, already clipped to the grid
    pub bounds: BoundingBox,
    /// Seed for every generator the edit owns
    pub seed: u64,
    /// Secondary action requested (e.g. right click)
    pub use_alternate: bool,
}

impl DrawInfo {
    pub fn new(name: &'static str, bounds: BoundingBox, seed: u64) -> Self {
        Self {
            name,
            bounds,
            seed,
            use_alternate: false,
        }
    }

    pub fn with_alternate(mut self, use_alternate: bool) -> Self {
        self.use_alternate = use_alternate;
        self
    }
}
