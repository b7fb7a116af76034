//! Voxel data structures and edits

pub mod block;
pub mod grid;
pub mod brush;
pub mod edit;

pub use block::{Block, BlockSet};
pub use grid::{Grid, VoxelGrid};
pub use brush::{Brush, BrushError, BrushInstance, BrushKind};
pub use edit::{DrawContext, DrawError, DrawKind, DrawOperation, DrawSummary, UndoLedger};
