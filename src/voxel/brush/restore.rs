//! Brush replaying a recorded undo history

use std::collections::HashMap;

use crate::core::types::IVec3;
use crate::session::Actor;
use crate::voxel::block::Block;
use crate::voxel::edit::{DrawInfo, UndoLedger};
use super::{BrushError, BrushInstance, PaintContext};

/// Writes back the block each recorded voxel held before its edit.
/// Voxels without an entry are left untouched.
#[derive(Debug, Clone, Default)]
pub struct RestoreInstance {
    blocks: HashMap<IVec3, Block>,
}

impl RestoreInstance {
    /// When a voxel was recorded more than once, the earliest value wins.
    pub fn from_ledger(ledger: &UndoLedger) -> Self {
        let mut blocks = HashMap::with_capacity(ledger.len());
        for entry in ledger.entries() {
            blocks.entry(entry.coord).or_insert(entry.previous);
        }
        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl BrushInstance for RestoreInstance {
    fn name(&self) -> &'static str {
        "Restore"
    }

    fn description(&self) -> String {
        format!("Restore({} blocks)", self.blocks.len())
    }

    fn begin(&mut self, _actor: &dyn Actor, _info: &DrawInfo) -> Result<(), BrushError> {
        Ok(())
    }

    fn next_block(&mut self, ctx: &PaintContext<'_>) -> Option<Block> {
        self.blocks.get(&ctx.coord).copied()
    }

    fn end(&mut self) {
        self.blocks = HashMap::new();
    }
}
