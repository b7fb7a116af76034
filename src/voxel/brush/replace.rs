//! Predicate brushes replacing (or sparing) a set of block types

use serde::{Deserialize, Serialize};

use crate::session::Actor;
use crate::voxel::block::{Block, BlockSet};
use crate::voxel::edit::DrawInfo;
use super::{BrushError, BrushInstance, PaintContext};

/// Target set plus replacement. Used by both Replace (current block in the
/// set) and ReplaceNot (current block outside the set).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceBrush {
    pub targets: Vec<Block>,
    /// None = actor's last used block, resolved at `begin`
    pub replacement: Option<Block>,
}

impl ReplaceBrush {
    /// All blocks but the last are targets and the last is the replacement;
    /// a single block is a target with the replacement left to `begin`.
    pub fn from_blocks(mut blocks: Vec<Block>) -> Result<Self, BrushError> {
        match blocks.len() {
            0 => Err(BrushError::MissingTarget),
            1 => Ok(Self { targets: blocks, replacement: None }),
            _ => {
                let replacement = blocks.pop();
                Ok(Self { targets: blocks, replacement })
            }
        }
    }

    pub fn instance(&self, invert: bool) -> ReplaceInstance {
        ReplaceInstance {
            brush: self.clone(),
            invert,
            targets: self.targets.iter().copied().collect(),
            replacement: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReplaceInstance {
    brush: ReplaceBrush,
    /// ReplaceNot semantics
    invert: bool,
    targets: BlockSet,
    replacement: Option<Block>,
}

impl BrushInstance for ReplaceInstance {
    fn name(&self) -> &'static str {
        if self.invert { "ReplaceNot" } else { "Replace" }
    }

    fn description(&self) -> String {
        let targets: Vec<String> = self.targets.iter().map(|b| b.to_string()).collect();
        match self.brush.replacement {
            Some(replacement) => format!("{}({} -> {})", self.name(), targets.join(", "), replacement),
            None => format!("{}({})", self.name(), targets.join(", ")),
        }
    }

    fn begin(&mut self, actor: &dyn Actor, _info: &DrawInfo) -> Result<(), BrushError> {
        if self.targets.is_empty() {
            return Err(BrushError::MissingTarget);
        }
        let replacement = self
            .brush
            .replacement
            .or_else(|| actor.last_used_block())
            .ok_or(BrushError::NoDefaultBlock)?;
        self.replacement = Some(replacement);
        Ok(())
    }

    fn next_block(&mut self, ctx: &PaintContext<'_>) -> Option<Block> {
        let current = ctx.grid.get_block(ctx.coord);
        if self.targets.contains(current) != self.invert {
            self.replacement
        } else {
            None
        }
    }
}
