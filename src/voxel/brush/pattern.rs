//! Coordinate-driven patterns: checkerboard and rainbow stripes

use serde::{Deserialize, Serialize};

use crate::session::Actor;
use crate::voxel::block::Block;
use crate::voxel::edit::DrawInfo;
use super::{BrushError, BrushInstance, PaintContext};

/// Stripe colors cycled by the rainbow brush
pub const RAINBOW: [Block; 7] = [
    Block::Red,
    Block::Orange,
    Block::Yellow,
    Block::Green,
    Block::Aqua,
    Block::Blue,
    Block::Violet,
];

/// Alternates two blocks on a 3D checkerboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckeredBrush {
    pub first: Block,
    pub second: Block,
}

impl CheckeredBrush {
    pub fn instance(&self) -> CheckeredInstance {
        CheckeredInstance { brush: *self }
    }
}

#[derive(Debug, Clone)]
pub struct CheckeredInstance {
    brush: CheckeredBrush,
}

impl BrushInstance for CheckeredInstance {
    fn name(&self) -> &'static str {
        "Checkered"
    }

    fn description(&self) -> String {
        format!("Checkered({}, {})", self.brush.first, self.brush.second)
    }

    fn begin(&mut self, _actor: &dyn Actor, _info: &DrawInfo) -> Result<(), BrushError> {
        Ok(())
    }

    fn next_block(&mut self, ctx: &PaintContext<'_>) -> Option<Block> {
        let c = ctx.coord;
        if (c.x + c.y + c.z).rem_euclid(2) == 0 {
            Some(self.brush.first)
        } else {
            Some(self.brush.second)
        }
    }
}

/// Diagonal color stripes
#[derive(Debug, Clone, Copy)]
pub struct RainbowInstance;

impl BrushInstance for RainbowInstance {
    fn name(&self) -> &'static str {
        "Rainbow"
    }

    fn description(&self) -> String {
        "Rainbow".to_string()
    }

    fn begin(&mut self, _actor: &dyn Actor, _info: &DrawInfo) -> Result<(), BrushError> {
        Ok(())
    }

    fn next_block(&mut self, ctx: &PaintContext<'_>) -> Option<Block> {
        let c = ctx.coord;
        let index = (c.x + c.y + c.z).rem_euclid(RAINBOW.len() as i32) as usize;
        Some(RAINBOW[index])
    }
}
