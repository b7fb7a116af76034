//! Weighted random brush

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};

use crate::session::Actor;
use crate::voxel::block::Block;
use crate::voxel::edit::DrawInfo;
use super::factory::BlockArg;
use super::{BrushError, BrushInstance, PaintContext};

/// Picks each voxel's block at random, weighted by ratio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomBrush {
    pub blocks: Vec<BlockArg>,
}

impl RandomBrush {
    /// A single block is paired with Air at equal weight.
    pub fn new(mut blocks: Vec<BlockArg>) -> Result<Self, BrushError> {
        match blocks.len() {
            0 => return Err(BrushError::NoBlocks),
            1 => blocks.push(BlockArg::new(Block::Air)),
            _ => {}
        }
        Ok(Self { blocks })
    }

    pub fn instance(&self) -> RandomInstance {
        RandomInstance {
            brush: self.clone(),
            pool: Vec::new(),
            rng: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomInstance {
    brush: RandomBrush,
    /// Each block repeated by its ratio
    pool: Vec<Block>,
    rng: Option<Pcg64Mcg>,
}

impl BrushInstance for RandomInstance {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn description(&self) -> String {
        let blocks: Vec<String> = self.brush.blocks.iter().map(|b| b.to_string()).collect();
        format!("Random({})", blocks.join(", "))
    }

    fn begin(&mut self, _actor: &dyn Actor, info: &DrawInfo) -> Result<(), BrushError> {
        if self.brush.blocks.is_empty() {
            return Err(BrushError::NoBlocks);
        }
        self.pool = self
            .brush
            .blocks
            .iter()
            .flat_map(|arg| std::iter::repeat_n(arg.block, arg.weight() as usize))
            .collect();
        self.rng = Some(Pcg64Mcg::seed_from_u64(info.seed));
        Ok(())
    }

    fn next_block(&mut self, _ctx: &PaintContext<'_>) -> Option<Block> {
        let rng = self.rng.as_mut()?;
        let index = rng.random_range(0..self.pool.len());
        Some(self.pool[index])
    }

    fn end(&mut self) {
        self.pool = Vec::new();
        self.rng = None;
    }
}
