//! Voxel grid access

use crate::core::types::IVec3;
use crate::math::BoundingBox;
use super::block::Block;

/// Bounds-checked 3D block storage that draw operations read and mutate.
///
/// Draw operations assume a single writer per grid: nothing here locks, and
/// concurrent operations over overlapping regions resolve as last write wins.
pub trait Grid {
    /// Addressable region of the grid
    fn bounds(&self) -> BoundingBox;

    fn in_bounds(&self, coord: IVec3) -> bool {
        self.bounds().contains(coord)
    }

    /// Block at `coord`. Out-of-bounds reads return Air.
    fn get_block(&self, coord: IVec3) -> Block;

    /// Write `block` at `coord`. Returns false and does nothing when out of bounds.
    fn set_block(&mut self, coord: IVec3, block: Block) -> bool;
}

/// Dense in-memory grid with its min corner at the origin
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    bounds: BoundingBox,
    blocks: Vec<Block>,
}

impl VoxelGrid {
    /// Create a grid of `dimensions` voxels filled with Air
    pub fn new(dimensions: IVec3) -> Self {
        Self::filled(dimensions, Block::Air)
    }

    /// Create a grid of `dimensions` voxels filled with `block`
    pub fn filled(dimensions: IVec3, block: Block) -> Self {
        let dimensions = dimensions.max(IVec3::ONE);
        let bounds = BoundingBox::from_corners(IVec3::ZERO, dimensions - IVec3::ONE);
        Self {
            bounds,
            blocks: vec![block; bounds.volume() as usize],
        }
    }

    /// Overwrite every voxel inside `region` (clipped to the grid)
    pub fn fill(&mut self, region: &BoundingBox, block: Block) {
        if let Some(clipped) = region.intersection(&self.bounds) {
            for p in clipped.iter() {
                self.set_block(p, block);
            }
        }
    }

    /// Count voxels holding `block`
    pub fn count(&self, block: Block) -> usize {
        self.blocks.iter().filter(|b| **b == block).count()
    }

    /// Raw block storage in raster order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}

impl Grid for VoxelGrid {
    fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    fn get_block(&self, coord: IVec3) -> Block {
        self.bounds
            .index_of(coord)
            .map(|i| self.blocks[i])
            .unwrap_or(Block::Air)
    }

    fn set_block(&mut self, coord: IVec3, block: Block) -> bool {
        match self.bounds.index_of(coord) {
            Some(i) => {
                self.blocks[i] = block;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_air() {
        let grid = VoxelGrid::new(IVec3::new(4, 3, 2));
        assert_eq!(grid.bounds().volume(), 24);
        assert_eq!(grid.count(Block::Air), 24);
    }

    #[test]
    fn test_get_set() {
        let mut grid = VoxelGrid::new(IVec3::splat(4));
        assert!(grid.set_block(IVec3::new(1, 2, 3), Block::Stone));
        assert_eq!(grid.get_block(IVec3::new(1, 2, 3)), Block::Stone);
        assert_eq!(grid.get_block(IVec3::new(3, 2, 1)), Block::Air);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = VoxelGrid::new(IVec3::splat(2));
        assert!(!grid.in_bounds(IVec3::new(2, 0, 0)));
        assert!(!grid.in_bounds(IVec3::new(0, -1, 0)));
        assert!(!grid.set_block(IVec3::new(-1, 0, 0), Block::Stone));
        assert_eq!(grid.get_block(IVec3::new(5, 5, 5)), Block::Air);
        assert_eq!(grid.count(Block::Stone), 0);
    }

    #[test]
    fn test_fill_clips() {
        let mut grid = VoxelGrid::new(IVec3::splat(4));
        grid.fill(&BoundingBox::from_corners(IVec3::splat(2), IVec3::splat(10)), Block::Dirt);
        assert_eq!(grid.count(Block::Dirt), 8);
    }
}
