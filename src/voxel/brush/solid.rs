//! Single-block brush with primary/secondary action

use serde::{Deserialize, Serialize};

use crate::session::Actor;
use crate::voxel::block::Block;
use crate::voxel::edit::DrawInfo;
use super::{BrushError, BrushInstance, PaintContext};

/// Places one block everywhere. The secondary block is used when the
/// operation requests its alternate action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SolidBrush {
    /// None = actor's last used block, resolved at `begin`
    pub primary: Option<Block>,
    pub secondary: Option<Block>,
}

impl SolidBrush {
    pub fn instance(&self) -> SolidInstance {
        SolidInstance { brush: *self, block: None }
    }
}

#[derive(Debug, Clone)]
pub struct SolidInstance {
    brush: SolidBrush,
    block: Option<Block>,
}

impl BrushInstance for SolidInstance {
    fn name(&self) -> &'static str {
        "Normal"
    }

    fn description(&self) -> String {
        match (self.brush.primary, self.brush.secondary) {
            (None, _) => "Normal".to_string(),
            (Some(primary), None) => format!("Normal({primary})"),
            (Some(primary), Some(secondary)) => format!("Normal({primary}, {secondary})"),
        }
    }

    fn begin(&mut self, actor: &dyn Actor, info: &DrawInfo) -> Result<(), BrushError> {
        let block = if info.use_alternate {
            self.brush.secondary.ok_or(BrushError::MissingAlternate)?
        } else {
            self.brush
                .primary
                .or_else(|| actor.last_used_block())
                .ok_or(BrushError::NoDefaultBlock)?
        };
        self.block = Some(block);
        Ok(())
    }

    fn next_block(&mut self, _ctx: &PaintContext<'_>) -> Option<Block> {
        self.block
    }

    fn end(&mut self) {
        self.block = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::IVec3;
    use crate::math::BoundingBox;
    use crate::session::Session;
    use crate::voxel::grid::VoxelGrid;

    fn info() -> DrawInfo {
        DrawInfo::new("Test", BoundingBox::from_corners(IVec3::ZERO, IVec3::ONE), 1)
    }

    fn paint(instance: &mut SolidInstance, info: &DrawInfo) -> Option<Block> {
        let grid = VoxelGrid::new(IVec3::splat(2));
        instance.next_block(&PaintContext { coord: IVec3::ZERO, info, grid: &grid })
    }

    #[test]
    fn test_configured_block() {
        let actor = Session::new("a").with_last_block(Block::Sand);
        let mut instance = SolidBrush { primary: Some(Block::Stone), secondary: None }.instance();
        let info = info();
        instance.begin(&actor, &info).unwrap();
        assert_eq!(paint(&mut instance, &info), Some(Block::Stone));
    }

    #[test]
    fn test_defaults_to_last_used_block() {
        let actor = Session::new("a").with_last_block(Block::Sand);
        let mut instance = SolidBrush::default().instance();
        let info = info();
        instance.begin(&actor, &info).unwrap();
        assert_eq!(paint(&mut instance, &info), Some(Block::Sand));
    }

    #[test]
    fn test_no_default_block() {
        let actor = Session::new("a");
        let mut instance = SolidBrush::default().instance();
        assert_eq!(instance.begin(&actor, &info()), Err(BrushError::NoDefaultBlock));
    }

    #[test]
    fn test_alternate_block() {
        let actor = Session::new("a");
        let info = info().with_alternate(true);

        let mut instance = SolidBrush { primary: Some(Block::Stone), secondary: Some(Block::Glass) }.instance();
        instance.begin(&actor, &info).unwrap();
        assert_eq!(paint(&mut instance, &info), Some(Block::Glass));

        let mut missing = SolidBrush { primary: Some(Block::Stone), secondary: None }.instance();
        assert_eq!(missing.begin(&actor, &info), Err(BrushError::MissingAlternate));
    }
}
