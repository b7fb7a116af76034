//! Per-voxel build authorization

use crate::core::types::IVec3;
use crate::voxel::block::Block;
use super::actor::Actor;

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Allowed,
    Denied,
}

impl Permission {
    pub fn is_allowed(self) -> bool {
        self == Permission::Allowed
    }
}

impl From<bool> for Permission {
    fn from(allowed: bool) -> Self {
        if allowed { Permission::Allowed } else { Permission::Denied }
    }
}

/// Decides whether an actor may place a block at a coordinate.
///
/// Called once per voxel that would actually change, so implementations
/// must be cheap and non-blocking.
pub trait Authorizer {
    fn can_place(&self, actor: &dyn Actor, coord: IVec3, block: Block) -> Permission;
}

/// Authorizer that allows everything
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn can_place(&self, _actor: &dyn Actor, _coord: IVec3, _block: Block) -> Permission {
        Permission::Allowed
    }
}

/// Authorizer that denies everything
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl Authorizer for DenyAll {
    fn can_place(&self, _actor: &dyn Actor, _coord: IVec3, _block: Block) -> Permission {
        Permission::Denied
    }
}

impl<F> Authorizer for F
where
    F: Fn(&dyn Actor, IVec3, Block) -> Permission,
{
    fn can_place(&self, actor: &dyn Actor, coord: IVec3, block: Block) -> Permission {
        self(actor, coord, block)
    }
}
