//! Voxdraw - resumable draw operations and brushes for a shared voxel world

pub mod core;
pub mod math;
pub mod field;
pub mod session;
pub mod voxel;
