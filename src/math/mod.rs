//! Mathematical utilities and data structures

pub mod bounds;
pub mod line;

pub use bounds::BoundingBox;
pub use line::LineCursor;
