//! Operation geometry and resumable voxel traversals

use std::collections::HashSet;
use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::IVec3;
use crate::math::{BoundingBox, LineCursor};
use super::DrawError;

/// Draw operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawKind {
    Cuboid,
    CuboidHollow,
    CuboidWireframe,
    Ellipsoid,
    Sphere,
    Line,
    Undo,
}

impl DrawKind {
    pub const ALL: [DrawKind; 7] = [
        DrawKind::Cuboid,
        DrawKind::CuboidHollow,
        DrawKind::CuboidWireframe,
        DrawKind::Ellipsoid,
        DrawKind::Sphere,
        DrawKind::Line,
        DrawKind::Undo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DrawKind::Cuboid => "Cuboid",
            DrawKind::CuboidHollow => "CuboidHollow",
            DrawKind::CuboidWireframe => "CuboidWireframe",
            DrawKind::Ellipsoid => "Ellipsoid",
            DrawKind::Sphere => "Sphere",
            DrawKind::Line => "Line",
            DrawKind::Undo => "Undo",
        }
    }

    /// Marks `prepare` expects
    pub fn mark_count(self) -> usize {
        match self {
            DrawKind::Undo => 0,
            _ => 2,
        }
    }

    /// Look up a kind by name or short alias (case-insensitive)
    pub fn parse(name: &str) -> Option<DrawKind> {
        let kind = match name.trim().to_ascii_lowercase().as_str() {
            "cuboid" | "z" => DrawKind::Cuboid,
            "cuboidhollow" | "hollow" | "zh" => DrawKind::CuboidHollow,
            "cuboidwireframe" | "wireframe" | "zw" => DrawKind::CuboidWireframe,
            "ellipsoid" => DrawKind::Ellipsoid,
            "sphere" => DrawKind::Sphere,
            "line" => DrawKind::Line,
            "undo" => DrawKind::Undo,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for DrawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Voxel set an operation covers, in world coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Cuboid(BoundingBox),
    /// One-voxel-thick box surface
    Hollow(BoundingBox),
    /// The twelve box edges
    Wireframe(BoundingBox),
    /// Ellipsoid inscribed in the box
    Ellipsoid(BoundingBox),
    Sphere { center: IVec3, radius_sq: i64 },
    Line { start: IVec3, end: IVec3 },
    /// Explicit coordinates, visited in order
    Points(Vec<IVec3>),
}

impl Shape {
    /// Build the geometry of `kind` from its marks.
    pub fn from_marks(kind: DrawKind, marks: &[IVec3]) -> Result<Shape, DrawError> {
        let expected = kind.mark_count();
        if marks.len() != expected {
            return Err(DrawError::WrongMarkCount { expected, got: marks.len() });
        }
        let shape = match kind {
            DrawKind::Cuboid => Shape::Cuboid(BoundingBox::from_corners(marks[0], marks[1])),
            DrawKind::CuboidHollow => Shape::Hollow(BoundingBox::from_corners(marks[0], marks[1])),
            DrawKind::CuboidWireframe => Shape::Wireframe(BoundingBox::from_corners(marks[0], marks[1])),
            DrawKind::Ellipsoid => Shape::Ellipsoid(BoundingBox::from_corners(marks[0], marks[1])),
            DrawKind::Sphere => Shape::Sphere {
                center: marks[0],
                radius_sq: distance_sq(marks[0], marks[1]),
            },
            DrawKind::Line => Shape::Line { start: marks[0], end: marks[1] },
            DrawKind::Undo => return Err(DrawError::InvalidState("undo is built from a ledger, not marks")),
        };
        Ok(shape)
    }

    /// Smallest box holding every voxel of the shape. None for an empty point set.
    pub fn bounds(&self) -> Option<BoundingBox> {
        match self {
            Shape::Cuboid(b) | Shape::Hollow(b) | Shape::Wireframe(b) | Shape::Ellipsoid(b) => Some(*b),
            Shape::Sphere { center, radius_sq } => Some(BoundingBox::from_center_radius(*center, radius_sq.isqrt())),
            Shape::Line { start, end } => Some(BoundingBox::from_corners(*start, *end)),
            Shape::Points(points) => BoundingBox::enclosing(points),
        }
    }

    /// Whether the shape is restricted to the grid before traversal.
    /// Lines and point lists keep off-grid voxels, which are skipped one by one.
    pub fn clips_to_grid(&self) -> bool {
        !matches!(self, Shape::Line { .. } | Shape::Points(_))
    }

    /// Approximate voxel count, for limits and progress
    pub fn estimate(&self) -> u64 {
        match self {
            Shape::Cuboid(b) => b.volume(),
            Shape::Hollow(b) => b.shell_volume(),
            Shape::Wireframe(b) => b.edge_volume(),
            Shape::Ellipsoid(b) => {
                let r = b.extent().as_dvec3() * 0.5;
                (4.0 / 3.0 * PI * r.x * r.y * r.z).ceil() as u64
            }
            Shape::Sphere { radius_sq, .. } => {
                let r = (*radius_sq as f64).sqrt();
                (4.0 / 3.0 * PI * r * r * r).ceil() as u64
            }
            Shape::Line { start, end } => LineCursor::length(*start, *end),
            Shape::Points(points) => points.len() as u64,
        }
    }

    /// Raster membership test. Lines and point lists are not rasterized.
    pub fn contains(&self, p: IVec3) -> bool {
        match self {
            Shape::Cuboid(b) => b.contains(p),
            Shape::Hollow(b) => b.contains(p) && b.on_shell(p),
            Shape::Wireframe(b) => b.contains(p) && b.on_edge(p),
            Shape::Ellipsoid(b) => {
                if !b.contains(p) {
                    return false;
                }
                let center = (b.min.as_dvec3() + b.max.as_dvec3()) * 0.5;
                let radii = b.extent().as_dvec3() * 0.5;
                let d = (p.as_dvec3() - center) / radii;
                d.length_squared() <= 1.0
            }
            Shape::Sphere { center, radius_sq } => distance_sq(p, *center) <= *radius_sq,
            Shape::Line { .. } | Shape::Points(_) => false,
        }
    }

    /// Next x worth examining after `p` within its row. Box shells only have
    /// members at both x ends of rows that are interior in y and z.
    fn next_x(&self, p: IVec3) -> i32 {
        let (b, min_extremes) = match self {
            Shape::Hollow(b) => (b, 1),
            Shape::Wireframe(b) => (b, 2),
            _ => return p.x + 1,
        };
        let extremes = [p.y == b.min.y || p.y == b.max.y, p.z == b.min.z || p.z == b.max.z]
            .into_iter()
            .filter(|e| *e)
            .count();
        if extremes >= min_extremes {
            p.x + 1
        } else if p.x + 1 < b.min.x {
            b.min.x
        } else if p.x >= b.min.x && p.x + 1 < b.max.x {
            b.max.x
        } else {
            p.x + 1
        }
    }

    /// Cursor over the shape's voxels within `region`
    pub fn traversal(self, region: BoundingBox) -> Traversal {
        let walk = match self {
            Shape::Line { start, end } => Walk::Line(LineCursor::new(start, end)),
            Shape::Points(points) => {
                let mut seen = HashSet::with_capacity(points.len());
                let points: Vec<IVec3> = points.into_iter().filter(|p| seen.insert(*p)).collect();
                Walk::Points { points, next: 0 }
            }
            shape => Walk::Raster { region, shape, cursor: Some(region.min) },
        };
        Traversal { walk }
    }
}

/// Squared distance between lattice points, saturating at `i64::MAX`
fn distance_sq(a: IVec3, b: IVec3) -> i64 {
    let d = a.as_i64vec3() - b.as_i64vec3();
    d.x.saturating_mul(d.x)
        .saturating_add(d.y.saturating_mul(d.y))
        .saturating_add(d.z.saturating_mul(d.z))
}

#[derive(Debug, Clone)]
enum Walk {
    Raster {
        region: BoundingBox,
        shape: Shape,
        /// Next coordinate to examine
        cursor: Option<IVec3>,
    },
    Line(LineCursor),
    Points { points: Vec<IVec3>, next: usize },
}

/// Resumable cursor yielding each voxel of an operation exactly once.
///
/// Raster shapes are walked z, then y, then x (x fastest); lines in Bresenham
/// order; point lists in their recorded order with duplicates dropped.
#[derive(Debug, Clone)]
pub struct Traversal {
    walk: Walk,
}

impl Traversal {
    /// True once no voxel is left to yield
    pub fn is_finished(&self) -> bool {
        match &self.walk {
            Walk::Raster { cursor, .. } => cursor.is_none(),
            Walk::Line(line) => line.remaining() == 0,
            Walk::Points { points, next } => *next >= points.len(),
        }
    }
}

fn raster_step(region: &BoundingBox, shape: &Shape, p: IVec3) -> Option<IVec3> {
    let x = shape.next_x(p);
    if x <= region.max.x {
        Some(IVec3::new(x, p.y, p.z))
    } else if p.y < region.max.y {
        Some(IVec3::new(region.min.x, p.y + 1, p.z))
    } else if p.z < region.max.z {
        Some(IVec3::new(region.min.x, region.min.y, p.z + 1))
    } else {
        None
    }
}

impl Iterator for Traversal {
    type Item = IVec3;

    fn next(&mut self) -> Option<IVec3> {
        match &mut self.walk {
            Walk::Raster { region, shape, cursor } => {
                while let Some(p) = *cursor {
                    *cursor = raster_step(region, shape, p);
                    if shape.contains(p) {
                        return Some(p);
                    }
                }
                None
            }
            Walk::Line(line) => line.next(),
            Walk::Points { points, next } => {
                let p = points.get(*next).copied()?;
                *next += 1;
                Some(p)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(shape: Shape) -> Vec<IVec3> {
        let region = shape.bounds().unwrap();
        shape.traversal(region).collect()
    }

    #[test]
    fn test_mark_count() {
        assert_eq!(
            Shape::from_marks(DrawKind::Cuboid, &[IVec3::ZERO]),
            Err(DrawError::WrongMarkCount { expected: 2, got: 1 })
        );
        assert!(Shape::from_marks(DrawKind::Line, &[IVec3::ZERO, IVec3::ONE]).is_ok());
    }

    #[test]
    fn test_kind_lookup() {
        for kind in DrawKind::ALL {
            assert_eq!(DrawKind::parse(kind.name()), Some(kind));
        }
        assert_eq!(DrawKind::parse(" Hollow "), Some(DrawKind::CuboidHollow));
        assert_eq!(DrawKind::parse("zw"), Some(DrawKind::CuboidWireframe));
        assert_eq!(DrawKind::parse("blob"), None);
    }

    #[test]
    fn test_raster_order_x_fastest() {
        let points = walk(Shape::Cuboid(BoundingBox::from_corners(IVec3::ZERO, IVec3::ONE)));
        assert_eq!(points.len(), 8);
        assert_eq!(points[0], IVec3::new(0, 0, 0));
        assert_eq!(points[1], IVec3::new(1, 0, 0));
        assert_eq!(points[2], IVec3::new(0, 1, 0));
        assert_eq!(points[4], IVec3::new(0, 0, 1));
    }

    #[test]
    fn test_hollow_and_wireframe_counts() {
        for (a, b) in [
            (IVec3::ZERO, IVec3::new(4, 5, 6)),
            (IVec3::ZERO, IVec3::new(0, 4, 4)),
            (IVec3::new(-3, 2, 1), IVec3::new(3, 2, 1)),
            (IVec3::ZERO, IVec3::new(1, 1, 7)),
        ] {
            let bounds = BoundingBox::from_corners(a, b);

            let shell = walk(Shape::Hollow(bounds));
            assert_eq!(shell.len() as u64, bounds.shell_volume());
            assert!(shell.iter().all(|p| bounds.on_shell(*p)));

            let edges = walk(Shape::Wireframe(bounds));
            assert_eq!(edges.len() as u64, bounds.edge_volume());
            assert!(edges.iter().all(|p| bounds.on_edge(*p)));
        }
    }

    #[test]
    fn test_clipped_shell_keeps_original_faces() {
        let shape = Shape::Hollow(BoundingBox::from_corners(IVec3::splat(-5), IVec3::splat(5)));
        let region = BoundingBox::from_corners(IVec3::ZERO, IVec3::splat(9));
        let points: Vec<_> = shape.clone().traversal(region).collect();
        // Only the three max faces fall inside the region
        assert!(points.iter().all(|p| p.max_element() == 5));
        assert_eq!(points.len(), 6 * 6 * 3 - 6 * 3 + 1);
    }

    #[test]
    fn test_sphere() {
        let shape = Shape::from_marks(DrawKind::Sphere, &[IVec3::ZERO, IVec3::new(0, 3, 0)]).unwrap();
        assert_eq!(shape.bounds(), Some(BoundingBox::from_corners(IVec3::splat(-3), IVec3::splat(3))));
        let points = walk(shape.clone());
        assert!(points.contains(&IVec3::new(0, -3, 0)));
        assert!(!points.contains(&IVec3::new(3, 3, 0)));
        assert!(points.iter().all(|p| p.as_i64vec3().length_squared() <= 9));
        assert_eq!(shape.estimate(), 114);
    }

    #[test]
    fn test_extreme_marks_saturate() {
        let marks = [IVec3::splat(i32::MIN), IVec3::splat(i32::MAX)];

        let sphere = Shape::from_marks(DrawKind::Sphere, &marks).unwrap();
        assert_eq!(sphere, Shape::Sphere { center: marks[0], radius_sq: i64::MAX });
        assert_eq!(sphere.bounds(), Some(BoundingBox::from_corners(marks[0], marks[1])));
        assert_eq!(sphere.estimate(), u64::MAX);
        assert!(sphere.contains(IVec3::ZERO));

        let ellipsoid = Shape::from_marks(DrawKind::Ellipsoid, &marks).unwrap();
        assert!(ellipsoid.contains(IVec3::ZERO));
        assert!(!ellipsoid.contains(marks[1]));

        let cuboid = Shape::from_marks(DrawKind::Cuboid, &marks).unwrap();
        assert_eq!(cuboid.estimate(), u64::MAX);
    }

    #[test]
    fn test_ellipsoid_small_box_is_full() {
        let points = walk(Shape::Ellipsoid(BoundingBox::from_corners(IVec3::ZERO, IVec3::ONE)));
        assert_eq!(points.len(), 8);
    }

    #[test]
    fn test_ellipsoid_excludes_corners() {
        let bounds = BoundingBox::from_corners(IVec3::ZERO, IVec3::new(10, 6, 8));
        let points = walk(Shape::Ellipsoid(bounds));
        assert!(!points.contains(&bounds.min));
        assert!(!points.contains(&bounds.max));
        assert!(points.contains(&IVec3::new(5, 3, 4)));
        assert!((points.len() as u64) < bounds.volume());
    }

    #[test]
    fn test_line_not_clipped() {
        let shape = Shape::Line { start: IVec3::new(-2, 0, 0), end: IVec3::new(2, 0, 0) };
        assert!(!shape.clips_to_grid());
        let points: Vec<_> = shape.traversal(BoundingBox::from_corners(IVec3::ZERO, IVec3::ZERO)).collect();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], IVec3::new(-2, 0, 0));
    }

    #[test]
    fn test_points_deduplicated() {
        let shape = Shape::Points(vec![IVec3::ONE, IVec3::ZERO, IVec3::ONE]);
        assert_eq!(walk(shape), vec![IVec3::ONE, IVec3::ZERO]);
    }

    #[test]
    fn test_traversal_resumes() {
        let shape = Shape::Wireframe(BoundingBox::from_corners(IVec3::ZERO, IVec3::new(3, 4, 5)));
        let full = walk(shape.clone());

        let mut traversal = shape.clone().traversal(shape.bounds().unwrap());
        let mut resumed: Vec<IVec3> = traversal.by_ref().take(7).collect();
        assert!(!traversal.is_finished());
        resumed.extend(traversal.by_ref());
        assert_eq!(resumed, full);
        assert!(traversal.is_finished());
    }
}
