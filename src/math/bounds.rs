//! Integer axis-aligned bounding box

use glam::I64Vec3;

use crate::core::types::IVec3;

/// Inclusive integer bounding box defined by min and max vertices
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub min: IVec3,
    pub max: IVec3,
}

impl BoundingBox {
    /// Create a box from any two opposite corners
    pub fn from_corners(a: IVec3, b: IVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a box spanning every point in `points`. Returns None for an empty slice.
    pub fn enclosing(points: &[IVec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self::from_corners(*first, *first);
        for p in rest {
            bounds.min = bounds.min.min(*p);
            bounds.max = bounds.max.max(*p);
        }
        Some(bounds)
    }

    /// Cube of side `2 * radius + 1` around `center`, clamped to the i32 range
    pub fn from_center_radius(center: IVec3, radius: i64) -> Self {
        let lo = I64Vec3::splat(i32::MIN as i64);
        let hi = I64Vec3::splat(i32::MAX as i64);
        let c = center.as_i64vec3();
        let r = I64Vec3::splat(radius.max(0));
        Self {
            min: (c - r).clamp(lo, hi).as_ivec3(),
            max: (c + r).clamp(lo, hi).as_ivec3(),
        }
    }

    /// Number of voxels along each axis. Computed in i64 so a box spanning
    /// the whole i32 range does not overflow.
    pub fn extent(&self) -> I64Vec3 {
        self.max.as_i64vec3() - self.min.as_i64vec3() + I64Vec3::ONE
    }

    /// Total voxel count, saturating at `u64::MAX`
    pub fn volume(&self) -> u64 {
        saturate(product(self.extent()))
    }

    /// Check if point is inside the box (inclusive)
    pub fn contains(&self, p: IVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Check if two boxes share at least one voxel
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Overlap of two boxes, None if they are disjoint
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        if !self.intersects(other) {
            return None;
        }
        Some(BoundingBox {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        })
    }

    /// Position of `p` relative to the min vertex
    pub fn relative(&self, p: IVec3) -> IVec3 {
        p - self.min
    }

    /// Linear index of a contained point, x fastest then y then z
    pub fn index_of(&self, p: IVec3) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        let r = p.as_i64vec3() - self.min.as_i64vec3();
        let dims = self.extent();
        Some((r.x + dims.x * (r.y + dims.y * r.z)) as usize)
    }

    /// Iterate all contained points in raster order (x fastest)
    pub fn iter(&self) -> impl Iterator<Item = IVec3> + '_ {
        (self.min.z..=self.max.z).flat_map(move |z| {
            (self.min.y..=self.max.y).flat_map(move |y| {
                (self.min.x..=self.max.x).map(move |x| IVec3::new(x, y, z))
            })
        })
    }

    /// Voxel count of the one-voxel-thick shell, saturating at `u64::MAX`
    pub fn shell_volume(&self) -> u64 {
        let d = self.extent();
        let inner = (d - I64Vec3::splat(2)).max(I64Vec3::ZERO);
        saturate(product(d) - product(inner))
    }

    /// Check if `p` lies on the box surface
    pub fn on_shell(&self, p: IVec3) -> bool {
        self.extreme_axes(p) >= 1
    }

    /// Check if `p` lies on one of the twelve box edges
    pub fn on_edge(&self, p: IVec3) -> bool {
        self.extreme_axes(p) >= 2
    }

    /// Voxel count of the box edges
    pub fn edge_volume(&self) -> u64 {
        let d = self.extent();
        // Per axis: values on a min/max face, and values strictly between
        let ext = |n: i64| if n > 1 { 2 } else { 1 };
        let inner = |n: i64| (n - 2).max(0);
        let corners = ext(d.x) * ext(d.y) * ext(d.z);
        let edges = inner(d.x) * ext(d.y) * ext(d.z)
            + ext(d.x) * inner(d.y) * ext(d.z)
            + ext(d.x) * ext(d.y) * inner(d.z);
        (corners + edges) as u64
    }

    /// How many axes of `p` sit on a min or max face
    fn extreme_axes(&self, p: IVec3) -> u32 {
        (p.cmpeq(self.min) | p.cmpeq(self.max)).bitmask().count_ones()
    }
}

/// Exact voxel product of per-axis counts, each at most 2^32
fn product(d: I64Vec3) -> u128 {
    d.x as u128 * d.y as u128 * d.z as u128
}

fn saturate(n: u128) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_orders_axes() {
        let b = BoundingBox::from_corners(IVec3::new(5, 0, 3), IVec3::new(1, 4, -2));
        assert_eq!(b.min, IVec3::new(1, 0, -2));
        assert_eq!(b.max, IVec3::new(5, 4, 3));
        assert_eq!(b.extent(), I64Vec3::new(5, 5, 6));
        assert_eq!(b.volume(), 150);
    }

    #[test]
    fn test_single_voxel() {
        let b = BoundingBox::from_corners(IVec3::ONE, IVec3::ONE);
        assert_eq!(b.volume(), 1);
        assert_eq!(b.shell_volume(), 1);
        assert_eq!(b.edge_volume(), 1);
        assert!(b.on_edge(IVec3::ONE));
    }

    #[test]
    fn test_contains_and_intersection() {
        let a = BoundingBox::from_corners(IVec3::ZERO, IVec3::splat(3));
        let b = BoundingBox::from_corners(IVec3::splat(2), IVec3::splat(6));
        let c = BoundingBox::from_corners(IVec3::splat(4), IVec3::splat(6));
        assert!(a.contains(IVec3::splat(3)));
        assert!(!a.contains(IVec3::new(4, 0, 0)));
        assert_eq!(
            a.intersection(&b),
            Some(BoundingBox::from_corners(IVec3::splat(2), IVec3::splat(3)))
        );
        assert!(a.intersection(&c).is_none());
    }

    #[test]
    fn test_iter_raster_order() {
        let b = BoundingBox::from_corners(IVec3::ZERO, IVec3::new(1, 1, 1));
        let points: Vec<_> = b.iter().collect();
        assert_eq!(points.len(), 8);
        assert_eq!(points[0], IVec3::new(0, 0, 0));
        assert_eq!(points[1], IVec3::new(1, 0, 0));
        assert_eq!(points[2], IVec3::new(0, 1, 0));
        assert_eq!(points[4], IVec3::new(0, 0, 1));
        for (i, p) in points.iter().enumerate() {
            assert_eq!(b.index_of(*p), Some(i));
        }
    }

    #[test]
    fn test_shell_volume_matches_filter() {
        for dims in [IVec3::new(1, 1, 1), IVec3::new(2, 3, 4), IVec3::new(5, 5, 5), IVec3::new(7, 1, 3)] {
            let b = BoundingBox::from_corners(IVec3::ZERO, dims - IVec3::ONE);
            let counted = b.iter().filter(|p| b.on_shell(*p)).count() as u64;
            assert_eq!(b.shell_volume(), counted, "dims {dims}");
        }
    }

    #[test]
    fn test_edge_volume_matches_filter() {
        for dims in [IVec3::new(1, 1, 1), IVec3::new(2, 2, 2), IVec3::new(3, 3, 3), IVec3::new(5, 4, 6), IVec3::new(1, 5, 5), IVec3::new(2, 5, 7)] {
            let b = BoundingBox::from_corners(IVec3::ZERO, dims - IVec3::ONE);
            let counted = b.iter().filter(|p| b.on_edge(*p)).count() as u64;
            assert_eq!(b.edge_volume(), counted, "dims {dims}");
        }
    }

    #[test]
    fn test_enclosing() {
        assert!(BoundingBox::enclosing(&[]).is_none());
        let b = BoundingBox::enclosing(&[IVec3::new(3, -1, 0), IVec3::new(0, 2, 9), IVec3::new(1, 1, 1)]).unwrap();
        assert_eq!(b.min, IVec3::new(0, -1, 0));
        assert_eq!(b.max, IVec3::new(3, 2, 9));
    }

    #[test]
    fn test_full_range_box_saturates() {
        let b = BoundingBox::from_corners(IVec3::splat(i32::MIN), IVec3::splat(i32::MAX));
        assert_eq!(b.extent(), I64Vec3::splat(1 << 32));
        assert_eq!(b.volume(), u64::MAX);
        assert_eq!(b.shell_volume(), u64::MAX);
        assert_eq!(b.edge_volume(), 12 * ((1 << 32) - 2) + 8);
    }

    #[test]
    fn test_large_box_volume() {
        let b = BoundingBox::from_corners(IVec3::splat(-500_000), IVec3::splat(499_999));
        assert_eq!(b.volume(), 1_000_000u64.pow(3));
        assert_eq!(b.shell_volume(), 1_000_000u64.pow(3) - 999_998u64.pow(3));

        let huge = BoundingBox::from_corners(IVec3::splat(-2_000_000), IVec3::splat(2_000_000));
        assert_eq!(huge.volume(), u64::MAX);
    }

    #[test]
    fn test_center_radius_clamps() {
        let b = BoundingBox::from_center_radius(IVec3::new(i32::MAX - 1, 0, i32::MIN), 10);
        assert_eq!(b.min, IVec3::new(i32::MAX - 11, -10, i32::MIN));
        assert_eq!(b.max, IVec3::new(i32::MAX, 10, i32::MIN + 10));

        let wide = BoundingBox::from_center_radius(IVec3::ZERO, 1 << 40);
        assert_eq!(wide.min, IVec3::splat(i32::MIN));
        assert_eq!(wide.max, IVec3::splat(i32::MAX));
    }
}
