//! Resumable 3D Bresenham line rasterization

use glam::I64Vec3;

use crate::core::types::IVec3;

/// Walks every voxel of a 3D digital line from `start` to `end` inclusive.
///
/// The axis with the largest delta is stepped once per voxel; the other two
/// accumulate error terms and step when their error crosses zero. All state
/// lives in the cursor so iteration can stop and resume at any point.
#[derive(Clone, Debug)]
pub struct LineCursor {
    point: IVec3,
    step: IVec3,
    /// Doubled absolute deltas, in i64 so endpoints may span the whole i32 range
    delta2: I64Vec3,
    /// Index of the dominant axis (0 = x, 1 = y, 2 = z)
    major: usize,
    err: [i64; 2],
    remaining: u64,
}

impl LineCursor {
    pub fn new(start: IVec3, end: IVec3) -> Self {
        let delta = end.as_i64vec3() - start.as_i64vec3();
        let abs = delta.abs();
        let major = if abs.x >= abs.y && abs.x >= abs.z {
            0
        } else if abs.y >= abs.z {
            1
        } else {
            2
        };
        let (a, b) = minor_axes(major);
        let err = [
            2 * abs[a] - abs[major],
            2 * abs[b] - abs[major],
        ];

        Self {
            point: start,
            step: delta.signum().as_ivec3(),
            delta2: abs * 2,
            major,
            err,
            remaining: abs[major] as u64 + 1,
        }
    }

    /// Voxel count of the whole line
    pub fn length(start: IVec3, end: IVec3) -> u64 {
        (end.as_i64vec3() - start.as_i64vec3()).abs().max_element() as u64 + 1
    }

    /// Voxels not yet yielded
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

fn minor_axes(major: usize) -> (usize, usize) {
    match major {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    }
}

impl Iterator for LineCursor {
    type Item = IVec3;

    fn next(&mut self) -> Option<IVec3> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.point;
        self.remaining -= 1;

        if self.remaining > 0 {
            let (a, b) = minor_axes(self.major);
            for (slot, axis) in [(0, a), (1, b)] {
                if self.err[slot] > 0 {
                    self.point[axis] += self.step[axis];
                    self.err[slot] -= self.delta2[self.major];
                }
                self.err[slot] += self.delta2[axis];
            }
            self.point[self.major] += self.step[self.major];
        }

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}
