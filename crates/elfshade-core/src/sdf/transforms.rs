//! SDF Transforms - translation, rotation and domain repetition
//!
//! Transforms move the *query point* into the shape's local frame. The free
//! functions are the point warps composers use inline; the node structs wrap
//! a child shape with the same warp.

use super::{Aabb, Sdf};
use glam::{Quat, Vec3};

// ============================================================================
// Point warps
// ============================================================================

/// Rotate `p` about the X axis by `angle` radians
#[inline]
pub fn rotate_x(p: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(p.x, c * p.y - s * p.z, s * p.y + c * p.z)
}

/// Rotate `p` about the Y axis by `angle` radians
#[inline]
pub fn rotate_y(p: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(c * p.x + s * p.z, p.y, c * p.z - s * p.x)
}

/// Rotate `p` about the Z axis by `angle` radians
#[inline]
pub fn rotate_z(p: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(c * p.x - s * p.y, s * p.x + c * p.y, p.z)
}

/// Rotate `p` about an arbitrary axis (Rodrigues' rotation formula).
///
/// The axis does not need to be unit length. A zero axis returns `p`.
#[inline]
pub fn rotate_axis(p: Vec3, axis: Vec3, angle: f32) -> Vec3 {
    let Some(k) = axis.try_normalize() else {
        return p;
    };
    let (s, c) = angle.sin_cos();
    p * c + k.cross(p) * s + k * k.dot(p) * (1.0 - c)
}

/// Fold space into a tile of size `cell` centered on the origin.
///
/// Axes with a cell size `<= 0` pass through unchanged.
#[inline]
pub fn repeat(p: Vec3, cell: Vec3) -> Vec3 {
    let fold = |x: f32, c: f32| {
        if c > 0.0 {
            (x + 0.5 * c).rem_euclid(c) - 0.5 * c
        } else {
            x
        }
    };
    Vec3::new(fold(p.x, cell.x), fold(p.y, cell.y), fold(p.z, cell.z))
}

// ============================================================================
// Transform nodes
// ============================================================================

/// Translation transform
pub struct Translate<S: Sdf> {
    pub inner: S,
    pub offset: Vec3,
}

impl<S: Sdf> Translate<S> {
    pub fn new(inner: S, offset: Vec3) -> Self {
        Self { inner, offset }
    }
}

impl<S: Sdf> Sdf for Translate<S> {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(p - self.offset)
    }

    fn bounds(&self) -> Aabb {
        let b = self.inner.bounds();
        Aabb::new(b.min + self.offset, b.max + self.offset)
    }
}

/// Axis-angle rotation transform
pub struct Rotate<S: Sdf> {
    pub inner: S,
    pub axis: Vec3,
    pub angle: f32,
}

impl<S: Sdf> Rotate<S> {
    pub fn new(inner: S, axis: Vec3, angle: f32) -> Self {
        Self { inner, axis, angle }
    }
}

impl<S: Sdf> Sdf for Rotate<S> {
    fn distance(&self, p: Vec3) -> f32 {
        // Rotate point into local space
        self.inner.distance(rotate_axis(p, self.axis, -self.angle))
    }

    fn bounds(&self) -> Aabb {
        let Some(axis) = self.axis.try_normalize() else {
            return self.inner.bounds();
        };
        let rotation = Quat::from_axis_angle(axis, self.angle);
        let b = self.inner.bounds();

        let mut new_min = Vec3::splat(f32::MAX);
        let mut new_max = Vec3::splat(f32::MIN);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { b.min.x } else { b.max.x },
                if i & 2 == 0 { b.min.y } else { b.max.y },
                if i & 4 == 0 { b.min.z } else { b.max.z },
            );
            let rotated = rotation * corner;
            new_min = new_min.min(rotated);
            new_max = new_max.max(rotated);
        }

        Aabb::new(new_min, new_max)
    }
}

/// Infinite domain repetition
pub struct Repeat<S: Sdf> {
    pub inner: S,
    pub cell: Vec3,
}

impl<S: Sdf> Repeat<S> {
    pub fn new(inner: S, cell: Vec3) -> Self {
        Self { inner, cell }
    }
}

impl<S: Sdf> Sdf for Repeat<S> {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(repeat(p, self.cell))
    }

    fn bounds(&self) -> Aabb {
        // Frame a 3x3x3 block of tiles on the repeated axes
        let b = self.inner.bounds();
        let reach = Vec3::new(
            self.cell.x.max(0.0),
            self.cell.y.max(0.0),
            self.cell.z.max(0.0),
        );
        Aabb::new(b.min - reach, b.max + reach)
    }
}
