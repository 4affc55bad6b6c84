//! Signed Distance Functions (SDF) for 3D shape definition
//!
//! SDFs represent shapes as mathematical functions that return the distance
//! from any point in space to the nearest surface. Negative values are inside,
//! positive values are outside, and zero is exactly on the surface.
//!
//! Scene composers mostly call the free functions in [`operations`] and
//! [`transforms`] directly, shader style. The node types and [`SdfExt`]
//! build the same math into reusable trees, which is how the shape viewer
//! assembles whatever primitive it was asked to show.
//!
//! ## Example
//!
//! ```rust
//! use elfshade_core::prelude::*;
//!
//! let snowman = sphere(1.0)
//!     .smooth_union(sphere(0.7).translate(0.0, 1.5, 0.0), 8.0)
//!     .union(sphere(0.5).translate(0.0, 2.5, 0.0));
//!
//! assert!(snowman.distance(Vec3::ZERO) < 0.0);
//! ```

pub mod operations;
pub mod primitives;
pub mod transforms;

use crate::scene::{MaterialId, Tagged};
use glam::Vec3;

/// The core SDF trait - any type that can compute distance from a point
pub trait Sdf: Send + Sync {
    /// Calculate the signed distance from point `p` to the surface.
    ///
    /// - Returns negative values for points inside the shape
    /// - Returns positive values for points outside the shape
    /// - Returns zero for points exactly on the surface
    fn distance(&self, p: Vec3) -> f32;

    /// Get an approximate bounding box for this SDF.
    /// Used to frame the camera around a shape.
    fn bounds(&self) -> Aabb {
        Aabb::new(Vec3::splat(-10.0), Vec3::splat(10.0))
    }
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a cube centered at origin
    pub fn cube(half_size: f32) -> Self {
        Self::new(Vec3::splat(-half_size), Vec3::splat(half_size))
    }

    /// Expand the bounding box by a margin
    pub fn expand(&self, margin: f32) -> Self {
        Self::new(
            self.min - Vec3::splat(margin),
            self.max + Vec3::splat(margin),
        )
    }

    /// Merge two bounding boxes
    pub fn union(&self, other: &Aabb) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Get the size of the bounding box
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Get the center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Radius of the sphere around the center that encloses every corner
    pub fn bounding_radius(&self) -> f32 {
        self.size().length() * 0.5
    }
}

/// An SDF node that can be composed and transformed
#[derive(Clone)]
pub struct SdfNode {
    inner: std::sync::Arc<dyn Sdf>,
}

impl SdfNode {
    /// Create a new SDF node from any type implementing Sdf
    pub fn new<S: Sdf + 'static>(sdf: S) -> Self {
        Self {
            inner: std::sync::Arc::new(sdf),
        }
    }
}

impl std::fmt::Debug for SdfNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdfNode").field("bounds", &self.bounds()).finish()
    }
}

impl Sdf for SdfNode {
    fn distance(&self, p: Vec3) -> f32 {
        self.inner.distance(p)
    }

    fn bounds(&self) -> Aabb {
        self.inner.bounds()
    }
}

/// Extension trait providing chainable operations on SDFs
pub trait SdfExt: Sdf + Sized + 'static {
    // === Boolean Operations ===

    /// Union: combine two shapes (OR)
    fn union<S: Sdf + 'static>(self, other: S) -> SdfNode {
        SdfNode::new(operations::Union::new(self, other))
    }

    /// Subtraction: cut shape `other` from `self`
    fn subtract<S: Sdf + 'static>(self, other: S) -> SdfNode {
        SdfNode::new(operations::Subtract::new(self, other))
    }

    /// Intersection: keep only where both shapes overlap (AND)
    fn intersect<S: Sdf + 'static>(self, other: S) -> SdfNode {
        SdfNode::new(operations::Intersect::new(self, other))
    }

    // === Soft Operations ===

    /// Exponential smooth union with sharpness `k` (larger is harder)
    fn smooth_union<S: Sdf + 'static>(self, other: S, k: f32) -> SdfNode {
        SdfNode::new(operations::SmoothUnion::new(self, other, k))
    }

    /// Linear crossfade towards `other`; `alpha = 1` is all `self`
    fn blend<S: Sdf + 'static>(self, other: S, alpha: f32) -> SdfNode {
        SdfNode::new(operations::Blend::new(self, other, alpha))
    }

    /// Rounded groove of radius `radius` along the intersection curve
    fn pipe<S: Sdf + 'static>(self, other: S, radius: f32) -> SdfNode {
        SdfNode::new(operations::Pipe::new(self, other, radius))
    }

    // === Transforms ===

    /// Translate (move) the shape
    fn translate(self, x: f32, y: f32, z: f32) -> SdfNode {
        SdfNode::new(transforms::Translate::new(self, Vec3::new(x, y, z)))
    }

    /// Rotate around X axis (angle in radians)
    fn rotate_x(self, angle: f32) -> SdfNode {
        self.rotate(Vec3::X, angle)
    }

    /// Rotate around Y axis (angle in radians)
    fn rotate_y(self, angle: f32) -> SdfNode {
        self.rotate(Vec3::Y, angle)
    }

    /// Rotate around Z axis (angle in radians)
    fn rotate_z(self, angle: f32) -> SdfNode {
        self.rotate(Vec3::Z, angle)
    }

    /// Rotate around arbitrary axis (angle in radians)
    fn rotate(self, axis: Vec3, angle: f32) -> SdfNode {
        SdfNode::new(transforms::Rotate::new(self, axis, angle))
    }

    // === Repetition ===

    /// Infinite repetition with the given cell size (`<= 0` leaves an axis alone)
    fn repeat(self, cell: Vec3) -> SdfNode {
        SdfNode::new(transforms::Repeat::new(self, cell))
    }

    // === Scenes ===

    /// Attach a material, turning the shape into a single-material scene
    fn with_material(self, material: MaterialId) -> Tagged<Self> {
        Tagged::new(self, material)
    }
}

// Implement SdfExt for all types that implement Sdf
impl<T: Sdf + 'static> SdfExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::primitives::{box3, sphere};
    use approx::assert_relative_eq;

    #[test]
    fn node_chain_matches_direct_math() {
        let shape = sphere(1.0).translate(2.0, 0.0, 0.0);
        assert_relative_eq!(shape.distance(Vec3::new(2.0, 0.0, 0.0)), -1.0, epsilon = 1e-6);
        assert_relative_eq!(shape.distance(Vec3::new(4.0, 0.0, 0.0)), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn subtract_through_ext() {
        let shape = box3(Vec3::ONE).subtract(sphere(0.5));
        assert!(shape.distance(Vec3::ZERO) > 0.0);
        assert!(shape.distance(Vec3::new(0.9, 0.9, 0.0)) < 0.0);
    }

    #[test]
    fn aabb_union_and_radius() {
        let a = Aabb::cube(1.0);
        let b = Aabb::new(Vec3::ZERO, Vec3::new(3.0, 1.0, 1.0));
        let u = a.union(&b);
        assert_eq!(u.min, Vec3::splat(-1.0));
        assert_eq!(u.max, Vec3::new(3.0, 1.0, 1.0));
        assert_relative_eq!(Aabb::cube(1.0).bounding_radius(), 3.0_f32.sqrt(), epsilon = 1e-6);
    }
}
