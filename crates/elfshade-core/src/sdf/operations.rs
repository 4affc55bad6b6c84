//! SDF Operations - Boolean, blending and seam combinators
//!
//! The scalar functions here are what scene composers call directly. The node
//! structs apply the same functions to child shapes.

use super::{Aabb, Sdf};
use glam::{Vec2, Vec3};

/// Floor applied to the log argument of [`smooth_min`].
pub const SMOOTH_MIN_FLOOR: f32 = 1e-4;

// ============================================================================
// Scalar combinators
// ============================================================================

/// Union of two distances (closest surface wins)
#[inline]
pub fn union(a: f32, b: f32) -> f32 {
    a.min(b)
}

/// Intersection of two distances (keep the overlap)
#[inline]
pub fn intersection(a: f32, b: f32) -> f32 {
    a.max(b)
}

/// Difference: carve `b` out of `a`
#[inline]
pub fn difference(a: f32, b: f32) -> f32 {
    a.max(-b)
}

/// Linear crossfade, `alpha * a + (1 - alpha) * b`.
///
/// The result is not a true distance field. Use it for gradual trait morphs,
/// not for precise geometry.
#[inline]
pub fn blend(a: f32, b: f32, alpha: f32) -> f32 {
    alpha * a + (1.0 - alpha) * b
}

/// Exponential smooth minimum with sharpness `k`.
///
/// Equal to `-ln(max(1e-4, exp(-k a) + exp(-k b))) / k`. The sum is taken as
/// a log-sum-exp around `min(a, b)` so the exponent is never positive, and the
/// floor becomes a cap of `ln(1e4) / k` on the result. Far from both shapes
/// the field therefore reads the cap instead of the true distance. The result
/// never exceeds `min(a, b)`; below the cap it approaches `min(a, b)` as `k`
/// grows. A non-positive `k` is a hard minimum.
#[inline]
pub fn smooth_min(a: f32, b: f32, k: f32) -> f32 {
    if k <= 0.0 {
        return a.min(b);
    }
    let m = a.min(b);
    let fused = m - (1.0 + (-k * (a - b).abs()).exp()).ln() / k;
    fused.min(-SMOOTH_MIN_FLOOR.ln() / k)
}

/// Rounded groove of radius `r` along the curve where `a` and `b` both vanish
#[inline]
pub fn pipe(a: f32, b: f32, r: f32) -> f32 {
    Vec2::new(a, b).length() - r
}

// ============================================================================
// Boolean Operations
// ============================================================================

/// Union of two SDFs (combine shapes)
pub struct Union<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf, B: Sdf> Union<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf, B: Sdf> Sdf for Union<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        union(self.a.distance(p), self.b.distance(p))
    }

    fn bounds(&self) -> Aabb {
        self.a.bounds().union(&self.b.bounds())
    }
}

/// Subtraction of two SDFs (cut B from A)
pub struct Subtract<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf, B: Sdf> Subtract<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf, B: Sdf> Sdf for Subtract<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        difference(self.a.distance(p), self.b.distance(p))
    }

    fn bounds(&self) -> Aabb {
        self.a.bounds()
    }
}

/// Intersection of two SDFs (keep only overlap)
pub struct Intersect<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf, B: Sdf> Intersect<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf, B: Sdf> Sdf for Intersect<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        intersection(self.a.distance(p), self.b.distance(p))
    }

    fn bounds(&self) -> Aabb {
        let (a, b) = (self.a.bounds(), self.b.bounds());
        Aabb::new(a.min.max(b.min), a.max.min(b.max).max(a.min.max(b.min)))
    }
}

// ============================================================================
// Soft Operations
// ============================================================================

/// Exponential smooth union
pub struct SmoothUnion<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
    pub k: f32,
}

impl<A: Sdf, B: Sdf> SmoothUnion<A, B> {
    pub fn new(a: A, b: B, k: f32) -> Self {
        Self { a, b, k }
    }
}

impl<A: Sdf, B: Sdf> Sdf for SmoothUnion<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        smooth_min(self.a.distance(p), self.b.distance(p), self.k)
    }

    fn bounds(&self) -> Aabb {
        // The blend bulges by at most ln(2)/k where the two surfaces meet
        let bulge = if self.k > 0.0 {
            std::f32::consts::LN_2 / self.k
        } else {
            0.0
        };
        self.a.bounds().union(&self.b.bounds()).expand(bulge)
    }
}

/// Linear crossfade between two SDFs
pub struct Blend<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
    pub alpha: f32,
}

impl<A: Sdf, B: Sdf> Blend<A, B> {
    pub fn new(a: A, b: B, alpha: f32) -> Self {
        Self { a, b, alpha }
    }
}

impl<A: Sdf, B: Sdf> Sdf for Blend<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        blend(self.a.distance(p), self.b.distance(p), self.alpha)
    }

    fn bounds(&self) -> Aabb {
        self.a.bounds().union(&self.b.bounds())
    }
}

/// Pipe seam between two SDFs
pub struct Pipe<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
    pub radius: f32,
}

impl<A: Sdf, B: Sdf> Pipe<A, B> {
    pub fn new(a: A, b: B, radius: f32) -> Self {
        Self { a, b, radius }
    }
}

impl<A: Sdf, B: Sdf> Sdf for Pipe<A, B> {
    fn distance(&self, p: Vec3) -> f32 {
        pipe(self.a.distance(p), self.b.distance(p), self.radius)
    }

    fn bounds(&self) -> Aabb {
        // The seam lies on the surface of `a`
        self.a.bounds().expand(self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::primitives::sphere;
    use crate::sdf::SdfExt;
    use approx::assert_relative_eq;

    #[test]
    fn smooth_min_matches_direct_formula() {
        let (a, b, k) = (0.3_f32, 0.45_f32, 6.0_f32);
        let direct = -((-k * a).exp() + (-k * b).exp()).max(SMOOTH_MIN_FLOOR).ln() / k;
        assert_relative_eq!(smooth_min(a, b, k), direct, epsilon = 1e-5);
    }

    #[test]
    fn smooth_min_never_exceeds_min() {
        for &(a, b) in &[(0.1, 0.2), (-1.0, 3.0), (2.0, 2.0), (-0.5, -0.7)] {
            assert!(smooth_min(a, b, 4.0) <= a.min(b));
        }
    }

    #[test]
    fn smooth_min_is_finite_for_huge_sharpness() {
        let d = smooth_min(40.0, 50.0, 1.0e4);
        assert!(d.is_finite());
        assert_relative_eq!(d, -SMOOTH_MIN_FLOOR.ln() / 1.0e4, epsilon = 1e-7);
        assert_relative_eq!(smooth_min(-40.0, -50.0, 1.0e4), -50.0, epsilon = 1e-4);
    }

    #[test]
    fn far_distances_are_capped_by_the_floor() {
        // exp(-16) + exp(-16) is below the floor
        assert_relative_eq!(smooth_min(2.0, 2.0, 8.0), 1.151_292_6, epsilon = 1e-5);
        assert_relative_eq!(smooth_min(10.0, 10.0, 1.0), 9.210_340, epsilon = 1e-4);

        let (a, b, k) = (1.0_f32, 1.5_f32, 14.0_f32);
        let direct = -((-k * a).exp() + (-k * b).exp()).max(SMOOTH_MIN_FLOOR).ln() / k;
        assert_relative_eq!(smooth_min(a, b, k), direct, epsilon = 1e-5);
        assert_relative_eq!(direct, 0.657_881_4, epsilon = 1e-5);
    }

    #[test]
    fn smooth_min_equal_inputs_dips_by_ln2() {
        let k = 8.0;
        assert_relative_eq!(smooth_min(1.0, 1.0, k), 1.0 - 2.0_f32.ln() / k, epsilon = 1e-6);
    }

    #[test]
    fn non_positive_sharpness_is_hard_min() {
        assert_eq!(smooth_min(0.25, -0.5, 0.0), -0.5);
        assert_eq!(smooth_min(0.25, 0.75, -3.0), 0.25);
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(2.0, 5.0, 1.0), 2.0);
        assert_eq!(blend(2.0, 5.0, 0.0), 5.0);
        assert_relative_eq!(blend(2.0, 4.0, 0.25), 3.5, epsilon = 1e-6);
    }

    #[test]
    fn pipe_is_zero_on_the_ring() {
        assert_relative_eq!(pipe(0.3, 0.4, 0.5), 0.0, epsilon = 1e-6);
        assert!(pipe(0.0, 0.0, 0.1) < 0.0);
    }

    #[test]
    fn pipe_node_traces_intersection_circle() {
        // Sphere surface meets the XZ plane on the unit circle
        let seam = sphere(1.0).pipe(super::super::primitives::box3(Vec3::new(5.0, 0.0, 5.0)), 0.1);
        assert!(seam.distance(Vec3::new(1.0, 0.0, 0.0)) < 0.0);
        assert_relative_eq!(seam.distance(Vec3::new(1.1, 0.0, 0.0)), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn intersect_bounds_shrink_to_overlap() {
        let shape = Intersect::new(sphere(1.0), sphere(1.0).translate(1.0, 0.0, 0.0));
        let b = shape.bounds();
        assert_relative_eq!(b.min.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(b.max.x, 1.0, epsilon = 1e-6);
    }
}
