//! SDF Primitive shapes
//!
//! All primitives are centered at the origin unless their parameters say
//! otherwise. Use transforms to position them.

use super::{Aabb, Sdf};
use glam::{Vec2, Vec3};

/// Floor applied to the ellipsoid gradient term before dividing.
pub const ELLIPSOID_FLOOR: f32 = 1e-4;

// ============================================================================
// Constructor functions (ergonomic API)
// ============================================================================

/// Create a sphere with given radius
pub fn sphere(radius: f32) -> Sphere {
    Sphere::new(radius)
}

/// Create a box with given half-extents (size/2 in each direction)
pub fn box3(half_extents: Vec3) -> Box3 {
    Box3::new(half_extents)
}

/// Create a cube with given size
pub fn cube(size: f32) -> Box3 {
    Box3::new(Vec3::splat(size * 0.5))
}

/// Create an infinite Y-aligned cylinder; `c = (center_x, center_z, radius)`
pub fn cylinder(c: Vec3) -> Cylinder {
    Cylinder::new(c)
}

/// Create a capped cylinder (Y-axis aligned) with given radius and height
pub fn capped_cylinder(radius: f32, height: f32) -> CappedCylinder {
    CappedCylinder::new(radius, height)
}

/// Create a torus lying in the XZ plane; `t = (major, minor)`
pub fn torus(major_radius: f32, minor_radius: f32) -> Torus {
    Torus::new(Vec2::new(major_radius, minor_radius))
}

/// Create a capsule between two endpoints
pub fn capsule(a: Vec3, b: Vec3, radius: f32) -> Capsule {
    Capsule::new(a, b, radius)
}

/// Create a cone with its tip at the origin opening downward.
///
/// `half_angle` is measured from the Y axis.
pub fn cone(half_angle: f32, height: f32) -> Cone {
    Cone::new(Vec2::new(half_angle.sin(), half_angle.cos()), height)
}

/// Create a sphere cut by the plane `y = cut_height`, keeping the upper cap
pub fn cut_sphere(radius: f32, cut_height: f32) -> CutSphere {
    CutSphere::new(radius, cut_height)
}

/// Create the hollow shell of a cut sphere
pub fn cut_hollow_sphere(radius: f32, cut_height: f32, thickness: f32) -> CutHollowSphere {
    CutHollowSphere::new(radius, cut_height, thickness)
}

/// Create an ellipsoid with given radii
pub fn ellipsoid(radii: Vec3) -> Ellipsoid {
    Ellipsoid::new(radii)
}

/// Create a hexagonal prism along Z with the given apothem and half length
pub fn hex_prism(apothem: f32, half_length: f32) -> HexPrism {
    HexPrism::new(Vec2::new(apothem, half_length))
}

/// Create an infinite tube along Z whose axis winds around a helix
pub fn tunnel(radius: f32, amplitude: f32, frequency: f32) -> Tunnel {
    Tunnel::new(radius, amplitude, frequency)
}

// ============================================================================
// Primitive Structs
// ============================================================================

/// Sphere centered at origin
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub radius: f32,
}

impl Sphere {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl Sdf for Sphere {
    fn distance(&self, p: Vec3) -> f32 {
        p.length() - self.radius
    }

    fn bounds(&self) -> Aabb {
        Aabb::cube(self.radius)
    }
}

/// Axis-aligned box (rectangular prism)
#[derive(Debug, Clone, Copy)]
pub struct Box3 {
    pub half_extents: Vec3,
}

impl Box3 {
    pub fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }
}

impl Sdf for Box3 {
    fn distance(&self, p: Vec3) -> f32 {
        let q = p.abs() - self.half_extents;
        q.max(Vec3::ZERO).length() + q.x.max(q.y.max(q.z)).min(0.0)
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(-self.half_extents, self.half_extents)
    }
}

/// Infinite cylinder parallel to the Y axis.
///
/// The axis passes through `(c.x, _, c.y)` and `c.z` is the radius.
#[derive(Debug, Clone, Copy)]
pub struct Cylinder {
    pub c: Vec3,
}

impl Cylinder {
    pub fn new(c: Vec3) -> Self {
        Self { c }
    }
}

impl Sdf for Cylinder {
    fn distance(&self, p: Vec3) -> f32 {
        (Vec2::new(p.x, p.z) - Vec2::new(self.c.x, self.c.y)).length() - self.c.z
    }

    fn bounds(&self) -> Aabb {
        let r = self.c.z;
        Aabb::new(
            Vec3::new(self.c.x - r, -1000.0, self.c.y - r),
            Vec3::new(self.c.x + r, 1000.0, self.c.y + r),
        )
    }
}

/// Cylinder aligned with Y axis, capped at both ends
#[derive(Debug, Clone, Copy)]
pub struct CappedCylinder {
    pub radius: f32,
    pub half_height: f32,
}

impl CappedCylinder {
    pub fn new(radius: f32, height: f32) -> Self {
        Self {
            radius,
            half_height: height * 0.5,
        }
    }
}

impl Sdf for CappedCylinder {
    fn distance(&self, p: Vec3) -> f32 {
        let d = Vec2::new(Vec2::new(p.x, p.z).length(), p.y).abs()
            - Vec2::new(self.radius, self.half_height);
        d.x.max(d.y).min(0.0) + d.max(Vec2::ZERO).length()
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(
            Vec3::new(-self.radius, -self.half_height, -self.radius),
            Vec3::new(self.radius, self.half_height, self.radius),
        )
    }
}

/// Torus (donut) lying in the XZ plane; `t = (major, minor)`
#[derive(Debug, Clone, Copy)]
pub struct Torus {
    pub t: Vec2,
}

impl Torus {
    pub fn new(t: Vec2) -> Self {
        Self { t }
    }
}

impl Sdf for Torus {
    fn distance(&self, p: Vec3) -> f32 {
        let q = Vec2::new(Vec2::new(p.x, p.z).length() - self.t.x, p.y);
        q.length() - self.t.y
    }

    fn bounds(&self) -> Aabb {
        let r = self.t.x + self.t.y;
        Aabb::new(Vec3::new(-r, -self.t.y, -r), Vec3::new(r, self.t.y, r))
    }
}

/// Capsule: every point within `radius` of the segment `a..b`
#[derive(Debug, Clone, Copy)]
pub struct Capsule {
    pub a: Vec3,
    pub b: Vec3,
    pub radius: f32,
}

impl Capsule {
    pub fn new(a: Vec3, b: Vec3, radius: f32) -> Self {
        Self { a, b, radius }
    }
}

impl Sdf for Capsule {
    fn distance(&self, p: Vec3) -> f32 {
        let pa = p - self.a;
        let ba = self.b - self.a;
        let len2 = ba.length_squared();
        // Degenerate segment collapses to a sphere around `a`
        let h = if len2 > f32::EPSILON {
            (pa.dot(ba) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (pa - ba * h).length() - self.radius
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(self.a.min(self.b), self.a.max(self.b)).expand(self.radius)
    }
}

/// Cone with its tip at the origin and its base disk at `y = -height`.
///
/// `c` is `(sin, cos)` of the half angle.
#[derive(Debug, Clone, Copy)]
pub struct Cone {
    pub c: Vec2,
    pub height: f32,
}

impl Cone {
    pub fn new(c: Vec2, height: f32) -> Self {
        Self { c, height }
    }
}

impl Sdf for Cone {
    fn distance(&self, p: Vec3) -> f32 {
        let q = self.height * Vec2::new(self.c.x / self.c.y.max(ELLIPSOID_FLOOR), -1.0);
        let w = Vec2::new(Vec2::new(p.x, p.z).length(), p.y);
        let a = w - q * (w.dot(q) / q.dot(q)).clamp(0.0, 1.0);
        let b = w - q * Vec2::new((w.x / q.x).clamp(0.0, 1.0), 1.0);
        let k = q.y.signum();
        let d = a.dot(a).min(b.dot(b));
        let s = (k * (w.x * q.y - w.y * q.x)).max(k * (w.y - q.y));
        d.sqrt() * s.signum()
    }

    fn bounds(&self) -> Aabb {
        let r = self.height * self.c.x / self.c.y.max(ELLIPSOID_FLOOR);
        Aabb::new(Vec3::new(-r, -self.height, -r), Vec3::new(r, 0.0, r))
    }
}

/// Sphere sliced by the plane `y = cut_height`, keeping the cap above it
#[derive(Debug, Clone, Copy)]
pub struct CutSphere {
    pub radius: f32,
    pub cut_height: f32,
}

impl CutSphere {
    pub fn new(radius: f32, cut_height: f32) -> Self {
        Self { radius, cut_height }
    }
}

impl Sdf for CutSphere {
    fn distance(&self, p: Vec3) -> f32 {
        let (r, h) = (self.radius, self.cut_height);
        let w = (r * r - h * h).max(0.0).sqrt();
        let q = Vec2::new(Vec2::new(p.x, p.z).length(), p.y);
        let s = ((h - r) * q.x * q.x + w * w * (h + r - 2.0 * q.y)).max(h * q.x - w * q.y);

        if s < 0.0 {
            // Closest feature is the spherical surface
            q.length() - r
        } else if q.x < w {
            // Projects inside the cut disk
            h - q.y
        } else {
            // Closest feature is the rim circle
            (q - Vec2::new(w, h)).length()
        }
    }

    fn bounds(&self) -> Aabb {
        let r = self.radius;
        Aabb::new(Vec3::new(-r, self.cut_height.max(-r), -r), Vec3::splat(r))
    }
}

/// Shell of thickness `thickness` around the part of a sphere's surface that
/// lies below the plane `y = cut_height`.
///
/// Unlike [`CutSphere`], which keeps the cap above the cut, this keeps the
/// bowl: the rim sits on the cut plane and the shell opens upward.
#[derive(Debug, Clone, Copy)]
pub struct CutHollowSphere {
    pub radius: f32,
    pub cut_height: f32,
    pub thickness: f32,
}

impl CutHollowSphere {
    pub fn new(radius: f32, cut_height: f32, thickness: f32) -> Self {
        Self {
            radius,
            cut_height,
            thickness,
        }
    }
}

impl Sdf for CutHollowSphere {
    fn distance(&self, p: Vec3) -> f32 {
        let (r, h) = (self.radius, self.cut_height);
        let w = (r * r - h * h).max(0.0).sqrt();
        let q = Vec2::new(Vec2::new(p.x, p.z).length(), p.y);

        if h * q.x < w * q.y {
            // Above the cone through the rim: nearest is the rim circle
            (q - Vec2::new(w, h)).length() - self.thickness
        } else {
            (q.length() - r).abs() - self.thickness
        }
    }

    fn bounds(&self) -> Aabb {
        Aabb::cube(self.radius + self.thickness)
    }
}

/// Ellipsoid (stretched sphere).
///
/// This is NOT an exact distance: `k0 * (k0 - 1) / k1` is a bound that is
/// exact on the surface and along the axes and conservative elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct Ellipsoid {
    pub radii: Vec3,
}

impl Ellipsoid {
    pub fn new(radii: Vec3) -> Self {
        Self { radii }
    }
}

impl Sdf for Ellipsoid {
    fn distance(&self, p: Vec3) -> f32 {
        let k0 = (p / self.radii).length();
        let k1 = (p / (self.radii * self.radii)).length();
        k0 * (k0 - 1.0) / k1.max(ELLIPSOID_FLOOR)
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(-self.radii, self.radii)
    }
}

/// Hexagonal prism along the Z axis; `h = (apothem, half_length)`
#[derive(Debug, Clone, Copy)]
pub struct HexPrism {
    pub h: Vec2,
}

impl HexPrism {
    pub fn new(h: Vec2) -> Self {
        Self { h }
    }
}

impl Sdf for HexPrism {
    fn distance(&self, p: Vec3) -> f32 {
        const K: Vec3 = Vec3::new(-0.866025404, 0.5, 0.577350269);
        let p = p.abs();
        let k = Vec2::new(K.x, K.y);
        let xy = Vec2::new(p.x, p.y);
        let xy = xy - 2.0 * k.dot(xy).min(0.0) * k;
        let d = Vec2::new(
            (xy - Vec2::new(xy.x.clamp(-K.z * self.h.x, K.z * self.h.x), self.h.x)).length()
                * (xy.y - self.h.x).signum(),
            p.z - self.h.y,
        );
        d.x.max(d.y).min(0.0) + d.max(Vec2::ZERO).length()
    }

    fn bounds(&self) -> Aabb {
        // Circumradius is apothem / cos(30 deg)
        let r = self.h.x * 1.154700538;
        Aabb::new(Vec3::new(-r, -r, -self.h.y), Vec3::new(r, r, self.h.y))
    }
}

/// Infinite tube along Z whose axis follows `amplitude * (cos fz, sin fz)`.
///
/// Exact when `amplitude` is zero. With a helical offset the value is an
/// approximate bound that overestimates by at most a factor of
/// `sqrt(1 + (amplitude * frequency)^2)`; march with `bias` below one.
#[derive(Debug, Clone, Copy)]
pub struct Tunnel {
    pub radius: f32,
    pub amplitude: f32,
    pub frequency: f32,
}

impl Tunnel {
    pub fn new(radius: f32, amplitude: f32, frequency: f32) -> Self {
        Self {
            radius,
            amplitude,
            frequency,
        }
    }

    /// Center of the tube cross-section at depth `z`
    pub fn axis_at(&self, z: f32) -> Vec2 {
        let a = self.frequency * z;
        self.amplitude * Vec2::new(a.cos(), a.sin())
    }
}

impl Sdf for Tunnel {
    fn distance(&self, p: Vec3) -> f32 {
        (Vec2::new(p.x, p.y) - self.axis_at(p.z)).length() - self.radius
    }

    fn bounds(&self) -> Aabb {
        let r = self.radius + self.amplitude.abs();
        Aabb::new(Vec3::new(-r, -r, -1000.0), Vec3::new(r, r, 1000.0))
    }
}

// ============================================================================
// Tests
// ============================================================================
