//! Pinhole camera that turns pixels into rays

use elfshade_core::march::Ray;
use elfshade_core::sdf::Aabb;
use glam::{Vec2, Vec3};

/// A simple orbital camera that orbits around a target point
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Point the camera is looking at
    pub target: Vec3,
    /// Up vector (usually Y-up)
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 45.0_f32.to_radians(),
        }
    }
}

impl Camera {
    /// Create a camera looking at a target from a position
    pub fn look_at(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Default::default()
        }
    }

    pub fn with_fov(mut self, degrees: f32) -> Self {
        self.fov = degrees.to_radians();
        self
    }

    /// Get the forward direction (normalized)
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z)
    }

    /// Get the right direction (normalized)
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).try_normalize().unwrap_or(Vec3::X)
    }

    /// Get the actual up direction (may differ from self.up due to camera orientation)
    pub fn actual_up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    /// Get distance from camera to target
    pub fn distance(&self) -> f32 {
        (self.position - self.target).length()
    }

    /// Ray through a point on the image plane.
    ///
    /// `ndc` runs from `-1` (left, bottom) to `1` (right, top); `aspect` is
    /// width over height.
    pub fn ray(&self, ndc: Vec2, aspect: f32) -> Ray {
        let half_height = (self.fov * 0.5).tan();
        let half_width = half_height * aspect;
        let direction = self.forward()
            + self.right() * (ndc.x * half_width)
            + self.actual_up() * (ndc.y * half_height);
        Ray::new(self.position, direction)
    }

    /// Ray through the center of pixel `(x, y)`, with `y` growing downward
    pub fn pixel_ray(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        let ndc = pixel_to_ndc(x, y, width, height);
        self.ray(ndc, width as f32 / height.max(1) as f32)
    }

    /// Orbit around the target point
    ///
    /// - `delta_x`: Horizontal rotation (positive = rotate right)
    /// - `delta_y`: Vertical rotation (positive = rotate up)
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        let radius = self.distance();
        if radius <= f32::EPSILON {
            return;
        }

        // Get spherical coordinates
        let offset = self.position - self.target;
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-0.999, 0.999).acos();

        theta -= delta_x;
        phi = (phi - delta_y).clamp(0.01, std::f32::consts::PI - 0.01);

        // Convert back to cartesian
        self.position = self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
    }

    /// Orbit by a normalized pointer position; the center `(0.5, 0.5)` leaves
    /// the camera where it is, the edges turn it by half a revolution
    /// horizontally and a quarter vertically
    pub fn orbit_from_mouse(&mut self, mouse: Vec2) {
        let delta = mouse - Vec2::splat(0.5);
        self.orbit(
            delta.x * std::f32::consts::TAU,
            delta.y * std::f32::consts::PI,
        );
    }

    /// Frame a bounding box (adjust camera to see the entire object)
    pub fn frame_bounds(&mut self, bounds: &Aabb, padding: f32) {
        let center = bounds.center();
        let radius = bounds.bounding_radius();
        let distance = (radius * (1.0 + padding)) / (self.fov * 0.5).sin();

        let dir = (self.position - self.target)
            .try_normalize()
            .unwrap_or(Vec3::Z);
        self.target = center;
        self.position = center + dir * distance;
    }
}

/// Map a pixel center onto `[-1, 1]` with `y` up
pub fn pixel_to_ndc(x: u32, y: u32, width: u32, height: u32) -> Vec2 {
    let w = width.max(1) as f32;
    let h = height.max(1) as f32;
    Vec2::new(
        (x as f32 + 0.5) / w * 2.0 - 1.0,
        1.0 - (y as f32 + 0.5) / h * 2.0,
    )
}
