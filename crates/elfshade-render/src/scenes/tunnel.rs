//! Helical tunnel fly-through
//!
//! The walls are the outside of a winding tube. Rings are a single torus
//! repeated along the tube, each centered on the tube's axis at its own
//! depth. The camera rides the axis.

use super::Stage;
use crate::camera::Camera;
use crate::environment::{MaterialStyle, Palette};
use elfshade_core::frame::{FrameContext, channels};
use elfshade_core::prelude::*;
use std::f32::consts::FRAC_PI_2;

pub const WALL: MaterialId = MaterialId(1);
pub const RING: MaterialId = MaterialId(2);

const RADIUS: f32 = 1.6;
const AMPLITUDE: f32 = 0.6;
const FREQUENCY: f32 = 0.25;
const RING_SPACING: f32 = 3.0;
const RING_THICKNESS: f32 = 0.08;
/// Scene units per second
const SPEED: f32 = 2.0;

/// The tunnel scene
#[derive(Debug, Clone, Copy)]
pub struct TunnelRide {
    tube: Tunnel,
}

impl TunnelRide {
    pub fn new() -> Self {
        Self {
            tube: tunnel(RADIUS, AMPLITUDE, FREQUENCY),
        }
    }

    /// Depth of the camera at time `t`; the ride heads down -Z
    pub fn depth(t: f32, frame: &FrameContext<'_>) -> f32 {
        -t * SPEED * (1.0 + frame.control(channels::MIDI_RATE))
    }

    /// Point on the tube axis at depth `z`
    pub fn axis_point(&self, z: f32) -> Vec3 {
        self.tube.axis_at(z).extend(z)
    }
}

impl Default for TunnelRide {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for TunnelRide {
    fn sample(&self, p: Vec3, frame: &FrameContext<'_>) -> DistanceSample {
        let wall = -self.tube.distance(p);

        // Ring cross-section follows the axis at the ring's own depth
        let cell = Vec3::new(0.0, 0.0, RING_SPACING);
        let local = repeat(p, cell);
        let ring_z = p.z - local.z;
        let q = (p - self.axis_point(ring_z)).truncate().extend(local.z);
        let pulse = 0.04 * frame.control(channels::LOW_BAND);
        let ring = torus(RADIUS, RING_THICKNESS + pulse).distance(rotate_x(q, FRAC_PI_2));

        let distance = union(wall, ring);
        let material = select_material(&[
            DistanceSample::new(wall, WALL),
            DistanceSample::new(ring, RING),
        ]);

        DistanceSample::new(distance, material)
    }
}

impl Stage for TunnelRide {
    fn palette(&self) -> Palette {
        Palette::new()
            .with(WALL, MaterialStyle::new(Vec3::new(0.18, 0.12, 0.3)))
            .with(
                RING,
                MaterialStyle::new(Vec3::new(1.0, 0.45, 0.15))
                    .glowing(1.5)
                    .reacting_to(channels::LOW_BAND),
            )
    }

    fn camera(&self, frame: &FrameContext<'_>) -> Camera {
        let z = Self::depth(frame.time, frame);
        Camera::look_at(self.axis_point(z), self.axis_point(z - 2.0)).with_fov(70.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elfshade_core::frame::ControlBank;

    #[test]
    fn axis_is_open_space() {
        let ride = TunnelRide::new();
        let frame = FrameContext::new(0.0);
        for z in [0.7, -4.1, -19.3] {
            let s = ride.sample(ride.axis_point(z), &frame);
            assert!(s.distance > 0.5, "axis at {z} should be clear");
        }
    }

    #[test]
    fn beyond_the_wall_is_solid() {
        let ride = TunnelRide::new();
        let frame = FrameContext::new(0.0);
        let z = 1.4;
        let p = ride.axis_point(z) + Vec3::new(RADIUS + 0.5, 0.0, 0.0);
        let s = ride.sample(p, &frame);
        assert!(s.distance < 0.0);
        assert_eq!(s.material, WALL);
    }

    #[test]
    fn rings_repeat_along_the_axis() {
        let ride = TunnelRide::new();
        let frame = FrameContext::new(0.0);
        for k in [-2.0_f32, 0.0, 3.0] {
            let z = k * RING_SPACING;
            let on_ring = ride.axis_point(z) + Vec3::new(0.0, RADIUS - 0.02, 0.0);
            let s = ride.sample(on_ring, &frame);
            assert_eq!(s.material, RING, "ring at {z}");
            assert!(s.distance < 0.0);
        }
    }

    #[test]
    fn rings_swell_with_low_band() {
        let ride = TunnelRide::new();
        let p = ride.axis_point(0.0) + Vec3::new(0.0, RADIUS - 0.1, 0.0);
        let quiet = ride.sample(p, &FrameContext::new(0.0)).distance;

        let bank = ControlBank::default().with(channels::LOW_BAND, 1.0).unwrap();
        let loud = ride.sample(p, &FrameContext::new(0.0).with_controls(&bank)).distance;
        assert!(loud < quiet);
    }

    #[test]
    fn camera_rides_the_axis() {
        let ride = TunnelRide::new();
        let frame = FrameContext::new(2.0);
        let camera = ride.camera(&frame);
        assert!(camera.position.z < 0.0);
        assert!(ride.sample(camera.position, &frame).distance > 0.0);
        assert!(camera.forward().z < 0.0);
    }
}
