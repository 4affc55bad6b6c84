//! An animated four-legged creature with a collar and name tag
//!
//! Body parts are fused with `smooth_min`, the collar seam is a `pipe`, and
//! the nose, eyes and collar are hard unions so they keep crisp edges. All
//! motion (breathing, leg swing, tail sway, head turn, ear twitch) warps the
//! query point; the primitives themselves never change.

use super::Stage;
use crate::camera::Camera;
use crate::environment::{MaterialStyle, Palette};
use elfshade_core::frame::{FrameContext, channels};
use elfshade_core::prelude::*;

pub const FLOOR: MaterialId = MaterialId(1);
pub const BODY: MaterialId = MaterialId(2);
pub const HEAD: MaterialId = MaterialId(3);
pub const EARS: MaterialId = MaterialId(4);
pub const NOSE: MaterialId = MaterialId(5);
pub const EYES: MaterialId = MaterialId(6);
pub const COLLAR: MaterialId = MaterialId(7);

const FLOOR_HEIGHT: f32 = -0.12;

const BODY_CENTER: Vec3 = Vec3::new(0.0, 0.9, 0.0);
const BODY_RADII: Vec3 = Vec3::new(0.85, 0.5, 0.45);

/// Hip joints with the phase of each leg's swing
const LEGS: [(Vec3, f32); 4] = [
    (Vec3::new(0.5, 0.6, 0.28), 0.0),
    (Vec3::new(0.5, 0.6, -0.28), std::f32::consts::PI),
    (Vec3::new(-0.5, 0.6, 0.28), std::f32::consts::PI),
    (Vec3::new(-0.5, 0.6, -0.28), 0.0),
];
const LEG_LENGTH: f32 = 0.6;
const LEG_RADIUS: f32 = 0.12;

const TAIL_BASE: Vec3 = Vec3::new(-0.8, 1.05, 0.0);
const TAIL_TIP: Vec3 = Vec3::new(-0.5, 0.35, 0.0);

const NECK_BASE: Vec3 = Vec3::new(0.55, 1.1, 0.0);
const NECK_RADIUS: f32 = 0.16;
/// Fraction of the neck where the collar sits
const COLLAR_AT: f32 = 0.55;
const COLLAR_THICKNESS: f32 = 0.05;

const HEAD_PIVOT: Vec3 = Vec3::new(0.75, 1.35, 0.0);
const HEAD_OFFSET: Vec3 = Vec3::new(0.22, 0.2, 0.0);
const HEAD_RADIUS: f32 = 0.36;

// Head-local, z mirrored for ears and eyes
const SNOUT_CENTER: Vec3 = Vec3::new(0.28, -0.08, 0.0);
const SNOUT_RADII: Vec3 = Vec3::new(0.22, 0.14, 0.16);
const NOSE_CENTER: Vec3 = Vec3::new(0.5, -0.04, 0.0);
const EYE_CENTER: Vec3 = Vec3::new(0.24, 0.1, 0.19);
const EAR_TIP: Vec3 = Vec3::new(-0.04, 0.58, 0.2);
const EAR_TILT: f32 = 0.25;

/// Blend sharpness per joint
const K_LIMBS: f32 = 14.0;
const K_NECK: f32 = 24.0;
const K_FACE: f32 = 18.0;

/// Distances of every part at one point
#[derive(Debug, Clone, Copy)]
pub struct Parts {
    pub floor: f32,
    pub body: f32,
    pub head: f32,
    pub ears: f32,
    pub nose: f32,
    pub eyes: f32,
    pub collar: f32,
}

/// The creature scene
#[derive(Debug, Clone, Copy, Default)]
pub struct Creature;

impl Creature {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate every part in its animated local frame
    pub fn parts(&self, p: Vec3, frame: &FrameContext<'_>) -> Parts {
        let t = frame.time;
        let low = frame.control(channels::LOW_BAND);
        let mid = frame.control(channels::MID_BAND);
        let high = frame.control(channels::HIGH_BAND);

        // Breathing: uniform scale about the body center
        let breath = 1.0 + (0.02 + 0.04 * low) * (t * 2.2).sin();
        let torso = ellipsoid(BODY_RADII).distance((p - BODY_CENTER) / breath) * breath;

        let leg = capsule(Vec3::ZERO, Vec3::new(0.0, -LEG_LENGTH, 0.0), LEG_RADIUS);
        let legs = LEGS.iter().fold(f32::MAX, |acc, &(hip, phase)| {
            let swing = 0.35 * (t * 3.0 + phase).sin();
            union(acc, leg.distance(rotate_x(p - hip, -swing)))
        });

        let sway = (0.3 + 0.7 * mid) * (t * 4.0).sin();
        let tail = capsule(Vec3::ZERO, TAIL_TIP, 0.07).distance(rotate_y(p - TAIL_BASE, -sway));

        let neck = capsule(NECK_BASE, HEAD_PIVOT, NECK_RADIUS).distance(p);
        let body = smooth_min(smooth_min(smooth_min(torso, legs, K_LIMBS), tail, K_LIMBS), neck, K_NECK);

        // Collar: a seam where the neck surface crosses a plane across it
        let neck_axis = (HEAD_PIVOT - NECK_BASE).normalize();
        let ring_center = NECK_BASE.lerp(HEAD_PIVOT, COLLAR_AT);
        let across = (p - ring_center).dot(neck_axis);
        let ring = pipe(neck, across, COLLAR_THICKNESS);
        let collar = union(ring, tag(p - ring_center));

        // Head frame turns about the pivot
        let yaw = 0.35 * (t * 0.7).sin();
        let h = rotate_y(p - HEAD_PIVOT, -yaw) - HEAD_OFFSET;
        let m = Vec3::new(h.x, h.y, h.z.abs());

        let skull = sphere(HEAD_RADIUS).distance(h);
        let snout = ellipsoid(SNOUT_RADII).distance(h - SNOUT_CENTER);
        let head = smooth_min(skull, snout, K_FACE);

        let tilt = EAR_TILT + 0.2 * high * (t * 18.0).sin();
        let ears = cone(0.4, 0.3).distance(rotate_x(m - EAR_TIP, -tilt));

        let nose = sphere(0.065).distance(h - NOSE_CENTER);
        let eyes = sphere(0.07).distance(m - EYE_CENTER);

        Parts {
            floor: p.y - FLOOR_HEIGHT,
            body,
            head,
            ears,
            nose,
            eyes,
            collar,
        }
    }
}

/// Hexagonal name tag hanging from a small loop below the collar
fn tag(q: Vec3) -> f32 {
    let hang = q - Vec3::new(0.12, -0.2, 0.0);
    let plate = hex_prism(0.07, 0.015).distance(rotate_y(hang, std::f32::consts::FRAC_PI_2));
    let loop_ = torus(0.03, 0.01).distance(rotate_z(hang - Vec3::new(0.0, 0.09, 0.0), std::f32::consts::FRAC_PI_2));
    union(plate, loop_)
}

impl Scene for Creature {
    fn sample(&self, p: Vec3, frame: &FrameContext<'_>) -> DistanceSample {
        let parts = self.parts(p, frame);

        let fused = smooth_min(parts.body, smooth_min(parts.head, parts.ears, K_FACE), K_NECK);
        let distance = [parts.floor, parts.nose, parts.eyes, parts.collar]
            .into_iter()
            .fold(fused, union);

        // Outer to inner; later entries win ties
        let material = select_material(&[
            DistanceSample::new(parts.floor, FLOOR),
            DistanceSample::new(parts.body, BODY),
            DistanceSample::new(parts.head, HEAD),
            DistanceSample::new(parts.ears, EARS),
            DistanceSample::new(parts.nose, NOSE),
            DistanceSample::new(parts.eyes, EYES),
            DistanceSample::new(parts.collar, COLLAR),
        ]);

        DistanceSample::new(distance, material)
    }
}

impl Stage for Creature {
    fn palette(&self) -> Palette {
        Palette::new()
            .with(FLOOR, MaterialStyle::new(Vec3::new(0.22, 0.2, 0.28)))
            .with(BODY, MaterialStyle::new(Vec3::new(0.85, 0.45, 0.2)))
            .with(HEAD, MaterialStyle::new(Vec3::new(0.9, 0.55, 0.3)))
            .with(EARS, MaterialStyle::new(Vec3::new(0.95, 0.62, 0.55)))
            .with(NOSE, MaterialStyle::new(Vec3::new(0.1, 0.08, 0.08)))
            .with(
                EYES,
                MaterialStyle::new(Vec3::new(0.9, 0.95, 1.0))
                    .glowing(0.6)
                    .reacting_to(channels::HIGH_BAND),
            )
            .with(
                COLLAR,
                MaterialStyle::new(Vec3::new(0.2, 0.5, 0.95))
                    .glowing(0.8)
                    .reacting_to(channels::LEVEL),
            )
    }

    fn camera(&self, frame: &FrameContext<'_>) -> Camera {
        let mut camera = Camera::look_at(Vec3::new(1.2, 1.6, 4.2), Vec3::new(0.15, 0.85, 0.0));
        camera.orbit_from_mouse(frame.mouse);
        camera
    }
}
