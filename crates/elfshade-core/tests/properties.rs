//! Kernel-wide properties: primitive signs, combinator identities,
//! repetition, marching and normals.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::float_cmp)]

use approx::assert_relative_eq;
use elfshade_core::prelude::*;
use std::f32::consts::{FRAC_PI_4, FRAC_PI_6};

const SURFACE_TOL: f32 = 1e-4;

struct Case {
    name: &'static str,
    shape: SdfNode,
    surface: Vec<Vec3>,
    inside: Vec3,
    outside: Vec3,
}

fn case<S: Sdf + 'static>(
    name: &'static str,
    shape: S,
    surface: Vec<Vec3>,
    inside: Vec3,
    outside: Vec3,
) -> Case {
    Case {
        name,
        shape: SdfNode::new(shape),
        surface,
        inside,
        outside,
    }
}

fn primitive_cases() -> Vec<Case> {
    let cut_w = (1.0_f32 - 0.36).sqrt();
    let cone_r = 2.0 * FRAC_PI_6.tan();
    vec![
        case(
            "sphere",
            sphere(2.0),
            vec![Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -2.0), Vec3::ONE.normalize() * 2.0],
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(0.0, 3.0, 0.0),
        ),
        case(
            "box",
            box3(Vec3::new(0.5, 1.0, 1.5)),
            vec![Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.1, -1.0, 0.2), Vec3::new(0.0, 0.0, 1.5)],
            Vec3::new(0.25, 0.5, -1.0),
            Vec3::new(0.0, 0.0, 2.0),
        ),
        case(
            "cylinder",
            cylinder(Vec3::new(0.0, 0.0, 1.0)),
            vec![Vec3::new(1.0, 5.0, 0.0), Vec3::new(0.0, -3.0, -1.0), Vec3::new(0.6, 0.0, 0.8)],
            Vec3::new(0.0, 40.0, 0.0),
            Vec3::new(1.5, 0.0, 0.0),
        ),
        case(
            "capped cylinder",
            capped_cylinder(1.0, 3.0),
            vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.5, 0.5), Vec3::new(0.0, -1.5, 0.0)],
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ),
        case(
            "torus",
            torus(2.0, 0.5),
            vec![Vec3::new(2.5, 0.0, 0.0), Vec3::new(0.0, 0.5, 2.0), Vec3::new(-1.5, 0.0, 0.0)],
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::ZERO,
        ),
        case(
            "capsule",
            capsule(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 0.5),
            vec![Vec3::new(0.0, 0.5, 0.0), Vec3::new(1.5, 0.0, 0.0), Vec3::new(-1.0, 0.0, -0.5)],
            Vec3::new(0.9, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ),
        case(
            "cone",
            cone(FRAC_PI_6, 2.0),
            vec![Vec3::ZERO, Vec3::new(0.0, -2.0, 0.1), Vec3::new(cone_r * 0.5, -1.0, 0.0)],
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, 0.5, 0.0),
        ),
        case(
            "cut sphere",
            cut_sphere(1.0, 0.6),
            vec![Vec3::new(0.0, 0.6, 0.3), Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.6, cut_w)],
            Vec3::new(0.0, 0.8, 0.0),
            Vec3::new(0.0, 0.2, 0.0),
        ),
        case(
            "cut hollow sphere",
            cut_hollow_sphere(1.0, 0.6, 0.05),
            vec![Vec3::new(1.05, 0.0, 0.0), Vec3::new(0.0, -0.95, 0.0), Vec3::new(cut_w, 0.65, 0.0)],
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::ZERO,
        ),
        case(
            "ellipsoid",
            ellipsoid(Vec3::new(2.0, 1.0, 0.5)),
            vec![Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, -0.5)],
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ),
        case(
            "hex prism",
            hex_prism(1.0, 0.5),
            vec![Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.2, 0.1, 0.5), Vec3::new(0.866025404, 0.5, 0.0)],
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 1.0),
        ),
        case(
            "tunnel",
            tunnel(1.0, 0.0, 1.0),
            vec![Vec3::new(1.0, 0.0, 3.0), Vec3::new(0.0, -1.0, -8.0), Vec3::new(0.6, 0.8, 0.0)],
            Vec3::new(0.0, 0.0, 100.0),
            Vec3::new(2.0, 0.0, 0.0),
        ),
    ]
}

// ============================================================================
// Primitives
// ============================================================================

#[test]
fn primitive_surface_points_are_zero() {
    for c in primitive_cases() {
        assert!(c.surface.len() >= 3, "{} needs three surface points", c.name);
        for p in &c.surface {
            let d = c.shape.distance(*p);
            assert!(d.abs() < SURFACE_TOL, "{}: distance {d} at surface point {p:?}", c.name);
        }
    }
}

#[test]
fn primitive_inside_negative_outside_positive() {
    for c in primitive_cases() {
        let inside = c.shape.distance(c.inside);
        let outside = c.shape.distance(c.outside);
        assert!(inside < 0.0, "{}: inside point gave {inside}", c.name);
        assert!(outside > 0.0, "{}: outside point gave {outside}", c.name);
    }
}

// ============================================================================
// Combinators
// ============================================================================

/// Deterministic values in `[-4, 4)`
fn pseudo_random_pairs(count: usize) -> Vec<(f32, f32)> {
    let mut state: u32 = 0x9e37_79b9;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state as f32 / u32::MAX as f32) * 8.0 - 4.0
    };
    (0..count).map(|_| (next(), next())).collect()
}

#[test]
fn boolean_identities() {
    let pairs = pseudo_random_pairs(256);
    assert!(pairs.iter().any(|&(a, b)| a < 0.0 && b < 0.0));
    for (a, b) in pairs {
        assert_eq!(union(a, b), a.min(b));
        assert_eq!(intersection(a, b), a.max(b));
        assert_eq!(difference(a, b), a.max(-b));
    }
}

#[test]
fn smooth_min_approaches_min() {
    // Stays under the ln(1e4) / k cap for every k below
    let (a, b) = (-0.2_f32, 0.05_f32);
    let err = |k: f32| (smooth_min(a, b, k) - a.min(b)).abs();
    assert!(err(1000.0) < err(1.0));

    let mut previous = f32::INFINITY;
    for k in [0.5, 1.0, 2.0, 4.0, 8.0, 16.0, 64.0, 256.0] {
        let e = err(k);
        assert!(e <= previous, "error grew at k = {k}");
        previous = e;
    }
    assert!(err(1000.0) < 1e-4);
}

// ============================================================================
// Repetition
// ============================================================================

#[test]
fn repetition_is_periodic_on_every_axis() {
    let cell = Vec3::new(2.0, 0.5, 4.0);
    let shape = torus(0.15, 0.05).rotate_x(FRAC_PI_4).repeat(cell);
    let p = Vec3::new(0.25, 0.125, -0.75);
    let base = shape.distance(p);

    for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
        for n in -3..=3 {
            let shifted = p + axis * cell * n as f32;
            assert_relative_eq!(shape.distance(shifted), base, epsilon = 1e-5);
        }
    }
}

// ============================================================================
// Marching and normals
// ============================================================================

const SPHERE_MATERIAL: MaterialId = MaterialId(7);

#[test]
fn marcher_hits_unit_sphere() {
    let scene = sphere(1.0).with_material(SPHERE_MATERIAL);
    let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
    let config = MarchConfig::default();

    let result = march(&scene, &ray, &FrameContext::new(0.0), &config);

    assert!(result.is_hit());
    assert_eq!(result.outcome, MarchOutcome::Hit);
    assert_eq!(result.material, SPHERE_MATERIAL);
    assert_relative_eq!(result.distance, 9.0, epsilon = 10.0 * config.epsilon);
    assert!(result.steps <= config.max_steps);
}

#[test]
fn marcher_miss_reports_far_and_no_material() {
    let scene = sphere(1.0).with_material(SPHERE_MATERIAL);
    let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::NEG_Z);
    let config = MarchConfig::default();

    let result = march(&scene, &ray, &FrameContext::new(0.0), &config);

    assert_eq!(result.outcome, MarchOutcome::Miss);
    assert_eq!(result.distance, config.far);
    assert_eq!(result.material, MaterialId::NONE);
}

/// A field that always reports the same distance, never reaching a surface
struct Hover(f32);

impl Scene for Hover {
    fn sample(&self, _p: Vec3, _frame: &FrameContext<'_>) -> DistanceSample {
        DistanceSample::new(self.0, MaterialId(1))
    }
}

#[test]
fn marcher_stops_after_step_budget() {
    let config = MarchConfig {
        far: 1.0e6,
        max_steps: 64,
        ..MarchConfig::default()
    };
    let scene = Hover(2.0 * config.epsilon);

    let result = march(&scene, &Ray::new(Vec3::ZERO, Vec3::X), &FrameContext::new(0.0), &config);

    assert_eq!(result.outcome, MarchOutcome::Miss);
    assert_eq!(result.steps, config.max_steps);
    assert_eq!(result.distance, config.far);
    assert_eq!(result.material, MaterialId::NONE);
}

#[test]
fn sphere_normals_point_outward() {
    let scene = sphere(1.0).with_material(SPHERE_MATERIAL);
    let frame = FrameContext::new(0.0);
    let points = [
        Vec3::X,
        Vec3::NEG_Y,
        Vec3::Z,
        Vec3::new(1.0, 1.0, 1.0).normalize(),
        Vec3::new(-0.3, 0.8, -0.5).normalize(),
    ];
    for p in points {
        let n = estimate_normal(&scene, p, &frame, 1e-3);
        assert_relative_eq!(n.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(n.dot(p.normalize()), 1.0, epsilon = 1e-4);
    }
}
