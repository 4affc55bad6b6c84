//! Orbitable viewer for a single primitive
//!
//! The shape spins about an axis that itself drifts over time, so the
//! rotation goes through the generic axis-angle warp. Optional domain
//! repetition tiles the shape into an endless lattice.

use super::Stage;
use crate::camera::Camera;
use crate::environment::{MaterialStyle, Palette};
use crate::{Error, Result};
use elfshade_core::frame::{FrameContext, channels};
use elfshade_core::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const SHAPE: MaterialId = MaterialId(1);

/// Which primitive the viewer shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Sphere,
    #[default]
    Box,
    Cylinder,
    Torus,
    Capsule,
    Cone,
    CutSphere,
    CutHollowSphere,
    Ellipsoid,
    HexPrism,
    /// Box crossfading into a sphere, driven by the morph channel
    Morph,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 11] = [
        Self::Sphere,
        Self::Box,
        Self::Cylinder,
        Self::Torus,
        Self::Capsule,
        Self::Cone,
        Self::CutSphere,
        Self::CutHollowSphere,
        Self::Ellipsoid,
        Self::HexPrism,
        Self::Morph,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Box => "box",
            Self::Cylinder => "cylinder",
            Self::Torus => "torus",
            Self::Capsule => "capsule",
            Self::Cone => "cone",
            Self::CutSphere => "cut-sphere",
            Self::CutHollowSphere => "cut-hollow-sphere",
            Self::Ellipsoid => "ellipsoid",
            Self::HexPrism => "hex-prism",
            Self::Morph => "morph",
        }
    }

    /// Build the shape, sized to fit roughly in a unit sphere
    pub fn build(self) -> SdfNode {
        match self {
            Self::Sphere => SdfNode::new(sphere(1.0)),
            Self::Box | Self::Morph => SdfNode::new(box3(Vec3::splat(0.75))),
            Self::Cylinder => SdfNode::new(capped_cylinder(0.6, 1.6)),
            Self::Torus => SdfNode::new(torus(0.8, 0.25)),
            Self::Capsule => SdfNode::new(capsule(Vec3::new(0.0, -0.6, 0.0), Vec3::new(0.0, 0.6, 0.0), 0.4)),
            // Tip up, centered on its height
            Self::Cone => cone(0.5, 1.5).translate(0.0, 0.75, 0.0),
            Self::CutSphere => SdfNode::new(cut_sphere(1.0, -0.3)),
            Self::CutHollowSphere => SdfNode::new(cut_hollow_sphere(1.0, 0.4, 0.06)),
            Self::Ellipsoid => SdfNode::new(ellipsoid(Vec3::new(1.0, 0.6, 0.8))),
            Self::HexPrism => SdfNode::new(hex_prism(0.7, 0.5)),
        }
    }
}

impl FromStr for ShapeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|k| k.name()).collect();
                Error::InvalidParameter(format!(
                    "unknown shape '{}', expected one of: {}",
                    s,
                    names.join(", ")
                ))
            })
    }
}

/// Viewer scene settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    pub shape: ShapeKind,
    /// Radians per second at zero modulation
    pub spin_speed: f32,
    /// Tile size per axis; `None` shows a single shape
    pub repeat: Option<[f32; 3]>,
    /// Surface color (RGB, 0-1)
    pub color: [f32; 3],
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            shape: ShapeKind::default(),
            spin_speed: 0.6,
            repeat: None,
            color: [0.75, 0.75, 0.75],
        }
    }
}

/// The shape viewer scene
#[derive(Debug, Clone)]
pub struct Viewer {
    options: ViewerOptions,
    shape: SdfNode,
    morph_target: Option<SdfNode>,
}

impl Viewer {
    pub fn new(options: ViewerOptions) -> Self {
        let shape = options.shape.build();
        let morph_target = (options.shape == ShapeKind::Morph).then(|| SdfNode::new(sphere(1.0)));
        Self {
            options,
            shape,
            morph_target,
        }
    }

    /// Axis the shape spins about at time `t`
    pub fn spin_axis(t: f32) -> Vec3 {
        Vec3::new((0.3 * t).sin(), 1.0, 0.5 * (0.5 * t).cos())
    }
}

impl Scene for Viewer {
    fn sample(&self, p: Vec3, frame: &FrameContext<'_>) -> DistanceSample {
        let t = frame.time;
        let rate = 1.0 + 2.0 * frame.control(channels::MIDI_RATE);

        let tiled = match self.options.repeat {
            Some(cell) => repeat(p, Vec3::from(cell)),
            None => p,
        };
        let q = rotate_axis(tiled, Self::spin_axis(t), -t * self.options.spin_speed * rate);

        let d = match &self.morph_target {
            Some(target) => {
                let morph = frame.control(channels::MIDI_MORPH);
                blend(self.shape.distance(q), target.distance(q), 1.0 - morph)
            }
            None => self.shape.distance(q),
        };

        DistanceSample::new(d, SHAPE)
    }
}

impl Stage for Viewer {
    fn palette(&self) -> Palette {
        Palette::new().with(
            SHAPE,
            MaterialStyle::new(Vec3::from(self.options.color))
                .glowing(0.25)
                .reacting_to(channels::LEVEL),
        )
    }

    fn camera(&self, frame: &FrameContext<'_>) -> Camera {
        let mut bounds = self.shape.bounds();
        if let Some(cell) = self.options.repeat {
            bounds = Aabb::new(bounds.min - Vec3::from(cell), bounds.max + Vec3::from(cell));
        }

        let mut camera = Camera::look_at(Vec3::new(2.0, 1.5, 2.0), Vec3::ZERO);
        camera.frame_bounds(&bounds, 0.15);
        camera.orbit_from_mouse(frame.mouse);
        camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elfshade_core::frame::ControlBank;

    fn viewer(shape: ShapeKind) -> Viewer {
        Viewer::new(ViewerOptions {
            shape,
            ..ViewerOptions::default()
        })
    }

    #[test]
    fn every_shape_has_an_inside() {
        // Solid core, torus ring, shell bottom
        let probes = [
            Vec3::new(0.0, 0.1, 0.0),
            Vec3::new(0.8, 0.0, 0.0),
            Vec3::new(0.0, -0.98, 0.0),
        ];
        let frame = FrameContext::new(0.0);
        for kind in ShapeKind::ALL {
            let v = viewer(kind);
            let inside = probes.iter().any(|&p| v.sample(p, &frame).distance < 0.0);
            assert!(inside, "{} should have an inside", kind.name());

            let far = v.sample(Vec3::splat(4.0), &frame);
            assert!(far.distance > 0.0);
            assert_eq!(far.material, SHAPE);
        }
    }

    #[test]
    fn morph_follows_control() {
        let v = viewer(ShapeKind::Morph);
        let corner = Vec3::splat(0.7);

        let boxy = v.sample(corner, &FrameContext::new(0.0));
        assert!(boxy.distance < 0.0);

        let bank = ControlBank::default().with(channels::MIDI_MORPH, 1.0).unwrap();
        let round = v.sample(corner, &FrameContext::new(0.0).with_controls(&bank));
        assert!(round.distance > 0.0);
    }

    #[test]
    fn repeated_viewer_tiles_space() {
        let v = Viewer::new(ViewerOptions {
            shape: ShapeKind::Torus,
            repeat: Some([3.0, 0.0, 3.0]),
            ..ViewerOptions::default()
        });
        let frame = FrameContext::new(0.75);
        let p = Vec3::new(0.5, 0.25, 0.75);
        let a = v.sample(p, &frame).distance;
        let b = v.sample(p + Vec3::new(6.0, 0.0, -3.0), &frame).distance;
        assert!((a - b).abs() < 1e-5);
    }

    #[test]
    fn spinning_changes_the_field() {
        let v = viewer(ShapeKind::Box);
        let p = Vec3::new(0.9, 0.0, 0.0);
        let still = v.sample(p, &FrameContext::new(0.0)).distance;
        let turned = v.sample(p, &FrameContext::new(1.3)).distance;
        assert!((still - turned).abs() > 1e-3);
    }

    #[test]
    fn shape_names_parse() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.name().parse::<ShapeKind>().unwrap(), kind);
        }
        assert!("blob".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn camera_frames_the_shape() {
        let v = viewer(ShapeKind::Torus);
        let camera = v.camera(&FrameContext::new(0.0));
        assert!(camera.distance() > v.shape.bounds().bounding_radius());
    }
}
