//! Scenes: distance fields that also report a material
//!
//! A scene is the per-frame "world function". It maps a point and the frame
//! inputs to a [`DistanceSample`]. Composers assemble their parts with the
//! scalar combinators and then pick the material with [`select_material`],
//! which makes the tie-break order explicit.

use crate::frame::FrameContext;
use crate::sdf::{Aabb, Sdf};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Discrete tag selecting a shading rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct MaterialId(pub u16);

impl MaterialId {
    /// Background, or no surface hit
    pub const NONE: MaterialId = MaterialId(0);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl std::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A distance together with the material of the closest part
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceSample {
    pub distance: f32,
    pub material: MaterialId,
}

impl DistanceSample {
    pub fn new(distance: f32, material: MaterialId) -> Self {
        Self { distance, material }
    }
}

/// A complete scene, evaluated once per march step
pub trait Scene: Send + Sync {
    fn sample(&self, p: Vec3, frame: &FrameContext<'_>) -> DistanceSample;
}

impl<F> Scene for F
where
    F: Fn(Vec3, &FrameContext<'_>) -> DistanceSample + Send + Sync,
{
    fn sample(&self, p: Vec3, frame: &FrameContext<'_>) -> DistanceSample {
        self(p, frame)
    }
}

/// A static shape with a single material
#[derive(Debug, Clone)]
pub struct Tagged<S: Sdf> {
    pub shape: S,
    pub material: MaterialId,
}

impl<S: Sdf> Tagged<S> {
    pub fn new(shape: S, material: MaterialId) -> Self {
        Self { shape, material }
    }

    pub fn bounds(&self) -> Aabb {
        self.shape.bounds()
    }
}

impl<S: Sdf> Scene for Tagged<S> {
    fn sample(&self, p: Vec3, _frame: &FrameContext<'_>) -> DistanceSample {
        DistanceSample::new(self.shape.distance(p), self.material)
    }
}

/// Pick the material of the closest candidate.
///
/// Candidates are folded in the given order and a later candidate takes over
/// when its distance is less than *or equal to* the best so far, so the last
/// of several coincident parts wins. An empty list yields
/// [`MaterialId::NONE`].
pub fn select_material(candidates: &[DistanceSample]) -> MaterialId {
    candidates
        .iter()
        .fold(None::<&DistanceSample>, |best, c| match best {
            Some(b) if c.distance > b.distance => Some(b),
            _ => Some(c),
        })
        .map_or(MaterialId::NONE, |best| best.material)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::primitives::sphere;
    use crate::sdf::SdfExt;

    const BODY: MaterialId = MaterialId(1);
    const HEAD: MaterialId = MaterialId(2);
    const EYES: MaterialId = MaterialId(3);

    #[test]
    fn closest_candidate_wins() {
        let m = select_material(&[
            DistanceSample::new(0.5, BODY),
            DistanceSample::new(0.1, HEAD),
            DistanceSample::new(0.3, EYES),
        ]);
        assert_eq!(m, HEAD);
    }

    #[test]
    fn later_candidate_wins_ties() {
        let m = select_material(&[
            DistanceSample::new(0.2, BODY),
            DistanceSample::new(0.2, HEAD),
            DistanceSample::new(0.9, EYES),
        ]);
        assert_eq!(m, HEAD);

        let m = select_material(&[
            DistanceSample::new(0.2, BODY),
            DistanceSample::new(0.2, HEAD),
            DistanceSample::new(0.2, EYES),
        ]);
        assert_eq!(m, EYES);
    }

    #[test]
    fn empty_candidates_are_background() {
        assert_eq!(select_material(&[]), MaterialId::NONE);
        assert!(MaterialId::NONE.is_none());
    }

    #[test]
    fn tagged_shape_and_function_scenes() {
        let frame = FrameContext::new(0.0);
        let tagged = sphere(1.0).with_material(BODY);
        let s = tagged.sample(Vec3::new(0.0, 2.0, 0.0), &frame);
        assert_eq!(s.material, BODY);
        assert!((s.distance - 1.0).abs() < 1e-6);

        fn rising_floor(p: Vec3, frame: &FrameContext<'_>) -> DistanceSample {
            DistanceSample::new(p.y - frame.time, HEAD)
        }
        let frame = FrameContext::new(2.0);
        assert_eq!(rising_floor.sample(Vec3::new(0.0, 3.0, 0.0), &frame).distance, 1.0);
    }
}
