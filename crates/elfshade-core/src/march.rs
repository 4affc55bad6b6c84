//! Sphere tracing and surface normals
//!
//! [`march`] walks a ray through a [`Scene`], stepping by the distance
//! estimate scaled by a bias factor, until it gets within `epsilon` of a
//! surface (hit), passes the far plane, or runs out of steps (miss). Every
//! march terminates within `max_steps` scene evaluations.

use crate::frame::FrameContext;
use crate::scene::{MaterialId, Scene};
use crate::{Error, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Gradients shorter than this are treated as degenerate
const MIN_GRADIENT: f32 = 1e-12;

/// A ray with a unit-length direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    ///
    /// A zero or non-finite direction falls back to `-Z` (the camera's
    /// default forward).
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize().unwrap_or(Vec3::NEG_Z),
        }
    }

    /// Point at parameter `t` along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Ray marching parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarchConfig {
    /// Distance along the ray where marching starts
    pub near: f32,
    /// Distance beyond which the ray is a miss
    pub far: f32,
    /// Hit threshold
    pub epsilon: f32,
    /// Maximum scene evaluations per ray
    pub max_steps: u32,
    /// Step scale; below 1 is conservative, above 1 may tunnel through thin parts
    pub bias: f32,
}

impl Default for MarchConfig {
    fn default() -> Self {
        Self {
            near: 0.01,
            far: 50.0,
            epsilon: 1e-3,
            max_steps: 128,
            bias: 0.9,
        }
    }
}

impl MarchConfig {
    /// Check that the parameters describe a terminating, meaningful march
    pub fn validate(&self) -> Result<()> {
        if !self.near.is_finite() || self.near < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "near must be a finite value >= 0, got {}",
                self.near
            )));
        }
        if self.far.is_nan() || self.far <= self.near {
            return Err(Error::InvalidParameter(format!(
                "far ({}) must be greater than near ({})",
                self.far, self.near
            )));
        }
        if self.epsilon.is_nan() || self.epsilon <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "epsilon must be > 0, got {}",
                self.epsilon
            )));
        }
        if self.max_steps == 0 {
            return Err(Error::InvalidParameter("max_steps must be at least 1".into()));
        }
        if !self.bias.is_finite() || self.bias <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "bias must be a finite value > 0, got {}",
                self.bias
            )));
        }
        Ok(())
    }
}

/// Terminal state of a march
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarchOutcome {
    Hit,
    Miss,
}

/// Result of marching one ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchResult {
    /// Distance along the ray to the hit, or `far` on a miss
    pub distance: f32,
    /// Material at the hit, or [`MaterialId::NONE`] on a miss
    pub material: MaterialId,
    /// Scene evaluations performed
    pub steps: u32,
    pub outcome: MarchOutcome,
}

impl MarchResult {
    pub fn is_hit(&self) -> bool {
        self.outcome == MarchOutcome::Hit
    }

    fn miss(config: &MarchConfig, steps: u32) -> Self {
        Self {
            distance: config.far,
            material: MaterialId::NONE,
            steps,
            outcome: MarchOutcome::Miss,
        }
    }
}

/// Sphere-trace `ray` through `scene`
pub fn march<S: Scene + ?Sized>(
    scene: &S,
    ray: &Ray,
    frame: &FrameContext<'_>,
    config: &MarchConfig,
) -> MarchResult {
    let mut t = config.near;

    for step in 1..=config.max_steps {
        let sample = scene.sample(ray.at(t), frame);

        if sample.distance < config.epsilon {
            return MarchResult {
                distance: t,
                material: sample.material,
                steps: step,
                outcome: MarchOutcome::Hit,
            };
        }

        t += sample.distance * config.bias;

        if t > config.far || t.is_nan() {
            return MarchResult::miss(config, step);
        }
    }

    MarchResult::miss(config, config.max_steps)
}

/// Estimate the unit surface normal at `p` by central differences.
///
/// Takes six scene samples. Falls back to `Vec3::Y` where the gradient
/// vanishes.
pub fn estimate_normal<S: Scene + ?Sized>(
    scene: &S,
    p: Vec3,
    frame: &FrameContext<'_>,
    epsilon: f32,
) -> Vec3 {
    let d = |offset: Vec3| {
        scene.sample(p + offset, frame).distance - scene.sample(p - offset, frame).distance
    };
    let gradient = Vec3::new(
        d(Vec3::X * epsilon),
        d(Vec3::Y * epsilon),
        d(Vec3::Z * epsilon),
    );

    let len = gradient.length();
    if len > MIN_GRADIENT && len.is_finite() {
        gradient / len
    } else {
        Vec3::Y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::DistanceSample;
    use crate::sdf::SdfExt;
    use crate::sdf::primitives::{box3, sphere};
    use approx::assert_relative_eq;

    #[test]
    fn ray_direction_is_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0));
        assert_relative_eq!(ray.direction.length(), 1.0, epsilon = 1e-6);
        assert_eq!(Ray::new(Vec3::ZERO, Vec3::ZERO).direction, Vec3::NEG_Z);
    }

    #[test]
    fn default_config_validates() {
        assert!(MarchConfig::default().validate().is_ok());
    }

    #[test]
    fn bad_configs_are_rejected() {
        let bad = [
            MarchConfig { far: 0.0, ..Default::default() },
            MarchConfig { epsilon: 0.0, ..Default::default() },
            MarchConfig { max_steps: 0, ..Default::default() },
            MarchConfig { bias: -1.0, ..Default::default() },
            MarchConfig { near: f32::NAN, ..Default::default() },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{config:?} should be rejected");
        }
    }

    #[test]
    fn hits_box_face() {
        let scene = box3(Vec3::ONE).with_material(MaterialId(4));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let hit = march(&scene, &ray, &FrameContext::new(0.0), &MarchConfig::default());
        assert!(hit.is_hit());
        assert_eq!(hit.material, MaterialId(4));
        assert_relative_eq!(hit.distance, 4.0, epsilon = 1e-2);
    }

    #[test]
    fn starts_at_near_plane() {
        // Inside the sphere from the first sample: immediate hit at `near`
        let scene = sphere(1.0).with_material(MaterialId(1));
        let config = MarchConfig::default();
        let hit = march(&scene, &Ray::new(Vec3::ZERO, Vec3::X), &FrameContext::new(0.0), &config);
        assert!(hit.is_hit());
        assert_eq!(hit.steps, 1);
        assert_eq!(hit.distance, config.near);
    }

    #[test]
    fn normal_on_box_face() {
        let scene = box3(Vec3::ONE).with_material(MaterialId(1));
        let n = estimate_normal(&scene, Vec3::new(1.0, 0.2, -0.3), &FrameContext::new(0.0), 1e-3);
        assert_relative_eq!(n.x, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn flat_field_normal_falls_back_to_up() {
        fn flat(_p: Vec3, _frame: &FrameContext<'_>) -> DistanceSample {
            DistanceSample::new(1.0, MaterialId(1))
        }
        assert_eq!(estimate_normal(&flat, Vec3::ZERO, &FrameContext::new(0.0), 1e-3), Vec3::Y);
    }

    #[test]
    fn nan_field_misses() {
        fn broken(_p: Vec3, _frame: &FrameContext<'_>) -> DistanceSample {
            DistanceSample::new(f32::NAN, MaterialId(1))
        }
        let config = MarchConfig::default();
        let result = march(&broken, &Ray::new(Vec3::ZERO, Vec3::Z), &FrameContext::new(0.0), &config);
        assert!(!result.is_hit());
        assert_eq!(result.distance, config.far);
        assert_eq!(result.steps, 1);
    }
}
