//! Built-in scenes
//!
//! A [`Stage`] is a scene plus what it takes to show it: its palette and
//! where the camera sits on a given frame. [`SceneKind`] names every
//! built-in stage and builds it from the render settings.

pub mod creature;
pub mod tunnel;
pub mod viewer;
pub mod waveform;

use crate::camera::Camera;
use crate::environment::Palette;
use crate::settings::RenderSettings;
use crate::{Error, Result};
use elfshade_core::frame::FrameContext;
use elfshade_core::scene::Scene;
use std::fmt;
use std::str::FromStr;

pub use creature::Creature;
pub use tunnel::TunnelRide;
pub use viewer::{ShapeKind, Viewer, ViewerOptions};
pub use waveform::{WaveformOptions, WaveformPanel};

/// A renderable scene
pub trait Stage: Scene {
    /// Material looks, keyed by the ids this scene emits
    fn palette(&self) -> Palette;

    /// Camera for this frame
    fn camera(&self, frame: &FrameContext<'_>) -> Camera;
}

/// Every built-in scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Creature,
    Viewer,
    Waveform,
    Tunnel,
}

impl SceneKind {
    pub fn all() -> [SceneKind; 4] {
        [Self::Creature, Self::Viewer, Self::Waveform, Self::Tunnel]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Creature => "creature",
            Self::Viewer => "viewer",
            Self::Waveform => "waveform",
            Self::Tunnel => "tunnel",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Creature => "Animated creature with a collar and name tag",
            Self::Viewer => "Single primitive spinning about a drifting axis",
            Self::Waveform => "LFO waveform preview panel",
            Self::Tunnel => "Fly-through of a winding tunnel with glowing rings",
        }
    }

    /// Build the scene with its options from `settings`
    pub fn build(self, settings: &RenderSettings) -> Box<dyn Stage> {
        match self {
            Self::Creature => Box::new(Creature::new()),
            Self::Viewer => Box::new(Viewer::new(settings.viewer.clone())),
            Self::Waveform => Box::new(WaveformPanel::new(settings.waveform.clone())),
            Self::Tunnel => Box::new(TunnelRide::new()),
        }
    }
}

impl FromStr for SceneKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownScene(s.to_string()))
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elfshade_core::march::{MarchConfig, march};

    #[test]
    fn names_round_trip() {
        for kind in SceneKind::all() {
            assert_eq!(kind.name().parse::<SceneKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.name());
        }
        assert!(matches!(
            "teapot".parse::<SceneKind>(),
            Err(Error::UnknownScene(name)) if name == "teapot"
        ));
    }

    #[test]
    fn every_scene_hits_from_its_camera() {
        let settings = RenderSettings::default();
        let frame = FrameContext::new(0.5);
        // The tunnel's center ray only meets a wall at a grazing angle
        let config = MarchConfig {
            far: 200.0,
            max_steps: 1024,
            ..MarchConfig::default()
        };
        for kind in SceneKind::all() {
            let stage = kind.build(&settings);
            let camera = stage.camera(&frame);
            let ray = camera.ray(glam::Vec2::ZERO, 16.0 / 9.0);
            let hit = march(stage.as_ref(), &ray, &frame, &config);
            assert!(hit.is_hit(), "{kind} center ray missed");
            assert!(
                stage.palette().contains(hit.material),
                "{kind} hit an unstyled material {}",
                hit.material
            );
        }
    }
}
