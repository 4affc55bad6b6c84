//! Lighting, fog and per-material looks
//!
//! [`Shading`], [`FeedbackSettings`] and [`GrainSettings`] are user settings
//! and live in the settings file. A [`Palette`] belongs to a scene and maps
//! its material ids onto colors and glow.

use elfshade_core::scene::MaterialId;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Light, background and fog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shading {
    /// Direction *towards* the light (will be normalized)
    pub light_direction: [f32; 3],
    /// Light color (RGB, 0-1)
    pub light_color: [f32; 3],
    /// Ambient term added to every lit surface
    pub ambient: [f32; 3],
    /// Background color at the top of the frame
    pub background: [f32; 3],
    /// Fog color; also the background color at the bottom of the frame
    pub fog_color: [f32; 3],
    /// Fog density (0 = no fog, higher = more fog)
    pub fog_density: f32,
    /// Central-difference step for normals
    pub normal_epsilon: f32,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            // Key light from upper right, behind the camera
            light_direction: [0.6, 0.8, 0.5],
            light_color: [1.0, 0.95, 0.88],
            ambient: [0.12, 0.12, 0.16],

            // Dusky gradient
            background: [0.05, 0.04, 0.09],
            fog_color: [0.18, 0.12, 0.22],
            fog_density: 0.04,

            normal_epsilon: 1e-3,
        }
    }
}

impl Shading {
    pub fn light_direction(&self) -> Vec3 {
        Vec3::from(self.light_direction)
            .try_normalize()
            .unwrap_or(Vec3::Y)
    }
}

/// How much of the previous frame echoes into the current one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackSettings {
    /// Weight of the echo on background pixels (0-1)
    pub mix: f32,
    /// Fraction of `mix` applied over surfaces
    pub hit_share: f32,
    /// Scale applied to the echo's uv around the center; below 1 zooms in
    pub zoom: f32,
    /// When set, `mix` is scaled by this control channel
    pub channel: Option<usize>,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            mix: 0.35,
            hit_share: 0.25,
            zoom: 0.97,
            channel: None,
        }
    }
}

/// Film grain from a Perlin texture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrainSettings {
    /// Peak brightness offset (0 disables grain)
    pub amount: f32,
    /// Noise frequency across the frame
    pub scale: f32,
    pub seed: u32,
}

impl Default for GrainSettings {
    fn default() -> Self {
        Self {
            amount: 0.03,
            scale: 240.0,
            seed: 7,
        }
    }
}

/// The look of one material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialStyle {
    /// Albedo (RGB, 0-1)
    pub color: Vec3,
    /// Self-illumination as a multiple of the albedo
    pub glow: f32,
    /// When set, glow is scaled by this control channel
    pub glow_channel: Option<usize>,
}

impl MaterialStyle {
    pub fn new(color: Vec3) -> Self {
        Self {
            color,
            glow: 0.0,
            glow_channel: None,
        }
    }

    pub fn glowing(mut self, glow: f32) -> Self {
        self.glow = glow;
        self
    }

    /// Drive the glow with a control channel
    pub fn reacting_to(mut self, channel: usize) -> Self {
        self.glow_channel = Some(channel);
        self
    }
}

impl Default for MaterialStyle {
    fn default() -> Self {
        Self::new(Vec3::splat(0.75))
    }
}

/// Material id to style lookup
#[derive(Debug, Clone, Default)]
pub struct Palette {
    entries: Vec<(MaterialId, MaterialStyle)>,
    fallback: MaterialStyle,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the style for `material`
    pub fn with(mut self, material: MaterialId, style: MaterialStyle) -> Self {
        match self.entries.iter_mut().find(|(id, _)| *id == material) {
            Some(entry) => entry.1 = style,
            None => self.entries.push((material, style)),
        }
        self
    }

    /// Style used for materials without an entry
    pub fn with_fallback(mut self, style: MaterialStyle) -> Self {
        self.fallback = style;
        self
    }

    pub fn style(&self, material: MaterialId) -> &MaterialStyle {
        self.entries
            .iter()
            .find(|(id, _)| *id == material)
            .map_or(&self.fallback, |(_, style)| style)
    }

    /// True when `material` has its own entry
    pub fn contains(&self, material: MaterialId) -> bool {
        self.entries.iter().any(|(id, _)| *id == material)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
