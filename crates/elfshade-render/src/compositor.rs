//! Final pixel color from a march result
//!
//! Misses show a vertical gradient. Hits get Lambert diffuse plus ambient
//! plus per-material glow, then fog by distance. The previous frame is mixed
//! in as a slightly zoomed echo, and a little Perlin grain goes on top.

use crate::environment::{FeedbackSettings, GrainSettings, MaterialStyle, Shading};
use crate::texture::{NoiseTexture, TextureSource};
use elfshade_core::frame::FrameContext;
use glam::{Vec2, Vec3, Vec4};
use image::Rgba;

/// How fast the grain pattern crawls
const GRAIN_SPEED: f32 = 3.0;

/// A lit surface point handed to the compositor
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit {
    /// Distance along the view ray
    pub distance: f32,
    pub normal: Vec3,
    pub style: MaterialStyle,
}

/// Shading, fog, feedback and grain for one frame
#[derive(Debug)]
pub struct Compositor {
    shading: Shading,
    feedback: FeedbackSettings,
    grain: GrainSettings,
    noise: NoiseTexture,
    light_direction: Vec3,
}

impl Compositor {
    pub fn new(shading: Shading, feedback: FeedbackSettings, grain: GrainSettings) -> Self {
        let noise = NoiseTexture::with_seed(grain.seed, grain.scale);
        let light_direction = shading.light_direction();
        Self {
            shading,
            feedback,
            grain,
            noise,
            light_direction,
        }
    }

    pub fn shading(&self) -> &Shading {
        &self.shading
    }

    /// Background gradient, `background` at the top blending to `fog_color`
    pub fn background(&self, uv: Vec2) -> Vec3 {
        let top = Vec3::from(self.shading.background);
        let bottom = Vec3::from(self.shading.fog_color);
        top.lerp(bottom, uv.y.clamp(0.0, 1.0))
    }

    /// Lambert diffuse plus ambient plus glow
    pub fn light(&self, style: &MaterialStyle, normal: Vec3, frame: &FrameContext<'_>) -> Vec3 {
        let lambert = normal.dot(self.light_direction).max(0.0);
        let ambient = Vec3::from(self.shading.ambient);
        let light_color = Vec3::from(self.shading.light_color);

        let glow = match style.glow_channel {
            Some(channel) => style.glow * frame.control(channel),
            None => style.glow,
        };

        style.color * (ambient + light_color * lambert) + style.color * glow
    }

    /// Blend towards the fog color by `1 - exp(-density * distance)`
    pub fn fog(&self, color: Vec3, distance: f32) -> Vec3 {
        let amount = 1.0 - (-self.shading.fog_density * distance.max(0.0)).exp();
        color.lerp(Vec3::from(self.shading.fog_color), amount.clamp(0.0, 1.0))
    }

    /// Weight of the previous frame at this pixel
    pub fn echo_weight(&self, hit: bool, frame: &FrameContext<'_>) -> f32 {
        let mut mix = self.feedback.mix;
        if let Some(channel) = self.feedback.channel {
            mix *= frame.control(channel);
        }
        if hit {
            mix *= self.feedback.hit_share;
        }
        mix.clamp(0.0, 1.0)
    }

    /// Where the echo is read for the pixel at `uv`
    pub fn echo_uv(&self, uv: Vec2) -> Vec2 {
        (uv - Vec2::splat(0.5)) * self.feedback.zoom + Vec2::splat(0.5)
    }

    /// Signed grain offset for this pixel
    pub fn grain(&self, uv: Vec2, frame: &FrameContext<'_>) -> f32 {
        if self.grain.amount <= 0.0 {
            return 0.0;
        }
        (self.noise.value(uv, frame.time * GRAIN_SPEED) - 0.5) * 2.0 * self.grain.amount
    }

    /// Final color of the pixel at `uv`
    pub fn composite(
        &self,
        uv: Vec2,
        hit: Option<&SurfaceHit>,
        frame: &FrameContext<'_>,
        previous: Option<&dyn TextureSource>,
    ) -> Vec4 {
        let mut color = match hit {
            Some(surface) => {
                let lit = self.light(&surface.style, surface.normal, frame);
                self.fog(lit, surface.distance)
            }
            None => self.background(uv),
        };

        if let Some(previous) = previous {
            let weight = self.echo_weight(hit.is_some(), frame);
            if weight > 0.0 {
                let echo = previous.sample(self.echo_uv(uv)).truncate();
                color = color.lerp(echo, weight);
            }
        }

        color += Vec3::splat(self.grain(uv, frame));
        color.clamp(Vec3::ZERO, Vec3::ONE).extend(1.0)
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(
            Shading::default(),
            FeedbackSettings::default(),
            GrainSettings::default(),
        )
    }
}

/// Quantize a `0..1` color to RGBA8
pub fn to_rgba8(color: Vec4) -> Rgba<u8> {
    let c = (color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
    Rgba([c.x as u8, c.y as u8, c.z as u8, c.w as u8])
}
