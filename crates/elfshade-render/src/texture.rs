//! Read-only textures sampled by the compositor
//!
//! Texture coordinates run from `(0, 0)` at the top-left of the image to
//! `(1, 1)` at the bottom-right.

use crate::Result;
use glam::{Vec2, Vec4};
use image::RgbaImage;
use noise::{NoiseFn, Perlin};
use std::path::Path;

/// Anything that can be sampled by uv
pub trait TextureSource: Send + Sync {
    /// Sample an RGBA color with channels in `0..1`
    fn sample(&self, uv: Vec2) -> Vec4;
}

/// An RGBA8 image with clamped, nearest-texel sampling
#[derive(Debug, Clone)]
pub struct ImageTexture {
    image: RgbaImage,
}

impl ImageTexture {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Load any format the `image` crate understands
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(image::open(path)?.to_rgba8()))
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl TextureSource for ImageTexture {
    fn sample(&self, uv: Vec2) -> Vec4 {
        TextureSource::sample(&self.image, uv)
    }
}

/// A finished frame can be read back directly as the feedback texture
impl TextureSource for RgbaImage {
    fn sample(&self, uv: Vec2) -> Vec4 {
        let (w, h) = self.dimensions();
        if w == 0 || h == 0 {
            return Vec4::ZERO;
        }
        let uv = uv.clamp(Vec2::ZERO, Vec2::ONE);
        let x = ((uv.x * w as f32) as u32).min(w - 1);
        let y = ((uv.y * h as f32) as u32).min(h - 1);
        let [r, g, b, a] = self.get_pixel(x, y).0;
        Vec4::new(f32::from(r), f32::from(g), f32::from(b), f32::from(a)) / 255.0
    }
}

/// Grey Perlin noise in `0..1`, opaque
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn with_seed(seed: u32, scale: f32) -> Self {
        Self {
            noise: Perlin::new(seed),
            scale,
        }
    }

    /// Noise value in `0..1`, optionally animated through a third axis
    pub fn value(&self, uv: Vec2, z: f32) -> f32 {
        let p = [
            f64::from(uv.x * self.scale),
            f64::from(uv.y * self.scale),
            f64::from(z),
        ];
        ((self.noise.get(p) as f32 + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

impl std::fmt::Debug for NoiseTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseTexture")
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl TextureSource for NoiseTexture {
    fn sample(&self, uv: Vec2) -> Vec4 {
        let v = self.value(uv, 0.0);
        Vec4::new(v, v, v, 1.0)
    }
}
