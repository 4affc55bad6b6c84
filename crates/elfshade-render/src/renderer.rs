//! CPU frame renderer
//!
//! Every pixel runs the whole pipeline on its own: camera ray, sphere trace,
//! normal, palette lookup, composite. Rows are spread over the rayon pool.
//! The previous frame is only read, and the new frame is a fresh buffer.

use crate::camera::Camera;
use crate::compositor::{Compositor, SurfaceHit, to_rgba8};
use crate::environment::Palette;
use crate::scenes::Stage;
use crate::settings::RenderSettings;
use crate::texture::TextureSource;
use crate::{Error, Result};
use elfshade_core::frame::FrameContext;
use elfshade_core::march::{MarchConfig, estimate_normal, march};
use glam::{Vec2, Vec4};
use image::RgbaImage;
use rayon::prelude::*;
use std::time::Instant;

/// Renders stages to RGBA8 images at a fixed resolution
#[derive(Debug)]
pub struct FrameRenderer {
    width: u32,
    height: u32,
    march: MarchConfig,
    normal_epsilon: f32,
    compositor: Compositor,
}

/// Camera and palette resolved once per frame
struct FrameSetup<'a> {
    camera: Camera,
    palette: Palette,
    previous: Option<&'a dyn TextureSource>,
}

impl FrameRenderer {
    pub fn new(settings: &RenderSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            width: settings.width,
            height: settings.height,
            march: settings.march,
            normal_epsilon: settings.shading.normal_epsilon,
            compositor: Compositor::new(
                settings.shading.clone(),
                settings.feedback.clone(),
                settings.grain.clone(),
            ),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Frame inputs for time `t` at this renderer's resolution
    pub fn frame(&self, t: f32) -> FrameContext<'static> {
        FrameContext::new(t).with_resolution(self.width, self.height)
    }

    /// Render one frame, echoing `previous` through the feedback layer
    pub fn render(
        &self,
        stage: &dyn Stage,
        frame: &FrameContext<'_>,
        previous: Option<&RgbaImage>,
    ) -> Result<RgbaImage> {
        let start = Instant::now();
        let setup = FrameSetup {
            camera: stage.camera(frame),
            palette: stage.palette(),
            previous: previous.map(|image| image as &dyn TextureSource),
        };

        let rows: Vec<(Vec<u8>, u32)> = (0..self.height)
            .into_par_iter()
            .map(|y| {
                let mut row = Vec::with_capacity(self.width as usize * 4);
                let mut hits = 0;
                for x in 0..self.width {
                    let (color, hit) = self.shade(stage, &setup, frame, x, y);
                    row.extend_from_slice(&to_rgba8(color).0);
                    hits += u32::from(hit);
                }
                (row, hits)
            })
            .collect();

        let hits: u32 = rows.iter().map(|(_, h)| h).sum();
        let pixels: Vec<u8> = rows.into_iter().flat_map(|(row, _)| row).collect();

        tracing::debug!(
            "Rendered {}x{} frame at t={:.3} in {:.1?} ({} of {} pixels hit)",
            self.width,
            self.height,
            frame.time,
            start.elapsed(),
            hits,
            self.pixel_count()
        );

        RgbaImage::from_raw(self.width, self.height, pixels)
            .ok_or_else(|| Error::InvalidParameter("frame buffer size mismatch".to_string()))
    }

    /// Full pipeline for one pixel; also reports whether the ray hit
    fn shade(
        &self,
        stage: &dyn Stage,
        setup: &FrameSetup<'_>,
        frame: &FrameContext<'_>,
        x: u32,
        y: u32,
    ) -> (Vec4, bool) {
        let ray = setup.camera.pixel_ray(x, y, self.width, self.height);
        let result = march(stage, &ray, frame, &self.march);

        let surface = result.is_hit().then(|| {
            let p = ray.at(result.distance);
            SurfaceHit {
                distance: result.distance,
                normal: estimate_normal(stage, p, frame, self.normal_epsilon),
                style: *setup.palette.style(result.material),
            }
        });

        let uv = Vec2::new(
            (x as f32 + 0.5) / self.width as f32,
            (y as f32 + 0.5) / self.height as f32,
        );
        let color = self
            .compositor
            .composite(uv, surface.as_ref(), frame, setup.previous);
        (color, surface.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{GrainSettings, MaterialStyle};
    use elfshade_core::prelude::*;
    use image::Rgba;

    const BALL: MaterialId = MaterialId(1);

    struct Ball;

    impl Scene for Ball {
        fn sample(&self, p: Vec3, _frame: &FrameContext<'_>) -> DistanceSample {
            DistanceSample::new(sphere(1.0).distance(p), BALL)
        }
    }

    impl Stage for Ball {
        fn palette(&self) -> Palette {
            Palette::new().with(BALL, MaterialStyle::new(Vec3::new(1.0, 0.0, 0.0)))
        }

        fn camera(&self, _frame: &FrameContext<'_>) -> Camera {
            Camera::default()
        }
    }

    fn small_settings() -> RenderSettings {
        RenderSettings {
            width: 32,
            height: 24,
            grain: GrainSettings {
                amount: 0.0,
                ..GrainSettings::default()
            },
            ..RenderSettings::default()
        }
    }

    #[test]
    fn center_hits_and_corner_misses() {
        let renderer = FrameRenderer::new(&small_settings()).unwrap();
        let image = renderer.render(&Ball, &renderer.frame(0.0), None).unwrap();
        assert_eq!(image.dimensions(), (32, 24));

        let center = image.get_pixel(16, 12);
        let corner = image.get_pixel(0, 0);
        assert!(center.0[0] > center.0[2], "ball should be red, got {center:?}");
        assert_ne!(center, corner);
        assert_eq!(corner.0[3], 255);
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = FrameRenderer::new(&small_settings()).unwrap();
        let frame = renderer.frame(1.0);
        let a = renderer.render(&Ball, &frame, None).unwrap();
        let b = renderer.render(&Ball, &frame, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn previous_frame_echoes_into_background() {
        let renderer = FrameRenderer::new(&small_settings()).unwrap();
        let frame = renderer.frame(0.0);
        let white = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));

        let plain = renderer.render(&Ball, &frame, None).unwrap();
        let echoed = renderer.render(&Ball, &frame, Some(&white)).unwrap();
        assert!(echoed.get_pixel(0, 0).0[0] > plain.get_pixel(0, 0).0[0]);
    }

    #[test]
    fn pixel_count_does_not_wrap() {
        let settings = RenderSettings {
            width: 70_000,
            height: 70_000,
            ..RenderSettings::default()
        };
        let renderer = FrameRenderer::new(&settings).unwrap();
        assert_eq!(renderer.pixel_count(), 4_900_000_000);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let settings = RenderSettings {
            height: 0,
            ..small_settings()
        };
        assert!(FrameRenderer::new(&settings).is_err());
    }
}
