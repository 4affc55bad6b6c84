//! # elfshade Render
//!
//! Turns elfshade scenes into images on the CPU.
//!
//! ## Features
//!
//! - Built-in scenes: creature, shape viewer, waveform panel, tunnel
//! - Orbit camera with mouse-driven framing
//! - Lambert shading, distance fog and per-material glow
//! - Feedback echo of the previous frame and Perlin film grain
//! - Row-parallel frame rendering with rayon
//! - JSON settings file with defaults for everything
//!
//! ## Example
//!
//! ```rust,no_run
//! use elfshade_render::{FrameRenderer, RenderSettings, SceneKind};
//!
//! let settings = RenderSettings::default();
//! let renderer = FrameRenderer::new(&settings)?;
//! let stage = SceneKind::Creature.build(&settings);
//!
//! let image = renderer.render(stage.as_ref(), &renderer.frame(1.5), None)?;
//! image.save("creature.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod camera;
pub mod compositor;
pub mod environment;
pub mod renderer;
pub mod scenes;
pub mod settings;
pub mod texture;

mod error;

// Re-export image for hosts that read or write frames
pub use image;

pub use camera::Camera;
pub use compositor::{Compositor, SurfaceHit};
pub use environment::{FeedbackSettings, GrainSettings, MaterialStyle, Palette, Shading};
pub use error::{Error, Result};
pub use renderer::FrameRenderer;
pub use scenes::{SceneKind, Stage};
pub use settings::{RenderSettings, settings_path};
pub use texture::{ImageTexture, NoiseTexture, TextureSource};
