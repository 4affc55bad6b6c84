//! # elfshade Core
//!
//! The signed distance field kernel behind elfshade's audio-reactive scenes.
//!
//! Everything in this crate is a pure function of a point and a read-only
//! [`FrameContext`](frame::FrameContext): primitives, combinators, transforms,
//! scene composers, the central-difference normal estimator and the
//! sphere-tracing ray marcher.
//!
//! ## Quick Start
//!
//! ```rust
//! use elfshade_core::prelude::*;
//!
//! let scene = sphere(1.0).with_material(MaterialId(1));
//! let frame = FrameContext::new(0.0);
//! let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
//!
//! let hit = march(&scene, &ray, &frame, &MarchConfig::default());
//! assert!(hit.is_hit());
//! ```
//!
//! ## Units and Conventions
//!
//! - **Distances**: Arbitrary scene units. Negative inside, positive outside.
//! - **Angles**: All rotation functions use **radians**
//! - **Precision**: `f32` throughout, matching fragment-shader precision
//! - **Coordinate system**: Right-handed, Y-up

pub mod frame;
pub mod march;
pub mod scene;
pub mod sdf;
pub mod waveform;

mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    // SDF primitives, combinators and transforms
    pub use crate::sdf::{Aabb, Sdf, SdfExt, SdfNode, operations::*, primitives::*};
    pub use crate::sdf::transforms::{repeat, rotate_axis, rotate_x, rotate_y, rotate_z};

    // Scenes and materials
    pub use crate::scene::{DistanceSample, MaterialId, Scene, Tagged, select_material};

    // Marching
    pub use crate::march::{MarchConfig, MarchOutcome, MarchResult, Ray, estimate_normal, march};

    // Frame inputs
    pub use crate::frame::{ControlBank, ControlSource, FrameContext, Silence, channels};

    // Math (re-export glam)
    pub use glam::{Vec2, Vec3, Vec4};

    // Error handling
    pub use crate::{Error, Result};
}
