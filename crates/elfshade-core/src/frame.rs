//! Per-frame inputs shared by every pixel evaluation
//!
//! A [`FrameContext`] is built once per frame by the host and handed to every
//! scene call. It is read-only, so pixels can be evaluated in any order and on
//! any thread.

use crate::{Error, Result};
use glam::Vec2;

/// Named control channels.
///
/// Audio analysis fills the band energies; the MIDI grid fills the rest.
pub mod channels {
    /// Bass energy
    pub const LOW_BAND: usize = 0;
    /// Midrange energy
    pub const MID_BAND: usize = 1;
    /// Treble energy
    pub const HIGH_BAND: usize = 2;
    /// Overall level
    pub const LEVEL: usize = 3;
    /// Waveform shape selector
    pub const MIDI_SHAPE: usize = 4;
    /// Modulation amount
    pub const MIDI_AMOUNT: usize = 5;
    /// Modulation rate
    pub const MIDI_RATE: usize = 6;
    /// Trait morph between two shapes
    pub const MIDI_MORPH: usize = 7;

    /// Number of named channels
    pub const COUNT: usize = 8;

    /// Channel names in index order
    pub const NAMES: [&str; COUNT] = [
        "low", "mid", "high", "level", "shape", "amount", "rate", "morph",
    ];

    /// Look up a channel by name
    pub fn by_name(name: &str) -> Option<usize> {
        NAMES.iter().position(|n| n.eq_ignore_ascii_case(name))
    }
}

/// Read-only access to scalar control values in `[0, 1]`.
///
/// Unknown channels read as zero.
pub trait ControlSource: Send + Sync {
    fn control_value(&self, channel: usize) -> f32;
}

/// A control source where every channel is silent
#[derive(Debug, Clone, Copy, Default)]
pub struct Silence;

impl ControlSource for Silence {
    fn control_value(&self, _channel: usize) -> f32 {
        0.0
    }
}

impl ControlSource for [f32] {
    fn control_value(&self, channel: usize) -> f32 {
        self.get(channel).copied().unwrap_or(0.0)
    }
}

impl<const N: usize> ControlSource for [f32; N] {
    fn control_value(&self, channel: usize) -> f32 {
        self.as_slice().control_value(channel)
    }
}

impl ControlSource for Vec<f32> {
    fn control_value(&self, channel: usize) -> f32 {
        self.as_slice().control_value(channel)
    }
}

/// Fixed-size bank of control values, clamped to `[0, 1]` on write
#[derive(Debug, Clone, PartialEq)]
pub struct ControlBank {
    values: Vec<f32>,
}

impl ControlBank {
    /// Create a bank of `len` silent channels
    pub fn new(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    /// Number of channels in the bank
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Set a channel, clamping the value into `[0, 1]`
    pub fn set(&mut self, channel: usize, value: f32) -> Result<()> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(channel)
            .ok_or(Error::ChannelOutOfRange { channel, len })?;
        *slot = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0)
        };
        Ok(())
    }

    /// Builder form of [`ControlBank::set`]
    pub fn with(mut self, channel: usize, value: f32) -> Result<Self> {
        self.set(channel, value)?;
        Ok(self)
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

impl Default for ControlBank {
    fn default() -> Self {
        Self::new(channels::COUNT)
    }
}

impl ControlSource for ControlBank {
    fn control_value(&self, channel: usize) -> f32 {
        self.values.control_value(channel)
    }
}

static SILENCE: Silence = Silence;

/// Everything a scene may read besides the query point
#[derive(Clone, Copy)]
pub struct FrameContext<'a> {
    /// Seconds since the animation started
    pub time: f32,
    /// Output size in pixels
    pub resolution: Vec2,
    /// Pointer position, normalized to `[0, 1]`
    pub mouse: Vec2,
    pub controls: &'a dyn ControlSource,
}

impl FrameContext<'static> {
    /// A silent frame at `time` with a 1x1 resolution
    pub fn new(time: f32) -> Self {
        Self {
            time,
            resolution: Vec2::ONE,
            mouse: Vec2::splat(0.5),
            controls: &SILENCE,
        }
    }
}

impl<'a> FrameContext<'a> {
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.resolution = Vec2::new(width as f32, height as f32);
        self
    }

    pub fn with_mouse(mut self, mouse: Vec2) -> Self {
        self.mouse = mouse;
        self
    }

    /// Replace the control source
    pub fn with_controls<'b>(self, controls: &'b dyn ControlSource) -> FrameContext<'b> {
        FrameContext {
            time: self.time,
            resolution: self.resolution,
            mouse: self.mouse,
            controls,
        }
    }

    /// Shorthand for `self.controls.control_value(channel)`
    #[inline]
    pub fn control(&self, channel: usize) -> f32 {
        self.controls.control_value(channel)
    }

    /// Width over height, or 1 for a degenerate resolution
    pub fn aspect(&self) -> f32 {
        if self.resolution.y > 0.0 {
            self.resolution.x / self.resolution.y
        } else {
            1.0
        }
    }
}

impl std::fmt::Debug for FrameContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameContext")
            .field("time", &self.time)
            .field("resolution", &self.resolution)
            .field("mouse", &self.mouse)
            .finish_non_exhaustive()
    }
}
