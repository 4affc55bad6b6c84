//! Waveform preview panel
//!
//! The LFO shape is drawn as a tube made of capsule segments floating in
//! front of a backing panel. Only the three segments around the query point
//! are evaluated; the horizontal gap to the rest of the chain caps the
//! result so it stays a lower bound.

use super::Stage;
use crate::camera::Camera;
use crate::environment::{MaterialStyle, Palette};
use elfshade_core::frame::{FrameContext, channels};
use elfshade_core::prelude::*;
use elfshade_core::waveform::{Waveform, midi_pitch_to_freq, quantize};
use serde::{Deserialize, Serialize};

pub const PANEL: MaterialId = MaterialId(1);
pub const AXIS: MaterialId = MaterialId(2);
pub const TRACE: MaterialId = MaterialId(3);

/// Width of the drawn window in scene units
const SPAN: f32 = 4.0;
const SEGMENTS: usize = 64;
const TRACE_RADIUS: f32 = 0.05;
const AXIS_RADIUS: f32 = 0.012;
const PANEL_DEPTH: f32 = -0.3;
const REFERENCE_PITCH: u8 = 69;

/// Waveform panel settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveformOptions {
    /// Fixed shape; `None` reads the shape selector channel
    pub shape: Option<Waveform>,
    /// Cycles shown at the reference pitch (A4)
    pub cycles: f32,
    /// MIDI note that scales the cycle count
    pub pitch: u8,
    /// Channel overriding `pitch`, read as `0..=127`
    pub pitch_channel: Option<usize>,
    /// Peak height of the trace
    pub amplitude: f32,
    /// Cycles per second the trace scrolls by
    pub scroll: f32,
    pub color: [f32; 3],
}

impl Default for WaveformOptions {
    fn default() -> Self {
        Self {
            shape: None,
            cycles: 2.0,
            pitch: REFERENCE_PITCH,
            pitch_channel: None,
            amplitude: 0.8,
            scroll: 0.25,
            color: [0.3, 1.0, 0.6],
        }
    }
}

/// One frame's trace: a polyline sampled from the waveform
#[derive(Debug, Clone, Copy)]
pub struct Trace {
    pub shape: Waveform,
    pub cycles: f32,
    pub amplitude: f32,
    pub phase: f32,
}

impl Trace {
    fn segment_width() -> f32 {
        SPAN / SEGMENTS as f32
    }

    /// Vertex `i` of the polyline, `0..=SEGMENTS`
    pub fn vertex(&self, i: usize) -> Vec3 {
        let u = i as f32 / SEGMENTS as f32;
        let x = -0.5 * SPAN + u * SPAN;
        let y = self.amplitude * self.shape.sample(u * self.cycles + self.phase);
        Vec3::new(x, y, 0.0)
    }

    fn segment_distance(&self, i: usize, p: Vec3) -> f32 {
        capsule(self.vertex(i), self.vertex(i + 1), TRACE_RADIUS).distance(p)
    }

    /// Distance to the tube, from the segments around `p.x`
    pub fn distance(&self, p: Vec3) -> f32 {
        let w = Self::segment_width();
        let cell = ((p.x + 0.5 * SPAN) / w).floor();
        let center = cell.clamp(0.0, (SEGMENTS - 1) as f32) as usize;
        let first = center.saturating_sub(1);
        let last = (center + 1).min(SEGMENTS - 1);

        let near = (first..=last)
            .map(|i| self.segment_distance(i, p))
            .fold(f32::MAX, f32::min);

        // Anything outside the window is at least this far away in x
        let mut gap = f32::MAX;
        if first > 0 {
            gap = gap.min(p.x - self.vertex(first).x);
        }
        if last < SEGMENTS - 1 {
            gap = gap.min(self.vertex(last + 1).x - p.x);
        }

        near.min(gap.max(0.0) - TRACE_RADIUS)
    }
}

/// The waveform preview scene
#[derive(Debug, Clone, Default)]
pub struct WaveformPanel {
    options: WaveformOptions,
}

impl WaveformPanel {
    pub fn new(options: WaveformOptions) -> Self {
        Self { options }
    }

    pub fn shape(&self, frame: &FrameContext<'_>) -> Waveform {
        self.options
            .shape
            .unwrap_or_else(|| Waveform::from_control(frame.control(channels::MIDI_SHAPE)))
    }

    /// Cycles shown this frame, scaled by the note frequency
    pub fn cycles(&self, frame: &FrameContext<'_>) -> f32 {
        let pitch = match self.options.pitch_channel {
            Some(channel) => quantize(frame.control(channel), 127),
            None => self.options.pitch,
        };
        let ratio = midi_pitch_to_freq(pitch) / midi_pitch_to_freq(REFERENCE_PITCH);
        (self.options.cycles * ratio).clamp(0.25, 16.0)
    }

    pub fn trace(&self, frame: &FrameContext<'_>) -> Trace {
        Trace {
            shape: self.shape(frame),
            cycles: self.cycles(frame),
            amplitude: self.options.amplitude * (1.0 + 0.25 * frame.control(channels::MIDI_AMOUNT)),
            phase: frame.time * self.options.scroll,
        }
    }

    fn panel_half_extents(&self) -> Vec3 {
        Vec3::new(0.5 * SPAN + 0.3, 1.25 * self.options.amplitude + 0.35, 0.05)
    }
}

impl Scene for WaveformPanel {
    fn sample(&self, p: Vec3, frame: &FrameContext<'_>) -> DistanceSample {
        let panel = box3(self.panel_half_extents()).distance(p - Vec3::new(0.0, 0.0, PANEL_DEPTH));
        let axis = capsule(
            Vec3::new(-0.5 * SPAN, 0.0, PANEL_DEPTH + 0.05),
            Vec3::new(0.5 * SPAN, 0.0, PANEL_DEPTH + 0.05),
            AXIS_RADIUS,
        )
        .distance(p);
        let trace = self.trace(frame).distance(p);

        let distance = union(union(panel, axis), trace);
        let material = select_material(&[
            DistanceSample::new(panel, PANEL),
            DistanceSample::new(axis, AXIS),
            DistanceSample::new(trace, TRACE),
        ]);

        DistanceSample::new(distance, material)
    }
}

impl Stage for WaveformPanel {
    fn palette(&self) -> Palette {
        Palette::new()
            .with(PANEL, MaterialStyle::new(Vec3::new(0.08, 0.09, 0.12)))
            .with(AXIS, MaterialStyle::new(Vec3::splat(0.35)))
            .with(
                TRACE,
                MaterialStyle::new(Vec3::from(self.options.color))
                    .glowing(1.2)
                    .reacting_to(channels::LEVEL),
            )
    }

    fn camera(&self, frame: &FrameContext<'_>) -> Camera {
        let mut camera = Camera::look_at(Vec3::new(0.0, 0.0, 5.5), Vec3::new(0.0, 0.0, PANEL_DEPTH));
        // Only a gentle tilt; the panel is meant to be read head-on
        let tilt = (frame.mouse - Vec2::splat(0.5)) * 0.25 + Vec2::splat(0.5);
        camera.orbit_from_mouse(tilt);
        camera
    }
}
