//! LFO waveform shapes for the waveform preview panel
//!
//! Every shape is sampled over one normalized cycle, `phase` in `[0, 1)`,
//! and returns a value in `[-1, 1]`. Phases outside the cycle wrap.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Pitch of A4 as a MIDI note number
const A4_PITCH: i16 = 69;
/// Frequency of A4 in Hz
const A4_FREQ: f32 = 440.0;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
    Sawtooth,
    /// Square wave that is high for `width` of the cycle
    Pulse { width: f32 },
}

impl Waveform {
    /// Sample the shape at `phase` (cycles)
    pub fn sample(self, phase: f32) -> f32 {
        let t = phase.rem_euclid(1.0);
        match self {
            Self::Sine => (t * TAU).sin(),
            Self::Square => {
                if t < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Self::Triangle => 1.0 - 2.0 * (2.0 * t - 1.0).abs(),
            Self::Sawtooth => 2.0 * t - 1.0,
            Self::Pulse { width } => {
                if t < width.clamp(0.0, 1.0) {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }

    /// Pick a shape from a control value, as a 4-position selector knob
    pub fn from_control(value: f32) -> Self {
        match quantize(value, 3) {
            0 => Self::Sine,
            1 => Self::Square,
            2 => Self::Triangle,
            _ => Self::Sawtooth,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sine => "sine",
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::Sawtooth => "sawtooth",
            Self::Pulse { .. } => "pulse",
        }
    }
}

/// Map a control value in `[0, 1]` onto `0..=steps`, rounding to nearest
pub fn quantize(value: f32, steps: u8) -> u8 {
    let v = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    (v * f32::from(steps)).round() as u8
}

/// Frequency in Hz of a MIDI note, with A4 (note 69) at 440 Hz
pub fn midi_pitch_to_freq(pitch: u8) -> f32 {
    (f32::from(i16::from(pitch) - A4_PITCH) / 12.0).exp2() * A4_FREQ
}
