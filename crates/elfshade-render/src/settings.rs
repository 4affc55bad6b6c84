//! Render settings management
//!
//! Settings are read from an explicit path when one is given, otherwise from
//! `{config_dir}/elfshade/settings.json`, otherwise built-in defaults apply.

use crate::environment::{FeedbackSettings, GrainSettings, Shading};
use crate::scenes::{ViewerOptions, WaveformOptions};
use crate::{Error, Result};
use elfshade_core::march::MarchConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything a frame render can be tuned by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Frames per second for `animate`
    pub fps: f32,
    pub march: MarchConfig,
    pub shading: Shading,
    pub feedback: FeedbackSettings,
    pub grain: GrainSettings,
    pub viewer: ViewerOptions,
    pub waveform: WaveformOptions,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            fps: 30.0,
            march: MarchConfig::default(),
            shading: Shading::default(),
            feedback: FeedbackSettings::default(),
            grain: GrainSettings::default(),
            viewer: ViewerOptions::default(),
            waveform: WaveformOptions::default(),
        }
    }
}

impl RenderSettings {
    /// Reject settings that cannot produce a frame
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidParameter(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "fps must be > 0, got {}",
                self.fps
            )));
        }
        if !(0.0..=1.0).contains(&self.feedback.mix) {
            return Err(Error::InvalidParameter(format!(
                "feedback.mix must be within 0..1, got {}",
                self.feedback.mix
            )));
        }
        self.march.validate()?;
        Ok(())
    }

    /// Parse settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path` if given (errors are fatal), else from the default
    /// location (errors fall back to defaults with a warning)
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let Some(path) = settings_path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        match Self::load(&path) {
            Ok(settings) => {
                tracing::debug!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) => {
                tracing::warn!("Ignoring {}: {}", path.display(), e);
                Ok(Self::default())
            }
        }
    }

    /// Write settings as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Get the path to the default settings file
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("elfshade").join("settings.json"))
}
