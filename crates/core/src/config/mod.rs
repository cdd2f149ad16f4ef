use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, VisualizerError};

/// Top-level configuration for a visualisation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Frames rendered per second of audio.
    pub fps: u32,
    /// Number of bar columns in a frame.
    pub width: usize,
    /// Number of terminal rows a frame occupies.
    pub height: u32,
    /// Character used to draw bars.
    pub bar_char: char,
    /// Print the number of skipped frames once playback ends.
    pub debug: bool,
    /// Pace frames against the wall clock.
    pub sync: bool,
    pub raw: RawFormat,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            width: 30,
            height: 15,
            bar_char: '#',
            debug: false,
            sync: true,
            raw: RawFormat::default(),
        }
    }
}

impl VisualizerConfig {
    /// Loads a configuration from a JSON file. Missing fields fall back to
    /// their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded configuration file");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(VisualizerError::config("fps must be greater than zero"));
        }
        if self.width == 0 {
            return Err(VisualizerError::config("width must be greater than zero"));
        }
        if self.height == 0 {
            return Err(VisualizerError::config("height must be greater than zero"));
        }
        self.raw.validate()
    }
}

/// Layout of headerless PCM input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFormat {
    pub sample_rate: u32,
    pub channels: u16,
    /// Bytes per sample: 1, 2 or 4, signed little-endian.
    pub sample_width: u8,
}

impl Default for RawFormat {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 2,
            sample_width: 2,
        }
    }
}

impl RawFormat {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(VisualizerError::config("raw sample rate must be greater than zero"));
        }
        if self.channels == 0 {
            return Err(VisualizerError::config("raw channel count must be greater than zero"));
        }
        match self.sample_width {
            1 | 2 | 4 => Ok(()),
            other => Err(VisualizerError::config(format!(
                "raw sample width must be 1, 2 or 4 bytes, got {other}"
            ))),
        }
    }
}
