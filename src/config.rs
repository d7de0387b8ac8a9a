use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for the Stitch-Planner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Generation budget settings
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Duration conversion settings
    #[serde(default)]
    pub timing: TimingConfig,

    /// Plan export settings
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.planner.validate()?;
        self.timing.validate()?;
        self.export.validate()?;
        Ok(())
    }
}

/// Generation budget for the segment planner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Maximum frames a single generation can produce
    pub max_frames: u32,

    /// Leading frames of every continuation generation that repeat the previous tail
    pub overlap_frames: u32,

    /// Shrink the last generation to what the target actually needs
    pub trim_final_generation: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_frames: 81,
            overlap_frames: 8,
            trim_final_generation: true,
        }
    }
}

impl PlannerConfig {
    /// New frames each continuation generation adds to the final video
    pub fn effective_frames(&self) -> u32 {
        self.max_frames.saturating_sub(self.overlap_frames)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_frames == 0 {
            return Err(ConfigError::InvalidValue {
                key: "planner.max_frames".to_string(),
                value: self.max_frames.to_string()
            }.into());
        }

        if self.overlap_frames >= self.max_frames {
            return Err(ConfigError::OverlapTooLarge {
                max_frames: self.max_frames,
                overlap_frames: self.overlap_frames,
            }.into());
        }

        Ok(())
    }
}

/// Duration-to-frames conversion settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Frame rate used when a duration is given without one
    pub default_fps: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { default_fps: 24.0 }
    }
}

impl TimingConfig {
    fn validate(&self) -> Result<()> {
        if !self.default_fps.is_finite() || self.default_fps <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "timing.default_fps".to_string(),
                value: self.default_fps.to_string()
            }.into());
        }

        Ok(())
    }
}

/// Plan export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name offered when exporting interactively
    pub default_filename: String,

    /// Indent JSON output
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_filename: "generation_plan.json".to_string(),
            pretty: true,
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<()> {
        if self.default_filename.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "export.default_filename".to_string(),
                value: self.default_filename.clone()
            }.into());
        }

        Ok(())
    }
}
