use thiserror::Error;

/// Main error type for the Stitch-Planner library
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Overlap of {overlap_frames} frames leaves no new frames with a maximum of {max_frames} per generation")]
    OverlapTooLarge { max_frames: u32, overlap_frames: u32 },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Errors raised for a single planning request
#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("Target length must be at least one frame")]
    NonPositiveTarget,

    #[error("Duration must be a positive number of seconds, got {value}")]
    InvalidDuration { value: f64 },

    #[error("Frame rate must be a positive number, got {value}")]
    InvalidFps { value: f64 },

    #[error("Target of {frames} frames is too large to plan")]
    TargetTooLarge { frames: f64 },

    #[error("Plan would need {segments} generations, more than the limit of {limit}")]
    TooManySegments { segments: u64, limit: u32 },
}

/// Errors for plans that do not hold together
#[derive(Error, Debug, PartialEq)]
pub enum PlanError {
    #[error("Plan is inconsistent: {reason}")]
    Inconsistent { reason: String },
}

/// Plan export and import errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unsupported plan format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Failed to serialize plan: {reason}")]
    SerializeFailed { reason: String },

    #[error("Failed to read plan file {path}: {reason}")]
    DeserializeFailed { path: String, reason: String },
}

/// Convenience type alias for Results using PlannerError
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Check if this error is recoverable (the caller can ask again)
    pub fn is_recoverable(&self) -> bool {
        match self {
            // A new target or duration may well succeed
            Self::Input(_) => true,
            Self::Io(_) => true,
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(ConfigError::OverlapTooLarge { max_frames, overlap_frames }) => {
                format!(
                    "Overlap ({}) must be smaller than the maximum frames per generation ({}).",
                    overlap_frames, max_frames
                )
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            Self::Export(ExportError::UnsupportedFormat { extension }) => {
                format!("Cannot export to '{}'. Use a .json or .toml file name.", extension)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_recoverable() {
        let err: PlannerError = InputError::NonPositiveTarget.into();
        assert!(err.is_recoverable());

        let err: PlannerError = ConfigError::OverlapTooLarge { max_frames: 8, overlap_frames: 8 }.into();
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_user_message() {
        let err: PlannerError = ConfigError::OverlapTooLarge { max_frames: 81, overlap_frames: 90 }.into();
        assert_eq!(
            err.user_message(),
            "Overlap (90) must be smaller than the maximum frames per generation (81)."
        );

        let err: PlannerError = InputError::InvalidFps { value: 0.0 }.into();
        assert_eq!(err.user_message(), "Invalid input: Frame rate must be a positive number, got 0");
    }
}
