use crate::error::{InputError, Result};

/// Convert a duration and frame rate into a whole number of frames
///
/// Fractional frames are truncated, so 1.5 seconds at 25 fps is 37 frames.
pub fn frames_from_duration(duration_seconds: f64, fps: f64) -> Result<u32> {
    if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return Err(InputError::InvalidDuration { value: duration_seconds }.into());
    }
    if !fps.is_finite() || fps <= 0.0 {
        return Err(InputError::InvalidFps { value: fps }.into());
    }

    let frames = (duration_seconds * fps).floor();
    if frames < 1.0 {
        return Err(InputError::NonPositiveTarget.into());
    }
    if frames > f64::from(u32::MAX) {
        return Err(InputError::TargetTooLarge { frames }.into());
    }

    Ok(frames as u32)
}
