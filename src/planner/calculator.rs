use tracing::debug;

use crate::{
    config::PlannerConfig,
    error::{InputError, Result},
};
use super::{
    plan::Plan,
    segment::{ContinuationSegment, FirstSegment, Segment},
    timing::frames_from_duration,
};

/// Most generations a single plan may contain
pub const MAX_SEGMENTS: u32 = 100_000;

/// Splits a target length into overlapping generations
///
/// The first generation starts from the seed image and fills frames
/// `1..=max_frames` of the final video. Every further generation is
/// conditioned on the last `overlap_frames` frames assembled so far; those
/// repeated frames are dropped, so each continuation adds
/// `max_frames - overlap_frames` new frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentPlanner {
    config: PlannerConfig,
}

impl Default for SegmentPlanner {
    fn default() -> Self {
        Self { config: PlannerConfig::default() }
    }
}

impl SegmentPlanner {
    /// Create a planner with the given generation budget
    pub fn new(max_frames: u32, overlap_frames: u32) -> Result<Self> {
        Self::from_config(&PlannerConfig {
            max_frames,
            overlap_frames,
            ..PlannerConfig::default()
        })
    }

    /// Create a planner from a configuration section
    pub fn from_config(config: &PlannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config: *config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn max_frames(&self) -> u32 {
        self.config.max_frames
    }

    pub fn overlap_frames(&self) -> u32 {
        self.config.overlap_frames
    }

    pub fn effective_frames(&self) -> u32 {
        self.config.effective_frames()
    }

    /// Plan the generations needed for `target_frames` frames
    ///
    /// The plan may come out longer than requested, by less than one
    /// continuation's worth of frames, but never shorter.
    pub fn calculate_segments(&self, target_frames: u32) -> Result<Plan> {
        if target_frames == 0 {
            return Err(InputError::NonPositiveTarget.into());
        }

        let max = self.config.max_frames;
        let overlap = self.config.overlap_frames;
        let effective = self.effective_frames();

        if target_frames <= max {
            debug!("Target of {} frames fits in a single generation", target_frames);
            let segment = Segment::First(FirstSegment {
                end_frame: target_frames,
                generation_frames: target_frames,
            });
            return Ok(Plan::new(vec![segment], target_frames, target_frames, max, overlap));
        }

        let remaining = target_frames - max;
        let additional = remaining.div_ceil(effective);
        if additional >= MAX_SEGMENTS {
            return Err(InputError::TooManySegments {
                segments: u64::from(additional) + 1,
                limit: MAX_SEGMENTS,
            }
            .into());
        }
        let calculated_length = additional
            .checked_mul(effective)
            .and_then(|frames| frames.checked_add(max))
            .ok_or(InputError::TargetTooLarge { frames: f64::from(target_frames) })?;
        let total_segments = 1 + additional;

        debug!(
            "Planning {} frames: {} generations of up to {} frames ({} overlap), {} frames produced",
            target_frames, total_segments, max, overlap, calculated_length
        );

        let mut segments = Vec::with_capacity(total_segments as usize);
        segments.push(Segment::First(FirstSegment {
            end_frame: max,
            generation_frames: max,
        }));

        let mut current_start = max + 1;
        for index in 2..=total_segments {
            let generation_start_frame = current_start - overlap;
            let end_frame = current_start + (effective - 1);

            let mut generation_frames = max;
            if index == total_segments && self.config.trim_final_generation && end_frame > target_frames {
                generation_frames = (target_frames - current_start) + overlap + 1;
                debug!(
                    "Trimming final generation to {} frames to stop at frame {}",
                    generation_frames, target_frames
                );
            }

            segments.push(Segment::Continuation(ContinuationSegment {
                index,
                start_frame: current_start,
                end_frame,
                generation_frames,
                generation_start_frame,
                skip_frames: generation_start_frame - 1,
                overlap_with_previous: overlap,
            }));

            // May pass u32::MAX once the final segment is placed
            current_start = current_start.saturating_add(effective);
        }

        Ok(Plan::new(segments, target_frames, calculated_length, max, overlap))
    }

    /// Plan the generations for a clip of `duration_seconds` at `fps`
    pub fn calculate_from_duration(&self, duration_seconds: f64, fps: f64) -> Result<Plan> {
        let target_frames = frames_from_duration(duration_seconds, fps)?;
        debug!("{:.2}s at {} fps resolves to {} frames", duration_seconds, fps, target_frames);

        Ok(self.calculate_segments(target_frames)?.with_duration(duration_seconds, fps))
    }
}
