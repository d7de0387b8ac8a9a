use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use super::segment::Segment;

/// A complete generation plan for one target length
///
/// Plans are built once by [`SegmentPlanner`](super::SegmentPlanner) and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    segments_needed: usize,
    target_length: u32,
    calculated_length: u32,
    max_frames_per_gen: u32,
    overlap_frames: u32,
    effective_frames_per_segment: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fps: Option<f64>,
    segments: Vec<Segment>,
}

impl Plan {
    pub(crate) fn new(
        segments: Vec<Segment>,
        target_length: u32,
        calculated_length: u32,
        max_frames_per_gen: u32,
        overlap_frames: u32,
    ) -> Self {
        Self {
            segments_needed: segments.len(),
            target_length,
            calculated_length,
            max_frames_per_gen,
            overlap_frames,
            effective_frames_per_segment: max_frames_per_gen - overlap_frames,
            duration_seconds: None,
            fps: None,
            segments,
        }
    }

    /// Record the duration this plan was derived from
    pub(crate) fn with_duration(mut self, duration_seconds: f64, fps: f64) -> Self {
        self.duration_seconds = Some(duration_seconds);
        self.fps = Some(fps);
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segments_needed(&self) -> usize {
        self.segments_needed
    }

    /// Requested frame count
    pub fn target_length(&self) -> u32 {
        self.target_length
    }

    /// Frame count the plan actually produces
    pub fn calculated_length(&self) -> u32 {
        self.calculated_length
    }

    pub fn max_frames_per_gen(&self) -> u32 {
        self.max_frames_per_gen
    }

    pub fn overlap_frames(&self) -> u32 {
        self.overlap_frames
    }

    pub fn effective_frames_per_segment(&self) -> u32 {
        self.effective_frames_per_segment
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        self.duration_seconds
    }

    pub fn fps(&self) -> Option<f64> {
        self.fps
    }

    /// Frames produced beyond the requested length
    pub fn overshoot(&self) -> u32 {
        self.calculated_length.saturating_sub(self.target_length)
    }

    /// Length of the produced video in seconds, when the frame rate is known
    pub fn calculated_duration_seconds(&self) -> Option<f64> {
        self.fps.map(|fps| f64::from(self.calculated_length) / fps)
    }

    /// Raw frames requested from the model across all generations
    pub fn total_generated_frames(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.generation_frames())).sum()
    }

    /// Raw frames thrown away as overlap before splicing
    pub fn discarded_frames(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.overlap_with_previous())).sum()
    }

    /// Check every structural invariant of the plan
    ///
    /// Plans built by the planner always pass; this exists for plans read
    /// back from disk. Frame arithmetic is done in `u64` so hand-edited
    /// values near `u32::MAX` are reported, not overflowed.
    pub fn validate(&self) -> Result<()> {
        let max = u64::from(self.max_frames_per_gen);
        let overlap = u64::from(self.overlap_frames);
        let target = u64::from(self.target_length);
        let calculated = u64::from(self.calculated_length);

        if max == 0 || overlap >= max {
            return inconsistent(format!("overlap {} with {} frames per generation", overlap, max));
        }
        let effective = max - overlap;
        if u64::from(self.effective_frames_per_segment) != effective {
            return inconsistent(format!(
                "effective frames {} should be {}",
                self.effective_frames_per_segment, effective
            ));
        }
        if target == 0 {
            return inconsistent("target length is zero".to_string());
        }

        let (expected_segments, expected_length) = if target <= max {
            (1, target)
        } else {
            let additional = (target - max).div_ceil(effective);
            (1 + additional, max + additional * effective)
        };
        if self.segments.len() as u64 != expected_segments || self.segments_needed != self.segments.len() {
            return inconsistent(format!(
                "{} segments listed and {} recorded, but {} frames need {}",
                self.segments.len(),
                self.segments_needed,
                target,
                expected_segments
            ));
        }
        if calculated != expected_length {
            return inconsistent(format!(
                "calculated length {} should be {} for a target of {}",
                calculated, expected_length, target
            ));
        }

        match self.segments.first() {
            Some(Segment::First(first)) => {
                let expected_end = if expected_segments == 1 { target } else { max };
                if u64::from(first.end_frame) != expected_end || u64::from(first.generation_frames) != expected_end {
                    return inconsistent(format!(
                        "first segment covers 1-{} with {} generated frames instead of 1-{}",
                        first.end_frame, first.generation_frames, expected_end
                    ));
                }
            }
            _ => return inconsistent("plan does not open with a first segment".to_string()),
        }

        let last_position = self.segments.len() - 1;
        let mut previous_end = max;
        for (position, segment) in self.segments.iter().enumerate().skip(1) {
            let Segment::Continuation(next) = segment else {
                return inconsistent(format!("segment {} restarts from the seed image", position + 1));
            };
            let index = next.index;
            if u64::from(index) != position as u64 + 1 {
                return inconsistent(format!("segment at position {} has index {}", position + 1, index));
            }

            let start = u64::from(next.start_frame);
            let end = u64::from(next.end_frame);
            if start != previous_end + 1 || end + 1 != start + effective {
                return inconsistent(format!(
                    "segment {} covers {}-{} instead of {}-{}",
                    index,
                    start,
                    end,
                    previous_end + 1,
                    previous_end + effective
                ));
            }

            let source = start - overlap;
            if u64::from(next.overlap_with_previous) != overlap
                || u64::from(next.generation_start_frame) != source
                || u64::from(next.skip_frames) + 1 != source
            {
                return inconsistent(format!("segment {} has wrong overlap accounting", index));
            }

            let generated = u64::from(next.generation_frames);
            let wrong_size = if position == last_position {
                // Trimmed or not, the last generation must still reach the target
                generated > max || start + generated - overlap <= target
            } else {
                generated != max
            };
            if wrong_size {
                return inconsistent(format!(
                    "segment {} generates {} frames (limit {}, overlap {})",
                    index, generated, max, overlap
                ));
            }

            previous_end = end;
        }

        Ok(())
    }
}

fn inconsistent(reason: String) -> Result<()> {
    Err(PlanError::Inconsistent { reason }.into())
}
