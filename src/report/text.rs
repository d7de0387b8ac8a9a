use std::fmt;

use crate::planner::{Plan, Segment};

const RULE_WIDTH: usize = 60;

/// Human-readable rendering of a [`Plan`]
///
/// ```rust
/// use stitch_planner::{report::PlanReport, SegmentPlanner};
///
/// let plan = SegmentPlanner::default().calculate_segments(150).unwrap();
/// let text = PlanReport::new(&plan).to_string();
/// assert!(text.contains("Segments Needed: 2"));
/// ```
pub struct PlanReport<'a> {
    plan: &'a Plan,
}

impl<'a> PlanReport<'a> {
    pub fn new(plan: &'a Plan) -> Self {
        Self { plan }
    }

    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.plan;

        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f, "VIDEO GENERATION PLAN")?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;

        if let (Some(duration), Some(fps)) = (plan.duration_seconds(), plan.fps()) {
            writeln!(f, "Target Duration: {:.1} seconds @ {} FPS", duration, fps)?;
        }
        writeln!(f, "Target Frames: {}", plan.target_length())?;
        writeln!(f, "Segments Needed: {}", plan.segments_needed())?;
        writeln!(f, "Max Frames per Generation: {}", plan.max_frames_per_gen())?;
        writeln!(f, "Overlap Frames: {}", plan.overlap_frames())?;
        writeln!(f, "Effective New Frames per Segment: {}", plan.effective_frames_per_segment())?;

        if plan.calculated_length() != plan.target_length() {
            write!(f, "Actual Final Length: {} frames", plan.calculated_length())?;
            if let Some(seconds) = plan.calculated_duration_seconds() {
                write!(f, " ({:.2} seconds)", seconds)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }

    fn write_segment(&self, f: &mut fmt::Formatter<'_>, segment: &Segment) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Segment {}:", segment.index())?;
        writeln!(f, "  Generate: {} frames", segment.generation_frames())?;
        writeln!(
            f,
            "  🎯 Skip frames: {} (start from {})",
            segment.skip_frames(),
            segment.generation_start_source()
        )?;

        match segment {
            Segment::First(first) => {
                writeln!(f, "  Use: Frames 1-{} (all frames)", first.generation_frames)?;
                writeln!(f, "  Source: Original image (no skipping needed)")?;
            }
            Segment::Continuation(next) => {
                writeln!(
                    f,
                    "  Use: Frames {}-{} (skip first {} frames from generation)",
                    next.overlap_with_previous + 1,
                    next.generation_frames,
                    next.overlap_with_previous
                )?;
                writeln!(f, "  Source: Frame {} from video timeline", next.generation_start_frame)?;
                writeln!(f, "  Overlap: {} frames with previous segment", next.overlap_with_previous)?;
            }
        }

        writeln!(
            f,
            "  Final position: Frames {}-{} in final video",
            segment.start_frame(),
            segment.end_frame()
        )
    }
}

impl fmt::Display for PlanReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_header(f)?;

        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(f, "GENERATION SEQUENCE:")?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;

        for segment in self.plan.segments() {
            self.write_segment(f, segment)?;
        }

        Ok(())
    }
}

/// One-line description of a plan, used in log output
pub struct PlanSummary<'a>(pub &'a Plan);

impl fmt::Display for PlanSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.0;
        write!(
            f,
            "{} frames -> {} generation(s), {} frames produced ({} raw, {} discarded)",
            plan.target_length(),
            plan.segments_needed(),
            plan.calculated_length(),
            plan.total_generated_frames(),
            plan.discarded_frames()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::SegmentPlanner;

    #[test]
    fn test_single_segment_report() {
        let plan = SegmentPlanner::default().calculate_segments(60).unwrap();
        let text = PlanReport::new(&plan).to_string();

        assert!(text.contains("Target Frames: 60"));
        assert!(text.contains("Segments Needed: 1"));
        assert!(text.contains("Skip frames: 0 (start from original image)"));
        assert!(text.contains("Use: Frames 1-60 (all frames)"));
        assert!(text.contains("Final position: Frames 1-60 in final video"));
        assert!(!text.contains("Actual Final Length"));
    }

    #[test]
    fn test_multi_segment_report() {
        let plan = SegmentPlanner::default().calculate_segments(150).unwrap();
        let text = PlanReport::new(&plan).to_string();

        assert!(text.contains("Actual Final Length: 154 frames"));
        assert!(text.contains("Segment 2:"));
        assert!(text.contains("Generate: 77 frames"));
        assert!(text.contains("Skip frames: 73 (start from frame 74)"));
        assert!(text.contains("Use: Frames 9-77 (skip first 8 frames from generation)"));
        assert!(text.contains("Source: Frame 74 from video timeline"));
        assert!(text.contains("Final position: Frames 82-154 in final video"));
    }

    #[test]
    fn test_duration_header() {
        let plan = SegmentPlanner::default().calculate_from_duration(10.0, 24.0).unwrap();
        let text = PlanReport::new(&plan).to_string();

        assert!(text.contains("Target Duration: 10.0 seconds @ 24 FPS"));
        assert!(text.contains("Target Frames: 240"));
        assert!(text.contains("Actual Final Length: 300 frames (12.50 seconds)"));
    }

    #[test]
    fn test_summary() {
        let plan = SegmentPlanner::default().calculate_segments(300).unwrap();
        assert_eq!(
            PlanSummary(&plan).to_string(),
            "300 frames -> 4 generation(s), 300 frames produced (324 raw, 24 discarded)"
        );
    }
}
