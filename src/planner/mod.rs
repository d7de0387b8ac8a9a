//! # Segment Planning Module
//!
//! Splits a target video length into overlapping, bounded-length generations
//! and describes where each one lands in the assembled video.

pub mod calculator;
pub mod plan;
pub mod segment;
pub mod timing;

pub use calculator::SegmentPlanner;
pub use plan::Plan;
pub use segment::{ContinuationSegment, FirstSegment, GenerationSource, Segment};
pub use timing::frames_from_duration;
