//! # Stitch-Planner
//!
//! Plan how to build a long video out of several bounded-length generations.
//!
//! A video model that can only produce `max_frames` frames per call can still
//! make longer clips: each further generation is conditioned on the tail of
//! the video assembled so far, and its first `overlap_frames` frames, which
//! repeat that tail, are discarded before splicing. This crate works out the
//! exact plan: how many generations, which frame each one continues from, and
//! where its surviving frames land in the final video.
//!
//! ## Quick Start
//!
//! ```rust
//! use stitch_planner::SegmentPlanner;
//!
//! # fn main() -> stitch_planner::Result<()> {
//! let planner = SegmentPlanner::new(81, 8)?;
//! let plan = planner.calculate_segments(300)?;
//!
//! assert_eq!(plan.segments_needed(), 4);
//! assert_eq!(plan.calculated_length(), 300);
//!
//! let plan = planner.calculate_from_duration(10.0, 24.0)?;
//! assert_eq!(plan.target_length(), 240);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`planner`] - Segment planning and duration conversion
//! - [`report`] - Text rendering, export and import of plans
//! - [`config`] - Configuration management
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod planner;
pub mod report;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{PlannerError, Result},
    planner::{GenerationSource, Plan, Segment, SegmentPlanner},
};
