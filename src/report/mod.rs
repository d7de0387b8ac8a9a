//! # Plan Reporting Module
//!
//! Presents finished plans as text and moves them to and from disk.

pub mod export;
pub mod text;

pub use export::{export_plan, load_plan, serialize_plan, PlanFormat};
pub use text::{PlanReport, PlanSummary};
