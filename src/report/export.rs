use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{
    error::{ExportError, Result},
    planner::Plan,
};

/// File formats a plan can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFormat {
    Json,
    Toml,
}

impl PlanFormat {
    /// Pick the format from a file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            _ => Err(ExportError::UnsupportedFormat {
                extension: path.as_ref().display().to_string(),
            }
            .into()),
        }
    }
}

/// Serialize a plan to text in the given format
pub fn serialize_plan(plan: &Plan, format: PlanFormat, pretty: bool) -> Result<String> {
    let text = match format {
        PlanFormat::Json if pretty => serde_json::to_string_pretty(plan)
            .map_err(|e| ExportError::SerializeFailed { reason: e.to_string() })?,
        PlanFormat::Json => serde_json::to_string(plan)
            .map_err(|e| ExportError::SerializeFailed { reason: e.to_string() })?,
        PlanFormat::Toml => toml::to_string_pretty(plan)
            .map_err(|e| ExportError::SerializeFailed { reason: e.to_string() })?,
    };
    Ok(text)
}

/// Write a plan to `path`, choosing the format from its extension
///
/// The plan is written to a temporary file next to `path` and renamed over
/// it once complete, so a failed export never leaves a partial file behind.
pub fn export_plan<P: AsRef<Path>>(plan: &Plan, path: P, pretty: bool) -> Result<()> {
    let path = path.as_ref();
    let format = PlanFormat::from_path(path)?;
    let mut content = serialize_plan(plan, format, pretty)?;
    if !content.ends_with('\n') {
        content.push('\n');
    }

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    debug!("Writing {:?} plan via temporary file in {:?}", format, directory);
    let mut temp_file = NamedTempFile::new_in(directory)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| e.error)?;

    info!("Generation plan exported to: {:?}", path);
    Ok(())
}

/// Read back a plan written by [`export_plan`] and check it still holds together
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<Plan> {
    let path = path.as_ref();
    let format = PlanFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;

    let plan: Plan = match format {
        PlanFormat::Json => serde_json::from_str(&content).map_err(|e| ExportError::DeserializeFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?,
        PlanFormat::Toml => toml::from_str(&content).map_err(|e| ExportError::DeserializeFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?,
    };

    plan.validate()?;
    debug!("Loaded plan with {} segments from {:?}", plan.segments_needed(), path);
    Ok(plan)
}
