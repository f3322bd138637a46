//! Report generation
//!
//! Renders a completed batch into a text or JSON report and writes it to
//! disk atomically, so a crash mid-write never leaves a truncated report
//! at the destination path.

pub mod json;
pub mod text;

use crate::error::{AudiogradeError, Result};
use crate::types::{BatchResult, ModelInfo};
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use tracing::info;

/// Output format for the report file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable plain text
    Text,
    /// Machine-readable JSON
    Json,
}

/// Render the batch and write the report to `dest`.
pub fn write(
    batch: &BatchResult,
    model: &ModelInfo,
    dest: &Path,
    format: ReportFormat,
) -> Result<()> {
    let rendered = match format {
        ReportFormat::Text => text::render(batch, model),
        ReportFormat::Json => json::render(batch, model).map_err(|e| {
            AudiogradeError::OutputError {
                path: dest.to_path_buf(),
                reason: format!("Failed to serialize report: {e}"),
            }
        })?,
    };

    write_atomic(dest, &rendered)?;

    info!(
        "Wrote report for {} files to {}",
        batch.total(),
        dest.display()
    );
    Ok(())
}

/// Write to a temporary sibling first, then rename over the destination.
fn write_atomic(dest: &Path, contents: &str) -> Result<()> {
    let temp_path = temp_path_for(dest);

    std::fs::write(&temp_path, contents)
        .map_err(|e| AudiogradeError::output_error(dest, e))?;

    std::fs::rename(&temp_path, dest).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        AudiogradeError::output_error(dest, e)
    })?;

    Ok(())
}

fn temp_path_for(dest: &Path) -> PathBuf {
    match dest.extension().and_then(|e| e.to_str()) {
        Some(ext) => dest.with_extension(format!("{ext}.tmp")),
        None => dest.with_extension("tmp"),
    }
}
