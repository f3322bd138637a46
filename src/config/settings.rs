//! Runtime configuration settings

use crate::models::ModelKind;
use crate::report::ReportFormat;
use std::path::PathBuf;

/// Runtime settings for the assessment pipeline
#[derive(Debug, Clone)]
pub struct Settings {
    /// Input path (file or directory)
    pub input: PathBuf,
    /// Report destination file
    pub output: PathBuf,
    /// Model family for this run
    pub model: ModelKind,
    /// Report format
    pub format: ReportFormat,
    /// Scan recursively
    pub recursive: bool,
    /// Skip accelerator probing and run on CPU
    pub force_cpu: bool,
    /// Windows per forward pass for the windowed model
    pub batch_size: usize,
    /// Optional reference WAV for the SQUIM subjective head
    pub reference: Option<PathBuf>,
    /// Show progress bars
    pub show_progress: bool,
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_cli(cli: &super::cli::Cli) -> Self {
        Self {
            input: cli.input.clone(),
            output: cli.output.clone(),
            model: cli.model,
            format: cli.format,
            recursive: cli.recursive,
            force_cpu: cli.force_cpu,
            batch_size: cli.batch_size.max(1),
            reference: cli.reference.clone(),
            show_progress: !cli.quiet,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("."),
            output: PathBuf::from("./report.txt"),
            model: ModelKind::Aesthetics,
            format: ReportFormat::Text,
            recursive: false,
            force_cpu: false,
            batch_size: 1,
            reference: None,
            show_progress: true,
        }
    }
}
