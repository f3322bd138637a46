//! CLI argument parsing and configuration

use crate::models::ModelKind;
use crate::report::ReportFormat;
use clap::Parser;
use std::path::PathBuf;

/// audiograde - Batch audio quality assessment
///
/// Scores local audio and video files with pretrained audio-quality models
/// (aesthetic axes, SQUIM speech quality, naturalness MOS) and writes a text
/// or JSON report.
#[derive(Parser, Debug)]
#[command(name = "audiograde")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Input path (file or directory)
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Report destination file
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Model family to score with
    #[arg(short, long, value_enum, default_value_t = ModelKind::Aesthetics)]
    pub model: ModelKind,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Scan subdirectories recursively
    #[arg(short, long, default_value = "false")]
    pub recursive: bool,

    /// Run inference on CPU even when an accelerator is available
    #[arg(long, default_value = "false")]
    pub force_cpu: bool,

    /// Analysis windows grouped per forward pass (aesthetics model only)
    #[arg(long, value_name = "N", default_value = "1")]
    pub batch_size: usize,

    /// WAV file to use as the non-matching reference for the SQUIM MOS head
    #[arg(long, value_name = "WAV")]
    pub reference: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress progress bars)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}
