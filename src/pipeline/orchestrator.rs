//! Pipeline orchestration
//!
//! Coordinates discovery, scoring, and report writing. Files are scored
//! sequentially in path order: a single ONNX session already saturates the
//! selected device, and deterministic order makes reports diffable.

use crate::audio;
use crate::config::Settings;
use crate::device::Device;
use crate::discovery;
use crate::error::{AudiogradeError, Result};
use crate::models::{
    AestheticsScorer, FileReference, ModelKind, MultiToneReference, NaturalnessScorer,
    ReferenceProvider, Scorer, SquimScorer,
};
use crate::report;
use crate::types::{BatchResult, MediaFile, MediaKind, MetricMap, MetricRecord, Waveform};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Pipeline result summary
#[derive(Debug)]
pub struct RunSummary {
    pub total_files: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Run the full assessment pipeline
pub fn run(settings: &Settings) -> Result<RunSummary> {
    let pipeline_start = Instant::now();

    validate_output_dest(&settings.output)?;

    // Phase 1: Discovery
    let discovery_start = Instant::now();
    info!("Scanning for media files...");
    let files = discovery::scan(&settings.input, settings.recursive)?;
    info!(
        "Found {} files in {:.2}s",
        files.len(),
        discovery_start.elapsed().as_secs_f64()
    );

    // Phase 2: Model setup
    let device = Device::select(settings.force_cpu);
    let setup_start = Instant::now();
    let mut scorer = build_scorer(settings, &device)?;
    info!(
        "Loaded {} model on {} in {:.2}s",
        scorer.info().name,
        device,
        setup_start.elapsed().as_secs_f64()
    );

    // Phase 3: Scoring
    let scoring_start = Instant::now();
    let batch = process_files(&files, scorer.as_mut(), settings)?;
    let scoring_elapsed = scoring_start.elapsed();
    if !files.is_empty() {
        info!(
            "Scored {} files in {:.2}s ({:.2}s/file)",
            files.len(),
            scoring_elapsed.as_secs_f64(),
            scoring_elapsed.as_secs_f64() / files.len() as f64
        );
    }

    // Phase 4: Report
    report::write(&batch, scorer.info(), &settings.output, settings.format)?;

    info!(
        "Total pipeline time: {:.2}s",
        pipeline_start.elapsed().as_secs_f64()
    );

    Ok(RunSummary {
        total_files: batch.total(),
        succeeded: batch.succeeded(),
        failed: batch.failed(),
    })
}

/// Reject unusable report destinations before any model loads
fn validate_output_dest(dest: &Path) -> Result<()> {
    if dest.is_dir() {
        return Err(AudiogradeError::OutputError {
            path: dest.to_path_buf(),
            reason: "destination is a directory; pass a file path".to_string(),
        });
    }
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(AudiogradeError::OutputError {
                path: dest.to_path_buf(),
                reason: format!("output directory '{}' does not exist", parent.display()),
            });
        }
    }
    Ok(())
}

/// Construct the scorer for the selected model family
fn build_scorer(settings: &Settings, device: &Device) -> Result<Box<dyn Scorer>> {
    match settings.model {
        ModelKind::Aesthetics => Ok(Box::new(AestheticsScorer::new(
            device,
            settings.batch_size,
        )?)),
        ModelKind::Squim => {
            let reference: Box<dyn ReferenceProvider> = match &settings.reference {
                Some(path) => {
                    let file_ref = FileReference::load(path).map_err(|e| {
                        AudiogradeError::setup_error(format!(
                            "Failed to load reference audio '{}': {}",
                            path.display(),
                            e
                        ))
                    })?;
                    Box::new(file_ref)
                }
                None => Box::new(MultiToneReference::default()),
            };
            Ok(Box::new(SquimScorer::new(device, reference)?))
        }
        ModelKind::Naturalness => Ok(Box::new(NaturalnessScorer::new(device)?)),
    }
}

/// Score every discovered file, one record per file
///
/// Recoverable failures become failed records; fatal errors abort the batch.
pub fn process_files(
    files: &[MediaFile],
    scorer: &mut dyn Scorer,
    settings: &Settings,
) -> Result<BatchResult> {
    let mut batch = BatchResult::default();

    let progress_bar = if settings.show_progress && !files.is_empty() {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let model = scorer.info().name;

    for file in files {
        if let Some(pb) = &progress_bar {
            pb.set_message(short_name(&file.path));
        }

        let start = Instant::now();
        match score_file(file, scorer) {
            Ok(metrics) => {
                batch.push(MetricRecord::success(
                    &file.path,
                    model,
                    metrics,
                    start.elapsed(),
                ));
            }
            Err(e) if e.is_recoverable() => {
                warn!("Failed {}: {}", file.path.display(), e);
                batch.push(MetricRecord::failure(
                    &file.path,
                    model,
                    e.to_string(),
                    start.elapsed(),
                ));
            }
            Err(e) => return Err(e),
        }

        if let Some(pb) = &progress_bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress_bar {
        pb.finish_with_message("Scoring complete");
    }

    Ok(batch)
}

/// Score a single file: load a 16 kHz mono waveform, then run the model
fn score_file(file: &MediaFile, scorer: &mut dyn Scorer) -> Result<MetricMap> {
    debug!("Scoring: {}", file.path.display());
    let waveform = load_waveform(file)?;
    scorer.score(&waveform)
}

/// How to turn a media file into a decodable waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadStep {
    /// Decode the file as-is
    Direct,
    /// Convert through ffmpeg first, then decode the result
    Convert,
}

/// Load strategy per media kind
///
/// Directly decodable audio gets one decode attempt before falling back to
/// conversion, so ffmpeg runs at most once per file. Everything else goes
/// straight to conversion.
fn load_plan(kind: MediaKind) -> &'static [LoadStep] {
    match kind {
        MediaKind::Audio(format) if format.directly_decodable() => {
            &[LoadStep::Direct, LoadStep::Convert]
        }
        MediaKind::Audio(_) | MediaKind::Video(_) => &[LoadStep::Convert],
        MediaKind::Unsupported => &[],
    }
}

fn load_waveform(file: &MediaFile) -> Result<Waveform> {
    let plan = load_plan(file.kind);
    let Some((last, earlier)) = plan.split_last() else {
        let extension = file
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("<none>")
            .to_string();
        return Err(AudiogradeError::UnsupportedFormat {
            path: file.path.clone(),
            extension,
        });
    };

    // Only a decode failure justifies retrying via the next step; anything
    // else (too short, unreadable, ffmpeg missing) is the file's verdict.
    for step in earlier {
        match attempt_load(file, *step) {
            Ok(waveform) => return Ok(waveform),
            Err(e @ AudiogradeError::DecodeError { .. }) => {
                warn!(
                    "Direct decode of {} failed, converting instead: {}",
                    file.path.display(),
                    e
                );
            }
            Err(e) => return Err(e),
        }
    }

    attempt_load(file, *last)
}

fn attempt_load(file: &MediaFile, step: LoadStep) -> Result<Waveform> {
    match step {
        LoadStep::Direct => audio::load(&file.path),
        LoadStep::Convert => {
            let strip_video = matches!(file.kind, MediaKind::Video(_));
            let converted = audio::convert_to_wav(&file.path, strip_video)?;
            audio::load(converted.wav_path())
        }
    }
}

fn short_name(path: &Path) -> String {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    name.chars().take(30).collect()
}
