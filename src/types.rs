//! Core data types for audiograde
//!
//! These types represent the domain model and flow through the pipeline.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::time::Duration;

// =============================================================================
// Input classification
// =============================================================================

/// Audio formats recognized by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Flac,
    Mp3,
    M4a,
    Ogg,
    Aac,
    Wma,
    Aiff,
    Au,
}

impl AudioFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "wav" => Some(AudioFormat::Wav),
            "flac" => Some(AudioFormat::Flac),
            "mp3" => Some(AudioFormat::Mp3),
            "m4a" => Some(AudioFormat::M4a),
            "ogg" => Some(AudioFormat::Ogg),
            "aac" => Some(AudioFormat::Aac),
            "wma" => Some(AudioFormat::Wma),
            "aiff" | "aif" => Some(AudioFormat::Aiff),
            "au" => Some(AudioFormat::Au),
            _ => None,
        }
    }

    /// Whether the in-process decoder handles this format without transcoding
    pub fn directly_decodable(self) -> bool {
        !matches!(self, AudioFormat::Wma | AudioFormat::Au)
    }
}

/// Video containers recognized by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoFormat {
    Mp4,
    Mov,
    Avi,
    Mkv,
    Wmv,
    Flv,
    Webm,
    M4v,
}

impl VideoFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp4" => Some(VideoFormat::Mp4),
            "mov" => Some(VideoFormat::Mov),
            "avi" => Some(VideoFormat::Avi),
            "mkv" => Some(VideoFormat::Mkv),
            "wmv" => Some(VideoFormat::Wmv),
            "flv" => Some(VideoFormat::Flv),
            "webm" => Some(VideoFormat::Webm),
            "m4v" => Some(VideoFormat::M4v),
            _ => None,
        }
    }
}

/// Classification of an input file, decided by extension alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio(AudioFormat),
    Video(VideoFormat),
    Unsupported,
}

impl MediaKind {
    /// Classify a path by its extension
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return MediaKind::Unsupported;
        };
        if let Some(format) = AudioFormat::from_extension(ext) {
            return MediaKind::Audio(format);
        }
        if let Some(format) = VideoFormat::from_extension(ext) {
            return MediaKind::Video(format);
        }
        MediaKind::Unsupported
    }

    /// Whether ffmpeg must produce a WAV before the decoder can read the file
    pub fn needs_conversion(&self) -> bool {
        match self {
            MediaKind::Audio(format) => !format.directly_decodable(),
            MediaKind::Video(_) => true,
            MediaKind::Unsupported => false,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, MediaKind::Unsupported)
    }
}

/// A discovered input file with its classification
#[derive(Debug, Clone)]
pub struct MediaFile {
    /// Absolute path where resolvable
    pub path: PathBuf,
    /// Extension-based classification
    pub kind: MediaKind,
    /// Size on disk, 0 if unreadable
    pub size_bytes: u64,
}

// =============================================================================
// Audio buffer
// =============================================================================

/// Decoded mono audio ready for inference
#[derive(Debug, Clone)]
pub struct Waveform {
    /// Mono samples normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Duration in seconds
    pub duration: f64,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        // Guard against division by zero - use 0 duration for invalid sample rate
        let duration = if sample_rate > 0 {
            samples.len() as f64 / sample_rate as f64
        } else {
            0.0
        };
        Self {
            samples,
            sample_rate,
            duration,
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the waveform is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// =============================================================================
// Metrics
// =============================================================================

/// Static description of a single reported metric
#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    /// Key used in JSON output and summary maps
    pub key: &'static str,
    /// Human-readable label for text reports
    pub label: &'static str,
    /// Short abbreviation for summary lines
    pub abbr: &'static str,
    /// Unit suffix, if any (e.g. "dB")
    pub unit: Option<&'static str>,
}

/// Static description of a model family, used for report headings
#[derive(Debug)]
pub struct ModelInfo {
    /// Short identifier used in records and logs
    pub name: &'static str,
    /// Heading for text reports
    pub title: &'static str,
    /// Metrics this family produces, in canonical order
    pub metrics: &'static [MetricDef],
}

/// Ordered metric values keyed by metric key
///
/// Preserves the model's canonical metric order and serializes as a JSON
/// object in that order.
#[derive(Debug, Clone, Default)]
pub struct MetricMap {
    entries: Vec<(&'static str, f64)>,
}

impl MetricMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &'static str, value: f64) {
        self.entries.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for MetricMap {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Records
// =============================================================================

/// Outcome of scoring one file - exactly one per discovered input
#[derive(Debug, Clone)]
pub struct MetricRecord {
    /// File name (final path component)
    pub file: String,
    /// Full path as discovered
    pub path: PathBuf,
    /// Model family that produced (or failed to produce) the metrics
    pub model: &'static str,
    /// Metric values; empty when the file failed
    pub metrics: MetricMap,
    /// Wall-clock processing time for this file
    pub elapsed: Duration,
    /// Failure message, if the file could not be scored
    pub error: Option<String>,
}

impl MetricRecord {
    pub fn success(path: &Path, model: &'static str, metrics: MetricMap, elapsed: Duration) -> Self {
        Self {
            file: file_name_of(path),
            path: path.to_path_buf(),
            model,
            metrics,
            elapsed,
            error: None,
        }
    }

    pub fn failure(path: &Path, model: &'static str, error: String, elapsed: Duration) -> Self {
        Self {
            file: file_name_of(path),
            path: path.to_path_buf(),
            model,
            metrics: MetricMap::new(),
            elapsed,
            error: Some(error),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// All records from one run, in input order
#[derive(Debug, Default)]
pub struct BatchResult {
    pub records: Vec<MetricRecord>,
}

impl BatchResult {
    pub fn push(&mut self, record: MetricRecord) {
        self.records.push(record);
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|r| r.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.records.iter().filter(|r| !r.succeeded()).count()
    }

    /// Mean of each metric over successful records, in definition order
    ///
    /// Failed records contribute to neither the numerator nor the
    /// denominator. Metrics with no successful values are omitted.
    pub fn metric_means(&self, defs: &'static [MetricDef]) -> Vec<(&'static MetricDef, f64)> {
        defs.iter()
            .filter_map(|def| {
                let values: Vec<f64> = self
                    .records
                    .iter()
                    .filter(|r| r.succeeded())
                    .filter_map(|r| r.metrics.get(def.key))
                    .collect();
                if values.is_empty() {
                    None
                } else {
                    Some((def, values.iter().sum::<f64>() / values.len() as f64))
                }
            })
            .collect()
    }
}
