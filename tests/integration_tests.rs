//! Integration tests for the audiograde pipeline
//!
//! These tests drive discovery, batch processing, and report writing with a
//! deterministic in-memory scorer, so they run without ONNX models, ffmpeg,
//! or an accelerator.

use audiograde::config::Settings;
use audiograde::error::Result;
use audiograde::models::{ModelKind, Scorer};
use audiograde::pipeline;
use audiograde::report::{self, ReportFormat};
use audiograde::types::{MetricDef, MetricMap, ModelInfo, Waveform};
use audiograde::{discovery, AudiogradeError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

static TEST_METRICS: [MetricDef; 2] = [
    MetricDef {
        key: "clarity",
        label: "Clarity",
        abbr: "CL",
        unit: None,
    },
    MetricDef {
        key: "depth",
        label: "Depth",
        abbr: "DP",
        unit: Some("dB"),
    },
];

static TEST_INFO: ModelInfo = ModelInfo {
    name: "test-scorer",
    title: "Test Assessment Results",
    metrics: &TEST_METRICS,
};

/// Deterministic scorer that returns fixed values and counts invocations
struct FixedScorer {
    clarity: f64,
    depth: f64,
    calls: usize,
}

impl FixedScorer {
    fn new(clarity: f64, depth: f64) -> Self {
        Self {
            clarity,
            depth,
            calls: 0,
        }
    }
}

impl Scorer for FixedScorer {
    fn score(&mut self, waveform: &Waveform) -> Result<MetricMap> {
        // The pipeline must hand every scorer 16 kHz mono audio
        assert_eq!(waveform.sample_rate, 16_000, "waveform not resampled");
        assert!(!waveform.is_empty(), "waveform is empty");

        self.calls += 1;
        let mut metrics = MetricMap::new();
        metrics.insert("clarity", self.clarity);
        metrics.insert("depth", self.depth);
        Ok(metrics)
    }

    fn info(&self) -> &'static ModelInfo {
        &TEST_INFO
    }
}

/// Generate a mono sine wave WAV file for testing
fn generate_sine_wav(path: &Path, frequency_hz: f32, duration_secs: f32, sample_rate: u32) {
    use std::f32::consts::PI;

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec).expect("Failed to create WAV file");

    let num_samples = (duration_secs * sample_rate as f32) as usize;
    let amplitude = 0.5f32;

    for i in 0..num_samples {
        let t = i as f32 / sample_rate as f32;
        let sample = (2.0 * PI * frequency_hz * t).sin() * amplitude;
        writer
            .write_sample((sample * 32767.0) as i16)
            .expect("Failed to write sample");
    }

    writer.finalize().expect("Failed to finalize WAV");
}

/// Create test settings with progress bars disabled
fn create_test_settings(input: &Path, output: &Path) -> Settings {
    Settings {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        model: ModelKind::Aesthetics,
        format: ReportFormat::Text,
        recursive: false,
        force_cpu: true,
        batch_size: 1,
        reference: None,
        show_progress: false,
    }
}

#[test]
fn test_batch_produces_one_record_per_file() {
    let input_dir = TempDir::new().expect("Failed to create input temp dir");
    let output_dir = TempDir::new().expect("Failed to create output temp dir");

    // One scoreable file, one unsupported file, one too-short file
    generate_sine_wav(&input_dir.path().join("a.wav"), 440.0, 1.0, 44100);
    fs::write(input_dir.path().join("b.xyz"), b"not media").expect("Failed to write file");
    generate_sine_wav(&input_dir.path().join("short.wav"), 440.0, 0.2, 44100);

    let files = discovery::scan(input_dir.path(), false).expect("Scan should succeed");
    assert_eq!(files.len(), 3, "Should discover all 3 files");

    let settings = create_test_settings(input_dir.path(), output_dir.path());
    let mut scorer = FixedScorer::new(5.0, 10.0);
    let batch =
        pipeline::process_files(&files, &mut scorer, &settings).expect("Batch should complete");

    assert_eq!(batch.total(), 3, "One record per discovered file");
    assert_eq!(batch.succeeded(), 1);
    assert_eq!(batch.failed(), 2);
    assert_eq!(scorer.calls, 1, "Only decodable audio reaches the model");

    // Records come back in scan order (lexicographic by path)
    assert_eq!(batch.records[0].file, "a.wav");
    assert_eq!(batch.records[1].file, "b.xyz");
    assert_eq!(batch.records[2].file, "short.wav");

    assert!(batch.records[0].succeeded());
    let err = batch.records[1].error.as_ref().expect("b.xyz should fail");
    assert!(err.contains("Unsupported format 'xyz'"), "got: {err}");
    let err = batch.records[2].error.as_ref().expect("short.wav should fail");
    assert!(err.contains("too short"), "got: {err}");
}

#[test]
fn test_text_report_end_to_end() {
    let input_dir = TempDir::new().expect("Failed to create input temp dir");
    let output_dir = TempDir::new().expect("Failed to create output temp dir");

    generate_sine_wav(&input_dir.path().join("one.wav"), 440.0, 1.0, 44100);
    generate_sine_wav(&input_dir.path().join("two.wav"), 880.0, 1.0, 44100);

    let files = discovery::scan(input_dir.path(), false).expect("Scan should succeed");
    let settings = create_test_settings(input_dir.path(), output_dir.path());
    let mut scorer = FixedScorer::new(5.0, 10.0);
    let batch =
        pipeline::process_files(&files, &mut scorer, &settings).expect("Batch should complete");

    let dest = output_dir.path().join("report.txt");
    report::write(&batch, &TEST_INFO, &dest, ReportFormat::Text).expect("Report should write");

    let text = fs::read_to_string(&dest).expect("Report should exist");
    assert!(text.contains("Test Assessment Results"));
    assert!(text.contains("File: one.wav"));
    assert!(text.contains("File: two.wav"));
    assert!(text.contains("Clarity (CL): 5.000"));
    assert!(text.contains("Depth (DP): 10.000 dB"));
    assert!(text.contains("Total files processed: 2"));
    assert!(text.contains("Succeeded: 2"));
    assert!(text.contains("Failed: 0"));
    assert!(text.contains("Average CL: 5.000"));
    assert!(text.contains("Average DP: 10.000 dB"));

    // Atomic write leaves no temporary files behind
    let leftovers: Vec<_> = fs::read_dir(output_dir.path())
        .expect("Failed to list output dir")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
        .collect();
    assert!(leftovers.is_empty(), "No .tmp files should remain");
}

#[test]
fn test_json_report_end_to_end() {
    let input_dir = TempDir::new().expect("Failed to create input temp dir");
    let output_dir = TempDir::new().expect("Failed to create output temp dir");

    generate_sine_wav(&input_dir.path().join("good.wav"), 440.0, 1.0, 44100);
    fs::write(input_dir.path().join("notes.txt"), b"plain text").expect("Failed to write file");

    let files = discovery::scan(input_dir.path(), false).expect("Scan should succeed");
    let settings = create_test_settings(input_dir.path(), output_dir.path());
    let mut scorer = FixedScorer::new(4.0, -3.5);
    let batch =
        pipeline::process_files(&files, &mut scorer, &settings).expect("Batch should complete");

    let dest = output_dir.path().join("report.json");
    report::write(&batch, &TEST_INFO, &dest, ReportFormat::Json).expect("Report should write");

    let json_content = fs::read_to_string(&dest).expect("Report should exist");
    let json: serde_json::Value =
        serde_json::from_str(&json_content).expect("Should be valid JSON");

    let results = json["results"].as_array().expect("results should be array");
    assert_eq!(results.len(), 2, "Should have 2 result entries");

    assert_eq!(results[0]["file"], "good.wav");
    assert_eq!(results[0]["model"], "test-scorer");
    assert_eq!(results[0]["success"], true);
    assert!((results[0]["metrics"]["clarity"].as_f64().unwrap() - 4.0).abs() < 1e-9);
    assert!((results[0]["metrics"]["depth"].as_f64().unwrap() + 3.5).abs() < 1e-9);
    assert!(results[0].get("error").is_none());

    assert_eq!(results[1]["file"], "notes.txt");
    assert_eq!(results[1]["success"], false);
    assert!(results[1]["error"]
        .as_str()
        .expect("failed entry should carry an error")
        .contains("Unsupported"));
    assert!(results[1].get("metrics").is_none(), "no metrics on failure");

    // Summary means cover successful entries only
    assert!((json["summary"]["clarity"].as_f64().unwrap() - 4.0).abs() < 1e-9);
    assert!((json["summary"]["depth"].as_f64().unwrap() + 3.5).abs() < 1e-9);
}

#[test]
fn test_empty_directory_still_writes_report() {
    let input_dir = TempDir::new().expect("Failed to create input temp dir");
    let output_dir = TempDir::new().expect("Failed to create output temp dir");

    let files = discovery::scan(input_dir.path(), false).expect("Scan should succeed");
    assert!(files.is_empty(), "Empty directory should yield no files");

    let settings = create_test_settings(input_dir.path(), output_dir.path());
    let mut scorer = FixedScorer::new(1.0, 1.0);
    let batch =
        pipeline::process_files(&files, &mut scorer, &settings).expect("Batch should complete");

    assert_eq!(batch.total(), 0);
    assert_eq!(scorer.calls, 0);

    let dest = output_dir.path().join("report.txt");
    report::write(&batch, &TEST_INFO, &dest, ReportFormat::Text).expect("Report should write");

    let text = fs::read_to_string(&dest).expect("Report should exist");
    assert!(text.contains("Total files processed: 0"));
}

#[test]
fn test_scan_rejects_missing_input() {
    let result = discovery::scan(Path::new("/nonexistent/path/that/does/not/exist"), false);
    match result {
        Err(AudiogradeError::FileNotFound(_)) => {}
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn test_invalid_audio_becomes_failed_record() {
    let input_dir = TempDir::new().expect("Failed to create input temp dir");
    let output_dir = TempDir::new().expect("Failed to create output temp dir");

    // Valid extension, garbage contents: direct decode fails, and the
    // conversion fallback fails too (whether or not ffmpeg is installed)
    fs::write(
        input_dir.path().join("invalid.wav"),
        b"This is not a valid WAV file content!!!!!",
    )
    .expect("Failed to create invalid file");

    let files = discovery::scan(input_dir.path(), false).expect("Scan should succeed");
    let settings = create_test_settings(input_dir.path(), output_dir.path());
    let mut scorer = FixedScorer::new(1.0, 1.0);
    let batch =
        pipeline::process_files(&files, &mut scorer, &settings).expect("Batch should complete");

    assert_eq!(batch.total(), 1);
    assert_eq!(batch.failed(), 1);
    assert_eq!(scorer.calls, 0, "Broken audio must not reach the model");
    assert!(batch.records[0].error.is_some());
}

#[test]
fn test_single_file_input() {
    let input_dir = TempDir::new().expect("Failed to create input temp dir");
    let output_dir = TempDir::new().expect("Failed to create output temp dir");

    let wav = input_dir.path().join("solo.wav");
    generate_sine_wav(&wav, 440.0, 1.0, 44100);

    let files = discovery::scan(&wav, false).expect("Scan should succeed");
    assert_eq!(files.len(), 1, "Single-file input yields one entry");

    let settings = create_test_settings(&wav, output_dir.path());
    let mut scorer = FixedScorer::new(2.5, 0.0);
    let batch =
        pipeline::process_files(&files, &mut scorer, &settings).expect("Batch should complete");

    assert_eq!(batch.succeeded(), 1);
    assert_eq!(batch.records[0].file, "solo.wav");
}

#[test]
fn test_recursive_scan_reaches_subdirectories() {
    let input_dir = TempDir::new().expect("Failed to create input temp dir");
    let sub = input_dir.path().join("inner");
    fs::create_dir(&sub).expect("Failed to create subdirectory");

    generate_sine_wav(&input_dir.path().join("top.wav"), 440.0, 1.0, 44100);
    generate_sine_wav(&sub.join("nested.wav"), 440.0, 1.0, 44100);

    let flat = discovery::scan(input_dir.path(), false).expect("Scan should succeed");
    assert_eq!(flat.len(), 1, "Non-recursive scan stays at the top level");

    let deep = discovery::scan(input_dir.path(), true).expect("Scan should succeed");
    assert_eq!(deep.len(), 2, "Recursive scan finds nested files");
}
