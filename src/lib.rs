//! audiograde - Batch Audio Quality Assessment
//!
//! A command-line utility that scores local audio and video files with
//! pretrained quality models: Audiobox aesthetic axes, SQUIM speech quality,
//! and UTMOSv2 naturalness. Results are written as text or JSON reports.
//!
//! # Architecture
//!
//! The library is organized into several key modules:
//!
//! - `config`: CLI argument parsing and runtime settings
//! - `discovery`: File scanning and extension-based classification
//! - `audio`: Decoding, ffmpeg conversion, resampling, and windowing
//! - `device`: Execution provider selection (CUDA, CoreML, CPU)
//! - `models`: ONNX model adapters behind the `Scorer` trait
//! - `pipeline`: Sequential batch orchestration
//! - `report`: Text and JSON report rendering
//!
//! # Example
//!
//! ```no_run
//! use audiograde::{config::Settings, pipeline};
//!
//! let settings = Settings::default();
//! let summary = pipeline::run(&settings).expect("Assessment failed");
//! println!("Scored {} files", summary.succeeded);
//! ```

pub mod audio;
pub mod config;
pub mod device;
pub mod discovery;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod types;

// Re-export key types at crate root
pub use error::{AudiogradeError, Result};
pub use types::{BatchResult, MediaFile, MediaKind, MetricRecord, Waveform};
