//! Batch processing pipeline

pub mod orchestrator;

pub use orchestrator::{process_files, run, RunSummary};
