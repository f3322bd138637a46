//! Unified error types for audiograde
//!
//! Error strategy:
//! - Per-file errors (classification, conversion, decoding, inference) are
//!   recoverable: they become failed records and the batch keeps going
//! - Setup errors (device, models, output destination) are fatal and abort
//!   the run before any file is scored
//!
//! All errors include actionable suggestions where possible.

use std::path::PathBuf;
use thiserror::Error;

/// Supported audio extensions, for helpful error messages
pub const SUPPORTED_AUDIO: &str = "wav, flac, mp3, m4a, ogg, aac, wma, aiff, au";
/// Supported video extensions, for helpful error messages
pub const SUPPORTED_VIDEO: &str = "mp4, mov, avi, mkv, wmv, flv, webm, m4v";

/// Top-level error type for audiograde operations
#[derive(Debug, Error)]
pub enum AudiogradeError {
    // =========================================================================
    // Recoverable errors - record the failure, continue the batch
    // =========================================================================
    #[error("Unsupported format '{extension}' for '{path}'\n  Supported audio: {SUPPORTED_AUDIO}\n  Supported video: {SUPPORTED_VIDEO}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Failed to decode '{path}': {reason}\n  Tip: If the file plays in other apps, its extension may not match the actual codec")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Conversion failed for '{path}': {reason}")]
    ConversionError { path: PathBuf, reason: String },

    #[error("Unusable audio in '{path}': {reason}")]
    LoadError { path: PathBuf, reason: String },

    #[error("{model} inference failed: {reason}\n  Tip: This may indicate insufficient memory or an incompatible model file")]
    InferenceError { model: String, reason: String },

    // =========================================================================
    // Fatal errors - abort the run
    // =========================================================================
    #[error("File not found: '{0}'\n  Tip: Check the path exists and is accessible")]
    FileNotFound(PathBuf),

    #[error("Setup failed: {reason}")]
    SetupError { reason: String },

    #[error("Cannot write output to '{path}': {reason}\n  Tip: Check write permissions for the output directory")]
    OutputError { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for audiograde operations
pub type Result<T> = std::result::Result<T, AudiogradeError>;

impl AudiogradeError {
    /// Returns true if this error should fail one record and let the batch continue
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AudiogradeError::UnsupportedFormat { .. }
                | AudiogradeError::DecodeError { .. }
                | AudiogradeError::ConversionError { .. }
                | AudiogradeError::LoadError { .. }
                | AudiogradeError::InferenceError { .. }
        )
    }

    /// Create a decode error with context about the issue
    pub fn decode_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        AudiogradeError::DecodeError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a conversion error with context about the issue
    pub fn conversion_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        AudiogradeError::ConversionError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a load error for audio that decoded but cannot be scored
    pub fn load_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        AudiogradeError::LoadError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an inference error tagged with the model name
    pub fn inference_error(model: impl Into<String>, reason: impl Into<String>) -> Self {
        AudiogradeError::InferenceError {
            model: model.into(),
            reason: reason.into(),
        }
    }

    /// Create a setup error
    pub fn setup_error(reason: impl Into<String>) -> Self {
        AudiogradeError::SetupError {
            reason: reason.into(),
        }
    }

    /// Create an output error, checking for common issues
    pub fn output_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!("Permission denied. Check that you have write access to {}", path.display())
            }
            std::io::ErrorKind::NotFound => {
                format!("Directory does not exist: {}", path.parent().map(|p| p.display().to_string()).unwrap_or_default())
            }
            _ => err.to_string(),
        };
        AudiogradeError::OutputError { path, reason }
    }
}

/// Extension trait for tagging foreign errors with the model that raised them
pub trait ErrorContext<T> {
    /// Convert any displayable error into an inference error for `model`
    fn with_model_context(self, model: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> ErrorContext<T> for std::result::Result<T, E> {
    fn with_model_context(self, model: &str) -> Result<T> {
        self.map_err(|e| AudiogradeError::InferenceError {
            model: model.to_string(),
            reason: e.to_string(),
        })
    }
}
