//! Audio loading, conversion, and windowing

pub mod convert;
pub mod decoder;
pub mod window;

pub use convert::{convert_to_wav, ConvertedAudio};
pub use decoder::{load, MIN_DURATION_SECS, TARGET_SAMPLE_RATE};
pub use window::{split_windows, weighted_mean, Window, WindowConfig};
