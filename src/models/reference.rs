//! Non-matching reference signals for the SQUIM subjective head
//!
//! The subjective MOS model compares the input against a reference recording
//! that does not need to match the content. The default is a synthesized
//! multi-tone signal; a clean speech WAV can be supplied instead.

use crate::audio;
use crate::error::Result;
use std::f32::consts::PI;
use std::path::Path;

/// Tone stack for the synthetic reference (Hz)
const REFERENCE_TONES: [f32; 4] = [220.0, 440.0, 880.0, 1760.0];
/// Peak amplitude of the synthetic reference
const REFERENCE_AMPLITUDE: f32 = 0.5;

/// Source of reference signals, one per scored waveform
pub trait ReferenceProvider {
    /// Produce a reference of exactly `len` samples at `sample_rate`
    fn reference(&self, len: usize, sample_rate: u32) -> Vec<f32>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Synthesized stack of octave-spaced sine tones
#[derive(Debug, Default)]
pub struct MultiToneReference;

impl ReferenceProvider for MultiToneReference {
    fn reference(&self, len: usize, sample_rate: u32) -> Vec<f32> {
        let per_tone = REFERENCE_AMPLITUDE / REFERENCE_TONES.len() as f32;
        (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                REFERENCE_TONES
                    .iter()
                    .map(|freq| (2.0 * PI * freq * t).sin() * per_tone)
                    .sum()
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "multi-tone"
    }
}

/// Reference loaded from a file, tiled or truncated to the input length
pub struct FileReference {
    samples: Vec<f32>,
}

impl FileReference {
    /// Decode and preprocess the file like any input (mono, 16 kHz)
    pub fn load(path: &Path) -> Result<Self> {
        let waveform = audio::load(path)?;
        Ok(Self {
            samples: waveform.samples,
        })
    }
}

impl ReferenceProvider for FileReference {
    fn reference(&self, len: usize, _sample_rate: u32) -> Vec<f32> {
        self.samples.iter().copied().cycle().take(len).collect()
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
