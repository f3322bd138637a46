//! Fixed-length analysis windows with overlap
//!
//! The aesthetics model scores fixed windows of audio. Long inputs are split
//! into overlapping windows and the per-window scores recombined as a
//! duration-weighted mean, so a truncated final window never dominates.

use crate::types::Waveform;

/// Window length for the aesthetics model (seconds)
pub const WINDOW_SECONDS: f32 = 10.0;
/// Overlap between consecutive windows (seconds, 50%)
pub const WINDOW_OVERLAP_SECONDS: f32 = 5.0;

/// Configuration for window splitting
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Samples per full window
    pub window_samples: usize,
    /// Overlapping samples between consecutive windows
    pub overlap_samples: usize,
    /// Sample rate the sample counts were derived from
    pub sample_rate: u32,
}

impl WindowConfig {
    pub fn new(window_seconds: f32, overlap_seconds: f32, sample_rate: u32) -> Self {
        Self {
            window_samples: (window_seconds * sample_rate as f32) as usize,
            overlap_samples: (overlap_seconds * sample_rate as f32) as usize,
            sample_rate,
        }
    }

    /// Standard configuration for the aesthetics model: 10s windows, 50% overlap
    pub fn aesthetics(sample_rate: u32) -> Self {
        Self::new(WINDOW_SECONDS, WINDOW_OVERLAP_SECONDS, sample_rate)
    }

    /// Hop between window starts
    pub fn stride(&self) -> usize {
        self.window_samples.saturating_sub(self.overlap_samples).max(1)
    }
}

/// One window of samples cut from a waveform
#[derive(Debug, Clone)]
pub struct Window {
    /// Window index (0-based)
    pub index: usize,
    /// Start position in the source waveform, in samples
    pub start_sample: usize,
    /// Samples for this window; the final window may be shorter
    pub samples: Vec<f32>,
    /// Sample rate
    pub sample_rate: u32,
}

impl Window {
    /// Window length in seconds - used as the aggregation weight
    pub fn duration(&self) -> f64 {
        if self.sample_rate > 0 {
            self.samples.len() as f64 / self.sample_rate as f64
        } else {
            0.0
        }
    }
}

/// Split a waveform into overlapping analysis windows
///
/// Every sample lands in at least one window: the final window is truncated
/// to the remaining samples rather than dropped. Waveforms no longer than
/// one window yield exactly one window.
pub fn split_windows(waveform: &Waveform, config: &WindowConfig) -> Vec<Window> {
    let total_samples = waveform.len();
    let stride = config.stride();

    // Audio fits in a single window
    if total_samples <= config.window_samples {
        return vec![Window {
            index: 0,
            start_sample: 0,
            samples: waveform.samples.clone(),
            sample_rate: waveform.sample_rate,
        }];
    }

    let mut windows = Vec::new();
    let mut start = 0;
    let mut index = 0;

    while start < total_samples {
        let end = (start + config.window_samples).min(total_samples);

        windows.push(Window {
            index,
            start_sample: start,
            samples: waveform.samples[start..end].to_vec(),
            sample_rate: waveform.sample_rate,
        });

        start += stride;
        index += 1;

        // Stop once the remainder is pure overlap already covered by the
        // previous window
        if total_samples.saturating_sub(start) <= config.overlap_samples {
            break;
        }
    }

    windows
}

/// Duration-weighted mean of per-window scores
///
/// Takes (score, weight) pairs; returns 0.0 when the total weight is zero.
pub fn weighted_mean(scores: &[(f64, f64)]) -> f64 {
    let total_weight: f64 = scores.iter().map(|(_, w)| w).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }
    scores.iter().map(|(s, w)| s * w).sum::<f64>() / total_weight
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waveform_of(seconds: f32, sample_rate: u32) -> Waveform {
        let n = (seconds * sample_rate as f32) as usize;
        Waveform::new((0..n).map(|i| (i % 100) as f32 / 100.0).collect(), sample_rate)
    }

    #[test]
    fn test_short_audio_single_window() {
        let wf = waveform_of(3.0, 16000);
        let windows = split_windows(&wf, &WindowConfig::aesthetics(16000));
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].samples.len(), wf.len());
        assert_eq!(windows[0].start_sample, 0);
    }

    #[test]
    fn test_exact_window_length_single_window() {
        let wf = waveform_of(10.0, 16000);
        let windows = split_windows(&wf, &WindowConfig::aesthetics(16000));
        assert_eq!(windows.len(), 1);
    }

    #[test]
    fn test_overlapping_windows_cover_everything() {
        let sample_rate = 16000;
        let wf = waveform_of(24.0, sample_rate);
        let config = WindowConfig::aesthetics(sample_rate);
        let windows = split_windows(&wf, &config);

        assert!(windows.len() > 1);

        // Consecutive windows advance by the stride
        for pair in windows.windows(2) {
            assert_eq!(pair[1].start_sample - pair[0].start_sample, config.stride());
        }

        // The last window reaches the end of the waveform
        let last = windows.last().unwrap();
        assert_eq!(last.start_sample + last.samples.len(), wf.len());
    }

    #[test]
    fn test_no_pure_overlap_tail_window() {
        // Exactly 20s: [0,10), [5,15), [10,20) - a fourth window would
        // repeat samples already covered
        let wf = waveform_of(20.0, 16000);
        let windows = split_windows(&wf, &WindowConfig::aesthetics(16000));
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[2].samples.len(), windows[0].samples.len());
    }

    #[test]
    fn test_zero_overlap_splits_exactly() {
        let sample_rate = 16000;
        let wf = waveform_of(20.0, sample_rate);
        let config = WindowConfig::new(10.0, 0.0, sample_rate);
        let windows = split_windows(&wf, &config);

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].samples.len(), config.window_samples);
        assert_eq!(windows[1].samples.len(), config.window_samples);
        assert_eq!(windows[1].start_sample, config.window_samples);
    }

    #[test]
    fn test_truncated_tail_kept() {
        let sample_rate = 16000;
        let wf = waveform_of(23.0, sample_rate);
        let config = WindowConfig::new(10.0, 0.0, sample_rate);
        let windows = split_windows(&wf, &config);

        assert_eq!(windows.len(), 3);
        let tail = windows.last().unwrap();
        assert!(tail.samples.len() < config.window_samples);
        assert!((tail.duration() - 3.0).abs() < 0.01);
    }

    #[test]
    fn test_weighted_mean_single_window_identity() {
        assert!((weighted_mean(&[(7.25, 10.0)]) - 7.25).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_mean_equal_weights() {
        let mean = weighted_mean(&[(2.0, 10.0), (4.0, 10.0)]);
        assert!((mean - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_mean_short_tail_counts_less() {
        // 10s window at 6.0, 2s tail at 1.0
        let mean = weighted_mean(&[(6.0, 10.0), (1.0, 2.0)]);
        let expected = (6.0 * 10.0 + 1.0 * 2.0) / 12.0;
        assert!((mean - expected).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_mean_empty() {
        assert_eq!(weighted_mean(&[]), 0.0);
    }
}
