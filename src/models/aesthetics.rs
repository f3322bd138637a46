//! Audiobox aesthetics adapter
//!
//! Scores four aesthetic axes per fixed analysis window and recombines the
//! per-window scores as a duration-weighted mean over the whole file.
//! Full-length windows share a shape and are batched per forward pass; a
//! truncated tail window runs on its own.

use crate::audio::window::{split_windows, weighted_mean, Window, WindowConfig};
use crate::device::Device;
use crate::error::{AudiogradeError, ErrorContext, Result};
use crate::models::{build_session, locate, primary_input_name, Scorer};
use crate::types::{MetricDef, MetricMap, ModelInfo, Waveform};
use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

/// Axis order matches the model's output columns
pub static AESTHETIC_METRICS: [MetricDef; 4] = [
    MetricDef { key: "CE", label: "Content Enjoyment", abbr: "CE", unit: None },
    MetricDef { key: "CU", label: "Content Usefulness", abbr: "CU", unit: None },
    MetricDef { key: "PC", label: "Production Complexity", abbr: "PC", unit: None },
    MetricDef { key: "PQ", label: "Production Quality", abbr: "PQ", unit: None },
];

pub static AESTHETICS_INFO: ModelInfo = ModelInfo {
    name: "audiobox-aesthetics",
    title: "Audio Aesthetics Assessment Results",
    metrics: &AESTHETIC_METRICS,
};

const NUM_AXES: usize = 4;

/// Per-window axis scores plus the window's aggregation weight
#[derive(Debug, Clone, Copy)]
struct WindowScores {
    values: [f64; NUM_AXES],
    weight: f64,
}

/// Scorer for the Audiobox aesthetics model
pub struct AestheticsScorer {
    session: Session,
    input_name: String,
    batch_size: usize,
}

impl AestheticsScorer {
    pub fn new(device: &Device, batch_size: usize) -> Result<Self> {
        let model_path = locate::find_model(locate::AESTHETICS_MODEL)?;
        let session = build_session(&model_path, device)?;
        let input_name = primary_input_name(&session)?;

        Ok(Self {
            session,
            input_name,
            batch_size: batch_size.max(1),
        })
    }

    /// Run one forward pass over a batch of equal-length windows
    ///
    /// Input shape is [batch, samples]; the model returns [batch, 4] with
    /// one row of axis scores per window.
    fn run_batch(&mut self, windows: &[&Window]) -> Result<Vec<[f64; NUM_AXES]>> {
        let rows = windows.len();
        let cols = windows[0].samples.len();

        let mut input = Array2::<f32>::zeros((rows, cols));
        for (i, window) in windows.iter().enumerate() {
            input
                .row_mut(i)
                .assign(&ndarray::ArrayView1::from(window.samples.as_slice()));
        }

        let input_tensor = Tensor::from_array(input).with_model_context(AESTHETICS_INFO.name)?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .with_model_context(AESTHETICS_INFO.name)?;

        let output = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or_else(|| AudiogradeError::inference_error(AESTHETICS_INFO.name, "No output tensor from model"))?;

        let (output_shape, output_data) = output
            .try_extract_tensor::<f32>()
            .with_model_context(AESTHETICS_INFO.name)?;

        let shape: Vec<i64> = output_shape.iter().copied().collect();

        // Validate dimensions explicitly for clear error messages
        if shape.len() != 2 {
            return Err(AudiogradeError::inference_error(
                AESTHETICS_INFO.name,
                format!("Expected 2D output tensor, got {}D with shape {:?}", shape.len(), shape),
            ));
        }
        if shape[0] != rows as i64 {
            return Err(AudiogradeError::inference_error(
                AESTHETICS_INFO.name,
                format!("Expected batch size {}, got {} (shape {:?})", rows, shape[0], shape),
            ));
        }
        if shape[1] != NUM_AXES as i64 {
            return Err(AudiogradeError::inference_error(
                AESTHETICS_INFO.name,
                format!("Expected {} aesthetic axes (CE/CU/PC/PQ), got {} (shape {:?})", NUM_AXES, shape[1], shape),
            ));
        }
        if output_data.len() != rows * NUM_AXES {
            return Err(AudiogradeError::inference_error(
                AESTHETICS_INFO.name,
                format!(
                    "Output buffer length {} doesn't match shape {:?}. Tensor may not be contiguous.",
                    output_data.len(),
                    shape
                ),
            ));
        }

        Ok(output_data
            .chunks_exact(NUM_AXES)
            .map(|row| [row[0] as f64, row[1] as f64, row[2] as f64, row[3] as f64])
            .collect())
    }

    fn score_group(&mut self, windows: &[&Window], scored: &mut Vec<WindowScores>) -> Result<()> {
        let rows = self.run_batch(windows)?;
        for (window, values) in windows.iter().zip(rows) {
            scored.push(WindowScores {
                values,
                weight: window.duration(),
            });
        }
        Ok(())
    }
}

impl Scorer for AestheticsScorer {
    fn score(&mut self, waveform: &Waveform) -> Result<MetricMap> {
        let config = WindowConfig::aesthetics(waveform.sample_rate);
        let windows = split_windows(waveform, &config);

        debug!(
            "Scoring {} windows over {:.1}s of audio (batch size {})",
            windows.len(),
            waveform.duration,
            self.batch_size
        );

        let mut scored: Vec<WindowScores> = Vec::with_capacity(windows.len());
        let mut pending: Vec<&Window> = Vec::with_capacity(self.batch_size);

        for window in &windows {
            if window.samples.len() == config.window_samples {
                pending.push(window);
                if pending.len() == self.batch_size {
                    self.score_group(&pending, &mut scored)?;
                    pending.clear();
                }
            } else {
                // Truncated tail (or a sole short window) has its own shape
                // and runs alone
                if !pending.is_empty() {
                    self.score_group(&pending, &mut scored)?;
                    pending.clear();
                }
                self.score_group(&[window], &mut scored)?;
            }
        }

        if !pending.is_empty() {
            self.score_group(&pending, &mut scored)?;
        }

        Ok(aggregate_windows(&scored))
    }

    fn info(&self) -> &'static ModelInfo {
        &AESTHETICS_INFO
    }
}

/// Duration-weighted aggregation of per-window axis scores
fn aggregate_windows(scored: &[WindowScores]) -> MetricMap {
    let mut metrics = MetricMap::new();
    for (axis, def) in AESTHETIC_METRICS.iter().enumerate() {
        let pairs: Vec<(f64, f64)> = scored.iter().map(|s| (s.values[axis], s.weight)).collect();
        metrics.insert(def.key, weighted_mean(&pairs));
    }
    metrics
}
