//! UTMOSv2 naturalness adapter
//!
//! Produces a single naturalness MOS estimate from the full waveform.

use crate::device::Device;
use crate::error::{AudiogradeError, ErrorContext, Result};
use crate::models::{build_session, extract_scalar, locate, primary_input_name, samples_tensor, Scorer};
use crate::types::{MetricDef, MetricMap, ModelInfo, Waveform};
use ort::session::Session;

pub static NATURALNESS_METRICS: [MetricDef; 1] = [
    MetricDef { key: "mos", label: "Mean Opinion Score", abbr: "MOS", unit: None },
];

pub static NATURALNESS_INFO: ModelInfo = ModelInfo {
    name: "utmosv2",
    title: "Speech Naturalness Assessment Results",
    metrics: &NATURALNESS_METRICS,
};

/// Scorer for the UTMOSv2 naturalness model
pub struct NaturalnessScorer {
    session: Session,
    input_name: String,
}

impl NaturalnessScorer {
    pub fn new(device: &Device) -> Result<Self> {
        let model_path = locate::find_model(locate::NATURALNESS_MODEL)?;
        let session = build_session(&model_path, device)?;
        let input_name = primary_input_name(&session)?;

        Ok(Self {
            session,
            input_name,
        })
    }
}

impl Scorer for NaturalnessScorer {
    fn score(&mut self, waveform: &Waveform) -> Result<MetricMap> {
        let input_tensor = samples_tensor(&waveform.samples, NATURALNESS_INFO.name)?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .with_model_context(NATURALNESS_INFO.name)?;

        let value = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or_else(|| AudiogradeError::inference_error(NATURALNESS_INFO.name, "No output tensor from model"))?;

        let mut metrics = MetricMap::new();
        metrics.insert(NATURALNESS_METRICS[0].key, extract_scalar(NATURALNESS_INFO.name, &value)?);
        Ok(metrics)
    }

    fn info(&self) -> &'static ModelInfo {
        &NATURALNESS_INFO
    }
}
