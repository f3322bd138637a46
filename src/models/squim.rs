//! SQUIM speech quality adapter
//!
//! Drives two sessions: an objective model that produces STOI, PESQ, and
//! SI-SDR from the waveform alone, and a subjective model that produces a
//! MOS estimate against a non-matching reference signal. Both consume the
//! full waveform in one pass.

use crate::device::Device;
use crate::error::{AudiogradeError, ErrorContext, Result};
use crate::models::{
    build_session, extract_scalar, locate, primary_input_name, samples_tensor, ReferenceProvider,
    Scorer,
};
use crate::types::{MetricDef, MetricMap, ModelInfo, Waveform};
use ort::session::Session;
use tracing::debug;

/// Objective metrics come first, in the model's output order, then MOS
pub static SQUIM_METRICS: [MetricDef; 4] = [
    MetricDef { key: "stoi", label: "Speech Intelligibility", abbr: "STOI", unit: None },
    MetricDef { key: "pesq", label: "Perceptual Quality", abbr: "PESQ", unit: None },
    MetricDef { key: "si_sdr", label: "Signal Distortion", abbr: "SI-SDR", unit: Some("dB") },
    MetricDef { key: "mos", label: "Mean Opinion Score", abbr: "MOS", unit: None },
];

pub static SQUIM_INFO: ModelInfo = ModelInfo {
    name: "squim",
    title: "Speech Quality Assessment Results (SQUIM)",
    metrics: &SQUIM_METRICS,
};

/// Number of outputs from the objective model
const OBJECTIVE_OUTPUTS: usize = 3;

/// Scorer combining the SQUIM objective and subjective models
pub struct SquimScorer {
    objective: Session,
    objective_input: String,
    subjective: Session,
    subjective_inputs: [String; 2],
    reference: Box<dyn ReferenceProvider>,
}

impl SquimScorer {
    pub fn new(device: &Device, reference: Box<dyn ReferenceProvider>) -> Result<Self> {
        let objective_path = locate::find_model(locate::SQUIM_OBJECTIVE_MODEL)?;
        let subjective_path = locate::find_model(locate::SQUIM_SUBJECTIVE_MODEL)?;

        let objective = build_session(&objective_path, device)?;
        let objective_input = primary_input_name(&objective)?;

        let subjective = build_session(&subjective_path, device)?;
        let names: Vec<String> = subjective.inputs.iter().map(|i| i.name.clone()).collect();
        if names.len() < 2 {
            return Err(AudiogradeError::SetupError {
                reason: format!(
                    "Subjective model declares {} input(s); expected a waveform and a reference",
                    names.len()
                ),
            });
        }
        let subjective_inputs = [names[0].clone(), names[1].clone()];

        debug!("SQUIM reference provider: {}", reference.name());

        Ok(Self {
            objective,
            objective_input,
            subjective,
            subjective_inputs,
            reference,
        })
    }

    /// STOI, PESQ, and SI-SDR from the objective model
    fn run_objective(&mut self, waveform: &Waveform, metrics: &mut MetricMap) -> Result<()> {
        let input_tensor = samples_tensor(&waveform.samples, SQUIM_INFO.name)?;

        let outputs = self
            .objective
            .run(ort::inputs![self.objective_input.as_str() => input_tensor])
            .with_model_context(SQUIM_INFO.name)?;

        let values: Vec<_> = outputs.iter().map(|(_, v)| v).collect();
        if values.len() != OBJECTIVE_OUTPUTS {
            return Err(AudiogradeError::inference_error(
                SQUIM_INFO.name,
                format!(
                    "Objective model produced {} outputs; expected STOI, PESQ, and SI-SDR",
                    values.len()
                ),
            ));
        }

        for (def, value) in SQUIM_METRICS[..OBJECTIVE_OUTPUTS].iter().zip(values) {
            metrics.insert(def.key, extract_scalar(SQUIM_INFO.name, &value)?);
        }

        Ok(())
    }

    /// MOS from the subjective model, against a per-file reference of
    /// matching length
    fn run_subjective(&mut self, waveform: &Waveform, metrics: &mut MetricMap) -> Result<()> {
        let reference = self.reference.reference(waveform.len(), waveform.sample_rate);

        let wave_tensor = samples_tensor(&waveform.samples, SQUIM_INFO.name)?;
        let ref_tensor = samples_tensor(&reference, SQUIM_INFO.name)?;

        let outputs = self
            .subjective
            .run(ort::inputs![
                self.subjective_inputs[0].as_str() => wave_tensor,
                self.subjective_inputs[1].as_str() => ref_tensor,
            ])
            .with_model_context(SQUIM_INFO.name)?;

        let value = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or_else(|| AudiogradeError::inference_error(SQUIM_INFO.name, "No output tensor from subjective model"))?;

        metrics.insert(SQUIM_METRICS[OBJECTIVE_OUTPUTS].key, extract_scalar(SQUIM_INFO.name, &value)?);
        Ok(())
    }
}

impl Scorer for SquimScorer {
    fn score(&mut self, waveform: &Waveform) -> Result<MetricMap> {
        let mut metrics = MetricMap::new();
        self.run_objective(waveform, &mut metrics)?;
        self.run_subjective(waveform, &mut metrics)?;
        Ok(metrics)
    }

    fn info(&self) -> &'static ModelInfo {
        &SQUIM_INFO
    }
}
