//! Model adapters
//!
//! Each model family wraps one or more ONNX sessions behind the same
//! [`Scorer`] seam, so the pipeline neither knows nor cares which family it
//! is driving. Session construction is shared here; the per-family modules
//! own input preparation and output interpretation.

pub mod aesthetics;
pub mod locate;
pub mod naturalness;
pub mod reference;
pub mod squim;

pub use aesthetics::AestheticsScorer;
pub use naturalness::NaturalnessScorer;
pub use reference::{FileReference, MultiToneReference, ReferenceProvider};
pub use squim::SquimScorer;

use crate::device::Device;
use crate::error::{AudiogradeError, ErrorContext, Result};
use crate::types::{MetricMap, ModelInfo, Waveform};
use clap::ValueEnum;
use ndarray::Array2;
use ort::session::Session;
use ort::value::{DynValue, Tensor};
use std::path::Path;

/// Model family selected for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelKind {
    /// Audiobox aesthetic axes (CE/CU/PC/PQ)
    Aesthetics,
    /// SQUIM speech quality (STOI/PESQ/SI-SDR plus MOS)
    Squim,
    /// UTMOSv2 naturalness MOS
    Naturalness,
}

impl ModelKind {
    /// Report metadata for this family, available without loading any model
    pub fn info(self) -> &'static ModelInfo {
        match self {
            ModelKind::Aesthetics => &aesthetics::AESTHETICS_INFO,
            ModelKind::Squim => &squim::SQUIM_INFO,
            ModelKind::Naturalness => &naturalness::NATURALNESS_INFO,
        }
    }
}

/// Uniform inference seam for all model families
///
/// `score` takes `&mut self` because ONNX Runtime's `Session::run` requires
/// mutable access; the pipeline is sequential, so no locking is involved.
pub trait Scorer {
    /// Score one preprocessed waveform, returning the family's metric map
    fn score(&mut self, waveform: &Waveform) -> Result<MetricMap>;

    /// Static metadata: name, report title, metric definitions
    fn info(&self) -> &'static ModelInfo;
}

/// Build an ORT session for a model file on the selected device
pub(crate) fn build_session(model_path: &Path, device: &Device) -> Result<Session> {
    let builder = Session::builder().map_err(|e| AudiogradeError::SetupError {
        reason: format!("Failed to create ORT session builder: {}", e),
    })?;

    builder
        .with_execution_providers(device.execution_providers())
        .map_err(|e| AudiogradeError::SetupError {
            reason: format!("Failed to configure {} execution provider: {}", device, e),
        })?
        .commit_from_file(model_path)
        .map_err(|e| AudiogradeError::SetupError {
            reason: format!("Failed to load model {}: {}", model_path.display(), e),
        })
}

/// Name of the first declared input tensor of a session
pub(crate) fn primary_input_name(session: &Session) -> Result<String> {
    session
        .inputs
        .first()
        .map(|input| input.name.clone())
        .ok_or_else(|| AudiogradeError::SetupError {
            reason: "Model has no input tensors defined".to_string(),
        })
}

/// Build a [1, N] input tensor from mono samples
pub(crate) fn samples_tensor(samples: &[f32], model: &str) -> Result<Tensor<f32>> {
    let array = Array2::from_shape_vec((1, samples.len()), samples.to_vec())
        .with_model_context(model)?;
    Tensor::from_array(array).with_model_context(model)
}

/// Extract a single scalar from an output value
///
/// Accepts any shape that flattens to exactly one element ([1], [1, 1], ...).
pub(crate) fn extract_scalar(model: &str, value: &DynValue) -> Result<f64> {
    let (shape, data) = value.try_extract_tensor::<f32>().with_model_context(model)?;

    if data.len() != 1 {
        let dims: Vec<i64> = shape.iter().copied().collect();
        return Err(AudiogradeError::inference_error(
            model,
            format!("expected a scalar output, got {} values (shape {:?})", data.len(), dims),
        ));
    }

    Ok(data[0] as f64)
}
