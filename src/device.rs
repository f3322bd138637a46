//! Inference device selection
//!
//! The device is chosen once per process and handed to every model session;
//! it never changes mid-run. Accelerators are registered with
//! error_on_failure, so a provider that probes as available but fails to
//! initialize aborts setup instead of silently dropping to CPU.

use std::fmt;

#[cfg(target_os = "macos")]
use ort::execution_providers::CoreMLExecutionProvider;
use ort::execution_providers::{
    CPUExecutionProvider, CUDAExecutionProvider, ExecutionProvider, ExecutionProviderDispatch,
};
use tracing::{debug, info};

/// Compute backend used for every session in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cuda,
    CoreMl,
    Cpu,
}

impl Device {
    /// Pick the best available backend: CUDA, then the platform accelerator,
    /// then CPU. `force_cpu` skips probing entirely.
    pub fn select(force_cpu: bool) -> Device {
        if force_cpu {
            info!("Forcing CPU inference (--force-cpu)");
            return Device::Cpu;
        }

        if CUDAExecutionProvider::default().is_available().unwrap_or(false) {
            info!("Using CUDA for inference");
            return Device::Cuda;
        }
        debug!("CUDA not available");

        #[cfg(target_os = "macos")]
        {
            if CoreMLExecutionProvider::default().is_available().unwrap_or(false) {
                info!("Using CoreML for inference");
                return Device::CoreMl;
            }
            debug!("CoreML not available");
        }

        info!("Using CPU for inference");
        Device::Cpu
    }

    /// Execution providers to register on a session builder
    pub fn execution_providers(&self) -> Vec<ExecutionProviderDispatch> {
        match self {
            Device::Cuda => vec![CUDAExecutionProvider::default().build().error_on_failure()],
            #[cfg(target_os = "macos")]
            Device::CoreMl => vec![CoreMLExecutionProvider::default().build().error_on_failure()],
            // Unreachable off macOS; select() never produces CoreMl there
            #[cfg(not(target_os = "macos"))]
            Device::CoreMl => vec![CPUExecutionProvider::default().build()],
            Device::Cpu => vec![CPUExecutionProvider::default().build()],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Device::Cuda => "cuda",
            Device::CoreMl => "coreml",
            Device::Cpu => "cpu",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
