//! Model artifact location
//!
//! The .onnx files are provided externally (typically baked into the
//! deployment image) and resolved from a fixed set of locations at startup.
//! There is no download path; a missing model is a setup failure.

use crate::error::{AudiogradeError, Result};
use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Environment variable pointing at a directory containing the model files
pub const MODEL_DIR_ENV: &str = "AUDIOGRADE_MODEL_DIR";

/// Audiobox aesthetics model artifact
pub const AESTHETICS_MODEL: &str = "audiobox_aesthetics.onnx";
/// SQUIM objective model artifact (STOI/PESQ/SI-SDR)
pub const SQUIM_OBJECTIVE_MODEL: &str = "squim_objective.onnx";
/// SQUIM subjective model artifact (MOS vs. reference)
pub const SQUIM_SUBJECTIVE_MODEL: &str = "squim_subjective.onnx";
/// UTMOSv2 naturalness model artifact
pub const NATURALNESS_MODEL: &str = "utmosv2.onnx";

/// Find a model file by checking multiple common locations
///
/// Search order:
/// 1. $AUDIOGRADE_MODEL_DIR/<filename>
/// 2. OS cache dir: ~/.cache/audiograde/models/ (Linux)
///    or ~/Library/Caches/com.audiograde.audiograde/models/ (macOS)
/// 3. OS data dir: ~/.local/share/audiograde/models/ (Linux)
/// 4. Current directory: ./models/<filename>
/// 5. Home directory: ~/audiograde/models/<filename>
///
/// Returns the first existing path, or a setup error listing every location
/// that was checked.
pub fn find_model(filename: &str) -> Result<PathBuf> {
    let mut checked: Vec<String> = Vec::new();

    if let Ok(dir) = std::env::var(MODEL_DIR_ENV) {
        let env_path = PathBuf::from(dir).join(filename);
        if env_path.exists() {
            return Ok(env_path);
        }
        checked.push(format!("{}={}", MODEL_DIR_ENV, env_path.display()));
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "audiograde", "audiograde") {
        let cache_path = proj_dirs.cache_dir().join("models").join(filename);
        if cache_path.exists() {
            return Ok(cache_path);
        }
        checked.push(cache_path.display().to_string());

        let data_path = proj_dirs.data_dir().join("models").join(filename);
        if data_path.exists() {
            return Ok(data_path);
        }
        checked.push(data_path.display().to_string());
    }

    let cwd_path = PathBuf::from("./models").join(filename);
    if cwd_path.exists() {
        return Ok(cwd_path.canonicalize().unwrap_or(cwd_path));
    }
    checked.push(cwd_path.display().to_string());

    if let Some(base_dirs) = BaseDirs::new() {
        let home_path = base_dirs.home_dir().join("audiograde").join("models").join(filename);
        if home_path.exists() {
            return Ok(home_path);
        }
        checked.push(home_path.display().to_string());
    }

    let locations_list = checked
        .iter()
        .map(|loc| format!("  - {}", loc))
        .collect::<Vec<_>>()
        .join("\n");

    Err(AudiogradeError::SetupError {
        reason: format!(
            "model file '{filename}' not found.\n\n\
             Locations checked:\n{locations_list}\n\n\
             To fix this, either:\n\
             1. Set the environment variable:\n\
                export {MODEL_DIR_ENV}=/path/to/models\n\n\
             2. Or place the file in one of the locations above."
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_is_setup_error() {
        let result = find_model("definitely_not_a_real_model_2b61.onnx");
        match result {
            Err(AudiogradeError::SetupError { reason }) => {
                assert!(reason.contains("definitely_not_a_real_model_2b61.onnx"));
                assert!(reason.contains(MODEL_DIR_ENV));
            }
            other => panic!("expected SetupError, got {other:?}"),
        }
    }

    #[test]
    fn test_artifact_names_are_distinct() {
        let names = [
            AESTHETICS_MODEL,
            SQUIM_OBJECTIVE_MODEL,
            SQUIM_SUBJECTIVE_MODEL,
            NATURALNESS_MODEL,
        ];
        for (i, a) in names.iter().enumerate() {
            for b in names.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
