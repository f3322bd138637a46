//! External audio conversion via ffmpeg
//!
//! Extracts the audio track from video files and transcodes audio formats
//! the in-process decoder cannot read. Output is always 16 kHz mono
//! pcm_s16le WAV in a temporary directory that is removed when the handle
//! drops.

use crate::audio::decoder::TARGET_SAMPLE_RATE;
use crate::error::{AudiogradeError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tracing::debug;

/// Handle to a converted WAV file
///
/// Keeps the backing temp directory alive; dropping the handle deletes the
/// WAV along with it.
#[derive(Debug)]
pub struct ConvertedAudio {
    _dir: TempDir,
    wav_path: PathBuf,
}

impl ConvertedAudio {
    pub fn wav_path(&self) -> &Path {
        &self.wav_path
    }
}

/// Convert a media file to 16 kHz mono WAV using ffmpeg
///
/// `strip_video` adds `-vn` so only the audio track is kept. A clean exit
/// that leaves no usable output (e.g. a video with no audio track) is still
/// a conversion failure.
pub fn convert_to_wav(input: &Path, strip_video: bool) -> Result<ConvertedAudio> {
    if !input.exists() {
        return Err(AudiogradeError::conversion_error(input, "source file does not exist"));
    }

    let dir = TempDir::new().map_err(|e| {
        AudiogradeError::conversion_error(input, format!("failed to create temp directory: {}", e))
    })?;

    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("audio");
    let wav_path = dir.path().join(format!("{stem}.wav"));

    let args = build_ffmpeg_args(input, &wav_path, strip_video);
    debug!("Running ffmpeg for {}", input.display());

    let output = Command::new("ffmpeg").args(&args).output().map_err(|e| {
        let reason = if e.kind() == std::io::ErrorKind::NotFound {
            "ffmpeg not found in PATH\n  Tip: Install ffmpeg and ensure it is on your PATH".to_string()
        } else {
            format!("failed to run ffmpeg: {}", e)
        };
        AudiogradeError::conversion_error(input, reason)
    })?;

    if !output.status.success() {
        return Err(AudiogradeError::conversion_error(
            input,
            format!("ffmpeg exited with {}: {}", output.status, stderr_excerpt(&output.stderr)),
        ));
    }

    validate_output(&wav_path, input)?;

    Ok(ConvertedAudio { _dir: dir, wav_path })
}

/// Assemble the ffmpeg argument list: decode input, optionally drop video,
/// write 16 kHz mono 16-bit PCM, overwrite without prompting
fn build_ffmpeg_args(input: &Path, output: &Path, strip_video: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-i".into(), input.as_os_str().to_owned()];

    if strip_video {
        args.push("-vn".into());
    }

    args.extend([
        OsString::from("-acodec"),
        OsString::from("pcm_s16le"),
        OsString::from("-ar"),
        OsString::from(TARGET_SAMPLE_RATE.to_string()),
        OsString::from("-ac"),
        OsString::from("1"),
        OsString::from("-y"),
    ]);

    args.push(output.as_os_str().to_owned());
    args
}

/// Reject zero-byte or missing output from an otherwise clean ffmpeg exit
fn validate_output(wav_path: &Path, input: &Path) -> Result<()> {
    let size = std::fs::metadata(wav_path).map(|m| m.len()).unwrap_or(0);
    if size == 0 {
        return Err(AudiogradeError::conversion_error(
            input,
            "conversion produced an empty file (the source may have no audio track)",
        ));
    }
    Ok(())
}

/// ffmpeg prints a long banner before the actual error; keep the last few
/// non-empty lines
fn stderr_excerpt(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let mut tail: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .rev()
        .take(3)
        .collect();
    tail.reverse();

    if tail.is_empty() {
        "no diagnostic output".to_string()
    } else {
        tail.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn arg_strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_args_for_video_strip_track() {
        let args = arg_strings(&build_ffmpeg_args(
            Path::new("/in/clip.mp4"),
            Path::new("/tmp/clip.wav"),
            true,
        ));

        assert_eq!(args[0], "-i");
        assert_eq!(args[1], "/in/clip.mp4");
        assert!(args.contains(&"-vn".to_string()));
        assert_eq!(args.last().unwrap(), "/tmp/clip.wav");

        let ar_pos = args.iter().position(|a| a == "-ar").unwrap();
        assert_eq!(args[ar_pos + 1], "16000");
        let ac_pos = args.iter().position(|a| a == "-ac").unwrap();
        assert_eq!(args[ac_pos + 1], "1");
        assert!(args.contains(&"pcm_s16le".to_string()));
        assert!(args.contains(&"-y".to_string()));
    }

    #[test]
    fn test_args_for_audio_keep_all_streams() {
        let args = arg_strings(&build_ffmpeg_args(
            Path::new("/in/song.wma"),
            Path::new("/tmp/song.wav"),
            false,
        ));
        assert!(!args.contains(&"-vn".to_string()));
    }

    #[test]
    fn test_missing_source_is_conversion_error() {
        let result = convert_to_wav(Path::new("/nonexistent/clip.mp4"), true);
        assert!(matches!(result, Err(AudiogradeError::ConversionError { .. })));
    }

    #[test]
    fn test_empty_output_rejected() {
        let dir = TempDir::new().unwrap();
        let wav = dir.path().join("out.wav");
        fs::write(&wav, b"").unwrap();

        let result = validate_output(&wav, Path::new("/in/clip.mp4"));
        assert!(matches!(result, Err(AudiogradeError::ConversionError { .. })));
    }

    #[test]
    fn test_missing_output_rejected() {
        let dir = TempDir::new().unwrap();
        let wav = dir.path().join("never_created.wav");

        let result = validate_output(&wav, Path::new("/in/clip.mp4"));
        assert!(matches!(result, Err(AudiogradeError::ConversionError { .. })));
    }

    #[test]
    fn test_stderr_excerpt_keeps_tail() {
        let stderr = b"banner line\nmore banner\n\nStream mapping:\nError: no audio stream\n";
        let excerpt = stderr_excerpt(stderr);
        assert!(excerpt.contains("no audio stream"));
        assert!(!excerpt.contains("banner line"));
    }

    #[test]
    fn test_stderr_excerpt_empty() {
        assert_eq!(stderr_excerpt(b""), "no diagnostic output");
    }
}
