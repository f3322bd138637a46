//! File discovery and scanning

use crate::error::{AudiogradeError, Result, SUPPORTED_AUDIO, SUPPORTED_VIDEO};
use crate::types::{MediaFile, MediaKind};
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Scan a path (file or directory) for media files
///
/// Every regular file is returned, including ones with unsupported
/// extensions: those become failed records downstream instead of being
/// silently ignored. Results are sorted by path, so identical inputs always
/// process in the same order.
pub fn scan(input: &Path, recursive: bool) -> Result<Vec<MediaFile>> {
    if !input.exists() {
        return Err(AudiogradeError::FileNotFound(input.to_path_buf()));
    }

    let mut files = Vec::new();

    if input.is_file() {
        // Single file mode
        files.push(discover_file(input));
    } else if input.is_dir() {
        // Directory mode
        let walker = if recursive {
            WalkDir::new(input)
        } else {
            WalkDir::new(input).max_depth(1)
        };

        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_file() {
                let file = discover_file(path);
                debug!("Discovered: {} ({:?})", file.path.display(), file.kind);
                files.push(file);
            }
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));

    let supported = files.iter().filter(|f| f.kind.is_supported()).count();
    info!("Discovered {} files ({} supported)", files.len(), supported);

    if supported == 0 {
        warn!(
            "No supported media files found in {}\n  Supported audio: {}\n  Supported video: {}",
            input.display(),
            SUPPORTED_AUDIO,
            SUPPORTED_VIDEO
        );
    }

    Ok(files)
}

/// Classify a file and capture basic metadata
///
/// A file that vanishes between walk and stat keeps size 0; the load phase
/// reports the real error for it.
fn discover_file(path: &Path) -> MediaFile {
    let kind = MediaKind::from_path(path);
    let size_bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

    MediaFile {
        path,
        kind,
        size_bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AudioFormat;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_missing_path_is_fatal() {
        let result = scan(Path::new("/nonexistent/audiograde/input"), false);
        assert!(matches!(result, Err(AudiogradeError::FileNotFound(_))));
    }

    #[test]
    fn test_scan_sorts_and_keeps_unsupported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("c.wav"), b"x").unwrap();
        fs::write(dir.path().join("a.xyz"), b"x").unwrap();
        fs::write(dir.path().join("b.mp4"), b"x").unwrap();

        let files = scan(dir.path(), false).unwrap();
        assert_eq!(files.len(), 3);

        let names: Vec<String> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.xyz", "b.mp4", "c.wav"]);

        assert_eq!(files[0].kind, MediaKind::Unsupported);
        assert!(matches!(files[1].kind, MediaKind::Video(_)));
        assert_eq!(files[2].kind, MediaKind::Audio(AudioFormat::Wav));
    }

    #[test]
    fn test_scan_single_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("solo.flac");
        fs::write(&path, b"not really flac").unwrap();

        let files = scan(&path, false).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].kind, MediaKind::Audio(AudioFormat::Flac));
        assert!(files[0].path.is_absolute());
    }

    #[test]
    fn test_scan_recursion_depth() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("top.wav"), b"x").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("nested.wav"), b"x").unwrap();

        let shallow = scan(dir.path(), false).unwrap();
        assert_eq!(shallow.len(), 1);

        let deep = scan(dir.path(), true).unwrap();
        assert_eq!(deep.len(), 2);
    }

    #[test]
    fn test_scan_is_deterministic() {
        let dir = TempDir::new().unwrap();
        for name in ["z.wav", "m.flac", "a.ogg"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let first = scan(dir.path(), false).unwrap();
        let second = scan(dir.path(), false).unwrap();
        let paths1: Vec<_> = first.iter().map(|f| f.path.clone()).collect();
        let paths2: Vec<_> = second.iter().map(|f| f.path.clone()).collect();
        assert_eq!(paths1, paths2);
    }
}
