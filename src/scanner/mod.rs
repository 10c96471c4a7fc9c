//! Audio file discovery.
//!
//! Only the top level of a folder is scanned: an album is one directory.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::metadata::ContainerKind;

/// Lists supported audio files directly inside `dir`, sorted by path.
///
/// Supported extensions: mp3, ogg (case-insensitive).
pub fn discover_audio_files(dir: &Path) -> walkdir::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file() && is_supported_audio_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Check if a path has a supported audio extension
pub fn is_supported_audio_file(path: &Path) -> bool {
    ContainerKind::from_path(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_discover_audio_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        File::create(root.join("b.mp3")).unwrap();
        File::create(root.join("a.ogg")).unwrap();
        File::create(root.join("UPPERCASE.OGG")).unwrap();
        File::create(root.join("music.flac")).unwrap(); // unsupported
        File::create(root.join("notes.txt")).unwrap();

        let subdir = root.join("disc2");
        std::fs::create_dir(&subdir).unwrap();
        File::create(subdir.join("nested.mp3")).unwrap(); // not scanned

        let names: Vec<String> = discover_audio_files(root)
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();

        assert_eq!(names, vec!["UPPERCASE.OGG", "a.ogg", "b.mp3"]);
    }

    #[test]
    fn test_directory_named_like_audio_is_skipped() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("folder.mp3")).unwrap();
        assert!(discover_audio_files(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = tempdir().unwrap();
        assert!(discover_audio_files(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_is_supported_audio_file() {
        assert!(is_supported_audio_file(Path::new("x.Mp3")));
        assert!(is_supported_audio_file(Path::new("x.ogg")));
        assert!(!is_supported_audio_file(Path::new("x.m4a")));
        assert!(!is_supported_audio_file(Path::new("mp3")));
    }
}
