use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::constants::CLEAN_PREFIX;
use crate::shared::error::CleanError;

/// Output directory layout for a batch run:
///
/// ```text
/// output_directory/
///   clean_<name>.<ext>
///   originals/<name>.<ext>
///   logging/<name>/log.txt
///   logging/<name>/profanity_preds.txt
///   logging/<name>/result.json
/// ```
#[derive(Clone, Debug)]
pub struct OutputLayout {
    output_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn originals_dir(&self) -> PathBuf {
        self.output_dir.join("originals")
    }

    pub fn logging_dir(&self) -> PathBuf {
        self.output_dir.join("logging")
    }

    /// Per-file logging subdirectory, keyed by the input's file stem.
    pub fn file_logging_dir(&self, input: &Path) -> PathBuf {
        self.logging_dir().join(file_stem(input))
    }

    pub fn clean_path(&self, input: &Path) -> PathBuf {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.output_dir.join(format!("{CLEAN_PREFIX}{name}"))
    }

    pub fn original_destination(&self, input: &Path) -> PathBuf {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.originals_dir().join(name)
    }

    /// Create the shared directories. An unwritable output directory is a
    /// process-level failure that aborts the whole run.
    pub fn ensure_directories(&self) -> Result<(), CleanError> {
        fs::create_dir_all(self.originals_dir())?;
        fs::create_dir_all(self.logging_dir())?;
        Ok(())
    }
}

pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clean_path_prefixes_file_name() {
        let layout = OutputLayout::new(Path::new("/out"));
        assert_eq!(
            layout.clean_path(Path::new("/in/song.mp3")),
            Path::new("/out/clean_song.mp3")
        );
    }

    #[test]
    fn test_original_destination_under_originals() {
        let layout = OutputLayout::new(Path::new("/out"));
        assert_eq!(
            layout.original_destination(Path::new("/in/song.mp3")),
            Path::new("/out/originals/song.mp3")
        );
    }

    #[test]
    fn test_file_logging_dir_uses_stem() {
        let layout = OutputLayout::new(Path::new("/out"));
        assert_eq!(
            layout.file_logging_dir(Path::new("/in/song.mp3")),
            Path::new("/out/logging/song")
        );
    }

    #[test]
    fn test_ensure_directories_creates_layout() {
        let tmp = TempDir::new().unwrap();
        let layout = OutputLayout::new(tmp.path());
        layout.ensure_directories().unwrap();
        assert!(layout.originals_dir().is_dir());
        assert!(layout.logging_dir().is_dir());
    }

    #[test]
    fn test_ensure_directories_unwritable_fails() {
        if cfg!(windows) {
            return;
        }
        let layout = OutputLayout::new(Path::new("/proc/no-such-place"));
        assert!(layout.ensure_directories().is_err());
    }
}
