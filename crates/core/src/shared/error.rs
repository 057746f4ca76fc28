use std::path::PathBuf;

use thiserror::Error;

/// Error taxonomy for a single file's cleaning run.
///
/// Per-file variants are caught by the batch runner and logged; they never
/// abort the batch. Process-level failures (unwritable output directory,
/// unresolvable model) are surfaced before the worker pool starts.
#[derive(Error, Debug)]
pub enum CleanError {
    #[error("unsupported audio format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to read audio from {path}: {message}")]
    AudioRead { path: PathBuf, message: String },

    #[error("transcription failed for {path}: {message}")]
    Transcription { path: PathBuf, message: String },

    #[error("{path} already has a completed run log at {marker}")]
    AlreadyProcessed { path: PathBuf, marker: PathBuf },

    #[error("failed to write cleaned audio to {path}: {message}")]
    AudioWrite { path: PathBuf, message: String },

    #[error("failed to resolve transcription model: {0}")]
    Model(#[from] crate::shared::model_resolver::ModelResolveError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize run result: {0}")]
    Report(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_unsupported_format_display() {
        let err = CleanError::UnsupportedFormat {
            path: Path::new("track.aiff").to_path_buf(),
        };
        assert_eq!(err.to_string(), "unsupported audio format: track.aiff");
    }

    #[test]
    fn test_already_processed_display_names_marker() {
        let err = CleanError::AlreadyProcessed {
            path: Path::new("song.mp3").to_path_buf(),
            marker: Path::new("logging/song/result.json").to_path_buf(),
        };
        assert!(err.to_string().contains("result.json"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CleanError = io.into();
        assert!(matches!(err, CleanError::Io(_)));
    }
}
