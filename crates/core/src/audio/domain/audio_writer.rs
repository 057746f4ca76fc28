use std::path::Path;

use super::audio_segment::AudioSegment;

/// Domain interface for encoding an audio segment to a file.
///
/// The container and codec are chosen from the output path's extension.
pub trait AudioWriter: Send {
    fn write_audio(
        &self,
        path: &Path,
        audio: &AudioSegment,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
