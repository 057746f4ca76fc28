use std::path::Path;

use super::audio_segment::AudioSegment;

/// Domain interface for decoding an audio file.
pub trait AudioReader: Send {
    /// Decode at the original sample rate and channel count (interleaved).
    /// This is the stream the excisor edits, so no quality is lost.
    fn read_audio(&self, path: &Path) -> Result<AudioSegment, Box<dyn std::error::Error>>;

    /// Decode to mono PCM at the given sample rate (speech recognition input).
    fn read_audio_resampled(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<AudioSegment, Box<dyn std::error::Error>>;
}
