use crate::audio::domain::audio_segment::AudioSegment;

use super::transcript::TranscribedWord;

/// Domain interface for speech-to-text transcription.
///
/// Implementations run inference on audio to produce word-level timestamps.
pub trait SpeechRecognizer: Send {
    fn transcribe(
        &self,
        audio: &AudioSegment,
    ) -> Result<Vec<TranscribedWord>, Box<dyn std::error::Error>>;
}
