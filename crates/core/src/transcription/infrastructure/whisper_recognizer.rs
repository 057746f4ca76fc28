use std::path::{Path, PathBuf};

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::domain::audio_segment::AudioSegment;
use crate::transcription::domain::speech_recognizer::SpeechRecognizer;
use crate::transcription::domain::transcript::TranscribedWord;

/// Speech recognizer using whisper.cpp via whisper-rs.
///
/// Whisper emits sub-word tokens; a token whose text begins with a space
/// starts a new word, so consecutive tokens are grouped back into whole
/// words. A word's span covers its first token's start to its last token's
/// end, and its confidence is the weakest token probability in the group.
#[derive(Debug)]
pub struct WhisperRecognizer {
    model_path: PathBuf,
}

/// In-progress token group while walking a segment's tokens.
struct WordBuilder {
    text: String,
    start_time: f64,
    end_time: f64,
    confidence: f32,
}

impl WordBuilder {
    fn start(piece: &str, start_time: f64, end_time: f64, prob: f32) -> Self {
        Self {
            text: piece.trim().to_string(),
            start_time,
            end_time,
            confidence: prob,
        }
    }

    fn push(&mut self, piece: &str, end_time: f64, prob: f32) {
        self.text.push_str(piece.trim_end());
        self.end_time = self.end_time.max(end_time);
        self.confidence = self.confidence.min(prob);
    }

    fn finish(self) -> Option<TranscribedWord> {
        if self.text.is_empty() || self.end_time <= self.start_time {
            return None;
        }
        Some(TranscribedWord {
            text: self.text,
            start_time: self.start_time,
            end_time: self.end_time,
            confidence: self.confidence,
        })
    }
}

impl WhisperRecognizer {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !model_path.exists() {
            return Err(format!("Whisper model not found at: {}", model_path.display()).into());
        }
        Ok(Self {
            model_path: model_path.to_path_buf(),
        })
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn transcribe(
        &self,
        audio: &AudioSegment,
    ) -> Result<Vec<TranscribedWord>, Box<dyn std::error::Error>> {
        let ctx = WhisperContext::new_with_params(
            self.model_path.to_str().ok_or("Invalid model path")?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| format!("Failed to load Whisper model: {e}"))?;

        let mut state = ctx
            .create_state()
            .map_err(|e| format!("Failed to create Whisper state: {e}"))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 0 });
        params.set_language(Some("en"));
        params.set_translate(false);
        params.set_token_timestamps(true);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(num_cpus().min(4) as i32);

        state
            .full(params, audio.samples())
            .map_err(|e| format!("Whisper inference failed: {e}"))?;

        let mut words = Vec::new();
        let num_segments = state.full_n_segments();

        for seg_idx in 0..num_segments {
            let segment = match state.get_segment(seg_idx) {
                Some(s) => s,
                None => continue,
            };

            let mut current: Option<WordBuilder> = None;

            let n_tokens = segment.n_tokens();
            for tok_idx in 0..n_tokens {
                let token = match segment.get_token(tok_idx) {
                    Some(t) => t,
                    None => continue,
                };

                let text = match token.to_str() {
                    Ok(t) => t,
                    Err(_) => continue,
                };

                // Special tokens like [_BEG_] or <|endoftext|> never join a word
                let trimmed = text.trim();
                if trimmed.is_empty() || trimmed.starts_with('[') || trimmed.starts_with('<') {
                    continue;
                }

                let token_data = token.token_data();
                let prob = token.token_probability();

                // Token timestamps are in centiseconds (10ms units)
                let start_time = token_data.t0 as f64 / 100.0;
                let end_time = token_data.t1 as f64 / 100.0;

                let starts_word = text.starts_with(' ') || current.is_none();
                if starts_word {
                    if let Some(done) = current.take().and_then(WordBuilder::finish) {
                        words.push(done);
                    }
                    current = Some(WordBuilder::start(trimmed, start_time, end_time, prob));
                } else if let Some(ref mut builder) = current {
                    builder.push(text, end_time, prob);
                }
            }

            if let Some(done) = current.and_then(WordBuilder::finish) {
                words.push(done);
            }
        }

        Ok(words)
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
