/// Audio container extensions the directory scan accepts.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "wav", "ogg", "flac"];

/// Prefix given to cleaned output files; inputs already carrying it are skipped.
pub const CLEAN_PREFIX: &str = "clean_";

/// Classifier score at or above which a word is treated as profane.
pub const DEFAULT_THRESHOLD: f32 = 0.98;

/// Seconds added on both sides of each flagged word before merging.
pub const DEFAULT_PADDING: f64 = 0.0;

/// Transcription confidence below which a word is surfaced as a diagnostic.
pub const DEFAULT_CONFIDENCE_FLOOR: f32 = 0.4;

/// Whisper expects 16 kHz mono input.
pub const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Characters of transcript shown in console previews and log.txt.
pub const TEXT_PREVIEW_CHARS: usize = 100;
