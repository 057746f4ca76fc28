use crate::censoring::domain::audio_excisor::ExcisionMode;
use crate::shared::constants::{DEFAULT_CONFIDENCE_FLOOR, DEFAULT_PADDING, DEFAULT_THRESHOLD};
use crate::transcription::domain::model_size::ModelSize;

/// Configuration for a cleaning run, passed explicitly to each stage —
/// there is no global state; the filesystem itself carries the only durable
/// run bookkeeping (the per-file result marker).
#[derive(Clone, Debug)]
pub struct CleanConfig {
    pub model_size: ModelSize,
    /// Classifier score at or above which a word is excised.
    pub threshold: f32,
    /// Seconds added on both sides of each flagged word.
    pub padding: f64,
    pub mode: ExcisionMode,
    /// Transcription confidence below which words are reported as diagnostics.
    pub confidence_floor: f32,
    /// Preview only: no files written, nothing moved.
    pub dry_run: bool,
    /// Worker threads; `None` sizes the pool to available parallelism.
    pub jobs: Option<usize>,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            model_size: ModelSize::default(),
            threshold: DEFAULT_THRESHOLD,
            padding: DEFAULT_PADDING,
            mode: ExcisionMode::default(),
            confidence_floor: DEFAULT_CONFIDENCE_FLOOR,
            dry_run: false,
            jobs: None,
        }
    }
}
