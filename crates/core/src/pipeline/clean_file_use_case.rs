use std::fs;
use std::path::{Path, PathBuf};

use crate::audio::domain::audio_reader::AudioReader;
use crate::audio::domain::audio_writer::AudioWriter;
use crate::censoring::domain::audio_excisor::AudioExcisor;
use crate::censoring::domain::segment_scorer::SegmentScorer;
use crate::censoring::domain::timeline_merger::TimelineMerger;
use crate::pipeline::clean_config::CleanConfig;
use crate::pipeline::output_layout::OutputLayout;
use crate::pipeline::run_reporter::{IntervalRecord, RunReporter, RunResult, RunStatus};
use crate::shared::constants::{AUDIO_EXTENSIONS, TEXT_PREVIEW_CHARS, WHISPER_SAMPLE_RATE};
use crate::shared::error::CleanError;
use crate::transcription::domain::speech_recognizer::SpeechRecognizer;
use crate::transcription::domain::transcript::TranscribedWord;

/// What one file's run produced, for the batch summary and console output.
#[derive(Debug)]
pub struct FileOutcome {
    pub total_words: usize,
    pub flagged_words: usize,
    pub intervals: Vec<IntervalRecord>,
    pub output_path: Option<PathBuf>,
}

/// Single-file cleaning pipeline, strictly sequential:
/// decode → transcribe → score → merge → excise → write → move → report.
///
/// The original file is renamed into `originals/` only after the cleaned
/// output was written successfully, so an interrupted or failed run leaves
/// the input where it was and stays retryable.
pub struct CleanFileUseCase {
    reader: Box<dyn AudioReader>,
    writer: Box<dyn AudioWriter>,
    recognizer: Box<dyn SpeechRecognizer>,
    scorer: SegmentScorer,
    config: CleanConfig,
}

impl CleanFileUseCase {
    pub fn new(
        reader: Box<dyn AudioReader>,
        writer: Box<dyn AudioWriter>,
        recognizer: Box<dyn SpeechRecognizer>,
        scorer: SegmentScorer,
        config: CleanConfig,
    ) -> Self {
        Self {
            reader,
            writer,
            recognizer,
            scorer,
            config,
        }
    }

    pub fn run(&self, input: &Path, layout: &OutputLayout) -> Result<FileOutcome, CleanError> {
        if !is_supported(input) {
            return Err(CleanError::UnsupportedFormat {
                path: input.to_path_buf(),
            });
        }

        let reporter = RunReporter::new(&layout.file_logging_dir(input));
        if reporter.is_completed() && !self.config.dry_run {
            return Err(CleanError::AlreadyProcessed {
                path: input.to_path_buf(),
                marker: reporter.completion_marker(),
            });
        }

        match self.process(input, layout, &reporter) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                if !self.config.dry_run {
                    self.record_failure(input, &reporter, &e);
                }
                Err(e)
            }
        }
    }

    fn process(
        &self,
        input: &Path,
        layout: &OutputLayout,
        reporter: &RunReporter,
    ) -> Result<FileOutcome, CleanError> {
        // 1. Decode twice: native quality for excision, mono 16k for whisper
        let native = self
            .reader
            .read_audio(input)
            .map_err(|e| CleanError::AudioRead {
                path: input.to_path_buf(),
                message: e.to_string(),
            })?;
        let speech = self
            .reader
            .read_audio_resampled(input, WHISPER_SAMPLE_RATE)
            .map_err(|e| CleanError::AudioRead {
                path: input.to_path_buf(),
                message: e.to_string(),
            })?;

        // 2. Transcribe with word timestamps
        let transcript =
            self.recognizer
                .transcribe(&speech)
                .map_err(|e| CleanError::Transcription {
                    path: input.to_path_buf(),
                    message: e.to_string(),
                })?;
        let preview = text_preview(&transcript);
        log::info!("{}: \"{preview}\"", input.display());
        log::debug!("{}: {} transcribed words", input.display(), transcript.len());

        // 3. Score, merge, excise
        let scoring = self.scorer.score(&transcript);
        let intervals = TimelineMerger::merge(
            &scoring.words,
            self.config.threshold,
            self.config.padding,
            native.duration(),
        );
        let cleaned = AudioExcisor::excise(&native, &intervals, self.config.mode);

        let interval_records: Vec<IntervalRecord> =
            intervals.iter().map(IntervalRecord::from_interval).collect();
        let flagged_words: usize = intervals.iter().map(|i| i.source_words.len()).sum();

        if flagged_words > 0 {
            log::info!(
                "{}: {flagged_words} profane word(s) in {} word(s), {} excision interval(s)",
                input.display(),
                transcript.len(),
                intervals.len()
            );
        } else {
            log::info!(
                "{}: no profanity in {} word(s)",
                input.display(),
                transcript.len()
            );
        }

        if self.config.dry_run {
            log::info!(
                "[dry-run] would write {} and move original to {}",
                layout.clean_path(input).display(),
                layout.original_destination(input).display()
            );
            return Ok(FileOutcome {
                total_words: transcript.len(),
                flagged_words,
                intervals: interval_records,
                output_path: None,
            });
        }

        // 4. Write the cleaned file, then commit by moving the original
        let clean_path = layout.clean_path(input);
        self.writer
            .write_audio(&clean_path, &cleaned.audio)
            .map_err(|e| CleanError::AudioWrite {
                path: clean_path.clone(),
                message: e.to_string(),
            })?;
        fs::rename(input, layout.original_destination(input))?;

        // 5. Persist the audit record
        let result = RunResult {
            input_path: input.to_path_buf(),
            output_path: Some(clean_path.clone()),
            model_size: self.config.model_size.to_string(),
            threshold: self.config.threshold,
            padding: self.config.padding,
            mode: self.config.mode.as_str().to_string(),
            total_words: transcript.len(),
            flagged_words,
            intervals: interval_records.clone(),
            low_confidence: scoring.low_confidence.iter().map(|w| w.text.clone()).collect(),
            classifier_failures: scoring.failures.clone(),
            text_preview: preview,
            status: RunStatus::Completed,
        };
        reporter.record(&result, &scoring.words)?;

        Ok(FileOutcome {
            total_words: transcript.len(),
            flagged_words,
            intervals: interval_records,
            output_path: Some(clean_path),
        })
    }

    /// Best-effort audit trail for a failed run. The failed status keeps the
    /// file retryable: a later run overwrites this record.
    fn record_failure(&self, input: &Path, reporter: &RunReporter, error: &CleanError) {
        let result = RunResult {
            input_path: input.to_path_buf(),
            output_path: None,
            model_size: self.config.model_size.to_string(),
            threshold: self.config.threshold,
            padding: self.config.padding,
            mode: self.config.mode.as_str().to_string(),
            total_words: 0,
            flagged_words: 0,
            intervals: Vec::new(),
            low_confidence: Vec::new(),
            classifier_failures: Vec::new(),
            text_preview: String::new(),
            status: RunStatus::Failed {
                message: error.to_string(),
            },
        };
        if let Err(e) = reporter.record(&result, &[]) {
            log::warn!("could not record failure for {}: {e}", input.display());
        }
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// First `TEXT_PREVIEW_CHARS` characters of the transcript text.
fn text_preview(words: &[TranscribedWord]) -> String {
    let text = words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    if text.chars().count() > TEXT_PREVIEW_CHARS {
        let truncated: String = text.chars().take(TEXT_PREVIEW_CHARS).collect();
        format!("{truncated}...")
    } else {
        text
    }
}
