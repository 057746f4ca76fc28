use std::path::{Path, PathBuf};
use std::thread;

use crate::audio::infrastructure::ffmpeg_audio_reader::FfmpegAudioReader;
use crate::audio::infrastructure::ffmpeg_audio_writer::FfmpegAudioWriter;
use crate::censoring::domain::segment_scorer::SegmentScorer;
use crate::censoring::infrastructure::lexicon_classifier::LexiconClassifier;
use crate::pipeline::clean_config::CleanConfig;
use crate::pipeline::clean_file_use_case::CleanFileUseCase;
use crate::pipeline::output_layout::OutputLayout;
use crate::shared::constants::{AUDIO_EXTENSIONS, CLEAN_PREFIX};
use crate::shared::error::CleanError;
use crate::shared::model_resolver;
use crate::transcription::infrastructure::whisper_recognizer::WhisperRecognizer;

/// Outcome tally for one batch run. `failed > 0` (or an empty scan) maps to
/// a non-zero process exit in the CLI.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.failed
    }
}

/// Processes every supported audio file in a directory through the cleaning
/// pipeline, distributing files across a worker pool.
///
/// Per-file failures are logged and tallied; only process-level problems
/// (missing input directory, unwritable output, unresolvable model) abort
/// the batch.
pub struct BatchRunner {
    config: CleanConfig,
}

impl BatchRunner {
    pub fn new(config: CleanConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<BatchSummary, CleanError> {
        if !input_dir.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("input directory not found: {}", input_dir.display()),
            )
            .into());
        }

        let files = scan_audio_files(input_dir)?;
        if files.is_empty() {
            log::warn!("no audio files found in {}", input_dir.display());
            return Ok(BatchSummary::default());
        }
        log::info!("{} audio file(s) to process", files.len());

        let layout = self.prepare_layout(output_dir)?;

        let size = self.config.model_size;
        let model_path = model_resolver::resolve(
            size.model_file_name(),
            &size.model_url(),
            Some(Box::new(log_download_progress)),
        )?;
        log::debug!("using model {}", model_path.display());

        let config = self.config.clone();
        let make_use_case = move || -> Result<CleanFileUseCase, CleanError> {
            let recognizer =
                WhisperRecognizer::new(&model_path).map_err(|e| CleanError::Transcription {
                    path: model_path.clone(),
                    message: e.to_string(),
                })?;
            Ok(CleanFileUseCase::new(
                Box::new(FfmpegAudioReader),
                Box::new(FfmpegAudioWriter),
                Box::new(recognizer),
                SegmentScorer::new(Box::new(LexiconClassifier::new()), config.confidence_floor),
                config.clone(),
            ))
        };

        let workers = self.worker_count(files.len());
        Ok(process_all(&files, &layout, workers, make_use_case))
    }

    /// Dry runs leave the output directory untouched, so the shared
    /// subdirectories are only created for a real run.
    fn prepare_layout(&self, output_dir: &Path) -> Result<OutputLayout, CleanError> {
        let layout = OutputLayout::new(output_dir);
        if self.config.dry_run {
            log::info!(
                "[dry-run] would create {} and {}",
                layout.originals_dir().display(),
                layout.logging_dir().display()
            );
        } else {
            layout.ensure_directories()?;
        }
        Ok(layout)
    }

    fn worker_count(&self, file_count: usize) -> usize {
        let available = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        self.config.jobs.unwrap_or(available).clamp(1, file_count.max(1))
    }
}

/// Fan the files out over `workers` threads, each with its own use case
/// (whisper contexts are not shareable across threads).
fn process_all<F>(
    files: &[PathBuf],
    layout: &OutputLayout,
    workers: usize,
    make_use_case: F,
) -> BatchSummary
where
    F: Fn() -> Result<CleanFileUseCase, CleanError> + Send + Sync,
{
    let (job_tx, job_rx) = crossbeam_channel::unbounded::<PathBuf>();
    for file in files {
        let _ = job_tx.send(file.clone());
    }
    drop(job_tx);

    let mut summary = BatchSummary::default();
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let layout = layout.clone();
            let make_use_case = &make_use_case;
            handles.push(scope.spawn(move || {
                let mut tally = BatchSummary::default();
                let use_case = match make_use_case() {
                    Ok(uc) => uc,
                    Err(e) => {
                        log::error!("worker failed to start: {e}");
                        for _ in job_rx.iter() {
                            tally.failed += 1;
                        }
                        return tally;
                    }
                };
                for file in job_rx.iter() {
                    match use_case.run(&file, &layout) {
                        Ok(_) => {
                            log::info!("done: {}", file.display());
                            tally.processed += 1;
                        }
                        Err(CleanError::AlreadyProcessed { path, marker }) => {
                            log::info!(
                                "skipping {}: already processed ({})",
                                path.display(),
                                marker.display()
                            );
                            tally.skipped += 1;
                        }
                        Err(e) => {
                            log::error!("{e}");
                            tally.failed += 1;
                        }
                    }
                }
                tally
            }));
        }
        for handle in handles {
            match handle.join() {
                Ok(tally) => {
                    summary.processed += tally.processed;
                    summary.skipped += tally.skipped;
                    summary.failed += tally.failed;
                }
                Err(_) => log::error!("worker thread panicked"),
            }
        }
    });
    summary
}

/// Supported audio files in `dir`, sorted by name. Non-recursive. Files
/// already carrying the cleaned-output prefix are skipped so re-running on
/// the output directory never re-cleans its own results.
pub fn scan_audio_files(dir: &Path) -> Result<Vec<PathBuf>, CleanError> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => continue,
        };
        if name.starts_with(CLEAN_PREFIX) {
            log::debug!("skipping already-cleaned file {name}");
            continue;
        }
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| AUDIO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false);
        if supported {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn log_download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        log::info!(
            "downloading model: {:.0}% ({:.1} MB / {:.1} MB)",
            downloaded as f64 / total as f64 * 100.0,
            downloaded as f64 / 1_048_576.0,
            total as f64 / 1_048_576.0
        );
    }
}
