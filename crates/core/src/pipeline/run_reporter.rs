use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::censoring::domain::excision_interval::ExcisionInterval;
use crate::censoring::domain::scored_word::ScoredWord;
use crate::shared::error::CleanError;

/// Terminal state of one file's run, persisted in `result.json`. Only a
/// `Completed` record blocks re-processing; a `Failed` one stays retryable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Failed { message: String },
}

/// One merged excision interval as persisted for audit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntervalRecord {
    pub start_time: f64,
    pub end_time: f64,
    pub words: Vec<String>,
}

impl IntervalRecord {
    pub fn from_interval(interval: &ExcisionInterval) -> Self {
        Self {
            start_time: interval.start_time,
            end_time: interval.end_time,
            words: interval
                .source_words
                .iter()
                .map(|w| w.word.text.clone())
                .collect(),
        }
    }
}

/// The durable audit record for one processed file. Immutable once a run
/// completes; a failed run's record is replaced by the retry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunResult {
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub model_size: String,
    pub threshold: f32,
    pub padding: f64,
    pub mode: String,
    pub total_words: usize,
    pub flagged_words: usize,
    pub intervals: Vec<IntervalRecord>,
    /// Words transcribed below the confidence floor (diagnostic only).
    pub low_confidence: Vec<String>,
    /// Words the classifier failed on and the failure messages (fail-open).
    pub classifier_failures: Vec<(String, String)>,
    pub text_preview: String,
    pub status: RunStatus,
}

/// Writes one file's audit record to its logging subdirectory.
///
/// Append-only: a completed `result.json` is never overwritten, and its
/// existence doubles as the persisted completion marker consulted before
/// re-processing.
pub struct RunReporter {
    dir: PathBuf,
}

impl RunReporter {
    pub fn new(file_logging_dir: &Path) -> Self {
        Self {
            dir: file_logging_dir.to_path_buf(),
        }
    }

    pub fn completion_marker(&self) -> PathBuf {
        self.dir.join("result.json")
    }

    /// Whether a previous run already completed for this file.
    ///
    /// A marker that exists but records a failed run does not count, so a
    /// crashed or errored file can be retried. A marker that cannot be
    /// parsed is treated as completed rather than risking a double-process.
    pub fn is_completed(&self) -> bool {
        let text = match fs::read_to_string(self.completion_marker()) {
            Ok(text) => text,
            Err(_) => return false,
        };
        match serde_json::from_str::<RunResult>(&text) {
            Ok(result) => result.status == RunStatus::Completed,
            Err(_) => true,
        }
    }

    /// Persist `result.json`, `log.txt`, and `profanity_preds.txt`.
    ///
    /// Refuses to overwrite an existing completed record so a file is never
    /// silently double-processed. A failed record is overwritten by a retry.
    pub fn record(&self, result: &RunResult, predictions: &[ScoredWord]) -> Result<(), CleanError> {
        let marker = self.completion_marker();
        if self.is_completed() {
            return Err(CleanError::AlreadyProcessed {
                path: result.input_path.clone(),
                marker,
            });
        }

        fs::create_dir_all(&self.dir)?;
        fs::write(
            self.dir.join("profanity_preds.txt"),
            render_predictions(result, predictions),
        )?;
        fs::write(self.dir.join("log.txt"), render_log(result))?;

        let json = serde_json::to_string_pretty(result)?;
        fs::write(&marker, json)?;
        Ok(())
    }
}

/// Per-word predictions table, original tool's tab-separated format.
fn render_predictions(result: &RunResult, predictions: &[ScoredWord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Model Size: {}", result.model_size);
    let _ = writeln!(out, "Threshold: {}", result.threshold);
    let _ = writeln!(out, "word\tprediction\tstart_time");
    for scored in predictions {
        let _ = writeln!(
            out,
            "{}\t{:.4}\t{:.2}",
            scored.word.text.to_lowercase(),
            scored.profanity_score,
            scored.word.start_time
        );
    }
    out
}

/// Human-readable per-file summary.
fn render_log(result: &RunResult) -> String {
    let mut out = String::new();
    let name = result
        .input_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let _ = writeln!(out, "Song: {name}");
    let _ = writeln!(out, "Model: {}", result.model_size);
    let _ = writeln!(out, "Threshold: {}", result.threshold);
    let _ = writeln!(out, "Mode: {}", result.mode);
    let _ = writeln!(out, "Total words: {}", result.total_words);
    let _ = writeln!(out, "Profane words: {}", result.flagged_words);
    if !result.intervals.is_empty() {
        let spans: Vec<String> = result
            .intervals
            .iter()
            .map(|i| format!("[{:.2}-{:.2}]", i.start_time, i.end_time))
            .collect();
        let _ = writeln!(out, "Excised intervals: {}", spans.join(", "));
    }
    let _ = writeln!(out, "Text preview: {}", result.text_preview);
    let status = match &result.status {
        RunStatus::Completed => "completed".to_string(),
        RunStatus::Failed { message } => format!("failed: {message}"),
    };
    let _ = writeln!(out, "Status: {status}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::domain::transcript::TranscribedWord;
    use tempfile::TempDir;

    fn scored(text: &str, start: f64, score: f32) -> ScoredWord {
        ScoredWord {
            word: TranscribedWord {
                text: text.to_string(),
                start_time: start,
                end_time: start + 0.5,
                confidence: 0.9,
            },
            profanity_score: score,
        }
    }

    fn sample_result() -> RunResult {
        RunResult {
            input_path: PathBuf::from("/in/song.mp3"),
            output_path: Some(PathBuf::from("/out/clean_song.mp3")),
            model_size: "base".to_string(),
            threshold: 0.98,
            padding: 0.0,
            mode: "mute".to_string(),
            total_words: 2,
            flagged_words: 1,
            intervals: vec![IntervalRecord {
                start_time: 0.0,
                end_time: 0.5,
                words: vec!["damn".to_string()],
            }],
            low_confidence: vec![],
            classifier_failures: vec![],
            text_preview: "damn it".to_string(),
            status: RunStatus::Completed,
        }
    }

    #[test]
    fn test_record_writes_all_three_files() {
        let tmp = TempDir::new().unwrap();
        let reporter = RunReporter::new(&tmp.path().join("song"));
        let preds = vec![scored("Damn", 0.0, 0.99), scored("it", 0.5, 0.01)];

        reporter.record(&sample_result(), &preds).unwrap();

        assert!(tmp.path().join("song/result.json").exists());
        assert!(tmp.path().join("song/log.txt").exists());
        assert!(tmp.path().join("song/profanity_preds.txt").exists());
    }

    #[test]
    fn test_predictions_file_format() {
        let tmp = TempDir::new().unwrap();
        let reporter = RunReporter::new(&tmp.path().join("song"));
        let preds = vec![scored("Damn", 0.0, 0.99)];

        reporter.record(&sample_result(), &preds).unwrap();

        let text = fs::read_to_string(tmp.path().join("song/profanity_preds.txt")).unwrap();
        assert!(text.starts_with("Model Size: base\nThreshold: 0.98\n"));
        assert!(text.contains("word\tprediction\tstart_time"));
        assert!(text.contains("damn\t0.9900\t0.00"));
    }

    #[test]
    fn test_log_file_mentions_counts_and_intervals() {
        let tmp = TempDir::new().unwrap();
        let reporter = RunReporter::new(&tmp.path().join("song"));

        reporter.record(&sample_result(), &[]).unwrap();

        let text = fs::read_to_string(tmp.path().join("song/log.txt")).unwrap();
        assert!(text.contains("Song: song.mp3"));
        assert!(text.contains("Total words: 2"));
        assert!(text.contains("Profane words: 1"));
        assert!(text.contains("[0.00-0.50]"));
        assert!(text.contains("Status: completed"));
    }

    #[test]
    fn test_result_json_round_trips_fields() {
        let tmp = TempDir::new().unwrap();
        let reporter = RunReporter::new(&tmp.path().join("song"));

        reporter.record(&sample_result(), &[]).unwrap();

        let text = fs::read_to_string(reporter.completion_marker()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["model_size"], "base");
        assert_eq!(value["flagged_words"], 1);
        assert_eq!(value["intervals"][0]["words"][0], "damn");
        assert_eq!(value["status"]["kind"], "completed");
    }

    #[test]
    fn test_record_refuses_to_overwrite_completed_run() {
        let tmp = TempDir::new().unwrap();
        let reporter = RunReporter::new(&tmp.path().join("song"));

        reporter.record(&sample_result(), &[]).unwrap();
        let second = reporter.record(&sample_result(), &[]);

        assert!(matches!(
            second,
            Err(CleanError::AlreadyProcessed { .. })
        ));
    }

    #[test]
    fn test_is_completed_tracks_marker() {
        let tmp = TempDir::new().unwrap();
        let reporter = RunReporter::new(&tmp.path().join("song"));
        assert!(!reporter.is_completed());
        reporter.record(&sample_result(), &[]).unwrap();
        assert!(reporter.is_completed());
    }

    #[test]
    fn test_failed_record_stays_retryable() {
        let tmp = TempDir::new().unwrap();
        let reporter = RunReporter::new(&tmp.path().join("song"));
        let failed = RunResult {
            status: RunStatus::Failed {
                message: "encoder not found".to_string(),
            },
            ..sample_result()
        };

        reporter.record(&failed, &[]).unwrap();
        assert!(!reporter.is_completed());

        // The retry overwrites the failed record and completes normally
        reporter.record(&sample_result(), &[]).unwrap();
        assert!(reporter.is_completed());
        let text = fs::read_to_string(reporter.completion_marker()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["status"]["kind"], "completed");
    }

    #[test]
    fn test_unparseable_marker_counts_as_completed() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("song");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("result.json"), b"{}").unwrap();

        let reporter = RunReporter::new(&dir);
        assert!(reporter.is_completed());
        assert!(matches!(
            reporter.record(&sample_result(), &[]),
            Err(CleanError::AlreadyProcessed { .. })
        ));
    }
}
