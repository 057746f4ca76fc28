use crate::transcription::domain::transcript::TranscribedWord;

use super::profanity_classifier::ProfanityClassifier;
use super::scored_word::ScoredWord;

/// Result of scoring one transcript, including the diagnostics the run
/// reporter records alongside the predictions.
#[derive(Debug, Default)]
pub struct ScoringOutcome {
    pub words: Vec<ScoredWord>,
    /// Words transcribed below the confidence floor. They are still scored
    /// and can still be flagged; flagging is textual, not signal-quality
    /// dependent.
    pub low_confidence: Vec<TranscribedWord>,
    /// Words the classifier failed on, with the failure message. These are
    /// treated as non-flagged (score 0).
    pub failures: Vec<(String, String)>,
}

/// Maps each transcribed word to a profanity probability.
pub struct SegmentScorer {
    classifier: Box<dyn ProfanityClassifier>,
    confidence_floor: f32,
}

impl SegmentScorer {
    pub fn new(classifier: Box<dyn ProfanityClassifier>, confidence_floor: f32) -> Self {
        Self {
            classifier,
            confidence_floor,
        }
    }

    /// Score every word independently, preserving transcript order.
    ///
    /// Classifier failures are fail-open: the word scores 0.0 and the
    /// failure is surfaced in the outcome and the warn log. Silencing on
    /// error is the caller's call (via dry-run preview), not this one's.
    pub fn score(&self, words: &[TranscribedWord]) -> ScoringOutcome {
        let mut outcome = ScoringOutcome::default();

        for word in words {
            if word.confidence < self.confidence_floor {
                outcome.low_confidence.push(word.clone());
            }

            let normalized = normalize(&word.text);
            let score = if normalized.is_empty() {
                0.0
            } else {
                match self.classifier.score(&normalized) {
                    Ok(p) => p.clamp(0.0, 1.0),
                    Err(e) => {
                        log::warn!(
                            "classifier failed for {:?} at {:.2}s, treating as clean: {e}",
                            word.text,
                            word.start_time
                        );
                        outcome.failures.push((word.text.clone(), e.to_string()));
                        0.0
                    }
                }
            };

            outcome.words.push(ScoredWord {
                word: word.clone(),
                profanity_score: score,
            });
        }

        outcome
    }
}

/// Lowercase and strip surrounding punctuation, matching how the classifier
/// lexicon is keyed. Interior characters stay: obfuscations like "sh!t" are
/// the classifier's problem.
fn normalize(text: &str) -> String {
    text.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}
