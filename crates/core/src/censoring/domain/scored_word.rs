use crate::transcription::domain::transcript::TranscribedWord;

/// A transcribed word paired with its profanity probability in [0, 1].
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredWord {
    pub word: TranscribedWord,
    pub profanity_score: f32,
}

impl ScoredWord {
    /// A word is flagged once its score reaches the decision threshold.
    pub fn is_flagged(&self, threshold: f32) -> bool {
        self.profanity_score >= threshold
    }
}
