/// Domain interface for text profanity classification.
///
/// Implementations are stateless per call: each span of text is scored on
/// its own with no cross-word context.
pub trait ProfanityClassifier: Send {
    /// Probability in [0, 1] that `text` is profane.
    fn score(&self, text: &str) -> Result<f32, Box<dyn std::error::Error>>;
}
