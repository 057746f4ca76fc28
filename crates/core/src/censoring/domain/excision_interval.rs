use super::scored_word::ScoredWord;

/// A maximal span of audio to excise, produced by the timeline merger.
///
/// Within one timeline, intervals are sorted by start and never overlap;
/// `start_time < end_time` always holds. `source_words` keeps the flagged
/// words that contributed, in time order, for the audit log.
#[derive(Clone, Debug, PartialEq)]
pub struct ExcisionInterval {
    pub start_time: f64,
    pub end_time: f64,
    pub source_words: Vec<ScoredWord>,
}

impl ExcisionInterval {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}
