use super::excision_interval::ExcisionInterval;
use super::scored_word::ScoredWord;

/// Coalesces flagged words into the minimal sorted set of excision intervals.
pub struct TimelineMerger;

impl TimelineMerger {
    /// Flag words scoring at or above `threshold`, expand each flagged span
    /// by `pad` on both sides, clamp to `[0, total_duration]`, then merge
    /// overlapping or exactly touching spans (closed-interval adjacency).
    ///
    /// `words` is expected in transcript order. Zero flagged words yields an
    /// empty vec, meaning no excision is needed.
    pub fn merge(
        words: &[ScoredWord],
        threshold: f32,
        pad: f64,
        total_duration: f64,
    ) -> Vec<ExcisionInterval> {
        let mut merged: Vec<ExcisionInterval> = Vec::new();

        for word in words.iter().filter(|w| w.is_flagged(threshold)) {
            let start = (word.word.start_time - pad).max(0.0);
            let end = (word.word.end_time + pad).min(total_duration);
            if end <= start {
                continue;
            }

            match merged.last_mut() {
                // Touching counts: a span starting exactly where the previous
                // ends joins it rather than leaving a zero-length seam.
                Some(last) if start <= last.end_time => {
                    last.end_time = last.end_time.max(end);
                    last.source_words.push(word.clone());
                }
                _ => merged.push(ExcisionInterval {
                    start_time: start,
                    end_time: end,
                    source_words: vec![word.clone()],
                }),
            }
        }

        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::domain::transcript::TranscribedWord;
    use approx::assert_relative_eq;

    fn scored(text: &str, start: f64, end: f64, score: f32) -> ScoredWord {
        ScoredWord {
            word: TranscribedWord {
                text: text.to_string(),
                start_time: start,
                end_time: end,
                confidence: 0.9,
            },
            profanity_score: score,
        }
    }

    #[test]
    fn test_no_flagged_words_yields_empty() {
        let words = vec![scored("hello", 0.0, 0.5, 0.01), scored("there", 0.5, 1.0, 0.2)];
        assert!(TimelineMerger::merge(&words, 0.98, 0.0, 10.0).is_empty());
    }

    #[test]
    fn test_single_flagged_word() {
        let words = vec![scored("damn", 0.0, 0.5, 0.99), scored("it", 0.5, 0.7, 0.01)];
        let intervals = TimelineMerger::merge(&words, 0.98, 0.0, 10.0);
        assert_eq!(intervals.len(), 1);
        assert_relative_eq!(intervals[0].start_time, 0.0);
        assert_relative_eq!(intervals[0].end_time, 0.5);
        assert_eq!(intervals[0].source_words.len(), 1);
        assert_eq!(intervals[0].source_words[0].word.text, "damn");
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let words = vec![scored("edge", 1.0, 1.5, 0.98)];
        assert_eq!(TimelineMerger::merge(&words, 0.98, 0.0, 10.0).len(), 1);
    }

    #[test]
    fn test_separate_words_stay_separate() {
        let words = vec![
            scored("first", 0.0, 0.5, 0.99),
            scored("clean", 0.5, 2.0, 0.0),
            scored("second", 2.0, 2.5, 0.99),
        ];
        let intervals = TimelineMerger::merge(&words, 0.98, 0.0, 10.0);
        assert_eq!(intervals.len(), 2);
        assert_relative_eq!(intervals[0].end_time, 0.5);
        assert_relative_eq!(intervals[1].start_time, 2.0);
    }

    #[test]
    fn test_padding_causes_touching_spans_to_merge() {
        // 0.0-0.5 and 0.7-1.2 flagged; pad 0.1 makes them touch at 0.6
        let words = vec![
            scored("first", 0.0, 0.5, 0.99),
            scored("second", 0.7, 1.2, 0.99),
        ];
        let intervals = TimelineMerger::merge(&words, 0.98, 0.1, 10.0);
        assert_eq!(intervals.len(), 1);
        assert_relative_eq!(intervals[0].start_time, 0.0);
        assert_relative_eq!(intervals[0].end_time, 1.3);
        assert_eq!(intervals[0].source_words.len(), 2);
    }

    #[test]
    fn test_exactly_touching_without_padding_merges() {
        let words = vec![
            scored("back", 0.0, 0.5, 0.99),
            scored("toback", 0.5, 1.0, 0.99),
        ];
        let intervals = TimelineMerger::merge(&words, 0.98, 0.0, 10.0);
        assert_eq!(intervals.len(), 1);
        assert_relative_eq!(intervals[0].end_time, 1.0);
    }

    #[test]
    fn test_padding_clamps_to_stream_bounds() {
        let words = vec![scored("early", 0.05, 0.3, 0.99), scored("late", 9.8, 9.95, 0.99)];
        let intervals = TimelineMerger::merge(&words, 0.98, 0.2, 10.0);
        assert_eq!(intervals.len(), 2);
        assert_relative_eq!(intervals[0].start_time, 0.0);
        assert_relative_eq!(intervals[1].end_time, 10.0);
    }

    #[test]
    fn test_source_words_kept_in_time_order() {
        let words = vec![
            scored("one", 0.0, 0.4, 0.99),
            scored("two", 0.4, 0.8, 0.99),
            scored("three", 0.8, 1.2, 0.99),
        ];
        let intervals = TimelineMerger::merge(&words, 0.98, 0.0, 10.0);
        assert_eq!(intervals.len(), 1);
        let texts: Vec<_> = intervals[0]
            .source_words
            .iter()
            .map(|w| w.word.text.as_str())
            .collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_output_sorted_and_non_overlapping() {
        let words = vec![
            scored("a", 0.0, 1.0, 0.99),
            scored("b", 0.5, 1.5, 0.99),
            scored("c", 3.0, 3.5, 0.99),
            scored("d", 5.0, 5.5, 0.99),
        ];
        let intervals = TimelineMerger::merge(&words, 0.98, 0.25, 10.0);
        for pair in intervals.windows(2) {
            assert!(pair[0].end_time < pair[1].start_time);
            assert!(pair[0].start_time < pair[1].start_time);
        }
    }

    #[test]
    fn test_merge_is_idempotent_over_flagged_spans() {
        // Re-merging words built from an already-merged timeline changes nothing
        let words = vec![
            scored("a", 0.0, 0.5, 0.99),
            scored("b", 0.6, 1.1, 0.99),
            scored("c", 4.0, 4.5, 0.99),
        ];
        let first = TimelineMerger::merge(&words, 0.98, 0.1, 10.0);
        let as_words: Vec<ScoredWord> = first
            .iter()
            .map(|i| scored("span", i.start_time, i.end_time, 1.0))
            .collect();
        let second = TimelineMerger::merge(&as_words, 0.98, 0.0, 10.0);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_relative_eq!(a.start_time, b.start_time);
            assert_relative_eq!(a.end_time, b.end_time);
        }
    }

    #[test]
    fn test_raising_threshold_never_flags_more() {
        let words = vec![
            scored("a", 0.0, 0.5, 0.5),
            scored("b", 1.0, 1.5, 0.98),
            scored("c", 2.0, 2.5, 0.995),
        ];
        let mut last_count = usize::MAX;
        for threshold in [0.4f32, 0.9, 0.98, 0.99, 1.0] {
            let flagged = words.iter().filter(|w| w.is_flagged(threshold)).count();
            assert!(flagged <= last_count);
            last_count = flagged;
        }
    }

    #[test]
    fn test_word_fully_outside_duration_is_dropped() {
        // Transcription can emit timestamps past the decoded stream's end
        let words = vec![scored("ghost", 10.5, 11.0, 0.99)];
        assert!(TimelineMerger::merge(&words, 0.98, 0.0, 10.0).is_empty());
    }
}
