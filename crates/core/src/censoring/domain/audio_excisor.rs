use crate::audio::domain::audio_segment::AudioSegment;

use super::excision_interval::ExcisionInterval;

/// How excised intervals are taken out of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExcisionMode {
    /// Replace with silence; duration and all surrounding timestamps are
    /// preserved, keeping sync with any accompanying broadcast timeline.
    #[default]
    Mute,
    /// Delete the interval and concatenate the remainder; duration shrinks.
    Remove,
}

impl ExcisionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExcisionMode::Mute => "mute",
            ExcisionMode::Remove => "remove",
        }
    }
}

/// The de-profaned stream plus the manifest of what was applied to it.
#[derive(Debug)]
pub struct CleanedAudio {
    pub audio: AudioSegment,
    pub applied: Vec<ExcisionInterval>,
    pub removed_duration: f64,
}

pub struct AudioExcisor;

impl AudioExcisor {
    /// Excise `intervals` (sorted, non-overlapping) from `audio`.
    ///
    /// Boundaries are frame-aligned and round toward the interval — start
    /// floors, end ceils — so a fractional-sample boundary can never leave
    /// residual profanity behind.
    pub fn excise(
        audio: &AudioSegment,
        intervals: &[ExcisionInterval],
        mode: ExcisionMode,
    ) -> CleanedAudio {
        match mode {
            ExcisionMode::Mute => Self::mute(audio, intervals),
            ExcisionMode::Remove => Self::remove(audio, intervals),
        }
    }

    fn mute(audio: &AudioSegment, intervals: &[ExcisionInterval]) -> CleanedAudio {
        let mut out = audio.clone();
        for interval in intervals {
            let (start, end) = sample_range(&out, interval);
            for sample in &mut out.samples_mut()[start..end] {
                *sample = 0.0;
            }
        }
        CleanedAudio {
            audio: out,
            applied: intervals.to_vec(),
            removed_duration: 0.0,
        }
    }

    fn remove(audio: &AudioSegment, intervals: &[ExcisionInterval]) -> CleanedAudio {
        let samples = audio.samples();
        let mut kept: Vec<f32> = Vec::with_capacity(samples.len());
        let mut cursor = 0usize;
        let mut removed_samples = 0usize;

        for interval in intervals {
            let (start, end) = sample_range(audio, interval);
            kept.extend_from_slice(&samples[cursor..start.max(cursor)]);
            removed_samples += end.saturating_sub(start.max(cursor));
            cursor = cursor.max(end);
        }
        kept.extend_from_slice(&samples[cursor..]);

        let removed_duration =
            removed_samples as f64 / (audio.sample_rate() as f64 * audio.channels() as f64);

        CleanedAudio {
            audio: AudioSegment::new(kept, audio.sample_rate(), audio.channels()),
            applied: intervals.to_vec(),
            removed_duration,
        }
    }
}

/// Interleaved sample range for an interval: frame-aligned, start floored,
/// end ceiled, clamped to the stream.
fn sample_range(audio: &AudioSegment, interval: &ExcisionInterval) -> (usize, usize) {
    let start_frame = audio.frame_at_time_floor(interval.start_time);
    let end_frame = audio.frame_at_time_ceil(interval.end_time);
    (
        audio.sample_index_of_frame(start_frame),
        audio.sample_index_of_frame(end_frame),
    )
}
