/// A segment of decoded audio: interleaved PCM samples normalized to [-1.0, 1.0].
#[derive(Clone, Debug)]
pub struct AudioSegment {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl AudioSegment {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels as f64)
    }

    /// Number of sample frames (one frame = one sample per channel).
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Frame index at `time`, rounded down. Interleaved channels share one
    /// frame index, so boundaries computed from frames never split a frame.
    pub fn frame_at_time_floor(&self, time: f64) -> usize {
        ((time.max(0.0) * self.sample_rate as f64).floor() as usize).min(self.frame_count())
    }

    /// Frame index at `time`, rounded up.
    pub fn frame_at_time_ceil(&self, time: f64) -> usize {
        ((time.max(0.0) * self.sample_rate as f64).ceil() as usize).min(self.frame_count())
    }

    /// Interleaved sample index for a frame index.
    pub fn sample_index_of_frame(&self, frame: usize) -> usize {
        frame * self.channels as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_creates_segment_with_correct_fields() {
        let samples = vec![0.0f32; 16000];
        let seg = AudioSegment::new(samples.clone(), 16000, 1);
        assert_eq!(seg.samples(), &samples[..]);
        assert_eq!(seg.sample_rate(), 16000);
        assert_eq!(seg.channels(), 1);
    }

    #[test]
    fn test_duration_mono() {
        let seg = AudioSegment::new(vec![0.0; 48000], 16000, 1);
        assert_relative_eq!(seg.duration(), 3.0);
    }

    #[test]
    fn test_duration_stereo() {
        let seg = AudioSegment::new(vec![0.0; 96000], 48000, 2);
        assert_relative_eq!(seg.duration(), 1.0);
    }

    #[test]
    fn test_frame_count_stereo() {
        let seg = AudioSegment::new(vec![0.0; 96000], 48000, 2);
        assert_eq!(seg.frame_count(), 48000);
    }

    #[test]
    fn test_frame_at_time_floor_and_ceil() {
        let seg = AudioSegment::new(vec![0.0; 16000], 16000, 1);
        // 0.50003s * 16000 = 8000.48
        assert_eq!(seg.frame_at_time_floor(0.50003), 8000);
        assert_eq!(seg.frame_at_time_ceil(0.50003), 8001);
    }

    #[test]
    fn test_frame_at_time_clamps_to_stream_end() {
        let seg = AudioSegment::new(vec![0.0; 16000], 16000, 1);
        assert_eq!(seg.frame_at_time_ceil(99.0), 16000);
    }

    #[test]
    fn test_frame_at_time_negative_clamps_to_zero() {
        let seg = AudioSegment::new(vec![0.0; 16000], 16000, 1);
        assert_eq!(seg.frame_at_time_floor(-0.5), 0);
    }

    #[test]
    fn test_sample_index_of_frame_stereo() {
        let seg = AudioSegment::new(vec![0.0; 200], 16000, 2);
        assert_eq!(seg.sample_index_of_frame(50), 100);
    }

    #[test]
    fn test_samples_mut() {
        let mut seg = AudioSegment::new(vec![0.0; 100], 16000, 1);
        seg.samples_mut()[50] = 1.0;
        assert_eq!(seg.samples()[50], 1.0);
    }
}
