use std::path::Path;

use crate::audio::domain::audio_reader::AudioReader;
use crate::audio::domain::audio_segment::AudioSegment;

/// Decodes audio files (mp3/m4a/wav/ogg/flac) using ffmpeg-next.
pub struct FfmpegAudioReader;

impl AudioReader for FfmpegAudioReader {
    fn read_audio(&self, path: &Path) -> Result<AudioSegment, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let mut ictx = ffmpeg_next::format::input(path)?;
        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Audio)
            .ok_or("no audio stream in file")?;
        let stream_index = stream.index();

        let codec_ctx =
            ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let mut decoder = codec_ctx.decoder().audio()?;

        let sample_rate = decoder.rate();
        let channel_layout = decoder.channel_layout();
        let channels = decoder.channels();

        // Keep the original rate and layout; only normalize the sample format
        // to packed f32 so the excisor sees one interleaved representation.
        let mut resampler = ffmpeg_next::software::resampling::Context::get(
            decoder.format(),
            channel_layout,
            sample_rate,
            ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Packed),
            channel_layout,
            sample_rate,
        )?;

        let samples = decode_all(
            &mut ictx,
            stream_index,
            &mut decoder,
            &mut resampler,
            channels as usize,
        )?;

        Ok(AudioSegment::new(samples, sample_rate, channels))
    }

    fn read_audio_resampled(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<AudioSegment, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let mut ictx = ffmpeg_next::format::input(path)?;
        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Audio)
            .ok_or("no audio stream in file")?;
        let stream_index = stream.index();

        let codec_ctx =
            ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let mut decoder = codec_ctx.decoder().audio()?;

        let mut resampler = ffmpeg_next::software::resampling::Context::get(
            decoder.format(),
            decoder.channel_layout(),
            decoder.rate(),
            ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Packed),
            ffmpeg_next::ChannelLayout::MONO,
            target_sample_rate,
        )?;

        let samples = decode_all(&mut ictx, stream_index, &mut decoder, &mut resampler, 1)?;

        Ok(AudioSegment::new(samples, target_sample_rate, 1))
    }
}

/// Drive the decode → resample loop over every packet, then flush both the
/// decoder and the resampler (the resampler may buffer samples).
fn decode_all(
    ictx: &mut ffmpeg_next::format::context::Input,
    stream_index: usize,
    decoder: &mut ffmpeg_next::codec::decoder::Audio,
    resampler: &mut ffmpeg_next::software::resampling::Context,
    channels: usize,
) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
    let mut all_samples: Vec<f32> = Vec::new();
    let mut decoded_frame = ffmpeg_next::util::frame::audio::Audio::empty();
    let mut resampled_frame = ffmpeg_next::util::frame::audio::Audio::empty();

    for (stream, packet) in ictx.packets() {
        if stream.index() != stream_index {
            continue;
        }

        decoder.send_packet(&packet)?;
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            resampler.run(&decoded_frame, &mut resampled_frame)?;
            extract_packed_f32(&resampled_frame, channels, &mut all_samples);
        }
    }

    decoder.send_eof()?;
    while decoder.receive_frame(&mut decoded_frame).is_ok() {
        resampler.run(&decoded_frame, &mut resampled_frame)?;
        extract_packed_f32(&resampled_frame, channels, &mut all_samples);
    }

    if let Ok(Some(delay)) = resampler.flush(&mut resampled_frame) {
        if delay.output > 0 {
            extract_packed_f32(&resampled_frame, channels, &mut all_samples);
        }
    }

    Ok(all_samples)
}

/// Extract interleaved f32 samples from a packed resampled frame.
fn extract_packed_f32(
    frame: &ffmpeg_next::util::frame::audio::Audio,
    channels: usize,
    out: &mut Vec<f32>,
) {
    let num_frames = frame.samples();
    if num_frames == 0 {
        return;
    }
    let total = num_frames * channels;
    let data = frame.data(0);
    let floats = unsafe { std::slice::from_raw_parts(data.as_ptr() as *const f32, total) };
    out.extend_from_slice(floats);
}
