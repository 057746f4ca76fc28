use std::path::Path;

use crate::audio::domain::audio_segment::AudioSegment;
use crate::audio::domain::audio_writer::AudioWriter;

/// Encodes a cleaned audio segment to a file using ffmpeg-next.
///
/// The muxer is inferred from the output path; the codec is chosen from the
/// extension so a `.mp3` input round-trips to a `.mp3` output. Output goes
/// to a `.part` temp file first and is renamed into place on success.
pub struct FfmpegAudioWriter;

/// Sample format the chosen encoder consumes.
enum EncodeFormat {
    /// f32 planar (lame, aac, vorbis).
    FltPlanar,
    /// i16 packed (pcm_s16le, flac).
    S16Packed,
}

impl AudioWriter for FfmpegAudioWriter {
    fn write_audio(
        &self,
        path: &Path,
        audio: &AudioSegment,
    ) -> Result<(), Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| format!("output path has no extension: {}", path.display()))?;
        let (codec, fmt) = encoder_for_extension(&ext)?;

        let temp_path = path.with_extension(format!("{ext}.part"));
        let mut octx = ffmpeg_next::format::output(&temp_path)?;

        let mut ost = octx.add_stream(Some(codec))?;
        let ost_idx = ost.index();

        let mut encoder = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .audio()?;
        encoder.set_rate(audio.sample_rate() as i32);
        let layout = ffmpeg_next::ChannelLayout::default(audio.channels() as i32);
        encoder.set_channel_layout(layout);
        encoder.set_format(match fmt {
            EncodeFormat::FltPlanar => {
                ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Planar)
            }
            EncodeFormat::S16Packed => {
                ffmpeg_next::format::Sample::I16(ffmpeg_next::format::sample::Type::Packed)
            }
        });

        let mut encoder = encoder.open_as(codec)?;
        ost.set_parameters(&encoder);

        let enc_time_base = encoder.time_base();
        let frame_size = encoder.frame_size() as usize;

        octx.write_header()?;
        let ost_time_base = octx.stream(ost_idx).ok_or("output stream missing")?.time_base();

        encode_segment(
            &mut encoder,
            audio,
            &fmt,
            layout,
            &mut octx,
            ost_idx,
            enc_time_base,
            ost_time_base,
            frame_size,
        )?;

        octx.write_trailer()?;
        drop(octx);

        std::fs::rename(&temp_path, path)?;
        Ok(())
    }
}

/// Map an audio extension to its encoder and the sample format it takes.
fn encoder_for_extension(
    ext: &str,
) -> Result<(ffmpeg_next::Codec, EncodeFormat), Box<dyn std::error::Error>> {
    match ext {
        "mp3" => {
            let codec = ffmpeg_next::encoder::find_by_name("libmp3lame")
                .or_else(|| ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MP3))
                .ok_or("mp3 encoder not found")?;
            Ok((codec, EncodeFormat::FltPlanar))
        }
        "m4a" => {
            let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::AAC)
                .ok_or("AAC encoder not found")?;
            Ok((codec, EncodeFormat::FltPlanar))
        }
        "ogg" => {
            let codec = ffmpeg_next::encoder::find_by_name("libvorbis")
                .or_else(|| ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::VORBIS))
                .ok_or("vorbis encoder not found")?;
            Ok((codec, EncodeFormat::FltPlanar))
        }
        "flac" => {
            let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::FLAC)
                .ok_or("flac encoder not found")?;
            Ok((codec, EncodeFormat::S16Packed))
        }
        "wav" => {
            let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::PCM_S16LE)
                .ok_or("pcm encoder not found")?;
            Ok((codec, EncodeFormat::S16Packed))
        }
        other => Err(format!("unsupported output extension: {other}").into()),
    }
}

/// Encode the segment in encoder-sized chunks and write interleaved packets.
#[allow(clippy::too_many_arguments)]
fn encode_segment(
    encoder: &mut ffmpeg_next::codec::encoder::audio::Encoder,
    audio: &AudioSegment,
    fmt: &EncodeFormat,
    layout: ffmpeg_next::ChannelLayout,
    octx: &mut ffmpeg_next::format::context::Output,
    stream_idx: usize,
    enc_time_base: ffmpeg_next::Rational,
    ost_time_base: ffmpeg_next::Rational,
    frame_size: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let channels = audio.channels() as usize;
    let sample_rate = audio.sample_rate();
    let samples = audio.samples();
    // PCM encoders report frame_size 0: any chunk length is fine
    let frames_per_chunk = if frame_size == 0 { 1024 } else { frame_size };
    let samples_per_chunk = frames_per_chunk * channels;

    let mut pts: i64 = 0;

    for chunk in samples.chunks(samples_per_chunk) {
        let chunk_frames = chunk.len() / channels;
        let mut frame = match fmt {
            EncodeFormat::FltPlanar => {
                let mut frame = ffmpeg_next::util::frame::audio::Audio::new(
                    ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Planar),
                    chunk_frames,
                    layout,
                );
                fill_planar_f32(&mut frame, chunk, channels, chunk_frames);
                frame
            }
            EncodeFormat::S16Packed => {
                let mut frame = ffmpeg_next::util::frame::audio::Audio::new(
                    ffmpeg_next::format::Sample::I16(ffmpeg_next::format::sample::Type::Packed),
                    chunk_frames,
                    layout,
                );
                fill_packed_s16(&mut frame, chunk);
                frame
            }
        };
        frame.set_rate(sample_rate);
        frame.set_pts(Some(pts));

        encoder.send_frame(&frame)?;
        flush_packets(encoder, octx, stream_idx, enc_time_base, ost_time_base)?;

        pts += chunk_frames as i64;
    }

    encoder.send_eof()?;
    flush_packets(encoder, octx, stream_idx, enc_time_base, ost_time_base)?;

    Ok(())
}

/// De-interleave f32 samples into the frame's per-channel planes.
fn fill_planar_f32(
    frame: &mut ffmpeg_next::util::frame::audio::Audio,
    chunk: &[f32],
    channels: usize,
    chunk_frames: usize,
) {
    for ch in 0..channels {
        let plane: Vec<f32> = (0..chunk_frames).map(|i| chunk[i * channels + ch]).collect();
        let dst = frame.data_mut(ch);
        let src_bytes = unsafe {
            std::slice::from_raw_parts(plane.as_ptr() as *const u8, plane.len() * 4)
        };
        dst[..src_bytes.len()].copy_from_slice(src_bytes);
    }
}

/// Convert f32 samples to interleaved i16 in the frame's single plane.
fn fill_packed_s16(frame: &mut ffmpeg_next::util::frame::audio::Audio, chunk: &[f32]) {
    let converted: Vec<i16> = chunk
        .iter()
        .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect();
    let dst = frame.data_mut(0);
    let src_bytes = unsafe {
        std::slice::from_raw_parts(converted.as_ptr() as *const u8, converted.len() * 2)
    };
    dst[..src_bytes.len()].copy_from_slice(src_bytes);
}

fn flush_packets(
    encoder: &mut ffmpeg_next::codec::encoder::audio::Encoder,
    octx: &mut ffmpeg_next::format::context::Output,
    stream_idx: usize,
    enc_time_base: ffmpeg_next::Rational,
    ost_time_base: ffmpeg_next::Rational,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut encoded = ffmpeg_next::Packet::empty();
    while encoder.receive_packet(&mut encoded).is_ok() {
        encoded.set_stream(stream_idx);
        encoded.rescale_ts(enc_time_base, ost_time_base);
        encoded.write_interleaved(octx)?;
    }
    Ok(())
}
