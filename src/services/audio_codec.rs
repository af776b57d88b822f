// Audio Codec Service
// Decode/resample/re-encode collaborator used by the audio analyzer

use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("failed to open audio source: {0}")]
    Io(#[from] std::io::Error),
    #[error("unrecognized or corrupt audio container: {0}")]
    Probe(String),
    #[error("no decodable audio track")]
    NoTrack,
    #[error("audio decode failed: {0}")]
    Decode(String),
    #[error("WAV encode failed: {0}")]
    Encode(String),
}

/// Decode/encode seam consumed by the audio analyzer.
///
/// `decode_mono` returns a mono sample sequence at exactly `target_rate`;
/// `encode_wav` packs samples into an uncompressed in-memory WAV buffer.
pub trait AudioCodec: Send + Sync {
    fn decode_mono(&self, path: &Path, target_rate: u32) -> Result<Vec<f32>, CodecError>;
    fn encode_wav(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, CodecError>;
}

/// Default codec: Symphonia for container probing and decode, hound for the
/// WAV re-encode.
#[derive(Debug, Default)]
pub struct SymphoniaCodec;

impl SymphoniaCodec {
    pub fn new() -> Self {
        Self
    }
}

impl AudioCodec for SymphoniaCodec {
    fn decode_mono(&self, path: &Path, target_rate: u32) -> Result<Vec<f32>, CodecError> {
        let (interleaved, source_rate, channels) = decode_interleaved(path)?;
        debug!(
            "[AUDIO_CODEC] decoded {} frames at {} Hz ({} ch)",
            interleaved.len() / channels.max(1),
            source_rate,
            channels
        );

        let mono = downmix(&interleaved, channels);
        Ok(resample(&mono, source_rate, target_rate))
    }

    fn encode_wav(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, CodecError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .map_err(|e| CodecError::Encode(e.to_string()))?;
            for &sample in samples {
                let quantized = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                writer
                    .write_sample(quantized)
                    .map_err(|e| CodecError::Encode(e.to_string()))?;
            }
            writer
                .finalize()
                .map_err(|e| CodecError::Encode(e.to_string()))?;
        }
        Ok(cursor.into_inner())
    }
}

/// Decode a file to interleaved f32 samples, reporting (samples, rate, channels).
fn decode_interleaved(path: &Path) -> Result<(Vec<f32>, u32, usize), CodecError> {
    let source = File::open(path)?;
    let stream = MediaSourceStream::new(Box::new(source), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| CodecError::Probe(e.to_string()))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(CodecError::NoTrack)?;
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| CodecError::Decode(e.to_string()))?;

    let mut samples = Vec::new();
    let mut sample_rate = 0u32;
    let mut channels = 0usize;
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(CodecError::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                if sample_buf.is_none() {
                    let spec = *decoded.spec();
                    sample_rate = spec.rate;
                    channels = spec.channels.count();
                    sample_buf = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
                }
                if let Some(buf) = sample_buf.as_mut() {
                    buf.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(buf.samples());
                }
            }
            // A corrupt packet is skippable; the stream may recover.
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(CodecError::Decode(e.to_string())),
        }
    }

    if samples.is_empty() || sample_rate == 0 {
        return Err(CodecError::Decode("no audio frames decoded".to_string()));
    }

    Ok((samples, sample_rate, channels))
}

/// Collapse interleaved frames to mono by averaging channels.
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Linear-interpolation resample. Good enough for classification input;
/// spectral fidelity beyond the classifier's needs is not a goal.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let step = from_rate as f64 / to_rate as f64;
    let out_len = ((samples.len() as f64) / step).ceil() as usize;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let position = i as f64 * step;
        let index = position as usize;
        let fraction = (position - index as f64) as f32;
        if index + 1 < samples.len() {
            out.push(samples[index] * (1.0 - fraction) + samples[index + 1] * fraction);
        } else if index < samples.len() {
            out.push(samples[index]);
        }
    }
    out
}
