//! Decoding of uploaded audio into Whisper-ready samples
//!
//! Whisper expects mono f32 samples at 16 kHz. Uploads arrive as WAV or MP3;
//! anything else is rejected at decode time.

use std::io::Cursor;

use crate::{Error, Result};

/// Sample rate expected by the Whisper model
pub const SAMPLE_RATE: u32 = 16_000;

/// Decode uploaded audio bytes into 16 kHz mono f32 samples
///
/// # Errors
///
/// Returns error if the data is not valid WAV or MP3
pub fn decode_to_samples(data: &[u8]) -> Result<Vec<f32>> {
    if data.starts_with(b"RIFF") {
        decode_wav(data)
    } else {
        decode_mp3(data)
    }
}

/// Decode WAV using hound, downmixing and resampling as needed
fn decode_wav(data: &[u8]) -> Result<Vec<f32>> {
    let cursor = Cursor::new(data);
    let mut reader =
        hound::WavReader::new(cursor).map_err(|e| Error::Audio(format!("WAV decode error: {e}")))?;

    let spec = reader.spec();
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::Audio(format!("WAV read error: {e}")))?,
        hound::SampleFormat::Int => {
            let max = f32::from(i16::MAX);
            reader
                .samples::<i16>()
                .map(|s| s.map(|v| f32::from(v) / max))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| Error::Audio(format!("WAV read error: {e}")))?
        }
    };

    let mono = downmix(&samples, spec.channels);

    if spec.sample_rate == SAMPLE_RATE {
        Ok(mono)
    } else {
        resample(&mono, spec.sample_rate, SAMPLE_RATE)
    }
}

/// Decode MP3 using minimp3
#[allow(clippy::cast_sign_loss)]
fn decode_mp3(data: &[u8]) -> Result<Vec<f32>> {
    let mut decoder = minimp3::Decoder::new(data);
    let mut samples: Vec<f32> = Vec::new();
    let mut sample_rate = SAMPLE_RATE;
    let mut decoded_any = false;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                decoded_any = true;
                sample_rate = frame.sample_rate as u32;
                if frame.channels == 2 {
                    for chunk in frame.data.chunks(2) {
                        let mono = f32::midpoint(f32::from(chunk[0]), f32::from(chunk[1])) / 32768.0;
                        samples.push(mono);
                    }
                } else {
                    for &s in &frame.data {
                        samples.push(f32::from(s) / 32768.0);
                    }
                }
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => {
                return Err(Error::Audio(format!("MP3 decode error: {e}")));
            }
        }
    }

    if !decoded_any {
        return Err(Error::Audio("unrecognized audio format".to_string()));
    }

    if sample_rate == SAMPLE_RATE {
        Ok(samples)
    } else {
        resample(&samples, sample_rate, SAMPLE_RATE)
    }
}

/// Downmix interleaved multi-channel samples to mono
#[allow(clippy::cast_precision_loss)]
fn downmix(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let channels = usize::from(channels);
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Resample audio using rubato
#[allow(clippy::cast_possible_truncation)]
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    use rubato::{FftFixedIn, Resampler};

    let chunk_size = 1024;
    let sub_chunks = 2;

    let mut resampler =
        FftFixedIn::<f64>::new(from_rate as usize, to_rate as usize, chunk_size, sub_chunks, 1)
            .map_err(|e| Error::Audio(format!("resampler init failed: {e}")))?;

    let input: Vec<f64> = samples.iter().map(|&s| f64::from(s)).collect();

    let mut output = Vec::new();

    for chunk in input.chunks(chunk_size) {
        // Zero-pad the final partial chunk so the tail is not dropped
        let mut block = chunk.to_vec();
        block.resize(chunk_size, 0.0);

        let result = resampler
            .process(&[block], None)
            .map_err(|e| Error::Audio(format!("resample failed: {e}")))?;
        output.extend_from_slice(&result[0]);
    }

    Ok(output.iter().map(|&s| s as f32).collect())
}
