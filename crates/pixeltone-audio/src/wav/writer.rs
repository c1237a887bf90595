//! Header serialization and float to PCM16 conversion.

use std::io::{self, Write};

use super::format::WavFormat;
use crate::buffer::PcmBuffer;

/// Size of the canonical RIFF/WAVE header in bytes.
pub const HEADER_LEN: usize = 44;

/// Writes a complete WAV file to a writer.
///
/// # Arguments
/// * `writer` - Output writer
/// * `format` - WAV format parameters
/// * `pcm_data` - Interleaved little-endian PCM bytes
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> io::Result<()> {
    let data_size = u32::try_from(pcm_data.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "PCM data exceeds 4 GiB"))?;
    let riff_size = data_size
        .checked_add(36)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "RIFF size overflow"))?;

    // RIFF header
    writer.write_all(b"RIFF")?;
    writer.write_all(&riff_size.to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    // fmt chunk
    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?;
    writer.write_all(&1u16.to_le_bytes())?; // PCM
    writer.write_all(&format.channels.to_le_bytes())?;
    writer.write_all(&format.sample_rate.to_le_bytes())?;
    writer.write_all(&format.byte_rate().to_le_bytes())?;
    writer.write_all(&format.block_align().to_le_bytes())?;
    writer.write_all(&format.bits_per_sample.to_le_bytes())?;

    // data chunk
    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(pcm_data)?;

    Ok(())
}

/// Converts one float sample to a signed 16-bit value.
///
/// The sample is clipped to [-1, 1]; negative values scale by 0x8000 and
/// non-negative values by 0x7FFF.
#[inline]
pub fn sample_to_pcm16(sample: f32) -> i16 {
    let clipped = if sample.is_nan() {
        0.0
    } else {
        sample.clamp(-1.0, 1.0)
    };
    let scaled = if clipped < 0.0 {
        clipped * 32768.0
    } else {
        clipped * 32767.0
    };
    scaled.round() as i16
}

/// Interleaves a buffer frame by frame into little-endian PCM16 bytes.
pub fn interleave_pcm16(buffer: &PcmBuffer) -> Vec<u8> {
    let channels = buffer.channels();
    let mut pcm = Vec::with_capacity(buffer.len() * channels.len() * 2);

    for frame in 0..buffer.len() {
        for channel in channels {
            pcm.extend_from_slice(&sample_to_pcm16(channel[frame]).to_le_bytes());
        }
    }

    pcm
}
