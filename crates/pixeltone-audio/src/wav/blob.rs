//! Encoded WAV output.

use tracing::debug;

use super::format::WavFormat;
use super::writer::{interleave_pcm16, write_wav, HEADER_LEN};
use crate::buffer::PcmBuffer;
use crate::error::{AudioError, AudioResult};

/// An encoded 16-bit PCM WAV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavBlob {
    bytes: Vec<u8>,
    pcm_hash: String,
    channels: u16,
    sample_rate: u32,
    num_frames: usize,
}

impl WavBlob {
    /// Complete WAV file bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the blob, returning the file bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// BLAKE3 hex digest of the PCM payload (not the header).
    pub fn pcm_hash(&self) -> &str {
        &self.pcm_hash
    }

    /// Number of interleaved channels.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of sample frames.
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_frames as f64 / self.sample_rate as f64
    }
}

/// Encodes a buffer as a canonical 16-bit PCM WAV file.
///
/// # Errors
/// * [`AudioError::EmptyBuffer`] if the buffer has no frames.
/// * [`AudioError::Encoding`] if the channel count or data size cannot be
///   represented in the RIFF header fields.
pub fn encode_wav(buffer: &PcmBuffer) -> AudioResult<WavBlob> {
    buffer.ensure_not_empty()?;

    let channels = u16::try_from(buffer.channel_count())
        .ok()
        .filter(|&c| c <= u16::MAX / 2)
        .ok_or_else(|| {
            AudioError::encoding(format!(
                "{} channels cannot be described by a WAV header",
                buffer.channel_count()
            ))
        })?;
    let format = WavFormat::new(channels, buffer.sample_rate());

    let data_size = buffer.len() as u64 * format.block_align() as u64;
    if data_size > u64::from(u32::MAX) - 36 {
        return Err(AudioError::encoding(format!(
            "{} bytes of PCM data exceed the RIFF size limit",
            data_size
        )));
    }
    u32::try_from(u64::from(buffer.sample_rate()) * u64::from(format.block_align()))
        .map_err(|_| AudioError::encoding("byte rate overflows 32 bits"))?;

    let pcm = interleave_pcm16(buffer);
    let pcm_hash = blake3::hash(&pcm).to_hex().to_string();

    let mut bytes = Vec::with_capacity(HEADER_LEN + pcm.len());
    write_wav(&mut bytes, &format, &pcm).map_err(|e| AudioError::encoding(e.to_string()))?;

    debug!(
        channels,
        sample_rate = buffer.sample_rate(),
        frames = buffer.len(),
        bytes = bytes.len(),
        "encoded WAV"
    );

    Ok(WavBlob {
        bytes,
        pcm_hash,
        channels,
        sample_rate: buffer.sample_rate(),
        num_frames: buffer.len(),
    })
}
