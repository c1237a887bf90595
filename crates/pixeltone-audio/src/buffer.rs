//! Multi-channel floating point PCM buffers.
//!
//! A [`PcmBuffer`] is the unit every transform in this crate consumes and
//! produces. Channels are stored planar (one `Vec<f32>` per channel) and are
//! guaranteed to share the same length.

use serde::{Deserialize, Serialize};

use crate::error::{AudioError, AudioResult};

/// Lowest level reported by the decibel conversions.
pub const DB_FLOOR: f64 = -100.0;

/// Planar PCM audio with a fixed sample rate.
///
/// Deserialization runs the same checks as [`PcmBuffer::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPcmBuffer")]
pub struct PcmBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPcmBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl TryFrom<RawPcmBuffer> for PcmBuffer {
    type Error = AudioError;

    fn try_from(raw: RawPcmBuffer) -> AudioResult<Self> {
        PcmBuffer::new(raw.sample_rate, raw.channels)
    }
}

impl PcmBuffer {
    /// Creates a buffer from planar channel data.
    ///
    /// # Errors
    /// Fails with [`AudioError::InvalidParameter`] when the sample rate is zero,
    /// no channels are given, or the channels differ in length.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::invalid_param(
                "sample_rate",
                "must be greater than 0",
            ));
        }
        let Some(first) = channels.first() else {
            return Err(AudioError::invalid_param(
                "channels",
                "at least one channel is required",
            ));
        };
        let len = first.len();
        if let Some((index, channel)) = channels
            .iter()
            .enumerate()
            .find(|(_, channel)| channel.len() != len)
        {
            return Err(AudioError::invalid_param(
                "channels",
                format!(
                    "channel {} has {} samples, expected {}",
                    index,
                    channel.len(),
                    len
                ),
            ));
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Creates a single-channel buffer.
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> AudioResult<Self> {
        Self::new(sample_rate, vec![samples])
    }

    /// Creates a buffer by de-interleaving frame-ordered samples.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(
        sample_rate: u32,
        channel_count: usize,
        interleaved: &[f32],
    ) -> AudioResult<Self> {
        if channel_count == 0 {
            return Err(AudioError::invalid_param(
                "channels",
                "at least one channel is required",
            ));
        }
        let frames = interleaved.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in interleaved.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        Self::new(sample_rate, channels)
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of sample frames (samples per channel).
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Returns true when the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    /// Borrows one channel.
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Borrows all channels.
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Consumes the buffer, returning its channels.
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Iterates over every sample of every channel.
    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        self.channels.iter().flat_map(|channel| channel.iter().copied())
    }

    /// Fails with [`AudioError::EmptyBuffer`] when there is nothing to process.
    pub fn ensure_not_empty(&self) -> AudioResult<()> {
        if self.is_empty() {
            Err(AudioError::EmptyBuffer)
        } else {
            Ok(())
        }
    }

    /// Mixes all channels down to one by averaging.
    pub fn to_mono(&self) -> Vec<f32> {
        if self.channels.len() == 1 {
            return self.channels[0].clone();
        }
        let scale = 1.0 / self.channels.len() as f32;
        (0..self.len())
            .map(|i| self.channels.iter().map(|channel| channel[i]).sum::<f32>() * scale)
            .collect()
    }

    /// Builds a new buffer at the same sample rate by transforming each channel.
    ///
    /// The closure receives the channel index and its samples. Every call must
    /// return the same number of samples.
    pub(crate) fn map_channels<F>(&self, mut f: F) -> PcmBuffer
    where
        F: FnMut(usize, &[f32]) -> Vec<f32>,
    {
        let channels: Vec<Vec<f32>> = self
            .channels
            .iter()
            .enumerate()
            .map(|(index, channel)| f(index, channel))
            .collect();
        debug_assert!(channels.windows(2).all(|w| w[0].len() == w[1].len()));
        PcmBuffer {
            sample_rate: self.sample_rate,
            channels,
        }
    }

    /// Peak absolute sample value across all channels.
    pub fn peak(&self) -> f32 {
        self.samples().fold(0.0f32, |max, s| max.max(s.abs()))
    }

    /// Scales every channel down so the peak does not exceed `ceiling`.
    ///
    /// Returns true when the buffer was rescaled.
    pub fn normalize_peak(&mut self, ceiling: f32) -> bool {
        let peak = self.peak();
        if peak <= ceiling || peak == 0.0 {
            return false;
        }
        let gain = ceiling / peak;
        for sample in self.channels.iter_mut().flat_map(|c| c.iter_mut()) {
            *sample *= gain;
        }
        true
    }

    /// Clamps every sample into [-1.0, 1.0].
    pub fn clamp(&mut self) {
        for sample in self.channels.iter_mut().flat_map(|c| c.iter_mut()) {
            *sample = sample.clamp(-1.0, 1.0);
        }
    }
}

/// Converts a linear amplitude to decibels, floored at [`DB_FLOOR`].
pub fn amplitude_to_db(amplitude: f64) -> f64 {
    if amplitude > 0.0 {
        (20.0 * amplitude.log10()).max(DB_FLOOR)
    } else {
        DB_FLOOR
    }
}

/// Converts decibels to a linear gain factor.
pub fn db_to_gain(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}
