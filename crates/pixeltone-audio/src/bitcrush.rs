//! Bit-depth and sample-rate reduction.

use tracing::debug;

use crate::buffer::PcmBuffer;
use crate::error::{AudioError, AudioResult};

/// Quantisation step for a bit depth: `1 / 2^(bits - 1)`.
pub fn quantization_step(bit_depth: u8) -> f32 {
    1.0 / (1u32 << (bit_depth.saturating_sub(1))) as f32
}

/// Number of source samples each held value spans, never less than one.
pub fn hold_factor(sample_rate: u32, target_sample_rate: u32) -> usize {
    let ratio = sample_rate as f64 / target_sample_rate.max(1) as f64;
    (ratio.round() as usize).max(1)
}

/// Quantizes a sample to the nearest multiple of `step`, clipped to [-1, 1].
#[inline]
fn quantize(sample: f32, step: f32) -> f32 {
    ((sample / step).round() * step).clamp(-1.0, 1.0)
}

/// Quantizes and sample-and-holds one channel.
///
/// Each run of `hold` samples takes the quantised value of its first sample.
pub(crate) fn crush_samples(samples: &[f32], step: f32, hold: usize) -> Vec<f32> {
    let hold = hold.max(1);
    let mut output = Vec::with_capacity(samples.len());
    for run in samples.chunks(hold) {
        let held = quantize(run[0], step);
        output.extend(std::iter::repeat(held).take(run.len()));
    }
    output
}

/// Reduces bit depth and effective sample rate of a buffer.
///
/// The output keeps the input's length, channel count and sample rate; the
/// lower rate is emulated by holding values.
///
/// # Arguments
/// * `buffer` - Input audio
/// * `bit_depth` - Target resolution in bits (1-16)
/// * `target_sample_rate` - Emulated sample rate in Hz (> 0)
///
/// # Errors
/// * [`AudioError::EmptyBuffer`] if the buffer has no frames.
/// * [`AudioError::InvalidParameter`] if `bit_depth` is outside 1-16 or the
///   target rate is zero.
pub fn apply_bitcrusher(
    buffer: &PcmBuffer,
    bit_depth: u8,
    target_sample_rate: u32,
) -> AudioResult<PcmBuffer> {
    buffer.ensure_not_empty()?;
    if !(1..=16).contains(&bit_depth) {
        return Err(AudioError::invalid_param(
            "bit_depth",
            format!("must be 1-16, got {}", bit_depth),
        ));
    }
    if target_sample_rate == 0 {
        return Err(AudioError::invalid_param(
            "target_sample_rate",
            "must be greater than 0",
        ));
    }

    let step = quantization_step(bit_depth);
    let hold = hold_factor(buffer.sample_rate(), target_sample_rate);
    debug!(bit_depth, target_sample_rate, hold, "bitcrush");

    Ok(buffer.map_channels(|_, samples| crush_samples(samples, step, hold)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| (i as f32 / len as f32) * 2.0 - 1.0).collect()
    }

    #[test]
    fn test_quantization_step() {
        assert_eq!(quantization_step(1), 1.0);
        assert_eq!(quantization_step(2), 0.5);
        assert_eq!(quantization_step(16), 1.0 / 32768.0);
    }

    #[test]
    fn test_hold_factor() {
        assert_eq!(hold_factor(44100, 44100), 1);
        assert_eq!(hold_factor(44100, 8000), 6);
        assert_eq!(hold_factor(8000, 44100), 1);
    }

    #[test]
    fn test_sample_and_hold_takes_first_of_run() {
        let out = crush_samples(&[0.1, 0.9, -0.9, 0.5, 0.2], 1.0 / 128.0, 2);
        assert_eq!(out.len(), 5);
        assert_eq!(out[0], out[1]);
        assert_eq!(out[2], out[3]);
        assert!((out[0] - 0.1).abs() <= 1.0 / 256.0);
        assert!((out[2] + 0.9).abs() <= 1.0 / 256.0);
        assert!((out[4] - 0.2).abs() <= 1.0 / 256.0);
    }

    #[test]
    fn test_one_bit_produces_ternary_levels() {
        let buffer = PcmBuffer::mono(8000, ramp(400)).unwrap();
        let out = apply_bitcrusher(&buffer, 1, 8000).unwrap();
        assert!(out
            .samples()
            .all(|s| s == 0.0 || s.abs() == 1.0));
    }

    #[test]
    fn test_preserves_shape() {
        let buffer = PcmBuffer::new(44100, vec![ramp(1000), ramp(1000)]).unwrap();
        let out = apply_bitcrusher(&buffer, 4, 11025).unwrap();
        assert_eq!(out.len(), 1000);
        assert_eq!(out.channel_count(), 2);
        assert_eq!(out.sample_rate(), 44100);
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let buffer = PcmBuffer::mono(44100, vec![0.0; 10]).unwrap();
        assert!(matches!(
            apply_bitcrusher(&buffer, 0, 8000),
            Err(AudioError::InvalidParameter { .. })
        ));
        assert!(matches!(
            apply_bitcrusher(&buffer, 17, 8000),
            Err(AudioError::InvalidParameter { .. })
        ));
        assert!(matches!(
            apply_bitcrusher(&buffer, 8, 0),
            Err(AudioError::InvalidParameter { .. })
        ));

        let empty = PcmBuffer::mono(44100, vec![]).unwrap();
        assert_eq!(apply_bitcrusher(&empty, 8, 8000), Err(AudioError::EmptyBuffer));
    }
}
