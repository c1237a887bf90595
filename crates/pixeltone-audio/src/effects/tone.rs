//! Filter-based tone shaping: bass boost, clarity and telephone.

use crate::buffer::db_to_gain;
use crate::filter::{filter_chain, BiquadFilter, OnePoleFilter};

const BUTTERWORTH_Q: f32 = 0.707;

const CLARITY_HIGHPASS_HZ: f32 = 2000.0;
const CLARITY_LOWPASS_HZ: f32 = 1000.0;

const TELEPHONE_LOW_HZ: f32 = 300.0;
const TELEPHONE_HIGH_HZ: f32 = 3400.0;
const TELEPHONE_DRIVE: f32 = 1.5;

/// Adds a one-pole low-passed copy back at `10^(dB/20) - 1`.
pub(crate) fn bass_boost(samples: &[f32], sample_rate: f32, gain_db: f32, cutoff: f32) -> Vec<f32> {
    let extra = (db_to_gain(gain_db as f64) - 1.0) as f32;
    let mut lowpass = OnePoleFilter::new(cutoff, sample_rate);
    samples
        .iter()
        .map(|&x| x + extra * lowpass.process(x))
        .collect()
}

/// Brightens (`level > 0`) or darkens (`level < 0`) the signal.
///
/// Positive levels add a 2 kHz high-passed copy scaled by the level; negative
/// levels crossfade toward a 1 kHz low-passed copy.
pub(crate) fn clarity(samples: &[f32], sample_rate: f32, level: f32) -> Vec<f32> {
    if level > 0.0 {
        let mut hp = BiquadFilter::highpass(CLARITY_HIGHPASS_HZ, BUTTERWORTH_Q, sample_rate);
        samples.iter().map(|&x| x + level * hp.process(x)).collect()
    } else if level < 0.0 {
        let amount = level.abs();
        let mut lp = BiquadFilter::lowpass(CLARITY_LOWPASS_HZ, BUTTERWORTH_Q, sample_rate);
        samples
            .iter()
            .map(|&x| (1.0 - amount) * x + amount * lp.process(x))
            .collect()
    } else {
        samples.to_vec()
    }
}

/// Normalised tanh saturation; unity drive is close to linear.
#[inline]
pub(crate) fn saturate(sample: f32, drive: f32) -> f32 {
    (sample * drive).tanh() / drive.tanh()
}

/// Band-limits to the 300-3400 Hz telephone band and adds mild drive.
pub(crate) fn telephone(samples: &[f32], sample_rate: f32) -> Vec<f32> {
    let band = filter_chain(
        samples,
        vec![
            BiquadFilter::highpass(TELEPHONE_LOW_HZ, BUTTERWORTH_Q, sample_rate),
            BiquadFilter::lowpass(TELEPHONE_HIGH_HZ, BUTTERWORTH_Q, sample_rate),
        ],
    );
    band.into_iter()
        .map(|s| saturate(s, TELEPHONE_DRIVE))
        .collect()
}
