//! LFO-modulated delay effects: chorus and vibrato.

use std::f32::consts::TAU;

use super::delay_line::DelayLine;

const CHORUS_BASE_DELAY_MS: f32 = 20.0;
const CHORUS_MAX_MOD_MS: f32 = 10.0;
const VIBRATO_MAX_MOD_MS: f32 = 5.0;

fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms / 1000.0 * sample_rate
}

/// Sums `voices` modulated delay taps with the dry signal.
///
/// Voices share one LFO rate with evenly spread phase offsets; each tap is
/// weighted `wet / voices` and the dry path `1 - wet`.
pub(crate) fn chorus(
    samples: &[f32],
    sample_rate: f32,
    rate: f32,
    depth: f32,
    voices: u8,
    wet: f32,
) -> Vec<f32> {
    let voices = voices.max(1);
    let base_delay = ms_to_samples(CHORUS_BASE_DELAY_MS, sample_rate);
    let max_mod = ms_to_samples(CHORUS_MAX_MOD_MS, sample_rate);
    let mut line = DelayLine::new((base_delay + max_mod).ceil() as usize + 2);

    let dry = 1.0 - wet;
    let voice_gain = wet / voices as f32;

    samples
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let t = i as f32 / sample_rate;
            let mut out = x * dry;
            for voice in 0..voices {
                let phase_offset = voice as f32 * TAU / voices as f32;
                let lfo = (TAU * rate * t + phase_offset).sin();
                let delay = base_delay + depth * max_mod * (lfo * 0.5 + 0.5);
                out += line.read_interpolated(delay) * voice_gain;
            }
            line.write(x);
            out
        })
        .collect()
}

/// Reads the signal through a sinusoidally modulated delay, fully wet.
pub(crate) fn vibrato(samples: &[f32], sample_rate: f32, rate: f32, depth: f32) -> Vec<f32> {
    let max_mod = ms_to_samples(VIBRATO_MAX_MOD_MS, sample_rate) * depth;
    let mut line = DelayLine::new(max_mod.ceil() as usize + 4);

    samples
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let t = i as f32 / sample_rate;
            let lfo = (TAU * rate * t).sin();
            let delay = 1.0 + max_mod * (lfo * 0.5 + 0.5);
            line.read_and_write(x, delay)
        })
        .collect()
}
