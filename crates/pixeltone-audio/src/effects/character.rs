//! Character voices built from the primitive effects.

use std::f32::consts::TAU;

use rand::Rng;

use super::chorus::vibrato;
use super::pitch_shift::{granular_shift, semitones_to_ratio};
use super::tone::saturate;
use crate::bitcrush::{crush_samples, hold_factor, quantization_step};
use crate::filter::{filter_chain, BiquadFilter, DcBlocker};
use crate::rng::create_rng;

const BUTTERWORTH_Q: f32 = 0.707;

const MONSTER_LOWPASS_HZ: f32 = 1200.0;

const UNDERWATER_SHIFT_SEMITONES: f32 = -1.0;
const UNDERWATER_WOBBLE_HZ: f32 = 0.5;
const UNDERWATER_WOBBLE_DEPTH: f32 = 0.6;

const RADIO_LOW_HZ: f32 = 500.0;
const RADIO_HIGH_HZ: f32 = 3000.0;
const RADIO_DRIVE: f32 = 2.0;
const RADIO_HUM_HZ: f32 = 60.0;
const RADIO_HUM_LEVEL: f32 = 0.02;
const RADIO_HISS_LEVEL: f32 = 0.01;

const COMPUTER_RATE_HZ: u32 = 8000;
const COMPUTER_HUM_HZ: f32 = 50.0;
const COMPUTER_HUM_LEVEL: f32 = 0.01;

/// Continuous sine at `frequency`, used for mains hum.
fn hum(index: usize, sample_rate: f32, frequency: f32) -> f32 {
    (TAU * frequency * index as f32 / sample_rate).sin()
}

/// Strips any offset left by the low-pass chains.
fn block_dc(samples: Vec<f32>) -> Vec<f32> {
    let mut blocker = DcBlocker::default();
    samples.into_iter().map(|s| blocker.process(s)).collect()
}

/// Drops the pitch without changing length, then darkens above 1.2 kHz.
pub(crate) fn monster(samples: &[f32], sample_rate: f32, semitones: f32) -> Vec<f32> {
    let shifted = granular_shift(samples, sample_rate, semitones_to_ratio(semitones));
    block_dc(filter_chain(
        &shifted,
        vec![BiquadFilter::lowpass(MONSTER_LOWPASS_HZ, BUTTERWORTH_Q, sample_rate)],
    ))
}

/// Muffled, slightly flat and slowly wobbling.
pub(crate) fn underwater(samples: &[f32], sample_rate: f32, cutoff: f32) -> Vec<f32> {
    let muffled = filter_chain(
        samples,
        vec![
            BiquadFilter::lowpass(cutoff, BUTTERWORTH_Q, sample_rate),
            BiquadFilter::lowpass(cutoff, BUTTERWORTH_Q, sample_rate),
        ],
    );
    let flat = granular_shift(
        &muffled,
        sample_rate,
        semitones_to_ratio(UNDERWATER_SHIFT_SEMITONES),
    );
    block_dc(vibrato(
        &flat,
        sample_rate,
        UNDERWATER_WOBBLE_HZ,
        UNDERWATER_WOBBLE_DEPTH,
    ))
}

/// AM-radio band limit with saturation, mains hum and seeded hiss.
pub(crate) fn old_radio(samples: &[f32], sample_rate: f32, seed: u32) -> Vec<f32> {
    let band = filter_chain(
        samples,
        vec![
            BiquadFilter::highpass(RADIO_LOW_HZ, BUTTERWORTH_Q, sample_rate),
            BiquadFilter::lowpass(RADIO_HIGH_HZ, BUTTERWORTH_Q, sample_rate),
        ],
    );
    let mut rng = create_rng(seed);
    band.iter()
        .enumerate()
        .map(|(i, &s)| {
            let hiss = rng.gen_range(-1.0f32..=1.0) * RADIO_HISS_LEVEL;
            saturate(s, RADIO_DRIVE) + RADIO_HUM_LEVEL * hum(i, sample_rate, RADIO_HUM_HZ) + hiss
        })
        .collect()
}

/// Low-resolution 8 kHz sound with a 50 Hz hum and dither-like noise.
///
/// The noise spans a quarter of a quantisation step so it colours the
/// signal without changing the crushed levels much.
pub(crate) fn old_computer(samples: &[f32], sample_rate: f32, bits: u8, seed: u32) -> Vec<f32> {
    let step = quantization_step(bits);
    let hold = hold_factor(sample_rate as u32, COMPUTER_RATE_HZ);
    let crushed = crush_samples(samples, step, hold);

    let mut rng = create_rng(seed);
    crushed
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let noise = rng.gen_range(-1.0f32..=1.0) * step * 0.25;
            s + COMPUTER_HUM_LEVEL * hum(i, sample_rate, COMPUTER_HUM_HZ) + noise
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let t = i as f32 / 44100.0;
                0.4 * (TAU * 220.0 * t).sin() + 0.2 * (TAU * 2500.0 * t).sin()
            })
            .collect()
    }

    #[test]
    fn test_lengths_are_preserved() {
        let input = voice(8000);
        assert_eq!(monster(&input, 44100.0, -6.0).len(), 8000);
        assert_eq!(underwater(&input, 44100.0, 500.0).len(), 8000);
        assert_eq!(old_radio(&input, 44100.0, 1).len(), 8000);
        assert_eq!(old_computer(&input, 44100.0, 8, 1).len(), 8000);
    }

    #[test]
    fn test_seeded_noise_is_deterministic() {
        let input = voice(4000);
        assert_eq!(old_radio(&input, 44100.0, 7), old_radio(&input, 44100.0, 7));
        assert_ne!(old_radio(&input, 44100.0, 7), old_radio(&input, 44100.0, 8));
        assert_eq!(
            old_computer(&input, 44100.0, 4, 7),
            old_computer(&input, 44100.0, 4, 7)
        );
    }

    #[test]
    fn test_computer_crush_holds_runs() {
        let input = voice(600);
        let crushed = crush_samples(&input, quantization_step(8), hold_factor(44100, 8000));
        for run in crushed.chunks(6) {
            assert!(run.iter().all(|&s| s == run[0]));
        }
    }
}
