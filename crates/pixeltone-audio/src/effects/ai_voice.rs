//! Synthetic "AI voice" colouring.
//!
//! A deterministic heuristic: per-frame pitch is pulled toward the nearest
//! semitone, the result is lightly smoothed, and a first-order pre-emphasis
//! flattens the spectral tilt. Every stage scales with `intensity`, and an
//! intensity of zero returns the input.

use super::pitch_shift::overlap_add;
use crate::note::freq_to_midi_float;
use crate::pitch::{detect_pitch, frame_rms};

const ANALYSIS_FRAME: usize = 2048;
const SILENCE_RMS: f32 = 0.01;
const SMOOTHING: f32 = 0.5;
const PRE_EMPHASIS: f32 = 0.4;

/// Playback ratio that moves a frame's pitch `intensity` of the way to the
/// nearest semitone, or 1 when the frame is silent or unvoiced.
fn snap_ratio(samples: &[f32], center: usize, sample_rate: u32, intensity: f32) -> f32 {
    let half = ANALYSIS_FRAME / 2;
    let start = center.saturating_sub(half);
    let end = (start + ANALYSIS_FRAME).min(samples.len());
    let frame = &samples[start..end];
    if frame_rms(frame) < SILENCE_RMS {
        return 1.0;
    }

    detect_pitch(frame, sample_rate)
        .and_then(|est| freq_to_midi_float(est.frequency as f64))
        .map(|midi| {
            let correction = (midi.round() - midi) as f32 * intensity;
            2.0f32.powf(correction / 12.0)
        })
        .unwrap_or(1.0)
}

pub(crate) fn process(samples: &[f32], sample_rate: f32, intensity: f32) -> Vec<f32> {
    if intensity <= 0.0 {
        return samples.to_vec();
    }

    let tuned = overlap_add(samples, ANALYSIS_FRAME, |center| {
        snap_ratio(samples, center, sample_rate as u32, intensity)
    });

    // 3-tap smoothing blended by intensity
    let smooth_mix = SMOOTHING * intensity;
    let last = tuned.len().saturating_sub(1);
    let smoothed: Vec<f32> = (0..tuned.len())
        .map(|i| {
            let prev = tuned[i.saturating_sub(1)];
            let next = tuned[(i + 1).min(last)];
            let avg = 0.25 * prev + 0.5 * tuned[i] + 0.25 * next;
            (1.0 - smooth_mix) * tuned[i] + smooth_mix * avg
        })
        .collect();

    let coeff = PRE_EMPHASIS * intensity;
    let mut previous = 0.0f32;
    smoothed
        .iter()
        .map(|&s| {
            let y = s - coeff * previous;
            previous = s;
            y
        })
        .collect()
}
