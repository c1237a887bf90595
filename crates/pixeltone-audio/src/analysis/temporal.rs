//! Zero-crossing statistics.

use crate::pitch::{frame_rms, zero_crossings};

/// Calculate zero crossing rate.
pub(super) fn calculate_zero_crossing_rate(samples: &[f32]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    zero_crossings(samples) as f64 / (samples.len() - 1) as f64
}

/// Coefficient of variation of the per-frame zero crossing rate.
///
/// Only frames with an RMS of at least `rms_floor` take part. Fewer than two
/// such frames, or a zero mean, give 0.
pub(super) fn zcr_variation(samples: &[f32], frame: usize, hop: usize, rms_floor: f32) -> f64 {
    if samples.len() < frame || frame < 2 {
        return 0.0;
    }
    let rates: Vec<f64> = (0..=(samples.len() - frame) / hop)
        .map(|i| &samples[i * hop..i * hop + frame])
        .filter(|window| frame_rms(window) >= rms_floor)
        .map(calculate_zero_crossing_rate)
        .collect();
    if rates.len() < 2 {
        return 0.0;
    }

    let mean = rates.iter().sum::<f64>() / rates.len() as f64;
    if mean <= 0.0 {
        return 0.0;
    }
    let variance = rates.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / rates.len() as f64;
    variance.sqrt() / mean
}
