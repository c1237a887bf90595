//! Pitch shifting by resampling and by overlap-added grains.

use std::f32::consts::TAU;

/// Grain length used by the length-preserving shifter.
const GRAIN_MS: f32 = 50.0;

/// Frequency ratio for a shift in semitones.
pub fn semitones_to_ratio(semitones: f32) -> f32 {
    2.0f32.powf(semitones / 12.0)
}

/// Linear interpolation at a fractional index, holding the last sample past the end.
#[inline]
fn sample_at(samples: &[f32], position: f64) -> f32 {
    let last = samples.len() - 1;
    if position <= 0.0 {
        return samples[0];
    }
    let index = position.floor() as usize;
    if index >= last {
        return samples[last];
    }
    let frac = (position - index as f64) as f32;
    samples[index] * (1.0 - frac) + samples[index + 1] * frac
}

/// Resamples by `ratio` with linear interpolation.
///
/// Raising the pitch shortens the signal: the output has `ceil(len / ratio)`
/// samples.
pub(crate) fn resample(samples: &[f32], ratio: f32) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }
    let ratio = ratio as f64;
    let out_len = (samples.len() as f64 / ratio).ceil() as usize;
    (0..out_len)
        .map(|i| sample_at(samples, i as f64 * ratio))
        .collect()
}

/// Periodic Hann window, which sums to one at 50% overlap.
pub(crate) fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 - 0.5 * (TAU * i as f32 / size as f32).cos())
        .collect()
}

/// Grain length in samples for a sample rate, kept even.
pub(crate) fn grain_length(sample_rate: f32) -> usize {
    ((GRAIN_MS / 1000.0 * sample_rate) as usize).max(4) & !1
}

/// Overlap-adds Hann-windowed grains, each read at its own speed.
///
/// Grains start every half grain (the first one half a grain before the
/// buffer) and read the input around their own centre, so the output keeps
/// the input's length and timing. `ratio_at` receives each grain's centre
/// sample and returns its playback ratio. The sum is normalised by the
/// accumulated window weight; samples no grain reached keep their input value.
pub(crate) fn overlap_add<F>(samples: &[f32], grain: usize, mut ratio_at: F) -> Vec<f32>
where
    F: FnMut(usize) -> f32,
{
    let n = samples.len();
    if n == 0 {
        return Vec::new();
    }
    let grain = grain.max(4) & !1;
    let hop = grain / 2;
    let half = hop as f64;
    let window = hann_window(grain);

    let mut out = vec![0.0f32; n];
    let mut weight = vec![0.0f32; n];
    let mut start = -(hop as isize);
    while start < n as isize {
        let center = start as f64 + half;
        let ratio = ratio_at((center.max(0.0) as usize).min(n - 1)) as f64;
        for (i, &w) in window.iter().enumerate() {
            let out_idx = start + i as isize;
            if out_idx < 0 || out_idx as usize >= n {
                continue;
            }
            let read_pos = center + (i as f64 - half) * ratio;
            if read_pos < 0.0 || read_pos > (n - 1) as f64 {
                continue;
            }
            out[out_idx as usize] += sample_at(samples, read_pos) * w;
            weight[out_idx as usize] += w;
        }
        start += hop as isize;
    }

    for ((o, &w), &x) in out.iter_mut().zip(&weight).zip(samples) {
        if w > 1e-3 {
            *o /= w;
        } else {
            *o = x;
        }
    }
    out
}

/// Shifts pitch by `ratio` without changing the length.
pub(crate) fn granular_shift(samples: &[f32], sample_rate: f32, ratio: f32) -> Vec<f32> {
    overlap_add(samples, grain_length(sample_rate), |_| ratio)
}
