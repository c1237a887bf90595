//! Monophonic pitch estimation.
//!
//! A zero-crossing count gives a coarse period guess. Upper harmonics only
//! ever add crossings, so the guess bounds the period from below: the
//! normalised autocorrelation is searched from half that lag up to the
//! longest period allowed. The first correlation peak within 90% of the best
//! one wins, so harmonic and subharmonic errors on harmonic-rich input are
//! avoided, and a parabola through the peak gives a sub-sample lag.

use serde::{Deserialize, Serialize};

/// Result of pitch detection on one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchEstimate {
    /// Estimated fundamental frequency in Hz.
    pub frequency: f32,
    /// Normalised autocorrelation at the chosen lag, in [0, 1].
    pub confidence: f32,
}

/// Search limits for [`detect_pitch_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PitchSearch {
    /// Lowest detectable frequency in Hz.
    pub min_frequency: f32,
    /// Highest detectable frequency in Hz.
    pub max_frequency: f32,
    /// Frames whose best correlation falls below this are unvoiced.
    pub min_confidence: f32,
}

impl Default for PitchSearch {
    fn default() -> Self {
        Self {
            min_frequency: 50.0,
            max_frequency: 2000.0,
            min_confidence: 0.5,
        }
    }
}

/// Root mean square of a frame.
pub fn frame_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum / samples.len() as f64).sqrt() as f32
}

/// Number of sign changes between adjacent samples.
pub fn zero_crossings(samples: &[f32]) -> usize {
    samples
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count()
}

/// Correlation of a frame with itself shifted by `lag`, normalised to [-1, 1].
fn normalized_autocorrelation(samples: &[f32], lag: usize) -> f64 {
    let n = samples.len();
    if lag >= n {
        return 0.0;
    }
    let (mut dot, mut energy_a, mut energy_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&a, &b) in samples[..n - lag].iter().zip(&samples[lag..]) {
        let (a, b) = (a as f64, b as f64);
        dot += a * b;
        energy_a += a * a;
        energy_b += b * b;
    }
    let denom = (energy_a * energy_b).sqrt();
    if denom > 0.0 {
        dot / denom
    } else {
        0.0
    }
}

/// Estimates the fundamental of a frame with the default 50-2000 Hz search.
pub fn detect_pitch(samples: &[f32], sample_rate: u32) -> Option<PitchEstimate> {
    detect_pitch_with(samples, sample_rate, &PitchSearch::default())
}

/// Estimates the fundamental of a frame.
///
/// Returns `None` for silent frames, frames too short to hold two periods of
/// the lowest frequency searched, and frames whose correlation is below
/// `search.min_confidence`.
pub fn detect_pitch_with(
    samples: &[f32],
    sample_rate: u32,
    search: &PitchSearch,
) -> Option<PitchEstimate> {
    let n = samples.len();
    let sr = sample_rate as f64;
    if n < 4 || sample_rate == 0 || search.max_frequency <= search.min_frequency {
        return None;
    }
    if samples.iter().all(|&s| s == 0.0) {
        return None;
    }

    let min_lag = ((sr / search.max_frequency as f64).floor() as usize).max(2);
    let max_lag = ((sr / search.min_frequency as f64).ceil() as usize).min(n / 2);
    if max_lag < min_lag + 2 {
        return None;
    }

    // The zero-crossing lag is a lower bound on the period, never an upper one
    let mean = samples.iter().map(|&s| s as f64).sum::<f64>() / n as f64;
    let crossings = samples
        .windows(2)
        .filter(|w| (w[0] as f64 >= mean) != (w[1] as f64 >= mean))
        .count();
    let lo = if crossings > 0 {
        let zcr_freq = crossings as f64 * sr / (2.0 * (n - 1) as f64);
        let seed = ((sr / zcr_freq * 0.5).floor() as usize).max(min_lag);
        if max_lag >= seed + 2 {
            seed
        } else {
            min_lag
        }
    } else {
        min_lag
    };
    let hi = max_lag;

    let corr: Vec<f64> = (lo..=hi)
        .map(|lag| normalized_autocorrelation(samples, lag))
        .collect();
    let (best_idx, best) = corr
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::MIN), |acc, (i, c)| if c > acc.1 { (i, c) } else { acc });

    // Skip the lobe around zero lag so its falling edge is never taken as a peak
    let start = (1..corr.len())
        .find(|&k| corr[k] > corr[k - 1])
        .unwrap_or(corr.len());
    let threshold = best * 0.9;
    let is_peak =
        |k: usize| corr[k] >= corr[k - 1] && (k + 1 == corr.len() || corr[k] >= corr[k + 1]);
    let chosen = (start..corr.len())
        .find(|&k| corr[k] >= threshold && is_peak(k))
        .unwrap_or(best_idx);

    let confidence = corr[chosen].clamp(0.0, 1.0) as f32;
    if confidence < search.min_confidence {
        return None;
    }

    // Parabolic interpolation for sub-sample accuracy
    let offset = if chosen > 0 && chosen + 1 < corr.len() {
        let (alpha, beta, gamma) = (corr[chosen - 1], corr[chosen], corr[chosen + 1]);
        let denom = alpha - 2.0 * beta + gamma;
        if denom.abs() > 1e-12 {
            (0.5 * (alpha - gamma) / denom).clamp(-0.5, 0.5)
        } else {
            0.0
        }
    } else {
        0.0
    };

    let lag = (lo + chosen) as f64 + offset;
    Some(PitchEstimate {
        frequency: (sr / lag) as f32,
        confidence,
    })
}
