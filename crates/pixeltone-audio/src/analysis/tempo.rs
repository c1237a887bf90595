//! Onset-interval tempo estimation.

use crate::pitch::frame_rms;

const ENVELOPE_WINDOW: usize = 512;
const MIN_ONSET_SPACING_SECS: f64 = 0.1;
const MIN_ONSETS: usize = 4;
const MIN_CONFIDENCE: f64 = 0.25;
const BPM_MIN: f64 = 60.0;
const BPM_MAX: f64 = 180.0;
const BIN_RADIUS: i64 = 2;
const REFINE_RADIUS: f64 = 2.5;

/// Folds a tempo into the 60-180 BPM range by octaves.
fn fold_bpm(mut bpm: f64) -> f64 {
    while bpm < BPM_MIN {
        bpm *= 2.0;
    }
    while bpm > BPM_MAX {
        bpm /= 2.0;
    }
    bpm
}

/// Window indices of onsets in a positive-flux curve.
///
/// An onset is a local flux maximum above `mean + 0.5 * stddev`, at least
/// `min_spacing` windows after the previous one.
fn pick_onsets(flux: &[f64], min_spacing: usize) -> Vec<usize> {
    if flux.is_empty() {
        return Vec::new();
    }
    let mean = flux.iter().sum::<f64>() / flux.len() as f64;
    let std = (flux.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / flux.len() as f64).sqrt();
    let threshold = mean + 0.5 * std;

    let mut onsets: Vec<usize> = Vec::new();
    for i in 0..flux.len() {
        let value = flux[i];
        if value <= threshold || value <= 0.0 {
            continue;
        }
        let rising = i == 0 || value >= flux[i - 1];
        let falling = i + 1 == flux.len() || value >= flux[i + 1];
        if !(rising && falling) {
            continue;
        }
        if onsets.last().map_or(true, |&last| i - last >= min_spacing) {
            onsets.push(i);
        }
    }
    onsets
}

/// Estimates tempo in BPM, or 0 without a confident pulse.
pub(super) fn estimate_bpm(samples: &[f32], sample_rate: u32) -> u32 {
    let window_secs = ENVELOPE_WINDOW as f64 / sample_rate as f64;
    let envelope: Vec<f64> = samples
        .chunks(ENVELOPE_WINDOW)
        .map(|chunk| frame_rms(chunk) as f64)
        .collect();
    if envelope.len() < 2 {
        return 0;
    }

    let flux: Vec<f64> = std::iter::once(0.0)
        .chain(envelope.windows(2).map(|w| (w[1] - w[0]).max(0.0)))
        .collect();

    let min_spacing = (MIN_ONSET_SPACING_SECS / window_secs).ceil() as usize;
    let onsets = pick_onsets(&flux, min_spacing.max(1));
    if onsets.len() < MIN_ONSETS {
        return 0;
    }

    let tempos: Vec<f64> = onsets
        .windows(2)
        .map(|w| fold_bpm(60.0 / ((w[1] - w[0]) as f64 * window_secs)))
        .collect();

    // Each interval votes for every 1-BPM bin within ±2 of its tempo
    let mut histogram = [0usize; (BPM_MAX - BPM_MIN) as usize + 1];
    for &bpm in &tempos {
        let center = bpm.round() as i64;
        for bin in (center - BIN_RADIUS)..=(center + BIN_RADIUS) {
            let index = usize::try_from(bin - BPM_MIN as i64).ok();
            if let Some(slot) = index.and_then(|i| histogram.get_mut(i)) {
                *slot += 1;
            }
        }
    }
    let Some((best_bin, &votes)) = histogram
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
    else {
        return 0;
    };
    if (votes as f64) < MIN_CONFIDENCE * tempos.len() as f64 {
        return 0;
    }

    let winner = BPM_MIN + best_bin as f64;
    let near: Vec<f64> = tempos
        .iter()
        .copied()
        .filter(|bpm| (bpm - winner).abs() <= REFINE_RADIUS)
        .collect();
    if near.is_empty() {
        return winner.round() as u32;
    }
    (near.iter().sum::<f64>() / near.len() as f64).round() as u32
}
