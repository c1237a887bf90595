//! Level and quality metrics.

/// Samples at or above this magnitude count as clipped.
pub(super) const CLIPPING_THRESHOLD: f32 = 0.999;
/// Samples below this magnitude count as silent.
pub(super) const SILENCE_THRESHOLD: f32 = 0.001;

/// Largest absolute sample.
pub(super) fn calculate_peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0f32, |max, s| max.max(s))
}

/// Root mean square level, accumulated in f64.
pub(super) fn calculate_rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let energy: f64 = samples.iter().map(|&s| f64::from(s).powi(2)).sum();
    (energy / samples.len() as f64).sqrt()
}

/// Percentage of samples at or near full scale.
pub(super) fn calculate_clipping_percentage<'a, I>(samples: I) -> f64
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let (clipped, total) = samples
        .into_iter()
        .fold((0usize, 0usize), |(clipped, total), channel| {
            let hits = channel
                .iter()
                .filter(|s| s.abs() >= CLIPPING_THRESHOLD)
                .count();
            (clipped + hits, total + channel.len())
        });
    if total == 0 {
        0.0
    } else {
        clipped as f64 * 100.0 / total as f64
    }
}

/// Mean sample value.
pub(super) fn calculate_dc_offset(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().copied().map(f64::from).sum::<f64>() / samples.len() as f64
}

/// Fraction of samples under [`SILENCE_THRESHOLD`]; 1.0 for no samples.
pub(super) fn calculate_silence_ratio(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 1.0;
    }
    let silent = samples
        .iter()
        .filter(|s| s.abs() < SILENCE_THRESHOLD)
        .count();
    silent as f64 / samples.len() as f64
}
