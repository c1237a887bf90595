//! Local audio analysis.
//!
//! Summarises a buffer's loudness, pitch, tempo and timbre. All metrics are
//! deterministic and rounded to six decimal places so repeated runs produce
//! byte-identical JSON.

mod quality;
mod spectral;
mod temporal;
mod tempo;
mod types;


use tracing::debug;

pub use types::LocalAnalysisResult;

use crate::buffer::{amplitude_to_db, PcmBuffer};
use crate::error::AudioResult;
use crate::note::freq_to_name;
use crate::transcribe::{pitch_track, TranscriberConfig};

use quality::{
    calculate_clipping_percentage, calculate_dc_offset, calculate_peak, calculate_rms,
    calculate_silence_ratio,
};
use spectral::{mean_spectral_centroid, mean_spectral_flatness};
use temporal::{calculate_zero_crossing_rate, zcr_variation};
use tempo::estimate_bpm;

/// Precision for floating point values in output (6 decimal places).
const FLOAT_PRECISION: i32 = 6;

/// Round a float to the specified number of decimal places.
fn round_f64(value: f64, decimals: i32) -> f64 {
    let multiplier = 10_f64.powi(decimals);
    (value * multiplier).round() / multiplier
}

/// Median of the voiced per-frame pitch estimates, 0 when none.
fn dominant_frequency(mono: &[f32], sample_rate: u32, config: &TranscriberConfig) -> f64 {
    let mut frequencies: Vec<f64> = pitch_track(mono, sample_rate, config)
        .iter()
        .filter_map(|frame| frame.frequency.map(f64::from))
        .collect();

    if frequencies.is_empty() {
        return 0.0;
    }
    frequencies.sort_by(f64::total_cmp);
    let mid = frequencies.len() / 2;
    if frequencies.len() % 2 == 0 {
        (frequencies[mid - 1] + frequencies[mid]) / 2.0
    } else {
        frequencies[mid]
    }
}

/// Analyses a buffer.
///
/// # Errors
/// [`AudioError::EmptyBuffer`](crate::AudioError::EmptyBuffer) when the
/// buffer has no frames. Silence is not an error: it yields the -100 dB
/// floor, no pitch and a tempo of 0.
pub fn analyze_buffer(buffer: &PcmBuffer) -> AudioResult<LocalAnalysisResult> {
    buffer.ensure_not_empty()?;

    let sample_rate = buffer.sample_rate();
    let mono = buffer.to_mono();
    let config = TranscriberConfig::default();

    let rms = calculate_rms(&mono);
    let peak = calculate_peak(&mono) as f64;
    let silence_ratio = calculate_silence_ratio(&mono);

    let dominant = dominant_frequency(&mono, sample_rate, &config);
    let estimated_pitch = if dominant > 0.0 {
        freq_to_name(dominant)
    } else {
        None
    };

    let harmonic_richness = if silence_ratio >= 1.0 {
        0.0
    } else {
        let variation =
            zcr_variation(&mono, config.frame_size, config.hop_size, config.rms_threshold).min(1.0);
        let flatness =
            mean_spectral_flatness(&mono, config.frame_size, config.hop_size, config.rms_threshold);
        100.0 * (0.5 * variation + 0.5 * flatness).clamp(0.0, 1.0)
    };

    let result = LocalAnalysisResult {
        duration: round_f64(buffer.duration_seconds(), FLOAT_PRECISION),
        average_loudness: round_f64(amplitude_to_db(rms), FLOAT_PRECISION),
        peak_loudness: round_f64(amplitude_to_db(peak), FLOAT_PRECISION),
        dominant_frequency: round_f64(dominant, FLOAT_PRECISION),
        estimated_pitch,
        estimated_bpm: estimate_bpm(&mono, sample_rate),
        harmonic_richness: round_f64(harmonic_richness, FLOAT_PRECISION),
        clipping_percentage: round_f64(
            calculate_clipping_percentage(buffer.channels().iter().map(Vec::as_slice)),
            FLOAT_PRECISION,
        ),
        zero_crossing_rate: round_f64(calculate_zero_crossing_rate(&mono), FLOAT_PRECISION),
        spectral_centroid: round_f64(
            mean_spectral_centroid(
                &mono,
                sample_rate,
                config.frame_size,
                config.hop_size,
                config.rms_threshold,
            ),
            FLOAT_PRECISION,
        ),
        silence_ratio: round_f64(silence_ratio, FLOAT_PRECISION),
        dc_offset: round_f64(calculate_dc_offset(&mono), FLOAT_PRECISION),
    };

    debug!(
        duration = result.duration,
        bpm = result.estimated_bpm,
        pitch = result.estimated_pitch.as_deref().unwrap_or("-"),
        "analysed buffer"
    );
    Ok(result)
}
