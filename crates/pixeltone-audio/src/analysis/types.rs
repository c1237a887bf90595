//! Analysis result types.

use serde::{Deserialize, Serialize};

/// Summary statistics for a buffer.
///
/// Loudness values are in dBFS and never below -100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalAnalysisResult {
    /// Length in seconds.
    pub duration: f64,
    /// RMS level of the mono mix in dB.
    pub average_loudness: f64,
    /// Peak level of the mono mix in dB.
    pub peak_loudness: f64,
    /// Median fundamental over voiced frames in Hz, 0 when nothing is voiced.
    pub dominant_frequency: f64,
    /// Nearest note name for the dominant frequency, e.g. "A4".
    pub estimated_pitch: Option<String>,
    /// Tempo estimate, 0 when no steady pulse was found.
    pub estimated_bpm: u32,
    /// Timbral complexity score from 0 to 100.
    pub harmonic_richness: f64,
    /// Percentage of samples (all channels) at or above 0.999 full scale.
    pub clipping_percentage: f64,
    /// Sign changes per sample of the mono mix.
    pub zero_crossing_rate: f64,
    /// Spectral centre of mass in Hz.
    pub spectral_centroid: f64,
    /// Fraction of mono samples below the silence threshold.
    pub silence_ratio: f64,
    /// Mean of the mono mix.
    pub dc_offset: f64,
}
