//! Time-domain IIR filters used by the effect engine.
//!
//! Biquad coefficients follow the Audio EQ Cookbook formulas; band limits
//! are built by chaining a high-pass and a low-pass with [`filter_chain`].
//! The one-pole filters are simple RC sections for smoothing and gentle tone
//! shaping.

use std::f32::consts::PI;

/// Biquad filter coefficients, normalised by `a0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoeffs {
    /// Creates lowpass filter coefficients.
    ///
    /// # Arguments
    /// * `cutoff` - Cutoff frequency in Hz
    /// * `q` - Q factor, 0.707 is Butterworth
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn lowpass(cutoff: f32, q: f32, sample_rate: f32) -> Self {
        let (cos_omega, alpha) = Self::prewarp(cutoff, q, sample_rate);

        let b0 = (1.0 - cos_omega) / 2.0;
        let b1 = 1.0 - cos_omega;
        let b2 = (1.0 - cos_omega) / 2.0;
        Self::normalise(b0, b1, b2, 1.0 + alpha, -2.0 * cos_omega, 1.0 - alpha)
    }

    /// Creates highpass filter coefficients.
    pub fn highpass(cutoff: f32, q: f32, sample_rate: f32) -> Self {
        let (cos_omega, alpha) = Self::prewarp(cutoff, q, sample_rate);

        let b0 = (1.0 + cos_omega) / 2.0;
        let b1 = -(1.0 + cos_omega);
        let b2 = (1.0 + cos_omega) / 2.0;
        Self::normalise(b0, b1, b2, 1.0 + alpha, -2.0 * cos_omega, 1.0 - alpha)
    }

    fn prewarp(frequency: f32, q: f32, sample_rate: f32) -> (f32, f32) {
        // Keep the corner below Nyquist and Q away from zero
        let frequency = frequency.clamp(1.0, sample_rate * 0.49);
        let q = q.max(0.5);
        let omega = 2.0 * PI * frequency / sample_rate;
        (omega.cos(), omega.sin() / (2.0 * q))
    }

    fn normalise(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Self {
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// Direct form I biquad.
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    coeffs: BiquadCoeffs,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl BiquadFilter {
    /// Creates a new biquad filter with the given coefficients.
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Creates a lowpass filter.
    pub fn lowpass(cutoff: f32, q: f32, sample_rate: f32) -> Self {
        Self::new(BiquadCoeffs::lowpass(cutoff, q, sample_rate))
    }

    /// Creates a highpass filter.
    pub fn highpass(cutoff: f32, q: f32, sample_rate: f32) -> Self {
        Self::new(BiquadCoeffs::highpass(cutoff, q, sample_rate))
    }

    /// Processes a single sample through the filter.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2
            - c.a1 * self.y1
            - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }
}

/// One-pole lowpass filter (simple RC filter).
#[derive(Debug, Clone)]
pub struct OnePoleFilter {
    a0: f32,
    b1: f32,
    y1: f32,
}

impl OnePoleFilter {
    /// Creates a new one-pole lowpass filter.
    ///
    /// # Arguments
    /// * `cutoff` - Cutoff frequency in Hz
    /// * `sample_rate` - Audio sample rate in Hz
    pub fn new(cutoff: f32, sample_rate: f32) -> Self {
        let b1 = (-2.0 * PI * cutoff / sample_rate).exp();
        Self {
            a0: 1.0 - b1,
            b1,
            y1: 0.0,
        }
    }

    /// Processes a single sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.y1 = self.a0 * input + self.b1 * self.y1;
        self.y1
    }
}

/// First-order DC blocker: `y[n] = x[n] - x[n-1] + r * y[n-1]`.
#[derive(Debug, Clone)]
pub struct DcBlocker {
    pole: f32,
    x1: f32,
    y1: f32,
}

impl DcBlocker {
    /// Pole radius giving a corner of roughly 35 Hz at 44.1 kHz.
    pub const DEFAULT_POLE: f32 = 0.995;

    pub fn new(pole: f32) -> Self {
        Self {
            pole: pole.clamp(0.0, 0.9999),
            x1: 0.0,
            y1: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = input - self.x1 + self.pole * self.y1;
        self.x1 = input;
        self.y1 = output;
        output
    }
}

impl Default for DcBlocker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_POLE)
    }
}

/// Runs `samples` through a fresh chain of biquads.
pub fn filter_chain(samples: &[f32], mut stages: Vec<BiquadFilter>) -> Vec<f32> {
    samples
        .iter()
        .map(|&s| stages.iter_mut().fold(s, |acc, stage| stage.process(acc)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate).sin())
            .collect()
    }

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn test_lowpass_attenuates_highs() {
        let sr = 44100.0;
        let low =
            filter_chain(&sine(100.0, sr, 8820), vec![BiquadFilter::lowpass(500.0, 0.707, sr)]);
        let high =
            filter_chain(&sine(8000.0, sr, 8820), vec![BiquadFilter::lowpass(500.0, 0.707, sr)]);
        assert!(rms(&low[4410..]) > 0.6);
        assert!(rms(&high[4410..]) < 0.05);
    }

    #[test]
    fn test_highpass_attenuates_lows() {
        let sr = 44100.0;
        let low =
            filter_chain(&sine(100.0, sr, 8820), vec![BiquadFilter::highpass(2000.0, 0.707, sr)]);
        assert!(rms(&low[4410..]) < 0.05);
    }

    #[test]
    fn test_chained_band_limit_keeps_the_middle() {
        let sr = 44100.0;
        let band = |freq: f32| {
            let stages = vec![
                BiquadFilter::highpass(300.0, 0.707, sr),
                BiquadFilter::lowpass(3400.0, 0.707, sr),
            ];
            rms(&filter_chain(&sine(freq, sr, 8820), stages)[4410..])
        };
        assert!(band(1000.0) > 0.6);
        assert!(band(50.0) < 0.05);
        assert!(band(15000.0) < 0.05);
    }

    #[test]
    fn test_one_pole_passes_dc() {
        let mut lp = OnePoleFilter::new(100.0, 44100.0);
        let mut last = 0.0;
        for _ in 0..44100 {
            last = lp.process(1.0);
        }
        assert!((last - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_dc_blocker_removes_offset() {
        let mut blocker = DcBlocker::default();
        let out: Vec<f32> = sine(440.0, 44100.0, 44100)
            .iter()
            .map(|s| blocker.process(s * 0.5 + 0.3))
            .collect();
        let tail = &out[22050..];
        let mean = tail.iter().sum::<f32>() / tail.len() as f32;
        assert!(mean.abs() < 0.01, "mean {}", mean);
        assert!(rms(tail) > 0.3);
    }

    #[test]
    fn test_cutoff_above_nyquist_stays_stable() {
        let lp = BiquadFilter::lowpass(30000.0, 0.707, 8000.0);
        let out = filter_chain(&sine(1000.0, 8000.0, 4000), vec![lp]);
        assert!(out.iter().all(|s| s.is_finite() && s.abs() < 4.0));
    }
}
