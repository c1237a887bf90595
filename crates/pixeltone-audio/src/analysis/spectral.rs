//! FFT-based spectral metrics, averaged over Hann-windowed frames.

use rustfft::{num_complex::Complex, FftPlanner};

use crate::pitch::frame_rms;

fn hann(i: usize, size: usize) -> f32 {
    0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / size as f32).cos())
}

/// Runs `metric` over the magnitude spectrum (bins 1 up to Nyquist) of every
/// frame at or above `rms_floor` and returns the mean, 0 when no frame
/// qualifies. A buffer shorter than one frame is zero-padded.
fn mean_over_frames<F>(
    samples: &[f32],
    fft_size: usize,
    hop: usize,
    rms_floor: f32,
    mut metric: F,
) -> f64
where
    F: FnMut(&[f64]) -> f64,
{
    let fft_size = fft_size.max(4);
    let hop = hop.max(1);
    let fft = FftPlanner::<f32>::new().plan_fft_forward(fft_size);
    let frame_count = if samples.len() <= fft_size {
        1
    } else {
        1 + (samples.len() - fft_size) / hop
    };

    let mut buffer = vec![Complex::new(0.0f32, 0.0); fft_size];
    let mut magnitudes = vec![0.0f64; fft_size / 2 - 1];
    let mut total = 0.0;
    let mut counted = 0usize;

    for frame in 0..frame_count {
        let start = frame * hop;
        let end = (start + fft_size).min(samples.len());
        let window = &samples[start..end];
        if frame_rms(window) < rms_floor {
            continue;
        }

        for (i, slot) in buffer.iter_mut().enumerate() {
            let s = window.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(s * hann(i, fft_size), 0.0);
        }
        fft.process(&mut buffer);
        for (m, c) in magnitudes.iter_mut().zip(&buffer[1..fft_size / 2]) {
            *m = c.norm() as f64;
        }

        total += metric(&magnitudes);
        counted += 1;
    }

    if counted == 0 {
        0.0
    } else {
        total / counted as f64
    }
}

/// Mean magnitude-weighted frequency across frames, in Hz.
pub(super) fn mean_spectral_centroid(
    samples: &[f32],
    sample_rate: u32,
    fft_size: usize,
    hop: usize,
    rms_floor: f32,
) -> f64 {
    let bin_hz = sample_rate as f64 / fft_size.max(4) as f64;
    mean_over_frames(samples, fft_size, hop, rms_floor, |magnitudes| {
        let (weighted, sum) = magnitudes
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(w, s), (i, &m)| (w + (i + 1) as f64 * bin_hz * m, s + m));
        if sum > 0.0 {
            weighted / sum
        } else {
            0.0
        }
    })
}

/// Mean spectral flatness (geometric over arithmetic mean of the power
/// spectrum), in [0, 1].
pub(super) fn mean_spectral_flatness(
    samples: &[f32],
    fft_size: usize,
    hop: usize,
    rms_floor: f32,
) -> f64 {
    mean_over_frames(samples, fft_size, hop, rms_floor, |magnitudes| {
        let count = magnitudes.len() as f64;
        let (log_sum, sum) = magnitudes.iter().fold((0.0, 0.0), |(l, s), &m| {
            let power = m * m + 1e-12;
            (l + power.ln(), s + power)
        });
        ((log_sum / count).exp() / (sum / count)).clamp(0.0, 1.0)
    })
}
