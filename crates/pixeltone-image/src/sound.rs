//! Image to sound-effect mapping.

use pixeltone_audio::{SoundEffectParameters, Waveform};
use tracing::debug;

use crate::color::Hsl;
use crate::pixels::PixelBuffer;

/// Widest grid the sound mapper averages over.
pub const SOUND_GRID_WIDTH: u32 = 100;
/// Volume of every mapped sound.
pub const SOUND_VOLUME: f64 = 0.5;

/// Waveform for a hue: one per 90-degree quadrant.
pub fn waveform_for_hue(hue: f64) -> Waveform {
    match hue.rem_euclid(360.0) {
        h if h < 90.0 => Waveform::Sine,
        h if h < 180.0 => Waveform::Square,
        h if h < 270.0 => Waveform::Sawtooth,
        _ => Waveform::Triangle,
    }
}

/// Base frequency for a lightness: 200 Hz (black) to 1 kHz (white).
pub fn base_frequency(lightness: f64) -> f64 {
    200.0 + 800.0 * lightness.clamp(0.0, 1.0)
}

/// Derives a swept tone from the image's average colour.
///
/// Hue picks the waveform, lightness the base frequency, and saturation both
/// the sweep width and the duration. Light images sweep up, dark ones down.
pub fn image_to_sound_params(image: &PixelBuffer) -> SoundEffectParameters {
    let (cols, rows) = image.fit_grid(image.width().min(SOUND_GRID_WIDTH), 1.0);
    let hsl = image.downsample(cols, rows).average().to_hsl();
    let params = sound_from_hsl(&hsl);
    debug!(
        hue = hsl.h,
        saturation = hsl.s,
        lightness = hsl.l,
        name = %params.name,
        "mapped image to sound"
    );
    params
}

fn sound_from_hsl(hsl: &Hsl) -> SoundEffectParameters {
    let waveform = waveform_for_hue(hsl.h);
    let saturation = hsl.s.clamp(0.0, 1.0);
    let start_freq = base_frequency(hsl.l);
    let end_freq = if hsl.l >= 0.5 {
        start_freq * (1.0 + saturation)
    } else {
        start_freq / (1.0 + saturation)
    };
    let label = match waveform {
        Waveform::Sine => "Sine",
        Waveform::Square => "Square",
        Waveform::Sawtooth => "Sawtooth",
        Waveform::Triangle => "Triangle",
    };

    SoundEffectParameters {
        name: format!("{} {}", hsl.family(), label),
        waveform,
        start_freq,
        end_freq,
        duration: 0.2 + 0.8 * saturation,
        volume: SOUND_VOLUME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hue_quadrants() {
        assert_eq!(waveform_for_hue(0.0), Waveform::Sine);
        assert_eq!(waveform_for_hue(89.9), Waveform::Sine);
        assert_eq!(waveform_for_hue(90.0), Waveform::Square);
        assert_eq!(waveform_for_hue(200.0), Waveform::Sawtooth);
        assert_eq!(waveform_for_hue(300.0), Waveform::Triangle);
        assert_eq!(waveform_for_hue(360.0), Waveform::Sine);
    }

    #[test]
    fn test_blue_image() {
        let image = PixelBuffer::filled(8, 8, [0, 0, 255, 255]).unwrap();
        let params = image_to_sound_params(&image);
        assert_eq!(params.name, "Blue Sawtooth");
        assert_eq!(params.waveform, Waveform::Sawtooth);
        assert!((params.start_freq - 600.0).abs() < 1e-9);
        assert!((params.end_freq - 1200.0).abs() < 1e-9);
        assert!((params.duration - 1.0).abs() < 1e-9);
        assert_eq!(params.volume, 0.5);
    }

    #[test]
    fn test_dark_image_sweeps_down() {
        let image = PixelBuffer::filled(4, 4, [64, 0, 0, 255]).unwrap();
        let params = image_to_sound_params(&image);
        assert_eq!(params.waveform, Waveform::Sine);
        assert!(params.end_freq < params.start_freq);
    }

    #[test]
    fn test_gray_image_is_flat_and_short() {
        let image = PixelBuffer::filled(300, 20, [128, 128, 128, 255]).unwrap();
        let params = image_to_sound_params(&image);
        assert_eq!(params.name, "Gray Sine");
        assert_eq!(params.start_freq, params.end_freq);
        assert!((params.duration - 0.2).abs() < 1e-9);
    }
}
