//! Image to song mapping.
//!
//! The image is reduced to a square grid; each column becomes one step of
//! a four-track song (melody, harmony, bass, percussion).

use pixeltone_audio::note::midi_to_name;
use pixeltone_audio::{ComposedSong, Instrument, Track};
use tracing::debug;

use crate::color::Rgb;
use crate::error::{ImageError, ImageResult};
use crate::pixels::PixelBuffer;
use crate::sound::waveform_for_hue;

/// Largest number of steps [`image_to_song`] accepts.
pub const MAX_STEPS: u32 = 256;

/// Semitone offsets of the major scale.
const MAJOR_SCALE: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];
/// Scale degrees in the two-octave melody range.
const MELODY_DEGREES: usize = 14;
/// Harmony sits this many scale degrees above the melody.
const HARMONY_INTERVAL: usize = 2;
/// Bass plays on every n-th step.
const BASS_EVERY: usize = 4;
const BASS_OCTAVE: i32 = 2;

const REST_LIGHTNESS: f64 = 0.1;
const HARMONY_MIN_SATURATION: f64 = 0.15;
const BASS_MIN_BLUE: f64 = 0.2;
const PERCUSSION_MIN_VARIANCE: f64 = 0.01;
const PERCUSSION_NOTE: &str = "C2";

/// Note name for a degree of C major above C in `octave`.
fn scale_note(octave: i32, degree: usize) -> String {
    let octave = octave + (degree / MAJOR_SCALE.len()) as i32;
    let midi = 12 * (octave + 1) + MAJOR_SCALE[degree % MAJOR_SCALE.len()];
    midi_to_name(midi)
}

/// Melody octave for a lightness: 3, 4 or 5.
fn melody_octave(lightness: f64) -> i32 {
    3 + ((lightness.clamp(0.0, 1.0) * 3.0) as i32).min(2)
}

/// Melody scale degree for a hue.
fn melody_degree(hue: f64) -> usize {
    let degree = (hue.rem_euclid(360.0) / 360.0 * MELODY_DEGREES as f64) as usize;
    degree.min(MELODY_DEGREES - 1)
}

fn luminance_variance(cells: &[Rgb]) -> f64 {
    if cells.is_empty() {
        return 0.0;
    }
    let n = cells.len() as f64;
    let mean = cells.iter().map(Rgb::luminance).sum::<f64>() / n;
    cells
        .iter()
        .map(|c| {
            let d = c.luminance() - mean;
            d * d
        })
        .sum::<f64>()
        / n
}

/// One step's notes for every track.
struct Step {
    melody: Option<String>,
    harmony: Option<String>,
    bass: Option<String>,
    percussion: Option<String>,
}

fn compose_step(index: usize, column: &[Rgb]) -> Step {
    let color = Rgb::average(column);
    let hsl = color.to_hsl();

    let (melody, harmony) = if hsl.l < REST_LIGHTNESS {
        (None, None)
    } else {
        let octave = melody_octave(hsl.l);
        let degree = melody_degree(hsl.h);
        let harmony = (hsl.s >= HARMONY_MIN_SATURATION)
            .then(|| scale_note(octave, degree + HARMONY_INTERVAL));
        (Some(scale_note(octave, degree)), harmony)
    };

    let bass = (index % BASS_EVERY == 0 && color.b >= BASS_MIN_BLUE).then(|| {
        let degree = ((color.b * MAJOR_SCALE.len() as f64) as usize).min(MAJOR_SCALE.len() - 1);
        scale_note(BASS_OCTAVE, degree)
    });

    let percussion = (luminance_variance(column) > PERCUSSION_MIN_VARIANCE)
        .then(|| PERCUSSION_NOTE.to_string());

    Step {
        melody,
        harmony,
        bass,
        percussion,
    }
}

/// Composes a song from an image, one step per grid column.
///
/// The image is box-averaged to `steps` x `steps` cells. Average saturation
/// sets the tempo (80 to 160 BPM) and the average hue picks the melody
/// instrument.
///
/// # Errors
/// [`ImageError::InvalidParameter`] unless `steps` is within 1-256.
pub fn image_to_song(image: &PixelBuffer, steps: u32) -> ImageResult<ComposedSong> {
    if !(1..=MAX_STEPS).contains(&steps) {
        return Err(ImageError::invalid_param(
            "steps",
            format!("must be 1-{}, got {}", MAX_STEPS, steps),
        ));
    }

    let grid = image.downsample(steps, steps);
    let columns: Vec<Vec<Rgb>> = (0..steps).map(|col| grid.column(col)).collect();

    let mean_saturation = columns
        .iter()
        .map(|column| Rgb::average(column).to_hsl().s)
        .sum::<f64>()
        / columns.len() as f64;
    let bpm = 80 + (80.0 * mean_saturation.clamp(0.0, 1.0)).round() as u32;
    let lead = Instrument::from(waveform_for_hue(grid.average().to_hsl().h));

    let mut melody = Vec::with_capacity(columns.len());
    let mut harmony = Vec::with_capacity(columns.len());
    let mut bass = Vec::with_capacity(columns.len());
    let mut percussion = Vec::with_capacity(columns.len());
    for (index, column) in columns.iter().enumerate() {
        let step = compose_step(index, column);
        melody.push(step.melody);
        harmony.push(step.harmony);
        bass.push(step.bass);
        percussion.push(step.percussion);
    }

    debug!(steps, bpm, ?lead, "mapped image to song");
    Ok(ComposedSong {
        bpm,
        tracks: vec![
            Track {
                instrument: lead,
                notes: melody,
            },
            Track {
                instrument: Instrument::Triangle,
                notes: harmony,
            },
            Track {
                instrument: Instrument::Square,
                notes: bass,
            },
            Track {
                instrument: Instrument::Noise,
                notes: percussion,
            },
        ],
    })
}
