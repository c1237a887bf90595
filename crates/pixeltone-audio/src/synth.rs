//! Oscillator synthesis for mapper output.
//!
//! Renders [`SoundEffectParameters`] (a single swept tone) and
//! [`ComposedSong`] (step-sequenced tracks) into PCM so they can be
//! auditioned or written out as WAV.

use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::PcmBuffer;
use crate::error::{AudioError, AudioResult};
use crate::note::name_to_freq;
use crate::rng::{create_rng, derive_seed, ENGINE_SEED};

/// Longest sound effect [`render_sound_effect`] accepts, in seconds.
pub const MAX_SOUND_SECONDS: f64 = 30.0;
/// Steps per beat when rendering a song (eighth notes).
pub const STEPS_PER_BEAT: f64 = 2.0;

const FADE_SECONDS: f64 = 0.005;
const TRACK_GAIN: f32 = 0.3;

/// Basic periodic waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// Lower-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        }
    }

    /// Evaluates the waveform at a phase in [0, 1).
    pub fn sample(&self, phase: f64) -> f32 {
        let value = match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
        };
        value as f32
    }
}

/// A single swept tone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundEffectParameters {
    /// Display name, e.g. "Blue Sawtooth".
    pub name: String,
    /// Oscillator shape.
    #[serde(rename = "type")]
    pub waveform: Waveform,
    /// Frequency at the start in Hz.
    pub start_freq: f64,
    /// Frequency at the end in Hz.
    pub end_freq: f64,
    /// Length in seconds.
    pub duration: f64,
    /// Linear gain (0 to 1).
    pub volume: f64,
}

/// Instrument assigned to a song track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    Sine,
    Square,
    Sawtooth,
    Triangle,
    Noise,
}

impl Instrument {
    /// The pitched waveform, `None` for noise.
    pub fn waveform(&self) -> Option<Waveform> {
        match self {
            Instrument::Sine => Some(Waveform::Sine),
            Instrument::Square => Some(Waveform::Square),
            Instrument::Sawtooth => Some(Waveform::Sawtooth),
            Instrument::Triangle => Some(Waveform::Triangle),
            Instrument::Noise => None,
        }
    }
}

impl From<Waveform> for Instrument {
    fn from(waveform: Waveform) -> Self {
        match waveform {
            Waveform::Sine => Instrument::Sine,
            Waveform::Square => Instrument::Square,
            Waveform::Sawtooth => Instrument::Sawtooth,
            Waveform::Triangle => Instrument::Triangle,
        }
    }
}

/// One voice of a song: a note name or rest per step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub instrument: Instrument,
    pub notes: Vec<Option<String>>,
}

/// A step-sequenced song. All tracks have the same number of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedSong {
    pub bpm: u32,
    pub tracks: Vec<Track>,
}

impl ComposedSong {
    /// Number of steps per track.
    pub fn steps(&self) -> usize {
        self.tracks.first().map_or(0, |t| t.notes.len())
    }

    /// Length of one step in seconds.
    pub fn step_seconds(&self) -> f64 {
        60.0 / self.bpm.max(1) as f64 / STEPS_PER_BEAT
    }
}

/// Linear fade-in and fade-out gain for sample `i` of `len`.
fn edge_fade(i: usize, len: usize, fade: usize) -> f32 {
    if fade == 0 {
        return 1.0;
    }
    let from_start = i as f32 / fade as f32;
    let from_end = (len - i) as f32 / fade as f32;
    from_start.min(from_end).min(1.0)
}

fn check_positive(name: &str, value: f64) -> AudioResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AudioError::invalid_param(
            name,
            format!("must be a positive number, got {}", value),
        ))
    }
}

/// Renders a swept tone as a mono buffer.
///
/// The frequency moves exponentially from `start_freq` to `end_freq`; short
/// fades at both ends avoid clicks.
pub fn render_sound_effect(
    params: &SoundEffectParameters,
    sample_rate: u32,
) -> AudioResult<PcmBuffer> {
    check_positive("sampleRate", sample_rate as f64)?;
    check_positive("startFreq", params.start_freq)?;
    check_positive("endFreq", params.end_freq)?;
    check_positive("duration", params.duration)?;
    if params.duration > MAX_SOUND_SECONDS {
        return Err(AudioError::invalid_param(
            "duration",
            format!("must be at most {} s, got {}", MAX_SOUND_SECONDS, params.duration),
        ));
    }
    if !(0.0..=1.0).contains(&params.volume) {
        return Err(AudioError::invalid_param(
            "volume",
            format!("must be 0.0-1.0, got {}", params.volume),
        ));
    }

    let sr = sample_rate as f64;
    let len = ((params.duration * sr).round() as usize).max(1);
    let fade = (FADE_SECONDS * sr) as usize;
    let fade = fade.min(len / 2);
    let ratio = params.end_freq / params.start_freq;

    let mut phase = 0.0f64;
    let samples: Vec<f32> = (0..len)
        .map(|i| {
            let t = i as f64 / len as f64;
            let freq = params.start_freq * ratio.powf(t);
            let value = params.waveform.sample(phase);
            phase = (phase + freq / sr).fract();
            value * params.volume as f32 * edge_fade(i, len, fade)
        })
        .collect();

    debug!(name = %params.name, samples = len, "rendered sound effect");
    PcmBuffer::mono(sample_rate, samples)
}

/// Renders one track into `out`, adding to what is already there.
fn render_track(
    track: &Track,
    index: usize,
    step_len: usize,
    sample_rate: f64,
    out: &mut [f32],
) -> AudioResult<()> {
    let fade = ((FADE_SECONDS * sample_rate) as usize).min(step_len / 2);
    let mut rng = create_rng(derive_seed(ENGINE_SEED, "song-noise", index));

    for (step, note) in track.notes.iter().enumerate() {
        let Some(name) = note else {
            continue;
        };
        let freq = name_to_freq(name).ok_or_else(|| {
            AudioError::invalid_param("notes", format!("unknown note name '{}'", name))
        })?;
        let start = step * step_len;
        let span = &mut out[start..start + step_len];

        match track.instrument.waveform() {
            Some(waveform) => {
                let mut phase = 0.0f64;
                for (i, slot) in span.iter_mut().enumerate() {
                    // Linear decay over the step
                    let decay = 1.0 - i as f32 / step_len as f32;
                    let envelope = decay * edge_fade(i, step_len, fade) * TRACK_GAIN;
                    *slot += waveform.sample(phase) * envelope;
                    phase = (phase + freq / sample_rate).fract();
                }
            }
            None => {
                // Percussive noise burst over the first quarter of the step
                let burst = (step_len / 4).max(1);
                for (i, slot) in span.iter_mut().take(burst).enumerate() {
                    let decay = 1.0 - i as f32 / burst as f32;
                    *slot += rng.gen_range(-1.0f32..=1.0) * decay * TRACK_GAIN;
                }
            }
        }
    }
    Ok(())
}

/// Renders a song as a mono buffer, one step per eighth note.
///
/// # Errors
/// [`AudioError::InvalidParameter`] when the tempo is zero, the tracks differ
/// in length, or a note name does not parse. A song without steps renders
/// an empty buffer.
pub fn render_song(song: &ComposedSong, sample_rate: u32) -> AudioResult<PcmBuffer> {
    check_positive("sampleRate", sample_rate as f64)?;
    if song.bpm == 0 {
        return Err(AudioError::invalid_param("bpm", "must be greater than 0"));
    }
    let steps = song.steps();
    if song.tracks.iter().any(|t| t.notes.len() != steps) {
        return Err(AudioError::invalid_param(
            "tracks",
            "every track must have the same number of steps",
        ));
    }

    let sr = sample_rate as f64;
    let step_len = ((song.step_seconds() * sr).round() as usize).max(1);
    let mut mix = vec![0.0f32; steps * step_len];
    for (index, track) in song.tracks.iter().enumerate() {
        render_track(track, index, step_len, sr, &mut mix)?;
    }

    let mut buffer = PcmBuffer::mono(sample_rate, mix)?;
    buffer.normalize_peak(1.0);
    debug!(
        bpm = song.bpm,
        steps,
        tracks = song.tracks.len(),
        "rendered song"
    );
    Ok(buffer)
}
