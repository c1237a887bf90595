//! Monophonic audio-to-MIDI transcription.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::PcmBuffer;
use crate::note::freq_to_midi;
use crate::pitch::{detect_pitch_with, frame_rms, PitchSearch};

/// A detected note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MidiNote {
    /// MIDI note number (0-127).
    pub pitch: u8,
    /// Onset in seconds from the start of the buffer.
    pub start_time: f64,
    /// Length in seconds.
    pub duration: f64,
}

impl MidiNote {
    /// End of the note in seconds.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

/// Tunables for [`transcribe_with`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranscriberConfig {
    /// Analysis window length in samples.
    pub frame_size: usize,
    /// Distance between successive frames in samples.
    pub hop_size: usize,
    /// Frames quieter than this RMS are silent.
    pub rms_threshold: f32,
    /// Notes shorter than this many seconds are dropped.
    pub min_note_seconds: f64,
    /// Pitch search limits.
    pub pitch: PitchSearch,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 1024,
            rms_threshold: 0.01,
            min_note_seconds: 0.06,
            pitch: PitchSearch::default(),
        }
    }
}

/// Transcribes a buffer with the default configuration.
pub fn transcribe_to_midi(buffer: &PcmBuffer) -> Vec<MidiNote> {
    transcribe_with(buffer, &TranscriberConfig::default())
}

/// Pitch estimate for one analysis frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePitch {
    /// Fundamental in Hz, `None` for silent or unvoiced frames.
    pub frequency: Option<f32>,
    /// First sample the frame owns.
    pub start: usize,
    /// One past the last sample the frame owns.
    pub end: usize,
}

/// Splits a mono signal into frames and estimates each frame's pitch.
///
/// Frame `i` owns `[i * hop, (i + 1) * hop)`; the last frame extends to the
/// end of its window or of the signal, whichever comes first. A signal
/// shorter than one frame is zero-padded into a single frame.
pub fn pitch_track(mono: &[f32], sample_rate: u32, config: &TranscriberConfig) -> Vec<FramePitch> {
    let frame_size = config.frame_size.max(4);
    let hop = config.hop_size.clamp(1, frame_size);
    let len = mono.len();
    if len == 0 {
        return Vec::new();
    }

    let frame_count = if len <= frame_size {
        1
    } else {
        1 + (len - frame_size) / hop
    };

    let mut window = vec![0.0f32; frame_size];
    (0..frame_count)
        .map(|i| {
            let start = i * hop;
            let available = (len - start).min(frame_size);
            window[..available].copy_from_slice(&mono[start..start + available]);
            window[available..].fill(0.0);

            let frequency = if frame_rms(&window) < config.rms_threshold {
                None
            } else {
                detect_pitch_with(&window, sample_rate, &config.pitch).map(|est| est.frequency)
            };

            let end = if i + 1 == frame_count {
                (start + frame_size).min(len)
            } else {
                start + hop
            };
            FramePitch {
                frequency,
                start,
                end,
            }
        })
        .collect()
}

/// Transcribes the dominant melody of a buffer into notes.
///
/// The buffer is mixed to mono and split into overlapping frames. Runs of
/// contiguous frames with the same pitch become one note; silence or a new
/// pitch ends the current note. Notes shorter than
/// `config.min_note_seconds` are discarded. An empty buffer or one with no
/// voiced frames yields an empty list.
pub fn transcribe_with(buffer: &PcmBuffer, config: &TranscriberConfig) -> Vec<MidiNote> {
    let mono = buffer.to_mono();
    let sr = buffer.sample_rate() as f64;
    let track = pitch_track(&mono, buffer.sample_rate(), config);

    let mut notes = Vec::new();
    let mut current: Option<(u8, usize, usize)> = None;
    let flush = |note: Option<(u8, usize, usize)>, notes: &mut Vec<MidiNote>| {
        if let Some((pitch, start, end)) = note {
            let duration = (end - start) as f64 / sr;
            if duration >= config.min_note_seconds {
                notes.push(MidiNote {
                    pitch,
                    start_time: start as f64 / sr,
                    duration,
                });
            }
        }
    };

    for frame in &track {
        let pitch = frame.frequency.and_then(|f| freq_to_midi(f as f64));
        let (start, end) = (frame.start, frame.end);
        match (current, pitch) {
            (Some((p, s, _)), Some(q)) if p == q => current = Some((p, s, end)),
            (_, Some(q)) => {
                flush(current.take(), &mut notes);
                current = Some((q, start, end));
            }
            (_, None) => flush(current.take(), &mut notes),
        }
    }
    flush(current, &mut notes);

    debug!(frames = track.len(), notes = notes.len(), "transcribed buffer");
    notes
}
