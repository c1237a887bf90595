//! Pixeltone audio engine
//!
//! Offline, deterministic transforms over planar PCM buffers:
//!
//! - **Bitcrusher** - amplitude quantisation with sample-and-hold
//! - **Voice effects** - pitch-shift, echo, reverb, chorus and friends
//! - **Transcription** - monophonic pitch tracking into MIDI notes
//! - **Analysis** - loudness, pitch, tempo and spectral summary
//! - **Synthesis** - swept tones and step-sequenced songs
//! - **WAV** - canonical 16-bit PCM encoding
//!
//! # Determinism
//!
//! No transform reads the clock or the OS entropy source. Noise textures use
//! PCG32 with seeds derived via BLAKE3, so the same input always produces the
//! same output, and encoded WAVs carry a BLAKE3 hash of their PCM payload.
//!
//! # Example
//!
//! ```
//! use pixeltone_audio::{apply_voice_effect_by_id, encode_wav, EffectParameters, PcmBuffer};
//!
//! let samples: Vec<f32> = (0..4410).map(|i| (i as f32 * 0.06).sin() * 0.5).collect();
//! let buffer = PcmBuffer::mono(44100, samples)?;
//! let params = EffectParameters::new().with("delayTime", 0.05);
//! let echoed = apply_voice_effect_by_id(&buffer, "echo", &params)?;
//! let wav = encode_wav(&echoed)?;
//! assert_eq!(wav.num_frames(), 4410);
//! # Ok::<(), pixeltone_audio::AudioError>(())
//! ```

pub mod analysis;
pub mod bitcrush;
pub mod buffer;
pub mod effects;
pub mod error;
pub mod filter;
pub mod note;
pub mod pitch;
pub mod rng;
pub mod synth;
pub mod transcribe;
pub mod wav;

pub use analysis::{analyze_buffer, LocalAnalysisResult};
pub use bitcrush::apply_bitcrusher;
pub use buffer::PcmBuffer;
pub use effects::{
    apply_voice_effect, apply_voice_effect_by_id, EffectId, EffectParameters, VoiceEffect,
};
pub use error::{AudioError, AudioResult};
pub use pitch::{detect_pitch, PitchEstimate};
pub use synth::{
    render_song, render_sound_effect, ComposedSong, Instrument, SoundEffectParameters, Track,
    Waveform,
};
pub use transcribe::{transcribe_to_midi, transcribe_with, MidiNote, TranscriberConfig};
pub use wav::{encode_wav, WavBlob};
