//! Effect identifiers and typed parameter records.
//!
//! External callers name an effect with a kebab-case id and pass a sparse map
//! of camelCase numeric controls. [`VoiceEffect::from_parameters`] resolves
//! the pair into a typed, validated effect; unset controls take the defaults
//! documented on each record.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::echo::MAX_FEEDBACK;
use super::VoiceEffect;
use crate::error::{AudioError, AudioResult};

/// Identifier of a voice effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectId {
    PitchShift,
    Echo,
    Reverb,
    Chorus,
    Vibrato,
    BassBoost,
    Robot,
    Monster,
    Telephone,
    Underwater,
    OldRadio,
    OldComputer,
    Clarity,
    AiVoice,
}

impl EffectId {
    /// Every effect, in display order.
    pub const ALL: [EffectId; 14] = [
        EffectId::PitchShift,
        EffectId::Echo,
        EffectId::Reverb,
        EffectId::Chorus,
        EffectId::Vibrato,
        EffectId::BassBoost,
        EffectId::Robot,
        EffectId::Monster,
        EffectId::Telephone,
        EffectId::Underwater,
        EffectId::OldRadio,
        EffectId::OldComputer,
        EffectId::Clarity,
        EffectId::AiVoice,
    ];

    /// The kebab-case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectId::PitchShift => "pitch-shift",
            EffectId::Echo => "echo",
            EffectId::Reverb => "reverb",
            EffectId::Chorus => "chorus",
            EffectId::Vibrato => "vibrato",
            EffectId::BassBoost => "bass-boost",
            EffectId::Robot => "robot",
            EffectId::Monster => "monster",
            EffectId::Telephone => "telephone",
            EffectId::Underwater => "underwater",
            EffectId::OldRadio => "old-radio",
            EffectId::OldComputer => "old-computer",
            EffectId::Clarity => "clarity",
            EffectId::AiVoice => "ai-voice",
        }
    }

    /// Parameter names this effect reads from an [`EffectParameters`] map.
    pub fn parameter_names(&self) -> &'static [&'static str] {
        match self {
            EffectId::PitchShift => &["pitchShift"],
            EffectId::Echo => &["delayTime", "feedback"],
            EffectId::Reverb => &["reverbRoomSize", "reverbWet"],
            EffectId::Chorus => &["chorusRate", "chorusDepth", "chorusVoices", "chorusWet"],
            EffectId::Vibrato => &["vibratoRate", "vibratoDepth"],
            EffectId::BassBoost => &["bassBoost", "bassCutoff"],
            EffectId::Robot => &["robotFrequency", "robotMix"],
            EffectId::Monster => &["monsterPitch"],
            EffectId::Underwater => &["underwaterCutoff"],
            EffectId::OldComputer => &["bitCrushLevel"],
            EffectId::Clarity => &["clarityLevel"],
            EffectId::AiVoice => &["intensity"],
            EffectId::Telephone | EffectId::OldRadio => &[],
        }
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectId {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        EffectId::ALL
            .iter()
            .copied()
            .find(|effect| effect.as_str() == id)
            .ok_or_else(|| AudioError::unsupported_effect(s))
    }
}

/// Sparse map of numeric effect controls keyed by camelCase name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectParameters(BTreeMap<String, f64>);

impl EffectParameters {
    /// Creates an empty map; every control takes its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    /// Sets one control, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    /// Reads one control.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Copies every control from `other`, overriding existing values.
    pub fn merge(&mut self, other: &EffectParameters) {
        for (name, value) in &other.0 {
            self.0.insert(name.clone(), *value);
        }
    }

    /// Iterates over the set controls in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reads a control as `f32`, falling back to `default` when unset.
    fn float(&self, name: &str, default: f32) -> AudioResult<f32> {
        match self.get(name) {
            None => Ok(default),
            Some(value) if value.is_finite() => Ok(value as f32),
            Some(value) => Err(AudioError::invalid_param(
                name,
                format!("must be finite, got {}", value),
            )),
        }
    }

    /// Reads a whole-number control, falling back to `default` when unset.
    fn whole(&self, name: &str, default: u8) -> AudioResult<u8> {
        match self.get(name) {
            None => Ok(default),
            Some(value)
                if value.is_finite() && value.fract() == 0.0 && (0.0..=255.0).contains(&value) =>
            {
                Ok(value as u8)
            }
            Some(value) => Err(AudioError::invalid_param(
                name,
                format!("must be a whole number from 0 to 255, got {}", value),
            )),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for EffectParameters {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

fn check_range(name: &str, value: f32, min: f32, max: f32) -> AudioResult<()> {
    if !value.is_finite() {
        return Err(AudioError::invalid_param(
            name,
            format!("must be finite, got {}", value),
        ));
    }
    if !(min..=max).contains(&value) {
        return Err(AudioError::invalid_param(
            name,
            format!("must be {}-{}, got {}", min, max, value),
        ));
    }
    Ok(())
}

fn check_whole_range(name: &str, value: u8, min: u8, max: u8) -> AudioResult<()> {
    if !(min..=max).contains(&value) {
        return Err(AudioError::invalid_param(
            name,
            format!("must be {}-{}, got {}", min, max, value),
        ));
    }
    Ok(())
}

/// Resampling pitch shift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchShiftParams {
    /// Shift in semitones (-24 to 24, default 0).
    #[serde(rename = "pitchShift")]
    pub semitones: f32,
}

impl Default for PitchShiftParams {
    fn default() -> Self {
        Self { semitones: 0.0 }
    }
}

impl PitchShiftParams {
    pub fn validate(&self) -> AudioResult<()> {
        check_range("pitchShift", self.semitones, -24.0, 24.0)
    }
}

/// Feedback echo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EchoParams {
    /// Delay in seconds (0.01 to 2, default 0.3).
    pub delay_time: f32,
    /// Feedback gain (default 0.5). Clamped into 0 to 0.7 when applied.
    pub feedback: f32,
}

impl Default for EchoParams {
    fn default() -> Self {
        Self {
            delay_time: 0.3,
            feedback: 0.5,
        }
    }
}

impl EchoParams {
    pub fn validate(&self) -> AudioResult<()> {
        check_range("delayTime", self.delay_time, 0.01, 2.0)?;
        if !self.feedback.is_finite() {
            return Err(AudioError::invalid_param(
                "feedback",
                format!("must be finite, got {}", self.feedback),
            ));
        }
        Ok(())
    }

    /// Feedback as it will be applied.
    pub fn effective_feedback(&self) -> f32 {
        self.feedback.clamp(0.0, MAX_FEEDBACK)
    }
}

/// Freeverb room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverbParams {
    /// Room size (0 to 1, default 0.5).
    #[serde(rename = "reverbRoomSize")]
    pub room_size: f32,
    /// Wet level (0 to 1, default 0.3).
    #[serde(rename = "reverbWet")]
    pub wet: f32,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            room_size: 0.5,
            wet: 0.3,
        }
    }
}

impl ReverbParams {
    pub fn validate(&self) -> AudioResult<()> {
        check_range("reverbRoomSize", self.room_size, 0.0, 1.0)?;
        check_range("reverbWet", self.wet, 0.0, 1.0)
    }
}

/// Multi-voice chorus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChorusParams {
    /// LFO rate in Hz (0.1 to 10, default 1.5).
    #[serde(rename = "chorusRate")]
    pub rate: f32,
    /// Modulation depth (0 to 1, default 0.5); 1 sweeps 10 ms.
    #[serde(rename = "chorusDepth")]
    pub depth: f32,
    /// Number of delayed voices (1 to 4, default 2).
    #[serde(rename = "chorusVoices")]
    pub voices: u8,
    /// Wet level (0 to 1, default 0.5).
    #[serde(rename = "chorusWet")]
    pub wet: f32,
}

impl Default for ChorusParams {
    fn default() -> Self {
        Self {
            rate: 1.5,
            depth: 0.5,
            voices: 2,
            wet: 0.5,
        }
    }
}

impl ChorusParams {
    pub fn validate(&self) -> AudioResult<()> {
        check_range("chorusRate", self.rate, 0.1, 10.0)?;
        check_range("chorusDepth", self.depth, 0.0, 1.0)?;
        check_whole_range("chorusVoices", self.voices, 1, 4)?;
        check_range("chorusWet", self.wet, 0.0, 1.0)
    }
}

/// Pitch wobble.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VibratoParams {
    /// LFO rate in Hz (0.1 to 20, default 5).
    #[serde(rename = "vibratoRate")]
    pub rate: f32,
    /// Depth (0 to 1, default 0.3); 1 sweeps 5 ms.
    #[serde(rename = "vibratoDepth")]
    pub depth: f32,
}

impl Default for VibratoParams {
    fn default() -> Self {
        Self {
            rate: 5.0,
            depth: 0.3,
        }
    }
}

impl VibratoParams {
    pub fn validate(&self) -> AudioResult<()> {
        check_range("vibratoRate", self.rate, 0.1, 20.0)?;
        check_range("vibratoDepth", self.depth, 0.0, 1.0)
    }
}

/// Low-shelf style bass lift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BassBoostParams {
    /// Boost in dB (0 to 24, default 6).
    #[serde(rename = "bassBoost")]
    pub gain_db: f32,
    /// Corner frequency in Hz (20 to 1000, default 150).
    #[serde(rename = "bassCutoff")]
    pub cutoff: f32,
}

impl Default for BassBoostParams {
    fn default() -> Self {
        Self {
            gain_db: 6.0,
            cutoff: 150.0,
        }
    }
}

impl BassBoostParams {
    pub fn validate(&self) -> AudioResult<()> {
        check_range("bassBoost", self.gain_db, 0.0, 24.0)?;
        check_range("bassCutoff", self.cutoff, 20.0, 1000.0)
    }
}

/// Ring-modulated robot voice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotParams {
    /// Carrier frequency in Hz (10 to 2000, default 50).
    #[serde(rename = "robotFrequency")]
    pub frequency: f32,
    /// Wet mix (0 to 1, default 0.8).
    #[serde(rename = "robotMix")]
    pub mix: f32,
}

impl Default for RobotParams {
    fn default() -> Self {
        Self {
            frequency: 50.0,
            mix: 0.8,
        }
    }
}

impl RobotParams {
    pub fn validate(&self) -> AudioResult<()> {
        check_range("robotFrequency", self.frequency, 10.0, 2000.0)?;
        check_range("robotMix", self.mix, 0.0, 1.0)
    }
}

/// Deep monster voice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterParams {
    /// Pitch drop in semitones (-24 to 0, default -6).
    #[serde(rename = "monsterPitch")]
    pub semitones: f32,
}

impl Default for MonsterParams {
    fn default() -> Self {
        Self { semitones: -6.0 }
    }
}

impl MonsterParams {
    pub fn validate(&self) -> AudioResult<()> {
        check_range("monsterPitch", self.semitones, -24.0, 0.0)
    }
}

/// Submerged voice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnderwaterParams {
    /// Low-pass corner in Hz (100 to 4000, default 500).
    #[serde(rename = "underwaterCutoff")]
    pub cutoff: f32,
}

impl Default for UnderwaterParams {
    fn default() -> Self {
        Self { cutoff: 500.0 }
    }
}

impl UnderwaterParams {
    pub fn validate(&self) -> AudioResult<()> {
        check_range("underwaterCutoff", self.cutoff, 100.0, 4000.0)
    }
}

/// Retro computer voice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OldComputerParams {
    /// Bit depth (1 to 16, default 8).
    #[serde(rename = "bitCrushLevel")]
    pub bits: u8,
}

impl Default for OldComputerParams {
    fn default() -> Self {
        Self { bits: 8 }
    }
}

impl OldComputerParams {
    pub fn validate(&self) -> AudioResult<()> {
        check_whole_range("bitCrushLevel", self.bits, 1, 16)
    }
}

/// Brightness control.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClarityParams {
    /// -1 (dark) to 1 (bright), default 0.
    #[serde(rename = "clarityLevel")]
    pub level: f32,
}

impl ClarityParams {
    pub fn validate(&self) -> AudioResult<()> {
        check_range("clarityLevel", self.level, -1.0, 1.0)
    }
}

/// Synthetic voice colouring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiVoiceParams {
    /// Strength of every stage (0 to 1, default 0.5).
    pub intensity: f32,
}

impl Default for AiVoiceParams {
    fn default() -> Self {
        Self { intensity: 0.5 }
    }
}

impl AiVoiceParams {
    pub fn validate(&self) -> AudioResult<()> {
        check_range("intensity", self.intensity, 0.0, 1.0)
    }
}

impl VoiceEffect {
    /// Resolves an effect id and sparse control map into a validated effect.
    ///
    /// Controls the effect does not read are ignored.
    pub fn from_parameters(id: EffectId, params: &EffectParameters) -> AudioResult<Self> {
        let effect = match id {
            EffectId::PitchShift => VoiceEffect::PitchShift(PitchShiftParams {
                semitones: params.float("pitchShift", 0.0)?,
            }),
            EffectId::Echo => {
                let defaults = EchoParams::default();
                VoiceEffect::Echo(EchoParams {
                    delay_time: params.float("delayTime", defaults.delay_time)?,
                    feedback: params.float("feedback", defaults.feedback)?,
                })
            }
            EffectId::Reverb => {
                let defaults = ReverbParams::default();
                VoiceEffect::Reverb(ReverbParams {
                    room_size: params.float("reverbRoomSize", defaults.room_size)?,
                    wet: params.float("reverbWet", defaults.wet)?,
                })
            }
            EffectId::Chorus => {
                let defaults = ChorusParams::default();
                VoiceEffect::Chorus(ChorusParams {
                    rate: params.float("chorusRate", defaults.rate)?,
                    depth: params.float("chorusDepth", defaults.depth)?,
                    voices: params.whole("chorusVoices", defaults.voices)?,
                    wet: params.float("chorusWet", defaults.wet)?,
                })
            }
            EffectId::Vibrato => {
                let defaults = VibratoParams::default();
                VoiceEffect::Vibrato(VibratoParams {
                    rate: params.float("vibratoRate", defaults.rate)?,
                    depth: params.float("vibratoDepth", defaults.depth)?,
                })
            }
            EffectId::BassBoost => {
                let defaults = BassBoostParams::default();
                VoiceEffect::BassBoost(BassBoostParams {
                    gain_db: params.float("bassBoost", defaults.gain_db)?,
                    cutoff: params.float("bassCutoff", defaults.cutoff)?,
                })
            }
            EffectId::Robot => {
                let defaults = RobotParams::default();
                VoiceEffect::Robot(RobotParams {
                    frequency: params.float("robotFrequency", defaults.frequency)?,
                    mix: params.float("robotMix", defaults.mix)?,
                })
            }
            EffectId::Monster => VoiceEffect::Monster(MonsterParams {
                semitones: params.float("monsterPitch", MonsterParams::default().semitones)?,
            }),
            EffectId::Telephone => VoiceEffect::Telephone,
            EffectId::Underwater => VoiceEffect::Underwater(UnderwaterParams {
                cutoff: params.float("underwaterCutoff", UnderwaterParams::default().cutoff)?,
            }),
            EffectId::OldRadio => VoiceEffect::OldRadio,
            EffectId::OldComputer => VoiceEffect::OldComputer(OldComputerParams {
                bits: params.whole("bitCrushLevel", OldComputerParams::default().bits)?,
            }),
            EffectId::Clarity => VoiceEffect::Clarity(ClarityParams {
                level: params.float("clarityLevel", 0.0)?,
            }),
            EffectId::AiVoice => VoiceEffect::AiVoice(AiVoiceParams {
                intensity: params.float("intensity", AiVoiceParams::default().intensity)?,
            }),
        };
        effect.validate()?;
        Ok(effect)
    }
}
