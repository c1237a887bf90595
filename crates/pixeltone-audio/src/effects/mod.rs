//! Voice effects.
//!
//! Effects form a closed enum dispatched by `match`. Every effect processes
//! each channel independently, keeps the frame count (except pitch-shift,
//! which resamples), and peak-normalises the result down to full scale when
//! it overshoots.

mod ai_voice;
mod character;
mod chorus;
mod delay_line;
mod echo;
mod params;
mod pitch_shift;
mod reverb;
mod ring_mod;
mod tone;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::buffer::PcmBuffer;
use crate::error::AudioResult;
use crate::rng::{derive_seed, ENGINE_SEED};

pub use echo::MAX_FEEDBACK;
pub use params::{
    AiVoiceParams, BassBoostParams, ChorusParams, ClarityParams, EchoParams, EffectId,
    EffectParameters, MonsterParams, OldComputerParams, PitchShiftParams, ReverbParams,
    RobotParams, UnderwaterParams, VibratoParams,
};
pub use pitch_shift::semitones_to_ratio;

/// A voice effect with its typed parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "kebab-case")]
pub enum VoiceEffect {
    PitchShift(PitchShiftParams),
    Echo(EchoParams),
    Reverb(ReverbParams),
    Chorus(ChorusParams),
    Vibrato(VibratoParams),
    BassBoost(BassBoostParams),
    Robot(RobotParams),
    Monster(MonsterParams),
    Telephone,
    Underwater(UnderwaterParams),
    OldRadio,
    OldComputer(OldComputerParams),
    Clarity(ClarityParams),
    AiVoice(AiVoiceParams),
}

impl VoiceEffect {
    /// The effect's identifier.
    pub fn id(&self) -> EffectId {
        match self {
            VoiceEffect::PitchShift(_) => EffectId::PitchShift,
            VoiceEffect::Echo(_) => EffectId::Echo,
            VoiceEffect::Reverb(_) => EffectId::Reverb,
            VoiceEffect::Chorus(_) => EffectId::Chorus,
            VoiceEffect::Vibrato(_) => EffectId::Vibrato,
            VoiceEffect::BassBoost(_) => EffectId::BassBoost,
            VoiceEffect::Robot(_) => EffectId::Robot,
            VoiceEffect::Monster(_) => EffectId::Monster,
            VoiceEffect::Telephone => EffectId::Telephone,
            VoiceEffect::Underwater(_) => EffectId::Underwater,
            VoiceEffect::OldRadio => EffectId::OldRadio,
            VoiceEffect::OldComputer(_) => EffectId::OldComputer,
            VoiceEffect::Clarity(_) => EffectId::Clarity,
            VoiceEffect::AiVoice(_) => EffectId::AiVoice,
        }
    }

    /// The effect with every control at its default.
    pub fn with_defaults(id: EffectId) -> Self {
        match id {
            EffectId::PitchShift => VoiceEffect::PitchShift(PitchShiftParams::default()),
            EffectId::Echo => VoiceEffect::Echo(EchoParams::default()),
            EffectId::Reverb => VoiceEffect::Reverb(ReverbParams::default()),
            EffectId::Chorus => VoiceEffect::Chorus(ChorusParams::default()),
            EffectId::Vibrato => VoiceEffect::Vibrato(VibratoParams::default()),
            EffectId::BassBoost => VoiceEffect::BassBoost(BassBoostParams::default()),
            EffectId::Robot => VoiceEffect::Robot(RobotParams::default()),
            EffectId::Monster => VoiceEffect::Monster(MonsterParams::default()),
            EffectId::Telephone => VoiceEffect::Telephone,
            EffectId::Underwater => VoiceEffect::Underwater(UnderwaterParams::default()),
            EffectId::OldRadio => VoiceEffect::OldRadio,
            EffectId::OldComputer => VoiceEffect::OldComputer(OldComputerParams::default()),
            EffectId::Clarity => VoiceEffect::Clarity(ClarityParams::default()),
            EffectId::AiVoice => VoiceEffect::AiVoice(AiVoiceParams::default()),
        }
    }

    /// Checks every control against its documented range.
    pub fn validate(&self) -> AudioResult<()> {
        match self {
            VoiceEffect::PitchShift(p) => p.validate(),
            VoiceEffect::Echo(p) => p.validate(),
            VoiceEffect::Reverb(p) => p.validate(),
            VoiceEffect::Chorus(p) => p.validate(),
            VoiceEffect::Vibrato(p) => p.validate(),
            VoiceEffect::BassBoost(p) => p.validate(),
            VoiceEffect::Robot(p) => p.validate(),
            VoiceEffect::Monster(p) => p.validate(),
            VoiceEffect::Underwater(p) => p.validate(),
            VoiceEffect::OldComputer(p) => p.validate(),
            VoiceEffect::Clarity(p) => p.validate(),
            VoiceEffect::AiVoice(p) => p.validate(),
            VoiceEffect::Telephone | VoiceEffect::OldRadio => Ok(()),
        }
    }
}

/// Applies one effect to every channel of a buffer.
///
/// # Errors
/// * [`AudioError::EmptyBuffer`](crate::AudioError::EmptyBuffer) if the
///   buffer has no frames.
/// * [`AudioError::InvalidParameter`](crate::AudioError::InvalidParameter)
///   if a control is non-finite or out of range.
pub fn apply_voice_effect(buffer: &PcmBuffer, effect: &VoiceEffect) -> AudioResult<PcmBuffer> {
    buffer.ensure_not_empty()?;
    effect.validate()?;

    let sr = buffer.sample_rate() as f32;
    let id = effect.id();

    let mut output = match effect {
        VoiceEffect::PitchShift(p) => {
            let ratio = semitones_to_ratio(p.semitones);
            buffer.map_channels(|_, s| pitch_shift::resample(s, ratio))
        }
        VoiceEffect::Echo(p) => {
            let feedback = p.effective_feedback();
            if feedback != p.feedback {
                warn!(requested = p.feedback, applied = feedback, "echo feedback clamped");
            }
            buffer.map_channels(|_, s| echo::process(s, sr, p.delay_time, feedback))
        }
        VoiceEffect::Reverb(p) => {
            buffer.map_channels(|_, s| reverb::process(s, sr, p.room_size, p.wet))
        }
        VoiceEffect::Chorus(p) => buffer
            .map_channels(|_, s| chorus::chorus(s, sr, p.rate, p.depth, p.voices, p.wet)),
        VoiceEffect::Vibrato(p) => {
            buffer.map_channels(|_, s| chorus::vibrato(s, sr, p.rate, p.depth))
        }
        VoiceEffect::BassBoost(p) => {
            buffer.map_channels(|_, s| tone::bass_boost(s, sr, p.gain_db, p.cutoff))
        }
        VoiceEffect::Robot(p) => {
            buffer.map_channels(|_, s| ring_mod::process(s, sr, p.frequency, p.mix))
        }
        VoiceEffect::Monster(p) => {
            buffer.map_channels(|_, s| character::monster(s, sr, p.semitones))
        }
        VoiceEffect::Telephone => buffer.map_channels(|_, s| tone::telephone(s, sr)),
        VoiceEffect::Underwater(p) => {
            buffer.map_channels(|_, s| character::underwater(s, sr, p.cutoff))
        }
        VoiceEffect::OldRadio => buffer.map_channels(|channel, s| {
            character::old_radio(s, sr, derive_seed(ENGINE_SEED, id.as_str(), channel))
        }),
        VoiceEffect::OldComputer(p) => buffer.map_channels(|channel, s| {
            let seed = derive_seed(ENGINE_SEED, id.as_str(), channel);
            character::old_computer(s, sr, p.bits, seed)
        }),
        VoiceEffect::Clarity(p) => buffer.map_channels(|_, s| tone::clarity(s, sr, p.level)),
        VoiceEffect::AiVoice(p) => {
            buffer.map_channels(|_, s| ai_voice::process(s, sr, p.intensity))
        }
    };

    let peak = output.peak();
    if output.normalize_peak(1.0) {
        warn!(effect = %id, peak, "effect output renormalised to full scale");
    }

    debug!(
        effect = %id,
        channels = output.channel_count(),
        frames_in = buffer.len(),
        frames_out = output.len(),
        "applied voice effect"
    );
    Ok(output)
}

/// Applies an effect named by its string id with a sparse control map.
///
/// # Errors
/// * [`AudioError::UnsupportedEffect`](crate::AudioError::UnsupportedEffect)
///   for an unknown id, plus every error of [`apply_voice_effect`].
pub fn apply_voice_effect_by_id(
    buffer: &PcmBuffer,
    effect_id: &str,
    params: &EffectParameters,
) -> AudioResult<PcmBuffer> {
    let id: EffectId = effect_id.parse()?;
    let effect = VoiceEffect::from_parameters(id, params)?;
    apply_voice_effect(buffer, &effect)
}
