//! Tests for the voice effect engine.

use std::f32::consts::TAU;

use pretty_assertions::assert_eq;

use super::*;
use crate::analysis::analyze_buffer;
use crate::bitcrush::{crush_samples, hold_factor, quantization_step};
use crate::error::AudioError;

fn voice_buffer(channels: usize, len: usize) -> PcmBuffer {
    let channel: Vec<f32> = (0..len)
        .map(|i| {
            let t = i as f32 / 44100.0;
            0.4 * (TAU * 220.0 * t).sin() + 0.2 * (TAU * 1320.0 * t).sin()
        })
        .collect();
    PcmBuffer::new(44100, vec![channel; channels]).unwrap()
}

fn sine(freq: f32, sample_rate: u32, len: usize, amplitude: f32) -> Vec<f32> {
    (0..len)
        .map(|i| (TAU * freq * i as f32 / sample_rate as f32).sin() * amplitude)
        .collect()
}

fn rms(samples: &[f32]) -> f32 {
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

// =========================================================================
// Identifier tests
// =========================================================================

#[test]
fn test_effect_ids_round_trip() {
    for id in EffectId::ALL {
        assert_eq!(id.as_str().parse::<EffectId>().unwrap(), id);
        assert_eq!(id.to_string(), id.as_str());
        assert_eq!(VoiceEffect::with_defaults(id).id(), id);
    }
}

#[test]
fn test_unknown_effect_id() {
    let err = "kazoo".parse::<EffectId>().unwrap_err();
    assert_eq!(err, AudioError::unsupported_effect("kazoo"));

    let buffer = voice_buffer(1, 100);
    let err =
        apply_voice_effect_by_id(&buffer, "PitchShift", &EffectParameters::new()).unwrap_err();
    assert_eq!(err.code(), "AUDIO_002");
}

#[test]
fn test_parameter_names_cover_from_parameters() {
    // Setting every advertised control to its default must resolve cleanly
    for id in EffectId::ALL {
        let defaults = serde_json::to_value(VoiceEffect::with_defaults(id)).unwrap();
        let params: EffectParameters = id
            .parameter_names()
            .iter()
            .map(|&name| (name, defaults[name].as_f64().unwrap()))
            .collect();
        assert_eq!(
            VoiceEffect::from_parameters(id, &params).unwrap(),
            VoiceEffect::with_defaults(id)
        );
    }
}

// =========================================================================
// Parameter resolution
// =========================================================================

#[test]
fn test_unset_controls_take_defaults() {
    let effect = VoiceEffect::from_parameters(EffectId::Chorus, &EffectParameters::new()).unwrap();
    assert_eq!(effect, VoiceEffect::Chorus(ChorusParams::default()));

    let params = EffectParameters::new().with("chorusVoices", 4.0).with("robotMix", 0.1);
    let effect = VoiceEffect::from_parameters(EffectId::Chorus, &params).unwrap();
    assert_eq!(
        effect,
        VoiceEffect::Chorus(ChorusParams {
            voices: 4,
            ..ChorusParams::default()
        })
    );
}

#[test]
fn test_out_of_range_controls_are_rejected() {
    let cases = [
        (EffectId::PitchShift, "pitchShift", 25.0),
        (EffectId::Echo, "delayTime", 3.0),
        (EffectId::Reverb, "reverbWet", 1.5),
        (EffectId::Chorus, "chorusVoices", 5.0),
        (EffectId::Chorus, "chorusVoices", 2.5),
        (EffectId::Vibrato, "vibratoRate", 0.0),
        (EffectId::BassBoost, "bassBoost", -1.0),
        (EffectId::Robot, "robotFrequency", 5.0),
        (EffectId::Monster, "monsterPitch", 1.0),
        (EffectId::Underwater, "underwaterCutoff", 50.0),
        (EffectId::OldComputer, "bitCrushLevel", 0.0),
        (EffectId::Clarity, "clarityLevel", -1.5),
        (EffectId::AiVoice, "intensity", 2.0),
        (EffectId::Reverb, "reverbRoomSize", f64::NAN),
    ];
    for (id, name, value) in cases {
        let params = EffectParameters::new().with(name, value);
        match VoiceEffect::from_parameters(id, &params) {
            Err(AudioError::InvalidParameter { name: got, .. }) => assert_eq!(got, name),
            other => panic!("{} {}={} resolved to {:?}", id, name, value, other),
        }
    }
}

#[test]
fn test_feedback_is_clamped_not_rejected() {
    let params = EffectParameters::new().with("feedback", 0.95);
    let effect = VoiceEffect::from_parameters(EffectId::Echo, &params).unwrap();
    let VoiceEffect::Echo(echo) = effect else {
        panic!("expected echo");
    };
    assert_eq!(echo.effective_feedback(), MAX_FEEDBACK);

    let params = EffectParameters::new().with("feedback", f64::INFINITY);
    assert!(VoiceEffect::from_parameters(EffectId::Echo, &params).is_err());
}

#[test]
fn test_parameters_merge_overrides() {
    let mut base = EffectParameters::new().with("delayTime", 0.5).with("feedback", 0.2);
    base.merge(&EffectParameters::new().with("feedback", 0.4));
    assert_eq!(base.get("delayTime"), Some(0.5));
    assert_eq!(base.get("feedback"), Some(0.4));
    assert_eq!(base.len(), 2);
}

// =========================================================================
// Serialization
// =========================================================================

#[test]
fn test_voice_effect_json_shape() {
    let effect = VoiceEffect::Echo(EchoParams {
        delay_time: 0.25,
        feedback: 0.5,
    });
    let json = serde_json::to_value(&effect).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"effect": "echo", "delayTime": 0.25, "feedback": 0.5})
    );

    let parsed: VoiceEffect = serde_json::from_str(r#"{"effect": "old-radio"}"#).unwrap();
    assert_eq!(parsed, VoiceEffect::OldRadio);

    let parsed: VoiceEffect =
        serde_json::from_str(r#"{"effect": "robot", "robotMix": 0.5}"#).unwrap();
    assert_eq!(
        parsed,
        VoiceEffect::Robot(RobotParams {
            mix: 0.5,
            ..RobotParams::default()
        })
    );
}

#[test]
fn test_effect_parameters_json_is_flat_object() {
    let params: EffectParameters =
        serde_json::from_str(r#"{"pitchShift": 7, "intensity": 0.25}"#).unwrap();
    assert_eq!(params.get("pitchShift"), Some(7.0));
    assert_eq!(params.get("intensity"), Some(0.25));
}

// =========================================================================
// Processing
// =========================================================================

#[test]
fn test_every_effect_preserves_shape_except_pitch_shift() {
    let buffer = voice_buffer(2, 6000);
    for id in EffectId::ALL {
        let out = apply_voice_effect(&buffer, &VoiceEffect::with_defaults(id)).unwrap();
        assert_eq!(out.channel_count(), 2, "{}", id);
        assert_eq!(out.sample_rate(), 44100, "{}", id);
        assert_eq!(out.len(), 6000, "{}", id);
        assert!(out.peak() <= 1.0 + 1e-6, "{}", id);
        assert!(out.samples().all(f32::is_finite), "{}", id);
    }
}

#[test]
fn test_pitch_shift_changes_length() {
    let buffer = voice_buffer(1, 6000);
    let up = VoiceEffect::PitchShift(PitchShiftParams { semitones: 12.0 });
    let down = VoiceEffect::PitchShift(PitchShiftParams { semitones: -12.0 });
    assert_eq!(apply_voice_effect(&buffer, &up).unwrap().len(), 3000);
    assert_eq!(apply_voice_effect(&buffer, &down).unwrap().len(), 12000);
}

#[test]
fn test_output_is_normalised_when_it_overshoots() {
    let buffer = PcmBuffer::mono(44100, vec![0.9; 44100]).unwrap();
    let boost = VoiceEffect::BassBoost(BassBoostParams {
        gain_db: 24.0,
        cutoff: 150.0,
    });
    let out = apply_voice_effect(&buffer, &boost).unwrap();
    assert!((out.peak() - 1.0).abs() < 1e-6);
}

#[test]
fn test_seeded_effects_are_deterministic() {
    let buffer = voice_buffer(2, 4000);
    for id in [EffectId::OldRadio, EffectId::OldComputer] {
        let effect = VoiceEffect::with_defaults(id);
        let a = apply_voice_effect(&buffer, &effect).unwrap();
        let b = apply_voice_effect(&buffer, &effect).unwrap();
        assert_eq!(a, b);
        // Channels draw independent noise
        assert_ne!(a.channel(0), a.channel(1));
    }
}

#[test]
fn test_empty_buffer_is_rejected() {
    let empty = PcmBuffer::mono(44100, vec![]).unwrap();
    assert_eq!(
        apply_voice_effect(&empty, &VoiceEffect::Telephone),
        Err(AudioError::EmptyBuffer)
    );
}

#[test]
fn test_by_id_matches_typed_path() {
    let buffer = voice_buffer(1, 3000);
    let params = EffectParameters::new().with("robotFrequency", 120.0);
    let by_id = apply_voice_effect_by_id(&buffer, "robot", &params).unwrap();
    let typed = apply_voice_effect(
        &buffer,
        &VoiceEffect::Robot(RobotParams {
            frequency: 120.0,
            mix: 0.8,
        }),
    )
    .unwrap();
    assert_eq!(by_id, typed);
}

// =========================================================================
// Character voices
// =========================================================================

#[test]
fn test_monster_lowers_pitch() {
    let buffer = PcmBuffer::mono(44100, sine(440.0, 44100, 44100, 0.5)).unwrap();
    let out = apply_voice_effect(&buffer, &VoiceEffect::with_defaults(EffectId::Monster)).unwrap();

    // Six semitones down from A4 is about 311 Hz
    let dominant = analyze_buffer(&out).unwrap().dominant_frequency;
    assert!(dominant > 250.0 && dominant < 380.0, "dominant {}", dominant);
}

#[test]
fn test_underwater_attenuates_above_cutoff() {
    let effect = VoiceEffect::Underwater(UnderwaterParams { cutoff: 500.0 });
    let through = |freq: f32| {
        let input = sine(freq, 44100, 44100, 0.5);
        let buffer = PcmBuffer::mono(44100, input.clone()).unwrap();
        let out = apply_voice_effect(&buffer, &effect).unwrap();
        rms(&out.channel(0).unwrap()[4410..]) / rms(&input[4410..])
    };

    let passed = through(200.0);
    let stopped = through(3000.0);
    assert!(passed > 0.4, "200 Hz kept {}", passed);
    assert!(stopped < 0.05, "3 kHz kept {}", stopped);
}

#[test]
fn test_reverb_tail_scales_with_sample_rate() {
    let effect = VoiceEffect::Reverb(ReverbParams {
        room_size: 0.5,
        wet: 1.0,
    });
    let first_echo = |sample_rate: u32| {
        let mut impulse = vec![0.0; sample_rate as usize];
        impulse[0] = 1.0;
        let buffer = PcmBuffer::mono(sample_rate, impulse).unwrap();
        let out = apply_voice_effect(&buffer, &effect).unwrap();
        assert!(out.samples().all(f32::is_finite));
        out.channel(0).unwrap().iter().position(|s| s.abs() > 0.0)
    };

    // The shortest comb is 1116 samples at 44.1 kHz, i.e. about 25 ms
    assert_eq!(first_echo(44100), Some(1116));
    assert_eq!(first_echo(22050), Some(558));
}

#[test]
fn test_old_computer_at_other_rates() {
    let effect = VoiceEffect::OldComputer(OldComputerParams { bits: 8 });
    let step = quantization_step(8);
    // Seeded noise spans a quarter step and the hum peaks at 0.01
    let tolerance = step * 0.25 + 0.01 + 1e-6;

    for sample_rate in [4000u32, 6000, 22050, 48000] {
        let input = sine(1000.0_f32.min(sample_rate as f32 / 5.0), sample_rate, 4000, 0.8);
        let buffer = PcmBuffer::mono(sample_rate, input.clone()).unwrap();
        let out = apply_voice_effect(&buffer, &effect).unwrap();
        assert_eq!(out.len(), input.len(), "{} Hz", sample_rate);

        let expected = crush_samples(&input, step, hold_factor(sample_rate, 8000));
        for (i, (got, want)) in out.channel(0).unwrap().iter().zip(&expected).enumerate() {
            assert!(
                (got - want).abs() <= tolerance,
                "{} Hz sample {}: {} vs {}",
                sample_rate,
                i,
                got,
                want
            );
        }
    }

    // Below the 8 kHz target every sample is its own hold run
    assert_eq!(hold_factor(4000, 8000), 1);
    assert_eq!(hold_factor(22050, 8000), 3);
}
