//! Ring modulation against a sine carrier.

use std::f32::consts::TAU;

/// Mixes `input * sin(2π f t)` with the dry signal.
///
/// ```text
/// output = mix * input * carrier + (1 - mix) * input
/// ```
pub(crate) fn process(samples: &[f32], sample_rate: f32, frequency: f32, mix: f32) -> Vec<f32> {
    let dry = 1.0 - mix;
    let phase_inc = frequency / sample_rate;
    let mut phase = 0.0f32;

    samples
        .iter()
        .map(|&x| {
            let carrier = (TAU * phase).sin();
            phase += phase_inc;
            if phase >= 1.0 {
                phase -= 1.0;
            }
            x * carrier * mix + x * dry
        })
        .collect()
}
