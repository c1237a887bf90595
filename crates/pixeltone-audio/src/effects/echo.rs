//! Feedback echo.

use super::delay_line::DelayLine;

/// Largest feedback the echo accepts; larger values are clamped to it.
pub const MAX_FEEDBACK: f32 = 0.7;

/// Applies `y[n] = x[n] + feedback * y[n - d]` with
/// `d = round(delay_time * sample_rate)`.
pub(crate) fn process(
    samples: &[f32],
    sample_rate: f32,
    delay_time: f32,
    feedback: f32,
) -> Vec<f32> {
    let delay = ((delay_time * sample_rate).round() as usize).max(1);
    let feedback = feedback.clamp(0.0, MAX_FEEDBACK);
    let mut line = DelayLine::new(delay + 1);

    samples
        .iter()
        .map(|&x| {
            let y = x + feedback * line.read(delay);
            line.write(y);
            y
        })
        .collect()
}
