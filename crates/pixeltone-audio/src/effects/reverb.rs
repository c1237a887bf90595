//! Mono Freeverb.
//!
//! Eight parallel damped comb filters feed four serial allpass filters. Comb
//! and allpass lengths are given in samples at 44.1 kHz and rescaled to the
//! buffer's rate; the room size also stretches the comb lengths.

// Freeverb tuning constants (in samples at 44.1kHz)
const COMB_TUNINGS: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
const ALLPASS_TUNINGS: [usize; 4] = [556, 441, 341, 225];

const FIXED_GAIN: f32 = 0.015;
const SCALE_WET: f32 = 3.0;
const SCALE_DAMPING: f32 = 0.4;
const SCALE_ROOM: f32 = 0.28;
const OFFSET_ROOM: f32 = 0.7;
const DAMPING: f32 = 0.5;

/// Comb filter with a one-pole lowpass in the feedback path.
struct CombFilter {
    buffer: Vec<f32>,
    index: usize,
    filter_store: f32,
    damp1: f32,
    damp2: f32,
    feedback: f32,
}

impl CombFilter {
    fn new(size: usize, feedback: f32, damping: f32) -> Self {
        Self {
            buffer: vec![0.0; size.max(1)],
            index: 0,
            filter_store: 0.0,
            damp1: damping,
            damp2: 1.0 - damping,
            feedback,
        }
    }

    fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.index];
        self.filter_store = output * self.damp2 + self.filter_store * self.damp1;
        self.buffer[self.index] = input + self.filter_store * self.feedback;
        self.index = (self.index + 1) % self.buffer.len();
        output
    }
}

struct AllpassFilter {
    buffer: Vec<f32>,
    index: usize,
}

impl AllpassFilter {
    fn new(size: usize) -> Self {
        Self {
            buffer: vec![0.0; size.max(1)],
            index: 0,
        }
    }

    fn process(&mut self, input: f32) -> f32 {
        let buf_out = self.buffer[self.index];
        let output = buf_out - input;
        self.buffer[self.index] = input + buf_out * 0.5;
        self.index = (self.index + 1) % self.buffer.len();
        output
    }
}

/// Reverberates one channel, mixing `(1 - wet) * dry + wet * reverb`.
pub(crate) fn process(samples: &[f32], sample_rate: f32, room_size: f32, wet: f32) -> Vec<f32> {
    let rate_scale = sample_rate / 44100.0;
    let length_scale = rate_scale * (0.6 + 0.8 * room_size);
    let feedback = room_size * SCALE_ROOM + OFFSET_ROOM;
    let damping = DAMPING * SCALE_DAMPING;

    let mut combs: Vec<CombFilter> = COMB_TUNINGS
        .iter()
        .map(|&size| CombFilter::new((size as f32 * length_scale) as usize, feedback, damping))
        .collect();
    let mut allpasses: Vec<AllpassFilter> = ALLPASS_TUNINGS
        .iter()
        .map(|&size| AllpassFilter::new((size as f32 * rate_scale) as usize))
        .collect();

    let dry = 1.0 - wet;
    samples
        .iter()
        .map(|&x| {
            let input = x * FIXED_GAIN;
            let mut out: f32 = combs.iter_mut().map(|comb| comb.process(input)).sum();
            for allpass in &mut allpasses {
                out = allpass.process(out);
            }
            dry * x + wet * out * SCALE_WET
        })
        .collect()
}
