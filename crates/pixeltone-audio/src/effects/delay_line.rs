//! Ring buffer shared by the delay-based effects.

/// A ring buffer for implementing delay lines with interpolation support.
#[derive(Debug, Clone)]
pub(crate) struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Creates a delay line able to look back `max_samples` samples.
    pub fn new(max_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_samples.max(4)],
            write_pos: 0,
        }
    }

    /// Writes a sample and advances the write position.
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Reads the sample written `delay_samples` writes ago (1 = most recent).
    pub fn read(&self, delay_samples: usize) -> f32 {
        let len = self.buffer.len();
        let delay = delay_samples.min(len);
        self.buffer[(self.write_pos + len - delay) % len]
    }

    /// Reads at a fractional delay using linear interpolation.
    pub fn read_interpolated(&self, delay_samples: f32) -> f32 {
        let delay = delay_samples.max(1.0);
        let delay_int = delay.floor() as usize;
        let frac = delay - delay_int as f32;

        let a = self.read(delay_int);
        let b = self.read(delay_int + 1);
        a * (1.0 - frac) + b * frac
    }

    /// Reads at `delay_samples` before writing `input`, returning the delayed sample.
    pub fn read_and_write(&mut self, input: f32, delay_samples: f32) -> f32 {
        let delayed = self.read_interpolated(delay_samples);
        self.write(input);
        delayed
    }
}
