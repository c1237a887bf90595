//! MIDI note numbers, frequencies and note names.
//!
//! Equal temperament with A4 = 440 Hz = MIDI 69. Octave numbers follow the
//! scientific convention, so MIDI 60 is "C4".

/// Reference pitch for A4 in Hz.
pub const A4_FREQUENCY: f64 = 440.0;
/// MIDI number of A4.
pub const A4_MIDI: i32 = 69;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Semitone offsets for natural note letters within an octave.
const SEMITONE_MAP: [(char, i32); 7] = [
    ('C', 0),
    ('D', 2),
    ('E', 4),
    ('F', 5),
    ('G', 7),
    ('A', 9),
    ('B', 11),
];

/// Converts a MIDI note number to frequency in Hz.
pub fn midi_to_freq(midi: f64) -> f64 {
    A4_FREQUENCY * 2.0_f64.powf((midi - A4_MIDI as f64) / 12.0)
}

/// Converts a frequency to a fractional MIDI note number.
///
/// Returns `None` for non-positive or non-finite frequencies.
pub fn freq_to_midi_float(freq: f64) -> Option<f64> {
    if freq > 0.0 && freq.is_finite() {
        Some(A4_MIDI as f64 + 12.0 * (freq / A4_FREQUENCY).log2())
    } else {
        None
    }
}

/// Converts a frequency to the nearest MIDI note, clamped to 0-127.
pub fn freq_to_midi(freq: f64) -> Option<u8> {
    freq_to_midi_float(freq).map(|midi| midi.round().clamp(0.0, 127.0) as u8)
}

/// Formats a MIDI note number as a name such as "A4" or "C#3".
pub fn midi_to_name(midi: i32) -> String {
    let pitch_class = midi.rem_euclid(12) as usize;
    let octave = midi.div_euclid(12) - 1;
    format!("{}{}", NOTE_NAMES[pitch_class], octave)
}

/// Name of the note nearest to a frequency.
pub fn freq_to_name(freq: f64) -> Option<String> {
    freq_to_midi(freq).map(|midi| midi_to_name(midi as i32))
}

/// Parses a note name ("C4", "A#3", "Bb5", "C-1") into a MIDI number.
pub fn name_to_midi(name: &str) -> Option<i32> {
    let mut chars = name.trim().chars().peekable();

    let letter = chars.next()?.to_ascii_uppercase();
    let mut semitone = SEMITONE_MAP
        .iter()
        .find(|(c, _)| *c == letter)
        .map(|(_, s)| *s)?;

    match chars.peek() {
        Some('#') => {
            semitone += 1;
            chars.next();
        }
        Some('b') => {
            semitone -= 1;
            chars.next();
        }
        _ => {}
    }

    let octave: String = chars.collect();
    let octave: i32 = octave.parse().ok()?;
    Some((octave + 1) * 12 + semitone)
}

/// Frequency of a named note.
pub fn name_to_freq(name: &str) -> Option<f64> {
    name_to_midi(name).map(|midi| midi_to_freq(midi as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_midi_frequency_round_trip() {
        assert!((midi_to_freq(69.0) - 440.0).abs() < 1e-9);
        assert!((midi_to_freq(60.0) - 261.6256).abs() < 1e-3);
        assert_eq!(freq_to_midi(440.0), Some(69));
        assert_eq!(freq_to_midi(261.63), Some(60));
        assert_eq!(freq_to_midi(0.0), None);
        assert_eq!(freq_to_midi(1e9), Some(127));
    }

    #[test]
    fn test_names() {
        assert_eq!(midi_to_name(69), "A4");
        assert_eq!(midi_to_name(60), "C4");
        assert_eq!(midi_to_name(61), "C#4");
        assert_eq!(midi_to_name(0), "C-1");
        assert_eq!(freq_to_name(440.0).as_deref(), Some("A4"));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(name_to_midi("A4"), Some(69));
        assert_eq!(name_to_midi("C2"), Some(36));
        assert_eq!(name_to_midi("a#3"), Some(58));
        assert_eq!(name_to_midi("Bb3"), Some(58));
        assert_eq!(name_to_midi("C-1"), Some(0));
        assert_eq!(name_to_midi("H4"), None);
        assert_eq!(name_to_midi("C"), None);
    }
}
