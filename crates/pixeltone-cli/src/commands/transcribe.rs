//! Transcribe command implementation

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use pixeltone_audio::note::midi_to_name;
use pixeltone_audio::transcribe_to_midi;

use super::output::{print_input, print_json};
use crate::input::read_wav;

/// Run the transcribe command
///
/// Prints the detected notes as a table, or as a JSON array with `json`.
pub fn run(input: &Path, json_output: bool) -> Result<ExitCode> {
    let buffer = read_wav(input)?;
    let notes = transcribe_to_midi(&buffer);

    if json_output {
        print_json(&notes)?;
        return Ok(ExitCode::SUCCESS);
    }

    print_input(input, &buffer);
    if notes.is_empty() {
        println!("{}", "No notes detected".yellow());
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{}",
        format!("{:<6} {:>5} {:>9} {:>9}", "Note", "MIDI", "Start", "Length").bold()
    );
    for note in &notes {
        println!(
            "{:<6} {:>5} {:>8.3}s {:>8.3}s",
            midi_to_name(i32::from(note.pitch)),
            note.pitch,
            note.start_time,
            note.duration
        );
    }
    println!("{} {}", "Notes:".green().bold(), notes.len());

    Ok(ExitCode::SUCCESS)
}
