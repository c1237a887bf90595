//! Shared output helpers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use pixeltone_audio::{PcmBuffer, WavBlob};
use serde::Serialize;

/// Pretty-printed JSON for a report.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize JSON")
}

/// Prints a report as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}

/// Writes text to a file.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).with_context(|| format!("Failed to write to: {}", path.display()))
}

/// Prints the one-line summary of a decoded input buffer.
pub fn print_input(path: &Path, buffer: &PcmBuffer) {
    println!(
        "{} {} ({} ch, {} Hz, {:.3} s)",
        "Input:".cyan().bold(),
        path.display(),
        buffer.channel_count(),
        buffer.sample_rate(),
        buffer.duration_seconds()
    );
}

/// Prints the summary of a written WAV file.
pub fn print_written(path: &Path, blob: &WavBlob) {
    println!(
        "{} {} ({} frames, {:.3} s)",
        "Wrote:".green().bold(),
        path.display(),
        blob.num_frames(),
        blob.duration_seconds()
    );
    println!("{} {}", "PCM hash:".dimmed(), &blob.pcm_hash()[..16]);
}
