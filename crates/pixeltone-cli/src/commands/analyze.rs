//! Analyze command implementation
//!
//! Summarizes a WAV file: loudness, pitch, tempo and spectral metrics.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use pixeltone_audio::{analyze_buffer, LocalAnalysisResult};

use super::output::{print_input, to_json, write_text};
use crate::input::read_wav;

/// Run the analyze command
///
/// # Arguments
/// * `input` - WAV file to analyze
/// * `output` - Optional JSON report path
/// * `json_output` - Print the JSON report instead of the colored summary
pub fn run(input: &Path, output: Option<&Path>, json_output: bool) -> Result<ExitCode> {
    let buffer = read_wav(input)?;
    let result = analyze_buffer(&buffer).context("Audio analysis failed")?;
    let json = to_json(&result)?;

    if json_output {
        println!("{}", json);
    } else {
        print_input(input, &buffer);
        print_summary(&result);
    }

    if let Some(path) = output {
        write_text(path, &json)?;
        if !json_output {
            println!("\n{} {}", "Output written to:".green().bold(), path.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_summary(result: &LocalAnalysisResult) {
    let row = |label: &str, value: String| println!("  {:<20} {}", label.dimmed(), value);

    println!("{}", "Loudness".bold());
    row("Average", format!("{:.2} dB", result.average_loudness));
    row("Peak", format!("{:.2} dB", result.peak_loudness));
    let clipping = format!("{:.3}%", result.clipping_percentage);
    row(
        "Clipping",
        if result.clipping_percentage > 0.0 {
            clipping.red().to_string()
        } else {
            clipping
        },
    );
    row("DC offset", format!("{:.6}", result.dc_offset));
    row("Silence", format!("{:.1}%", result.silence_ratio * 100.0));

    println!("{}", "Pitch and tempo".bold());
    row(
        "Dominant frequency",
        format!("{:.2} Hz", result.dominant_frequency),
    );
    row(
        "Estimated pitch",
        result
            .estimated_pitch
            .clone()
            .unwrap_or_else(|| "-".to_string()),
    );
    row(
        "Estimated BPM",
        match result.estimated_bpm {
            0 => "-".to_string(),
            bpm => bpm.to_string(),
        },
    );

    println!("{}", "Timbre".bold());
    row(
        "Harmonic richness",
        format!("{:.1}", result.harmonic_richness),
    );
    row(
        "Spectral centroid",
        format!("{:.1} Hz", result.spectral_centroid),
    );
    row(
        "Zero crossing rate",
        format!("{:.4}", result.zero_crossing_rate),
    );
}
