//! Image-sound and image-song command implementations

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use pixeltone_audio::{render_song, render_sound_effect};
use pixeltone_image::{image_to_song, image_to_sound_params};

use super::output::{print_json, print_written};
use crate::input::{read_image, write_wav};

/// Sample rate used when rendering mapped audio.
pub const RENDER_SAMPLE_RATE: u32 = 44100;

/// Run the image-sound command
///
/// Prints the mapped parameters and optionally renders them to a WAV file.
pub fn run_sound(input: &Path, output: Option<&Path>, json_output: bool) -> Result<ExitCode> {
    let image = read_image(input)?;
    let params = image_to_sound_params(&image);

    if json_output {
        print_json(&params)?;
    } else {
        println!(
            "{} {} ({}x{})",
            "Image:".cyan().bold(),
            input.display(),
            image.width(),
            image.height()
        );
        println!("{} {}", "Sound:".cyan().bold(), params.name.bold());
        println!(
            "  {:.1} Hz -> {:.1} Hz, {:.2} s, volume {:.2}",
            params.start_freq, params.end_freq, params.duration, params.volume
        );
    }

    if let Some(path) = output {
        let buffer = render_sound_effect(&params, RENDER_SAMPLE_RATE)
            .context("Failed to render sound")?;
        let blob = write_wav(path, &buffer)?;
        if !json_output {
            print_written(path, &blob);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Run the image-song command
///
/// Prints the composed song and optionally renders it to a WAV file.
pub fn run_song(
    input: &Path,
    steps: u32,
    output: Option<&Path>,
    json_output: bool,
) -> Result<ExitCode> {
    let image = read_image(input)?;
    let song = image_to_song(&image, steps).context("Failed to compose song")?;

    if json_output {
        print_json(&song)?;
    } else {
        println!(
            "{} {} ({}x{})",
            "Image:".cyan().bold(),
            input.display(),
            image.width(),
            image.height()
        );
        println!("{} {} BPM, {} steps", "Song:".cyan().bold(), song.bpm, song.steps());
        for track in &song.tracks {
            let cells: Vec<String> = track
                .notes
                .iter()
                .map(|note| format!("{:<4}", note.as_deref().unwrap_or(".")))
                .collect();
            println!(
                "  {:<9} {}",
                format!("{:?}", track.instrument).to_lowercase().dimmed(),
                cells.join("")
            );
        }
    }

    if let Some(path) = output {
        let buffer = render_song(&song, RENDER_SAMPLE_RATE).context("Failed to render song")?;
        let blob = write_wav(path, &buffer)?;
        if !json_output {
            print_written(path, &blob);
        }
    }

    Ok(ExitCode::SUCCESS)
}
