//! Glyph-art, emoji-art and palette command implementations

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use pixeltone_image::{to_color_palette, to_emoji_art, to_glyph_art, PaletteEntry};

use super::output::print_json;
use crate::input::read_image;

/// Run the glyph-art command
pub fn run_glyph(input: &Path, width: u32) -> Result<ExitCode> {
    let image = read_image(input)?;
    let art = to_glyph_art(&image, width).context("Failed to render glyph art")?;
    println!("{}", art);
    Ok(ExitCode::SUCCESS)
}

/// Run the emoji-art command
pub fn run_emoji(input: &Path, width: u32) -> Result<ExitCode> {
    let image = read_image(input)?;
    let art = to_emoji_art(&image, width).context("Failed to render emoji art")?;
    println!("{}", art);
    Ok(ExitCode::SUCCESS)
}

/// Parses `#rrggbb` back into channels for the swatch.
fn swatch_rgb(entry: &PaletteEntry) -> Option<(u8, u8, u8)> {
    let hex = entry.hex.strip_prefix('#')?;
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Run the palette command
pub fn run_palette(input: &Path, max_colors: usize, json_output: bool) -> Result<ExitCode> {
    let image = read_image(input)?;
    let palette = to_color_palette(&image, max_colors);

    if json_output {
        print_json(&palette)?;
        return Ok(ExitCode::SUCCESS);
    }

    let total = image.pixel_count().max(1) as f64;
    for entry in &palette {
        let swatch = match swatch_rgb(entry) {
            Some((r, g, b)) => "    ".on_truecolor(r, g, b).to_string(),
            None => "    ".to_string(),
        };
        println!(
            "{} {} {:>8} {:>6.2}%",
            swatch,
            entry.hex,
            entry.count,
            entry.count as f64 / total * 100.0
        );
    }
    Ok(ExitCode::SUCCESS)
}
