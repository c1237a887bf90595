//! Pixel-art reductions: glyph art, emoji art and colour palettes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{hex8, Rgb};
use crate::error::{ImageError, ImageResult};
use crate::pixels::PixelBuffer;

/// Glyphs from lightest to darkest.
pub const GLYPHS: &str = " .:-=+*#%@";
/// Largest grid width the art reductions accept.
pub const MAX_GRID_WIDTH: u32 = 1000;
/// Height-to-width correction for text cells, which are about twice as tall
/// as they are wide.
pub const GLYPH_ASPECT: f64 = 0.5;

/// Square emoji and the colour each stands for.
pub const EMOJI_PALETTE: [(&str, [u8; 3]); 9] = [
    ("⬛", [0, 0, 0]),
    ("⬜", [255, 255, 255]),
    ("🟥", [221, 46, 68]),
    ("🟧", [244, 144, 12]),
    ("🟨", [253, 203, 88]),
    ("🟩", [120, 177, 89]),
    ("🟦", [85, 172, 238]),
    ("🟪", [170, 142, 214]),
    ("🟫", [193, 105, 79]),
];

/// One colour of a palette and how many pixels carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// Lower-case `#rrggbb`.
    pub hex: String,
    pub count: usize,
}

fn check_grid_width(grid_width: u32) -> ImageResult<()> {
    if (1..=MAX_GRID_WIDTH).contains(&grid_width) {
        Ok(())
    } else {
        Err(ImageError::invalid_param(
            "grid_width",
            format!("must be 1-{}, got {}", MAX_GRID_WIDTH, grid_width),
        ))
    }
}

/// Glyph for a luminance in [0, 1]; bright cells get sparse glyphs.
pub fn glyph_for_luminance(luminance: f64) -> char {
    let glyphs: Vec<char> = GLYPHS.chars().collect();
    let darkness = 1.0 - luminance.clamp(0.0, 1.0);
    let index = (darkness * (glyphs.len() - 1) as f64).round() as usize;
    glyphs[index.min(glyphs.len() - 1)]
}

/// Renders the image as text, `grid_width` glyphs per row.
pub fn to_glyph_art(image: &PixelBuffer, grid_width: u32) -> ImageResult<String> {
    check_grid_width(grid_width)?;
    let (cols, rows) = image.fit_grid(grid_width, GLYPH_ASPECT);
    let grid = image.downsample(cols, rows);
    let lines: Vec<String> = (0..rows)
        .map(|row| {
            grid.row(row)
                .iter()
                .map(|cell| glyph_for_luminance(cell.luminance()))
                .collect()
        })
        .collect();
    debug!(cols, rows, "rendered glyph art");
    Ok(lines.join("\n"))
}

/// Nearest palette emoji by RGB distance. Ties go to the earlier entry.
pub fn nearest_emoji(color: &Rgb) -> &'static str {
    let mut best = EMOJI_PALETTE[0].0;
    let mut best_distance = f64::INFINITY;
    for (emoji, rgb) in EMOJI_PALETTE {
        let distance = color.distance_squared(&Rgb::from_rgb8(rgb));
        if distance < best_distance {
            best = emoji;
            best_distance = distance;
        }
    }
    best
}

/// Renders the image as rows of square emoji, `grid_width` per row.
pub fn to_emoji_art(image: &PixelBuffer, grid_width: u32) -> ImageResult<String> {
    check_grid_width(grid_width)?;
    let (cols, rows) = image.fit_grid(grid_width, 1.0);
    let grid = image.downsample(cols, rows);
    let lines: Vec<String> = (0..rows)
        .map(|row| grid.row(row).iter().map(nearest_emoji).collect())
        .collect();
    debug!(cols, rows, "rendered emoji art");
    Ok(lines.join("\n"))
}

/// Most frequent exact colours among the visible pixels.
///
/// Sorted by count (descending), then hex (ascending).
pub fn to_color_palette(image: &PixelBuffer, max_colors: usize) -> Vec<PaletteEntry> {
    count_colors(image.pixels(), max_colors)
}

/// Like [`to_color_palette`] but only samples every `stride`-th pixel.
///
/// # Errors
/// [`ImageError::InvalidParameter`] when `stride` is zero.
pub fn to_color_palette_strided(
    image: &PixelBuffer,
    max_colors: usize,
    stride: usize,
) -> ImageResult<Vec<PaletteEntry>> {
    if stride == 0 {
        return Err(ImageError::invalid_param("stride", "must be greater than 0"));
    }
    Ok(count_colors(image.pixels().step_by(stride), max_colors))
}

fn count_colors<I>(pixels: I, max_colors: usize) -> Vec<PaletteEntry>
where
    I: Iterator<Item = [u8; 4]>,
{
    let mut counts: HashMap<[u8; 3], usize> = HashMap::new();
    for [r, g, b, a] in pixels {
        if a > 0 {
            *counts.entry([r, g, b]).or_insert(0) += 1;
        }
    }

    let mut entries: Vec<PaletteEntry> = counts
        .into_iter()
        .map(|([r, g, b], count)| PaletteEntry {
            hex: hex8(r, g, b),
            count,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.hex.cmp(&b.hex)));
    entries.truncate(max_colors);
    debug!(colors = entries.len(), "built palette");
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn gradient(width: u32) -> PixelBuffer {
        let mut rgba = Vec::new();
        for x in 0..width {
            let v = (x * 255 / (width - 1)) as u8;
            rgba.extend_from_slice(&[v, v, v, 255]);
        }
        PixelBuffer::new(width, 1, rgba).unwrap()
    }

    #[test]
    fn test_glyph_extremes() {
        assert_eq!(glyph_for_luminance(1.0), ' ');
        assert_eq!(glyph_for_luminance(0.0), '@');
    }

    #[test]
    fn test_glyph_art_gradient() {
        let art = to_glyph_art(&gradient(10), 10).unwrap();
        assert_eq!(art, "@%#*+=-:. ");
    }

    #[test]
    fn test_glyph_art_rows() {
        let image = PixelBuffer::filled(20, 20, [255, 255, 255, 255]).unwrap();
        let art = to_glyph_art(&image, 8).unwrap();
        let lines: Vec<&str> = art.split('\n').collect();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| *l == "        "));
    }

    #[test]
    fn test_grid_width_range() {
        let image = gradient(4);
        assert!(to_glyph_art(&image, 0).is_err());
        assert!(to_emoji_art(&image, 1001).is_err());
        assert!(to_emoji_art(&image, 1000).is_ok());
    }

    #[test]
    fn test_emoji_art() {
        let mut rgba = Vec::new();
        rgba.extend_from_slice(&[250, 10, 10, 255]);
        rgba.extend_from_slice(&[10, 10, 10, 255]);
        let image = PixelBuffer::new(2, 1, rgba).unwrap();
        assert_eq!(to_emoji_art(&image, 2).unwrap(), "🟥⬛");
    }

    #[test]
    fn test_palette_order_and_alpha() {
        let mut rgba = Vec::new();
        for pixel in [
            [0, 0, 255, 255],
            [255, 0, 0, 255],
            [255, 0, 0, 255],
            [0, 255, 0, 255],
            [9, 9, 9, 0],
        ] {
            rgba.extend_from_slice(&pixel);
        }
        let image = PixelBuffer::new(5, 1, rgba).unwrap();
        let palette = to_color_palette(&image, 8);
        assert_eq!(
            palette,
            vec![
                PaletteEntry {
                    hex: "#ff0000".into(),
                    count: 2
                },
                PaletteEntry {
                    hex: "#0000ff".into(),
                    count: 1
                },
                PaletteEntry {
                    hex: "#00ff00".into(),
                    count: 1
                },
            ]
        );
        assert_eq!(to_color_palette(&image, 1).len(), 1);
    }

    #[test]
    fn test_strided_palette() {
        let image = gradient(8);
        let every_other = to_color_palette_strided(&image, 16, 2).unwrap();
        assert_eq!(every_other.len(), 4);
        assert!(to_color_palette_strided(&image, 16, 0).is_err());
    }
}
