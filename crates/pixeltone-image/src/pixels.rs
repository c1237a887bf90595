//! RGBA pixel buffers and grid downsampling.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::{ImageError, ImageResult};

/// Largest row count [`PixelBuffer::fit_grid`] returns.
pub const MAX_GRID_ROWS: u32 = 1000;

/// An 8-bit RGBA image, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPixelBuffer")]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

#[derive(Deserialize)]
struct RawPixelBuffer {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl TryFrom<RawPixelBuffer> for PixelBuffer {
    type Error = ImageError;

    fn try_from(raw: RawPixelBuffer) -> ImageResult<Self> {
        PixelBuffer::new(raw.width, raw.height, raw.rgba)
    }
}

impl PixelBuffer {
    /// Wraps RGBA bytes.
    ///
    /// # Errors
    /// * [`ImageError::EmptyImage`] when either dimension is zero.
    /// * [`ImageError::InvalidDimensions`] when `rgba.len() != width * height * 4`.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> ImageResult<Self> {
        if width == 0 || height == 0 {
            return Err(ImageError::EmptyImage);
        }
        let expected = width as u64 * height as u64 * 4;
        if rgba.len() as u64 != expected {
            return Err(ImageError::InvalidDimensions {
                width,
                height,
                len: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// An image filled with one colour.
    pub fn filled(width: u32, height: u32, pixel: [u8; 4]) -> ImageResult<Self> {
        let count = width as usize * height as usize;
        Self::new(width, height, pixel.repeat(count))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.rgba.len() / 4
    }

    /// Pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.rgba[idx],
            self.rgba[idx + 1],
            self.rgba[idx + 2],
            self.rgba[idx + 3],
        ]
    }

    /// Iterates over all pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.rgba
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Grid size that fits `max_width` columns while keeping the aspect ratio.
    ///
    /// `aspect` scales the row count, for glyph cells that are taller than wide.
    /// Rows are capped at [`MAX_GRID_ROWS`], so very tall images lose their
    /// proportions instead of producing an unbounded grid.
    pub fn fit_grid(&self, max_width: u32, aspect: f64) -> (u32, u32) {
        let cols = max_width.max(1);
        let rows = (cols as f64 * self.height as f64 / self.width as f64 * aspect).round();
        (cols, (rows.min(MAX_GRID_ROWS as f64) as u32).max(1))
    }

    /// Box-average downsample into `cols` x `rows` cells.
    ///
    /// Each cell averages the RGB of the source pixels it covers; a cell always
    /// covers at least one pixel, so grids larger than the image repeat pixels.
    pub fn downsample(&self, cols: u32, rows: u32) -> ColorGrid {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let span = |index: u32, cells: u32, size: u32| -> (u32, u32) {
            let start = (index as u64 * size as u64 / cells as u64) as u32;
            let end = ((index as u64 + 1) * size as u64 / cells as u64) as u32;
            let start = start.min(size - 1);
            (start, end.max(start + 1).min(size))
        };

        let mut cells = Vec::with_capacity(cols as usize * rows as usize);
        for row in 0..rows {
            let (y0, y1) = span(row, rows, self.height);
            for col in 0..cols {
                let (x0, x1) = span(col, cols, self.width);
                let covered: Vec<Rgb> = (y0..y1)
                    .flat_map(|y| (x0..x1).map(move |x| (x, y)))
                    .map(|(x, y)| Rgb::from_rgba8(self.get(x, y)))
                    .collect();
                cells.push(Rgb::average(&covered));
            }
        }
        ColorGrid { cols, rows, cells }
    }

    /// Average colour of the whole image.
    pub fn average_color(&self) -> Rgb {
        let colors: Vec<Rgb> = self.pixels().map(Rgb::from_rgba8).collect();
        Rgb::average(&colors)
    }
}

/// Averaged colours laid out in rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGrid {
    cols: u32,
    rows: u32,
    cells: Vec<Rgb>,
}

impl ColorGrid {
    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[Rgb] {
        &self.cells
    }

    pub fn get(&self, col: u32, row: u32) -> Rgb {
        self.cells[(row * self.cols + col) as usize]
    }

    /// Cells of one row, left to right.
    pub fn row(&self, row: u32) -> &[Rgb] {
        let start = (row * self.cols) as usize;
        &self.cells[start..start + self.cols as usize]
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, col: u32) -> Vec<Rgb> {
        (0..self.rows).map(|row| self.get(col, row)).collect()
    }

    /// Mean colour over every cell.
    pub fn average(&self) -> Rgb {
        Rgb::average(&self.cells)
    }
}
