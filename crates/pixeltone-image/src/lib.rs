//! Pixeltone image mappers
//!
//! Turns RGBA pixel buffers into things you can hear or paste into a chat:
//!
//! - [`image_to_sound_params`] - a swept tone from the average colour
//! - [`image_to_song`] - a four-track step sequence, one step per column
//! - [`to_glyph_art`] / [`to_emoji_art`] - text renditions
//! - [`to_color_palette`] - the most common exact colours
//!
//! All mappers are pure and deterministic. Sound and song output uses the
//! types of `pixeltone-audio`, so it can be rendered with
//! [`pixeltone_audio::render_sound_effect`] and [`pixeltone_audio::render_song`].

pub mod art;
pub mod color;
pub mod error;
pub mod pixels;
pub mod song;
pub mod sound;

pub use art::{
    to_color_palette, to_color_palette_strided, to_emoji_art, to_glyph_art, PaletteEntry,
};
pub use color::{ColorFamily, Hsl, Rgb};
pub use error::{ImageError, ImageResult};
pub use pixels::{ColorGrid, PixelBuffer, MAX_GRID_ROWS};
pub use song::image_to_song;
pub use sound::image_to_sound_params;
