//! Colour math for the mappers.

use std::fmt;

/// RGB colour with f64 components in the 0.0 to 1.0 range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Creates a colour from 8-bit channels, ignoring alpha.
    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self::from_rgb8([rgba[0], rgba[1], rgba[2]])
    }

    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self::new(
            rgb[0] as f64 / 255.0,
            rgb[1] as f64 / 255.0,
            rgb[2] as f64 / 255.0,
        )
    }

    /// Converts to 8-bit channels, rounding and clamping.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b)]
    }

    /// Perceived brightness, `0.299 R + 0.587 G + 0.114 B`.
    pub fn luminance(&self) -> f64 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }

    /// Squared Euclidean distance in RGB space.
    pub fn distance_squared(&self, other: &Rgb) -> f64 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        dr * dr + dg * dg + db * db
    }

    /// Mean of a set of colours, black when empty.
    pub fn average<'a, I>(colors: I) -> Rgb
    where
        I: IntoIterator<Item = &'a Rgb>,
    {
        let mut sum = Rgb::default();
        let mut count = 0usize;
        for color in colors {
            sum.r += color.r;
            sum.g += color.g;
            sum.b += color.b;
            count += 1;
        }
        if count == 0 {
            return sum;
        }
        let n = count as f64;
        Rgb::new(sum.r / n, sum.g / n, sum.b / n)
    }

    /// Convert to HSL.
    pub fn to_hsl(&self) -> Hsl {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let delta = max - min;
        let l = (max + min) / 2.0;

        if delta < 1e-10 {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let s = delta / (1.0 - (2.0 * l - 1.0).abs());

        let h = if (self.r - max).abs() < 1e-10 {
            ((self.g - self.b) / delta).rem_euclid(6.0)
        } else if (self.g - max).abs() < 1e-10 {
            2.0 + (self.b - self.r) / delta
        } else {
            4.0 + (self.r - self.g) / delta
        };

        Hsl {
            h: (h * 60.0).rem_euclid(360.0),
            s: s.clamp(0.0, 1.0),
            l,
        }
    }

    /// Lower-case `#rrggbb`.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        hex8(r, g, b)
    }
}

/// Formats 8-bit channels as lower-case `#rrggbb`.
pub fn hex8(r: u8, g: u8, b: u8) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Hue in degrees [0, 360), saturation and lightness in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    /// Everyday name of the colour family.
    pub fn family(&self) -> ColorFamily {
        if self.s < 0.1 {
            return if self.l < 0.2 {
                ColorFamily::Black
            } else if self.l > 0.8 {
                ColorFamily::White
            } else {
                ColorFamily::Gray
            };
        }
        match self.h {
            h if h < 15.0 => ColorFamily::Red,
            h if h < 45.0 => ColorFamily::Orange,
            h if h < 75.0 => ColorFamily::Yellow,
            h if h < 165.0 => ColorFamily::Green,
            h if h < 195.0 => ColorFamily::Cyan,
            h if h < 255.0 => ColorFamily::Blue,
            h if h < 285.0 => ColorFamily::Purple,
            h if h < 345.0 => ColorFamily::Magenta,
            _ => ColorFamily::Red,
        }
    }
}

/// Coarse colour names used for sound labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFamily {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Magenta,
    Black,
    White,
    Gray,
}

impl ColorFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorFamily::Red => "Red",
            ColorFamily::Orange => "Orange",
            ColorFamily::Yellow => "Yellow",
            ColorFamily::Green => "Green",
            ColorFamily::Cyan => "Cyan",
            ColorFamily::Blue => "Blue",
            ColorFamily::Purple => "Purple",
            ColorFamily::Magenta => "Magenta",
            ColorFamily::Black => "Black",
            ColorFamily::White => "White",
            ColorFamily::Gray => "Gray",
        }
    }
}

impl fmt::Display for ColorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_hsl(color: Rgb, h: f64, s: f64, l: f64) {
        let hsl = color.to_hsl();
        assert!((hsl.h - h).abs() < 1e-6, "hue {} != {}", hsl.h, h);
        assert!((hsl.s - s).abs() < 1e-6, "saturation {} != {}", hsl.s, s);
        assert!((hsl.l - l).abs() < 1e-6, "lightness {} != {}", hsl.l, l);
    }

    #[test]
    fn test_primaries_to_hsl() {
        assert_hsl(Rgb::new(1.0, 0.0, 0.0), 0.0, 1.0, 0.5);
        assert_hsl(Rgb::new(0.0, 1.0, 0.0), 120.0, 1.0, 0.5);
        assert_hsl(Rgb::new(0.0, 0.0, 1.0), 240.0, 1.0, 0.5);
        assert_hsl(Rgb::new(1.0, 0.0, 1.0), 300.0, 1.0, 0.5);
        assert_hsl(Rgb::new(0.5, 0.5, 0.5), 0.0, 0.0, 0.5);
    }

    #[test]
    fn test_dark_saturated_color() {
        // Dark red: lightness 0.25, still fully saturated
        assert_hsl(Rgb::new(0.5, 0.0, 0.0), 0.0, 1.0, 0.25);
    }

    #[test]
    fn test_luminance_weights() {
        assert!((Rgb::new(1.0, 1.0, 1.0).luminance() - 1.0).abs() < 1e-12);
        assert!((Rgb::new(0.0, 1.0, 0.0).luminance() - 0.587).abs() < 1e-12);
    }

    #[test]
    fn test_hex() {
        assert_eq!(Rgb::from_rgb8([255, 128, 0]).to_hex(), "#ff8000");
        assert_eq!(hex8(1, 2, 3), "#010203");
    }

    #[test]
    fn test_families() {
        assert_eq!(Rgb::new(0.0, 0.0, 1.0).to_hsl().family(), ColorFamily::Blue);
        assert_eq!(Rgb::new(1.0, 1.0, 0.0).to_hsl().family(), ColorFamily::Yellow);
        assert_eq!(Rgb::new(0.95, 0.95, 0.95).to_hsl().family(), ColorFamily::White);
        assert_eq!(Rgb::new(0.9, 0.1, 0.2).to_hsl().family().to_string(), "Red");
    }

    #[test]
    fn test_average() {
        let colors = [Rgb::new(1.0, 0.0, 0.0), Rgb::new(0.0, 0.0, 1.0)];
        assert_eq!(Rgb::average(&colors), Rgb::new(0.5, 0.0, 0.5));
        assert_eq!(Rgb::average(&[] as &[Rgb]), Rgb::default());
    }
}
