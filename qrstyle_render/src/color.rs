use std::str::FromStr;

use image::Rgba;
use serde::Deserialize;

/// An RGBA color, written as `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    pub const WHITE: Self = Self([255, 255, 255, 255]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    /// Linear interpolation towards `other`, with `t` clamped to `0.0..=1.0`.
    /// # Example
    /// ```
    /// use qrstyle_render::Color;
    /// let grey = Color::BLACK.lerp(Color::WHITE, 0.5);
    /// assert_eq!(grey, Color::rgb(128, 128, 128));
    /// ```
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self(std::array::from_fn(|k| {
            let (a, b) = (self.0[k] as f32, other.0[k] as f32);
            (a + (b - a) * t).round() as u8
        }))
    }
}

impl From<Color> for Rgba<u8> {
    fn from(value: Color) -> Self {
        Rgba(value.0)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError(s.to_owned()))?;
        if !matches!(hex.len(), 6 | 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError(s.to_owned()));
        }
        let mut rgba = [u8::MAX; 4];
        for (k, channel) in rgba.iter_mut().enumerate().take(hex.len() / 2) {
            *channel = u8::from_str_radix(&hex[2 * k..2 * k + 2], 16)
                .map_err(|_| ColorParseError(s.to_owned()))?;
        }
        Ok(Self(rgba))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b, a] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")?;
        if a != u8::MAX {
            write!(f, "{a:02x}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}', expected #rrggbb or #rrggbbaa")]
pub struct ColorParseError(pub String);

/// Blend `color` over `base`, weighted by `coverage` (255 means `color` entirely).
#[inline]
pub(crate) fn blend(base: Rgba<u8>, color: Rgba<u8>, coverage: u8) -> Rgba<u8> {
    let c = coverage as u32;
    Rgba(std::array::from_fn(|k| {
        let mixed = base.0[k] as u32 * (255 - c) + color.0[k] as u32 * c;
        ((mixed + 127) / 255) as u8
    }))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("#1a73e8".parse(), Ok(Color::rgb(0x1a, 0x73, 0xe8)));
        assert_eq!("#00000080".parse(), Ok(Color([0, 0, 0, 0x80])));
        assert!("1a73e8".parse::<Color>().is_err());
        assert!("#1a73e".parse::<Color>().is_err());
        assert!("#zz73e8".parse::<Color>().is_err());
        assert!("#+1+2+3".parse::<Color>().is_err());
        assert!("#1a+3e8".parse::<Color>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::rgb(0x1a, 0x73, 0xe8).to_string(), "#1a73e8");
        assert_eq!(Color([1, 2, 3, 4]).to_string(), "#01020304");
    }

    #[test]
    fn test_blend_extremes() {
        let (white, black) = (Rgba([255, 255, 255, 255]), Rgba([0, 0, 0, 255]));
        assert_eq!(blend(white, black, 0), white);
        assert_eq!(blend(white, black, 255), black);
        assert_eq!(blend(white, black, 1), Rgba([254, 254, 254, 255]));
    }
}
