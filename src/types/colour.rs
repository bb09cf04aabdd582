//! Colour type and parsing.

use std::fmt;
use std::str::FromStr;

use image::{Rgb, Rgba};

use crate::error::{FxError, Result};

/// An RGB colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    /// Create a new colour from RGB components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Parse a `#RRGGBB` hex colour string.
    ///
    /// The leading `#` and exactly six hex digits are required; this is the
    /// form palette entries and colour-list tokens take. Surrounding
    /// whitespace is trimmed.
    pub fn from_hex(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix('#')
            .ok_or_else(|| FxError::InvalidColour {
                token: trimmed.to_string(),
            })?;

        // Byte length and ASCII together keep the slices below on char
        // boundaries
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(FxError::InvalidColour {
                token: trimmed.to_string(),
            });
        }

        let r = parse_hex_byte(&hex[0..2], trimmed)?;
        let g = parse_hex_byte(&hex[2..4], trimmed)?;
        let b = parse_hex_byte(&hex[4..6], trimmed)?;
        Ok(Self::new(r, g, b))
    }

    /// Convert to an RGB triple.
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Colour {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<Colour> for Rgb<u8> {
    fn from(c: Colour) -> Self {
        Rgb([c.r, c.g, c.b])
    }
}

impl From<Colour> for Rgba<u8> {
    fn from(c: Colour) -> Self {
        Rgba([c.r, c.g, c.b, 255])
    }
}

/// Parse a two-character hex byte.
fn parse_hex_byte(s: &str, token: &str) -> Result<u8> {
    u8::from_str_radix(s, 16).map_err(|_| FxError::InvalidColour {
        token: token.to_string(),
    })
}
