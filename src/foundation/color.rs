use serde::{Deserialize, Serialize};

use crate::foundation::error::{PhotomarkError, PhotomarkResult};

/// Straight-alpha RGBA8 color used for fills, strokes and text brushes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    /// Construct from all four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Construct a fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Return the same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parse a CSS-style hex color: `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> PhotomarkResult<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        // Length is in bytes, so non-ASCII input must be rejected before
        // the digit pairs are sliced out.
        if !hex.is_ascii() {
            return Err(bad_hex(s));
        }
        let parse = |h: &str| u8::from_str_radix(h, 16).map_err(|_| bad_hex(s));
        match hex.len() {
            3 => {
                let nib = |i: usize| -> PhotomarkResult<u8> {
                    let v = parse(&hex[i..i + 1])?;
                    Ok(v * 16 + v)
                };
                Ok(Self::opaque(nib(0)?, nib(1)?, nib(2)?))
            }
            6 => Ok(Self::opaque(
                parse(&hex[0..2])?,
                parse(&hex[2..4])?,
                parse(&hex[4..6])?,
            )),
            8 => Ok(Self::new(
                parse(&hex[0..2])?,
                parse(&hex[2..4])?,
                parse(&hex[4..6])?,
                parse(&hex[6..8])?,
            )),
            _ => Err(bad_hex(s)),
        }
    }
}

fn bad_hex(s: &str) -> PhotomarkError {
    PhotomarkError::validation(format!("invalid hex color '{s}'"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
