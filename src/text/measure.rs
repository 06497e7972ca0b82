/// Measured extents of a single text line, in the same units as the font
/// size passed in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// Advance width of the line.
    pub width: f64,
    /// Line box height.
    pub height: f64,
}

/// Text measurement seam.
///
/// Template builders and hit testing measure text through this trait so
/// geometry stays deterministic and independent of the installed fonts.
pub trait TextMeasurer {
    /// Measure a single line at `font_size` and `weight`.
    fn measure(&self, text: &str, font_size: f64, weight: f32) -> TextMetrics;
}

/// Average glyph advance as a fraction of the font size.
pub const NOMINAL_ADVANCE_EM: f64 = 0.6;
/// Line box height as a fraction of the font size.
pub const NOMINAL_LINE_HEIGHT_EM: f64 = 1.2;

/// Font-independent measurer using a fixed average advance per character.
///
/// Deterministic by construction; good enough for capsule sizing and
/// anchor placement, where exact glyph metrics do not matter.
#[derive(Clone, Copy, Debug, Default)]
pub struct NominalTextMeasurer;

impl TextMeasurer for NominalTextMeasurer {
    fn measure(&self, text: &str, font_size: f64, _weight: f32) -> TextMetrics {
        let chars = text.chars().count() as f64;
        TextMetrics {
            width: chars * font_size * NOMINAL_ADVANCE_EM,
            height: font_size * NOMINAL_LINE_HEIGHT_EM,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/measure.rs"]
mod tests;
