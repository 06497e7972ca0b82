use std::sync::Arc;

use crate::foundation::color::Rgba8;
use crate::foundation::error::{PhotomarkError, PhotomarkResult};

/// Stateful helper for building Parley text layouts from raw font bytes.
///
/// Fonts are registered once per session; layouts are rebuilt per draw.
/// When no font has been registered the engine reports it and callers
/// degrade by skipping glyph output.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    default_family: Option<String>,
    font_bytes: Option<Arc<Vec<u8>>>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            default_family: None,
            font_bytes: None,
        }
    }

    /// Register a font from raw bytes and make it the default family.
    ///
    /// Returns the primary family name detected in the font data.
    pub fn register_font(&mut self, bytes: Vec<u8>) -> PhotomarkResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            PhotomarkError::validation("no font families registered from font bytes")
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PhotomarkError::validation("registered font family has no name"))?
            .to_string();

        self.default_family = Some(family_name.clone());
        self.font_bytes = Some(Arc::new(bytes));
        Ok(family_name)
    }

    /// Whether a font is available for glyph output.
    pub fn has_font(&self) -> bool {
        self.default_family.is_some()
    }

    /// Raw bytes of the default font, for glyph rasterization.
    pub fn default_font_bytes(&self) -> Option<Arc<Vec<u8>>> {
        self.font_bytes.clone()
    }

    /// Shape and lay out a single run of plain text in the default family.
    pub fn layout(
        &mut self,
        text: &str,
        size_px: f32,
        weight: f32,
        brush: Rgba8,
        max_width_px: Option<f32>,
    ) -> PhotomarkResult<parley::Layout<Rgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PhotomarkError::validation(
                "text size must be finite and > 0",
            ));
        }
        let family = self
            .default_family
            .clone()
            .ok_or_else(|| PhotomarkError::validation("no font registered"))?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(weight),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        if let Some(w) = max_width_px {
            layout.break_all_lines(Some(w));
            layout.align(
                Some(w),
                parley::Alignment::Start,
                parley::AlignmentOptions::default(),
            );
        } else {
            layout.break_all_lines(None);
        }

        Ok(layout)
    }
}
