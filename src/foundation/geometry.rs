use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::foundation::error::{PhotomarkError, PhotomarkResult};

/// Tolerance for coordinate comparisons after a relative/absolute round trip.
pub const COORD_EPSILON: f64 = 1e-6;

/// Object placement in one coordinate space.
///
/// In *absolute* space all fields are surface pixels (position) and pixel
/// multipliers (scale). In *relative* space `left`/`top` are fractions of the
/// displayed background width/height and `scale_x`/`scale_y` are fractions of
/// the background **width**. Scaling both axes by width keeps an overlay's
/// aspect ratio stable when a portrait photo replaces a landscape one.
/// Rotation (radians) and opacity are dimensionless and identical in both
/// spaces.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Horizontal position of the local origin.
    pub left: f64,
    /// Vertical position of the local origin.
    pub top: f64,
    /// Horizontal scale factor.
    pub scale_x: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
    /// Rotation around the local origin, radians.
    pub rotation: f64,
    /// Opacity in `[0, 1]`, composed multiplicatively down a group tree.
    pub opacity: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            opacity: 1.0,
        }
    }
}

impl Transform {
    /// Identity transform positioned at `(left, top)`.
    pub fn at(left: f64, top: f64) -> Self {
        Self {
            left,
            top,
            ..Self::default()
        }
    }

    /// Same transform with a uniform scale.
    pub fn with_scale(self, scale: f64) -> Self {
        Self {
            scale_x: scale,
            scale_y: scale,
            ..self
        }
    }

    /// Same transform with a different opacity.
    pub fn with_opacity(self, opacity: f64) -> Self {
        Self { opacity, ..self }
    }

    /// Affine mapping local coordinates to the parent space.
    ///
    /// Order: translate, then rotate about the local origin, then scale.
    pub fn to_affine(&self) -> Affine {
        Affine::translate(Vec2::new(self.left, self.top))
            * Affine::rotate(self.rotation)
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }
}

/// Displayed background placement: origin and extent in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackgroundBounds {
    /// Top-left corner of the displayed background.
    pub origin: Point,
    /// Displayed width in pixels.
    pub width: f64,
    /// Displayed height in pixels.
    pub height: f64,
}

impl BackgroundBounds {
    /// Bounds with an explicit origin.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            width,
            height,
        }
    }

    /// Bounds anchored at the surface origin.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Bounds as a [`Rect`] in surface coordinates.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + self.width,
            self.origin.y + self.height,
        )
    }

    /// Reject zero or non-finite extents before any division by them.
    pub fn validate(&self) -> PhotomarkResult<()> {
        let ok = self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0;
        if ok {
            Ok(())
        } else {
            Err(PhotomarkError::degenerate_bounds(format!(
                "background extent {}x{} is unusable",
                self.width, self.height
            )))
        }
    }
}

/// Convert an absolute transform into background-relative fractions.
///
/// Position divides by the matching axis extent; both scale axes divide by
/// the background width.
pub fn to_relative(abs: &Transform, bounds: &BackgroundBounds) -> PhotomarkResult<Transform> {
    bounds.validate()?;
    Ok(Transform {
        left: (abs.left - bounds.origin.x) / bounds.width,
        top: (abs.top - bounds.origin.y) / bounds.height,
        scale_x: abs.scale_x / bounds.width,
        scale_y: abs.scale_y / bounds.width,
        rotation: abs.rotation,
        opacity: abs.opacity,
    })
}

/// Convert a background-relative transform back to absolute surface pixels.
///
/// Exact inverse of [`to_relative`] for the same bounds.
pub fn to_absolute(rel: &Transform, bounds: &BackgroundBounds) -> PhotomarkResult<Transform> {
    bounds.validate()?;
    Ok(Transform {
        left: bounds.origin.x + rel.left * bounds.width,
        top: bounds.origin.y + rel.top * bounds.height,
        scale_x: rel.scale_x * bounds.width,
        scale_y: rel.scale_y * bounds.width,
        rotation: rel.rotation,
        opacity: rel.opacity,
    })
}

/// Placement anchors for template output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Centered on the background.
    Center,
    /// Margin inset from the top-left corner.
    TopLeft,
    /// Margin inset from the top-right corner.
    TopRight,
    /// Margin inset from the bottom-left corner.
    BottomLeft,
    /// Margin inset from the bottom-right corner.
    #[default]
    BottomRight,
}

/// Top-left position that places a `content_width x content_height` box at
/// `anchor` within `bounds`, inset by `margin_frac` of the background width.
///
/// Corner anchors put the box edge exactly on the margin line; the margin is
/// width-derived on both axes so insets look uniform.
pub fn anchor_position(
    anchor: Anchor,
    content_width: f64,
    content_height: f64,
    bounds: &BackgroundBounds,
    margin_frac: f64,
) -> Point {
    let margin = bounds.width * margin_frac;
    let o = bounds.origin;
    let (w, h) = (bounds.width, bounds.height);
    match anchor {
        Anchor::Center => Point::new(
            o.x + (w - content_width) / 2.0,
            o.y + (h - content_height) / 2.0,
        ),
        Anchor::TopLeft => Point::new(o.x + margin, o.y + margin),
        Anchor::TopRight => Point::new(o.x + w - content_width - margin, o.y + margin),
        Anchor::BottomLeft => Point::new(o.x + margin, o.y + h - content_height - margin),
        Anchor::BottomRight => Point::new(
            o.x + w - content_width - margin,
            o.y + h - content_height - margin,
        ),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geometry.rs"]
mod tests;
