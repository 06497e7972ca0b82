use crate::foundation::color::Rgba8;
use crate::foundation::error::{PhotomarkError, PhotomarkResult};
use crate::scene::object::{Payload, SceneObject};

/// A single field edit applied to the selected object.
#[derive(Clone, Debug, PartialEq)]
pub enum EditField {
    /// Replace the text content.
    Text(String),
    /// Replace the fill color.
    FillColor(Rgba8),
    /// Replace the font size, in the object's local units.
    FontSize(f64),
}

/// Field names editable on `object`, for surfacing in a properties panel.
///
/// Groups never expose `font_size`: their text is sized relative to the
/// surrounding artwork and only scales with the group as a whole.
pub fn editable_fields(object: &SceneObject) -> &'static [&'static str] {
    match &object.payload {
        Payload::Text(_) => &["text", "fill_color", "font_size"],
        Payload::Group(_) => {
            if object.first_text().is_some() {
                &["text", "fill_color"]
            } else {
                &[]
            }
        }
        Payload::Shape(_) => &["fill_color"],
        Payload::Image(_) => &[],
    }
}

/// Apply a field edit to an object.
///
/// On a group, a text edit targets the first text child and a fill edit
/// recolors every text child; font size edits are rejected.
pub fn apply_edit(object: &mut SceneObject, field: &EditField) -> PhotomarkResult<()> {
    match (&mut object.payload, field) {
        (Payload::Text(t), EditField::Text(s)) => {
            t.text = s.clone();
            Ok(())
        }
        (Payload::Text(t), EditField::FillColor(c)) => {
            t.fill = *c;
            Ok(())
        }
        (Payload::Text(t), EditField::FontSize(size)) => {
            validate_font_size(*size)?;
            t.font_size = *size;
            Ok(())
        }
        (Payload::Group(_), EditField::Text(s)) => match object.first_text_mut() {
            Some(t) => {
                t.text = s.clone();
                Ok(())
            }
            None => Err(PhotomarkError::validation("group has no text to edit")),
        },
        (Payload::Group(_), EditField::FillColor(c)) => {
            let touched = object.for_each_text_mut(&mut |t| t.fill = *c);
            if touched == 0 {
                return Err(PhotomarkError::validation("group has no text to recolor"));
            }
            Ok(())
        }
        (Payload::Group(_), EditField::FontSize(_)) => Err(PhotomarkError::validation(
            "font size is fixed for grouped objects; scale the group instead",
        )),
        (Payload::Shape(s), EditField::FillColor(c)) => {
            s.fill = *c;
            Ok(())
        }
        (Payload::Shape(_), _) | (Payload::Image(_), _) => Err(PhotomarkError::validation(
            "field is not editable on this object",
        )),
    }
}

fn validate_font_size(size: f64) -> PhotomarkResult<()> {
    if !size.is_finite() || size <= 0.0 {
        return Err(PhotomarkError::validation(format!(
            "font size {size} must be finite and > 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/editor/controller.rs"]
mod tests;
