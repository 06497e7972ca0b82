use serde::Deserialize;

use crate::foundation::error::PhotomarkResult;
use crate::foundation::geometry::{Anchor, BackgroundBounds, Transform, anchor_position};
use crate::scene::object::{Role, SceneObject};
use crate::template::catalog::{
    TemplateCategory, TemplateSpec, UserProfile, parse_color, parse_params,
};
use crate::template::parts;
use crate::text::measure::TextMeasurer;

/// Contact line used when a watermark has no explicit text param.
fn default_contact_line(user: &UserProfile) -> String {
    [user.name.as_str(), user.phone.as_str()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" - ")
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PillParams {
    text: Option<String>,
    anchor: Anchor,
    margin_frac: f64,
    opacity: f64,
    fill: String,
    text_color: String,
}

impl Default for PillParams {
    fn default() -> Self {
        Self {
            text: None,
            anchor: Anchor::BottomRight,
            margin_frac: 0.05,
            opacity: 1.0,
            fill: "#00000080".to_string(),
            text_color: "#ffffff".to_string(),
        }
    }
}

/// Rounded capsule behind one bold contact line.
///
/// Font size is 4% of the background width, padding 0.8em, corner radius
/// half the font size, so the capsule keeps its look at any photo size.
pub struct PillWatermark;

impl TemplateSpec for PillWatermark {
    fn id(&self) -> &'static str {
        "pill"
    }

    fn category(&self) -> TemplateCategory {
        TemplateCategory::Watermark
    }

    fn default_params(&self) -> serde_json::Value {
        serde_json::json!({})
    }

    fn build(
        &self,
        params: &serde_json::Value,
        bounds: &BackgroundBounds,
        user: &UserProfile,
        measurer: &dyn TextMeasurer,
    ) -> PhotomarkResult<SceneObject> {
        let p: PillParams = parse_params(params)?;
        let fill = parse_color(&p.fill)?;
        let text_color = parse_color(&p.text_color)?;
        let text = p.text.unwrap_or_else(|| default_contact_line(user));

        let font_size = bounds.width * 0.04;
        let m = measurer.measure(&text, font_size, 700.0);
        let pad = font_size * 0.8;
        let w = m.width + 2.0 * pad;
        let h = m.height + pad;

        let children = vec![
            parts::rect(0.0, 0.0, w, h, font_size * 0.5, fill),
            parts::text(pad, pad / 2.0, text, font_size, 700.0, text_color),
        ];
        let pos = anchor_position(p.anchor, w, h, bounds, p.margin_frac);
        Ok(parts::group(
            children,
            Transform::at(pos.x, pos.y).with_opacity(p.opacity),
            Role::Watermark,
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum BannerPosition {
    Top,
    Bottom,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BannerParams {
    text: Option<String>,
    position: BannerPosition,
    opacity: f64,
    fill: String,
    text_color: String,
}

impl Default for BannerParams {
    fn default() -> Self {
        Self {
            text: None,
            position: BannerPosition::Bottom,
            opacity: 1.0,
            fill: "#000000a6".to_string(),
            text_color: "#ffffff".to_string(),
        }
    }
}

/// Full-width translucent strip with centered contact text.
///
/// The strip height and font size both derive from the background width,
/// like every other template, so a banner on a tall portrait photo matches
/// one on a wide landscape shot.
pub struct BannerWatermark;

impl TemplateSpec for BannerWatermark {
    fn id(&self) -> &'static str {
        "banner"
    }

    fn category(&self) -> TemplateCategory {
        TemplateCategory::Watermark
    }

    fn default_params(&self) -> serde_json::Value {
        serde_json::json!({})
    }

    fn build(
        &self,
        params: &serde_json::Value,
        bounds: &BackgroundBounds,
        user: &UserProfile,
        measurer: &dyn TextMeasurer,
    ) -> PhotomarkResult<SceneObject> {
        let p: BannerParams = parse_params(params)?;
        let fill = parse_color(&p.fill)?;
        let text_color = parse_color(&p.text_color)?;
        let text = p.text.unwrap_or_else(|| default_contact_line(user));

        let h = bounds.width * 0.09;
        let font_size = bounds.width * 0.045;
        let m = measurer.measure(&text, font_size, 700.0);

        let children = vec![
            parts::rect(0.0, 0.0, bounds.width, h, 0.0, fill),
            parts::text(
                (bounds.width - m.width) / 2.0,
                (h - m.height) / 2.0,
                text,
                font_size,
                700.0,
                text_color,
            ),
        ];
        let top = match p.position {
            BannerPosition::Top => bounds.origin.y,
            BannerPosition::Bottom => bounds.origin.y + bounds.height - h,
        };
        Ok(parts::group(
            children,
            Transform::at(bounds.origin.x, top).with_opacity(p.opacity),
            Role::Watermark,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/watermarks.rs"]
mod tests;
