//! Full-bleed frames, stickers and the advertising strip.

use serde::Deserialize;

use crate::foundation::color::Rgba8;
use crate::foundation::error::PhotomarkResult;
use crate::foundation::geometry::{Anchor, BackgroundBounds, Transform, anchor_position};
use crate::scene::object::{Role, SceneObject};
use crate::template::catalog::{
    TemplateCategory, TemplateSpec, UserProfile, parse_color, parse_params,
};
use crate::template::parts;
use crate::text::measure::TextMeasurer;

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FrameModernParams {
    title: String,
    price: String,
    opacity: f64,
}

impl Default for FrameModernParams {
    fn default() -> Self {
        Self {
            title: "MODERN FAMILY HOME".to_string(),
            price: "Contact for price".to_string(),
            opacity: 1.0,
        }
    }
}

/// Translucent footer panel covering the bottom 35% of the photo, with a
/// headline and a gold price line.
pub struct FrameModern;

impl TemplateSpec for FrameModern {
    fn id(&self) -> &'static str {
        "frame_modern"
    }

    fn category(&self) -> TemplateCategory {
        TemplateCategory::Frame
    }

    fn default_params(&self) -> serde_json::Value {
        serde_json::json!({})
    }

    fn build(
        &self,
        params: &serde_json::Value,
        bounds: &BackgroundBounds,
        _user: &UserProfile,
        _measurer: &dyn TextMeasurer,
    ) -> PhotomarkResult<SceneObject> {
        let p: FrameModernParams = parse_params(params)?;
        let gold = Rgba8::opaque(0xf1, 0xc4, 0x0f);
        let (w, h) = (bounds.width, bounds.height);
        let footer_h = h * 0.35;
        let footer_top = h - footer_h;

        let children = vec![
            parts::rect(0.0, footer_top, w, footer_h, 0.0, Rgba8::BLACK.with_alpha(140)),
            parts::text(
                w * 0.05,
                footer_top + w * 0.03,
                p.title,
                w * 0.06,
                800.0,
                Rgba8::WHITE,
            ),
            parts::text(
                w * 0.05,
                footer_top + w * 0.03 + w * 0.075,
                p.price,
                w * 0.05,
                700.0,
                gold,
            ),
        ];
        Ok(parts::group(
            children,
            Transform::at(bounds.origin.x, bounds.origin.y).with_opacity(p.opacity),
            Role::Frame,
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FrameMinimalParams {
    caption: String,
    accent: String,
    opacity: f64,
}

impl Default for FrameMinimalParams {
    fn default() -> Self {
        Self {
            caption: "FOR SALE".to_string(),
            accent: "#c0392b".to_string(),
            opacity: 1.0,
        }
    }
}

/// Thin inset border with a solid caption badge in the top-left corner.
pub struct FrameMinimal;

impl TemplateSpec for FrameMinimal {
    fn id(&self) -> &'static str {
        "frame_minimal"
    }

    fn category(&self) -> TemplateCategory {
        TemplateCategory::Frame
    }

    fn default_params(&self) -> serde_json::Value {
        serde_json::json!({})
    }

    fn build(
        &self,
        params: &serde_json::Value,
        bounds: &BackgroundBounds,
        _user: &UserProfile,
        measurer: &dyn TextMeasurer,
    ) -> PhotomarkResult<SceneObject> {
        let p: FrameMinimalParams = parse_params(params)?;
        let accent = parse_color(&p.accent)?;
        let (w, h) = (bounds.width, bounds.height);
        let inset = w * 0.02;
        let bar = w * 0.005;

        // Border drawn as four bars; filled shapes only, no stroking.
        let mut children = vec![
            parts::rect(inset, inset, w - 2.0 * inset, bar, 0.0, Rgba8::WHITE),
            parts::rect(inset, h - inset - bar, w - 2.0 * inset, bar, 0.0, Rgba8::WHITE),
            parts::rect(inset, inset, bar, h - 2.0 * inset, 0.0, Rgba8::WHITE),
            parts::rect(w - inset - bar, inset, bar, h - 2.0 * inset, 0.0, Rgba8::WHITE),
        ];

        let badge_w = w * 0.4;
        let badge_h = w * 0.1;
        let font_size = w * 0.04;
        let m = measurer.measure(&p.caption, font_size, 700.0);
        children.push(parts::rect(w * 0.05, w * 0.05, badge_w, badge_h, 0.0, accent));
        children.push(parts::text(
            w * 0.05 + (badge_w - m.width) / 2.0,
            w * 0.05 + (badge_h - m.height) / 2.0,
            p.caption,
            font_size,
            700.0,
            Rgba8::WHITE,
        ));

        Ok(parts::group(
            children,
            Transform::at(bounds.origin.x, bounds.origin.y).with_opacity(p.opacity),
            Role::Frame,
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StickerParams {
    label: Option<String>,
    fill: Option<String>,
    text_color: String,
    anchor: Anchor,
    margin_frac: f64,
    opacity: f64,
}

impl Default for StickerParams {
    fn default() -> Self {
        Self {
            label: None,
            fill: None,
            text_color: "#ffffff".to_string(),
            anchor: Anchor::Center,
            margin_frac: 0.05,
            opacity: 1.0,
        }
    }
}

/// Capsule sticker with a short uppercase label.
///
/// The built-in presets differ only in default label and fill; both can be
/// overridden through params.
#[derive(Clone, Copy)]
pub struct Sticker {
    id: &'static str,
    label: &'static str,
    fill: &'static str,
}

impl Sticker {
    /// The built-in sticker presets.
    pub const PRESETS: [Sticker; 6] = [
        Sticker { id: "sticker_hot", label: "HOT", fill: "#e74c3c" },
        Sticker { id: "sticker_price_cut", label: "PRICE CUT", fill: "#e67e22" },
        Sticker { id: "sticker_deed", label: "TITLE DEED", fill: "#27ae60" },
        Sticker { id: "sticker_urgent", label: "URGENT SALE", fill: "#c0392b" },
        Sticker { id: "sticker_storefront", label: "STOREFRONT", fill: "#8e44ad" },
        Sticker { id: "sticker_bank", label: "BANK SALE", fill: "#2c3e50" },
    ];
}

impl TemplateSpec for Sticker {
    fn id(&self) -> &'static str {
        self.id
    }

    fn category(&self) -> TemplateCategory {
        TemplateCategory::Sticker
    }

    fn default_params(&self) -> serde_json::Value {
        serde_json::json!({})
    }

    fn build(
        &self,
        params: &serde_json::Value,
        bounds: &BackgroundBounds,
        _user: &UserProfile,
        measurer: &dyn TextMeasurer,
    ) -> PhotomarkResult<SceneObject> {
        let p: StickerParams = parse_params(params)?;
        let fill = parse_color(p.fill.as_deref().unwrap_or(self.fill))?;
        let text_color = parse_color(&p.text_color)?;
        let label = p.label.unwrap_or_else(|| self.label.to_string());

        let font_size = bounds.width * 0.05;
        let m = measurer.measure(&label, font_size, 800.0);
        let pad = font_size * 0.6;
        let w = m.width + 2.0 * pad;
        let h = m.height + pad;

        let children = vec![
            parts::rect(0.0, 0.0, w, h, h * 0.2, fill),
            parts::text(pad, pad / 2.0, label, font_size, 800.0, text_color),
        ];
        let pos = anchor_position(p.anchor, w, h, bounds, p.margin_frac);
        Ok(parts::group(
            children,
            Transform::at(pos.x, pos.y).with_opacity(p.opacity),
            Role::Sticker,
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct AdBannerParams {
    fill: String,
    opacity: f64,
}

impl Default for AdBannerParams {
    fn default() -> Self {
        Self {
            fill: "#0a0a0aa6".to_string(),
            opacity: 1.0,
        }
    }
}

/// Bottom advertising strip: agency name on the left, phone on the right.
pub struct AdBanner;

impl TemplateSpec for AdBanner {
    fn id(&self) -> &'static str {
        "ad_banner"
    }

    fn category(&self) -> TemplateCategory {
        TemplateCategory::AdBlock
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
        let p: AdBannerParams = parse_params(params)?;
        let fill = parse_color(&p.fill)?;
        let gold = Rgba8::opaque(0xf1, 0xc4, 0x0f);
        let w = bounds.width;
        let h = w * 0.08;
        let font_size = w * 0.035;

        let phone = measurer.measure(&user.phone, font_size, 700.0);
        let line_h = measurer.measure(&user.agency, font_size, 700.0).height;
        let text_top = (h - line_h) / 2.0;

        let children = vec![
            parts::rect(0.0, 0.0, w, h, 0.0, fill),
            parts::text(w * 0.03, text_top, user.agency.clone(), font_size, 700.0, Rgba8::WHITE),
            parts::text(
                w - w * 0.03 - phone.width,
                text_top,
                user.phone.clone(),
                font_size,
                700.0,
                gold,
            ),
        ];
        Ok(parts::group(
            children,
            Transform::at(bounds.origin.x, bounds.origin.y + bounds.height - h)
                .with_opacity(p.opacity),
            Role::AdBlock,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/frames.rs"]
mod tests;
