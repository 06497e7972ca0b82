//! Agent badge cards.
//!
//! Each card is authored at a nominal design size of 450x130 units and
//! scaled to the photo by one scalar, `width_frac * background_width / 450`.
//! Children never scale independently; the group transform carries the whole
//! card, which is what keeps text and artwork proportional at any photo size.

use serde::Deserialize;

use crate::foundation::color::Rgba8;
use crate::foundation::error::{PhotomarkError, PhotomarkResult};
use crate::foundation::geometry::{Anchor, BackgroundBounds, Transform, anchor_position};
use crate::scene::object::{ImageClip, Role, SceneObject};
use crate::template::catalog::{TemplateCategory, TemplateSpec, UserProfile, parse_params};
use crate::template::parts;
use crate::text::measure::TextMeasurer;

/// Nominal badge design width in local units.
pub const TAG_DESIGN_WIDTH: f64 = 450.0;
/// Nominal badge design height in local units.
pub const TAG_DESIGN_HEIGHT: f64 = 130.0;

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BadgeParams {
    anchor: Anchor,
    margin_frac: f64,
    width_frac: f64,
    opacity: f64,
}

impl Default for BadgeParams {
    fn default() -> Self {
        Self {
            anchor: Anchor::BottomRight,
            margin_frac: 0.05,
            width_frac: 0.35,
            opacity: 1.0,
        }
    }
}

impl BadgeParams {
    fn validated(self) -> PhotomarkResult<Self> {
        if !self.width_frac.is_finite() || self.width_frac <= 0.0 || self.width_frac > 1.0 {
            return Err(PhotomarkError::template_build(format!(
                "width_frac {} out of range",
                self.width_frac
            )));
        }
        Ok(self)
    }
}

/// Place a 450x130 card's children as an anchored, uniformly scaled group.
fn badge_group(
    children: Vec<SceneObject>,
    p: &BadgeParams,
    bounds: &BackgroundBounds,
) -> SceneObject {
    let scale = bounds.width * p.width_frac / TAG_DESIGN_WIDTH;
    let pos = anchor_position(
        p.anchor,
        TAG_DESIGN_WIDTH * scale,
        TAG_DESIGN_HEIGHT * scale,
        bounds,
        p.margin_frac,
    );
    parts::group(
        children,
        Transform::at(pos.x, pos.y)
            .with_scale(scale)
            .with_opacity(p.opacity),
        Role::Watermark,
    )
}

fn avatar_or_skip(children: &mut Vec<SceneObject>, user: &UserProfile, x: f64, y: f64, size: f64) {
    if let Some(avatar) = &user.avatar_ref {
        children.push(parts::image(x, y, avatar, size, size, ImageClip::Circle));
    }
}

/// White capsule card with an amber accent disc behind the avatar.
pub struct TagAmber;

impl TemplateSpec for TagAmber {
    fn id(&self) -> &'static str {
        "tag_amber"
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
        _measurer: &dyn TextMeasurer,
    ) -> PhotomarkResult<SceneObject> {
        let p: BadgeParams = parse_params::<BadgeParams>(params)?.validated()?;
        let amber = Rgba8::opaque(0xf6, 0xb2, 0x1b);
        let dark = Rgba8::opaque(0x2d, 0x34, 0x36);
        let gray = Rgba8::opaque(0x63, 0x6e, 0x72);

        let mut children = vec![
            parts::rect(0.0, 0.0, 450.0, 130.0, 65.0, Rgba8::WHITE),
            parts::circle(10.0, 10.0, 55.0, amber),
        ];
        avatar_or_skip(&mut children, user, 13.0, 13.0, 104.0);
        children.extend([
            parts::text(145.0, 16.0, user.name.clone(), 24.0, 900.0, dark),
            parts::text(145.0, 50.0, user.job_title.clone(), 13.0, 400.0, gray),
            parts::text(
                145.0,
                72.0,
                format!("Hotline: {}", user.phone),
                15.0,
                700.0,
                dark,
            ),
            parts::text(145.0, 100.0, user.agency.clone(), 10.0, 600.0, amber),
        ]);
        Ok(badge_group(children, &p, bounds))
    }
}

/// Near-black card with gold trim and a hexagon accent.
pub struct TagLuxury;

impl TemplateSpec for TagLuxury {
    fn id(&self) -> &'static str {
        "tag_luxury"
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
        _measurer: &dyn TextMeasurer,
    ) -> PhotomarkResult<SceneObject> {
        let p: BadgeParams = parse_params::<BadgeParams>(params)?.validated()?;
        let gold = Rgba8::opaque(0xc5, 0xa0, 0x59);
        let near_black = Rgba8::opaque(0x0a, 0x0a, 0x0a);
        let silver = Rgba8::opaque(0xd9, 0xd9, 0xd9);

        // Gold base under an inset black panel reads as a 2-unit border.
        let mut children = vec![
            parts::rect(0.0, 0.0, 450.0, 130.0, 13.0, gold),
            parts::rect(2.0, 2.0, 446.0, 126.0, 12.0, near_black),
            parts::path(0.0, 0.0, parts::hexagon(65.0, 65.0, 58.0), gold),
        ];
        avatar_or_skip(&mut children, user, 13.0, 13.0, 104.0);
        children.extend([
            parts::text(160.0, 20.0, user.name.clone(), 22.0, 700.0, gold),
            parts::rect(160.0, 54.0, 180.0, 2.0, 0.0, gold),
            parts::text(160.0, 66.0, user.job_title.clone(), 12.0, 400.0, silver),
            parts::text(
                160.0,
                90.0,
                format!("Hotline: {}", user.phone),
                14.0,
                500.0,
                Rgba8::WHITE,
            ),
        ]);
        Ok(badge_group(children, &p, bounds))
    }
}

/// White capsule card with a blue accent bar and a Zalo contact line.
pub struct TagBlue;

impl TemplateSpec for TagBlue {
    fn id(&self) -> &'static str {
        "tag_blue"
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
        _measurer: &dyn TextMeasurer,
    ) -> PhotomarkResult<SceneObject> {
        let p: BadgeParams = parse_params::<BadgeParams>(params)?.validated()?;
        let blue = Rgba8::opaque(0x09, 0x84, 0xe3);
        let dark = Rgba8::opaque(0x2d, 0x34, 0x36);
        let gray = Rgba8::opaque(0x63, 0x6e, 0x72);
        let faint = Rgba8::opaque(0xb2, 0xbe, 0xc3);

        let mut children = vec![
            parts::rect(0.0, 0.0, 450.0, 130.0, 65.0, Rgba8::WHITE),
            parts::rect(140.0, 35.0, 4.0, 60.0, 0.0, blue),
        ];
        avatar_or_skip(&mut children, user, 10.0, 10.0, 110.0);
        children.extend([
            parts::text(165.0, 14.0, user.name.clone(), 24.0, 800.0, blue),
            parts::text(165.0, 48.0, user.job_title.clone(), 12.0, 400.0, gray),
            parts::text(
                165.0,
                68.0,
                format!("Zalo: {}", user.phone),
                18.0,
                700.0,
                dark,
            ),
            parts::text(165.0, 102.0, user.agency.clone(), 9.0, 400.0, faint),
        ]);
        Ok(badge_group(children, &p, bounds))
    }
}

/// Avatar badge design width in local units.
const AVATAR_BADGE_WIDTH: f64 = 290.0;
/// Avatar badge design height in local units.
const AVATAR_BADGE_HEIGHT: f64 = 110.0;

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct AvatarBadgeParams {
    anchor: Anchor,
    margin_frac: f64,
    width_frac: f64,
    opacity: f64,
}

impl Default for AvatarBadgeParams {
    fn default() -> Self {
        Self {
            anchor: Anchor::BottomLeft,
            margin_frac: 0.05,
            width_frac: 0.30,
            opacity: 1.0,
        }
    }
}

/// Compact avatar disc with an overlapping name card.
pub struct AvatarBadge;

impl TemplateSpec for AvatarBadge {
    fn id(&self) -> &'static str {
        "avatar_badge"
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
        _measurer: &dyn TextMeasurer,
    ) -> PhotomarkResult<SceneObject> {
        let p: AvatarBadgeParams = parse_params(params)?;
        if !p.width_frac.is_finite() || p.width_frac <= 0.0 || p.width_frac > 1.0 {
            return Err(PhotomarkError::template_build(format!(
                "width_frac {} out of range",
                p.width_frac
            )));
        }
        let dark = Rgba8::opaque(0x2d, 0x34, 0x36);
        let gray = Rgba8::opaque(0x63, 0x6e, 0x72);

        let mut children = vec![parts::rect(
            90.0,
            30.0,
            200.0,
            50.0,
            25.0,
            Rgba8::WHITE.with_alpha(235),
        )];
        // White ring behind the avatar disc.
        children.push(parts::circle(0.0, 0.0, 54.0, Rgba8::WHITE));
        avatar_or_skip(&mut children, user, 4.0, 4.0, 100.0);
        children.extend([
            parts::text(115.0, 38.0, user.name.clone(), 16.0, 700.0, dark),
            parts::text(115.0, 60.0, user.phone.clone(), 14.0, 400.0, gray),
        ]);

        let scale = bounds.width * p.width_frac / AVATAR_BADGE_WIDTH;
        let pos = anchor_position(
            p.anchor,
            AVATAR_BADGE_WIDTH * scale,
            AVATAR_BADGE_HEIGHT * scale,
            bounds,
            p.margin_frac,
        );
        Ok(parts::group(
            children,
            Transform::at(pos.x, pos.y)
                .with_scale(scale)
                .with_opacity(p.opacity),
            Role::Watermark,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/badges.rs"]
mod tests;
