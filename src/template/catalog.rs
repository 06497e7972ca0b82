use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::foundation::color::Rgba8;
use crate::foundation::error::{PhotomarkError, PhotomarkResult};
use crate::foundation::geometry::BackgroundBounds;
use crate::scene::object::SceneObject;
use crate::template::{badges, frames, watermarks};
use crate::text::measure::TextMeasurer;

/// Agent identity injected into templates.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Agency or brokerage name.
    pub agency: String,
    /// Job title shown on badge cards.
    pub job_title: String,
    /// Image-store key of the avatar photo, if one was uploaded.
    pub avatar_ref: Option<String>,
}

/// Template family, used to group the catalog for pickers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    /// Contact watermarks and agent badges.
    Watermark,
    /// Full-bleed photo frames.
    Frame,
    /// Decorative stickers.
    Sticker,
    /// Advertising strips.
    AdBlock,
}

/// A pure template builder.
///
/// `build` must be deterministic: the same params, bounds and user yield an
/// identical object tree. All output dimensions derive from the background
/// width so the result scales with the photo.
pub trait TemplateSpec {
    /// Stable catalog id.
    fn id(&self) -> &'static str;
    /// Template family.
    fn category(&self) -> TemplateCategory;
    /// Params used when the caller passes none or invalid ones.
    fn default_params(&self) -> serde_json::Value;
    /// Build the placed object tree in absolute surface coordinates.
    fn build(
        &self,
        params: &serde_json::Value,
        bounds: &BackgroundBounds,
        user: &UserProfile,
        measurer: &dyn TextMeasurer,
    ) -> PhotomarkResult<SceneObject>;
}

/// Registry of template builders keyed by id.
pub struct TemplateCatalog {
    specs: BTreeMap<&'static str, Box<dyn TemplateSpec>>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl TemplateCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self {
            specs: BTreeMap::new(),
        }
    }

    /// Catalog preloaded with the built-in templates.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.register(Box::new(watermarks::PillWatermark));
        catalog.register(Box::new(watermarks::BannerWatermark));
        catalog.register(Box::new(badges::TagAmber));
        catalog.register(Box::new(badges::TagLuxury));
        catalog.register(Box::new(badges::TagBlue));
        catalog.register(Box::new(badges::AvatarBadge));
        catalog.register(Box::new(frames::FrameModern));
        catalog.register(Box::new(frames::FrameMinimal));
        for preset in frames::Sticker::PRESETS {
            catalog.register(Box::new(preset));
        }
        catalog.register(Box::new(frames::AdBanner));
        catalog
    }

    /// Register a builder, replacing any previous one with the same id.
    pub fn register(&mut self, spec: Box<dyn TemplateSpec>) {
        self.specs.insert(spec.id(), spec);
    }

    /// All registered ids in stable order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.keys().copied()
    }

    /// Look up a builder by id.
    pub fn get(&self, id: &str) -> PhotomarkResult<&dyn TemplateSpec> {
        self.specs
            .get(id)
            .map(|s| s.as_ref())
            .ok_or_else(|| PhotomarkError::template_build(format!("unknown template '{id}'")))
    }

    /// Build a template, falling back to its default params when the given
    /// ones are rejected.
    pub fn build(
        &self,
        id: &str,
        params: &serde_json::Value,
        bounds: &BackgroundBounds,
        user: &UserProfile,
        measurer: &dyn TextMeasurer,
    ) -> PhotomarkResult<SceneObject> {
        bounds.validate()?;
        let spec = self.get(id)?;
        match spec.build(params, bounds, user, measurer) {
            Ok(obj) => Ok(obj),
            Err(PhotomarkError::TemplateBuild(msg)) => {
                warn!(template = id, %msg, "rejected params, building with defaults");
                spec.build(&spec.default_params(), bounds, user, measurer)
            }
            Err(e) => Err(e),
        }
    }
}

/// Deserialize a params struct, treating `null` as "all defaults".
pub(crate) fn parse_params<T: DeserializeOwned + Default>(
    params: &serde_json::Value,
) -> PhotomarkResult<T> {
    if params.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(params.clone())
        .map_err(|e| PhotomarkError::template_build(format!("invalid params: {e}")))
}

/// Parse a params hex color, mapping failures to template-build errors.
pub(crate) fn parse_color(hex: &str) -> PhotomarkResult<Rgba8> {
    Rgba8::from_hex(hex).map_err(|e| PhotomarkError::template_build(e.to_string()))
}

#[cfg(test)]
#[path = "../../tests/unit/template/catalog.rs"]
mod tests;
