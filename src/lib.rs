//! Photomark is a resolution-independent image annotation and
//! template-compositing engine for listing photos.
//!
//! Overlays (watermarks, agent badges, frames, stickers) are declared once
//! and stored in background-relative coordinates, so they survive any change
//! of display size or source photo and reproduce deterministically at export
//! time at full resolution.
//!
//! # Pipeline overview
//!
//! 1. **Load**: decode a photo into premultiplied RGBA8 ([`ImageStore`])
//! 2. **Fit**: map native pixels onto the viewport ([`SurfaceAdapter`])
//! 3. **Compose**: build and edit the scene graph ([`Session`], templates)
//! 4. **Render**: rasterize in painter's order on the CPU ([`CpuRasterizer`])
//! 5. **Export**: re-render at native resolution and encode PNG/JPEG
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: template builds and coordinate
//!   conversions are pure and stable for a given input.
//! - **No IO in renderers**: decoding is front-loaded in [`ImageStore`].
//! - **Premultiplied RGBA8** end-to-end: renderers output premultiplied
//!   pixels; encoders flatten or unpremultiply at the edge.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod editor;
mod foundation;
mod render;
mod scene;
mod surface;
mod template;
mod text;

pub use assets::decode::{circle_masked, decode_image, premultiply_rgba8_in_place};
pub use assets::store::{ImageStore, PreparedImage};
pub use editor::controller::{EditField, apply_edit, editable_fields};
pub use editor::session::{DocumentId, LoadTicket, Session};
pub use foundation::color::Rgba8;
pub use foundation::error::{PhotomarkError, PhotomarkResult};
pub use foundation::geometry::{
    Anchor, BackgroundBounds, COORD_EPSILON, Transform, anchor_position, to_absolute, to_relative,
};
pub use render::export::{
    ExportFormat, ExportRequest, ExportedImage, encode_pixmap, export_dimensions,
};
pub use render::raster::CpuRasterizer;
pub use scene::document::CompositionDocument;
pub use scene::graph::SceneGraph;
pub use scene::object::{
    GroupPayload, ImageClip, ImagePayload, ObjectId, Payload, Role, SceneObject, ShapeKind,
    ShapePayload, TextPayload,
};
pub use surface::adapter::{SurfaceAdapter, SurfaceState};
pub use template::badges::{TAG_DESIGN_HEIGHT, TAG_DESIGN_WIDTH};
pub use template::catalog::{TemplateCatalog, TemplateCategory, TemplateSpec, UserProfile};
pub use text::layout::TextLayoutEngine;
pub use text::measure::{
    NOMINAL_ADVANCE_EM, NOMINAL_LINE_HEIGHT_EM, NominalTextMeasurer, TextMeasurer, TextMetrics,
};
