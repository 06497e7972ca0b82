use std::collections::BTreeMap;

use kurbo::Point;
use tracing::{debug, instrument, warn};

use crate::assets::store::ImageStore;
use crate::editor::controller::{self, EditField};
use crate::foundation::color::Rgba8;
use crate::foundation::error::{PhotomarkError, PhotomarkResult};
use crate::foundation::geometry::{BackgroundBounds, Transform};
use crate::render::export::{ExportRequest, ExportedImage, encode_pixmap, export_dimensions};
use crate::render::raster::CpuRasterizer;
use crate::scene::document::CompositionDocument;
use crate::scene::graph::SceneGraph;
use crate::scene::object::{ImagePayload, ObjectId, Payload, SceneObject, TextPayload};
use crate::surface::adapter::{SurfaceAdapter, SurfaceState};
use crate::template::catalog::{TemplateCatalog, UserProfile};
use crate::text::layout::TextLayoutEngine;
use crate::text::measure::{NominalTextMeasurer, TextMeasurer};

/// Handle of one open photo within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(u64);

/// Liveness token for an in-flight background load.
///
/// Decoding happens outside the session; when the result comes back the
/// ticket proves the photo still wants it. A stale ticket (photo removed or
/// reloaded since) makes `complete_load` a logged no-op, so late results can
/// never clobber a newer photo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    doc: DocumentId,
    generation: u64,
}

struct PhotoState {
    doc: CompositionDocument,
    adapter: SurfaceAdapter,
    /// Absolute working scene, present while the surface is `Ready`.
    scene: Option<SceneGraph>,
    selection: Option<ObjectId>,
    generation: u64,
}

/// Single-threaded editing session over a set of independent photos.
///
/// Owns the template catalog, the decoded-image store, the text stack and
/// the rasterizer. All mutation is serialized through `&mut self`; the only
/// asynchronous boundary is image decoding, guarded by [`LoadTicket`].
pub struct Session {
    catalog: TemplateCatalog,
    images: ImageStore,
    fonts: TextLayoutEngine,
    raster: CpuRasterizer,
    measurer: NominalTextMeasurer,
    user: UserProfile,
    photos: BTreeMap<DocumentId, PhotoState>,
    next_doc: u64,
}

impl Session {
    /// Session with the built-in template catalog.
    pub fn new(user: UserProfile) -> Self {
        Self::with_catalog(user, TemplateCatalog::with_builtins())
    }

    /// Session with a caller-provided catalog.
    pub fn with_catalog(user: UserProfile, catalog: TemplateCatalog) -> Self {
        Self {
            catalog,
            images: ImageStore::new(),
            fonts: TextLayoutEngine::new(),
            raster: CpuRasterizer::new(),
            measurer: NominalTextMeasurer,
            user,
            photos: BTreeMap::new(),
            next_doc: 0,
        }
    }

    /// The template catalog.
    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Current agent profile.
    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    /// Replace the agent profile used by subsequent template builds.
    pub fn set_user(&mut self, user: UserProfile) {
        self.user = user;
    }

    /// Register the session font used for all text output.
    pub fn register_font(&mut self, bytes: Vec<u8>) -> PhotomarkResult<String> {
        self.fonts.register_font(bytes)
    }

    /// Decode and store an auxiliary image (avatars, logos) under `key`.
    pub fn add_image(&mut self, key: &str, bytes: &[u8]) -> PhotomarkResult<(u32, u32)> {
        let dims = self.images.insert_bytes(key, bytes)?;
        self.raster.invalidate_source(key);
        Ok(dims)
    }

    /// Open a new photo slot keyed by `background_ref` and start a load.
    pub fn load_photo(&mut self, background_ref: &str) -> (DocumentId, LoadTicket) {
        self.next_doc += 1;
        let id = DocumentId(self.next_doc);
        let state = PhotoState {
            doc: CompositionDocument::new(background_ref),
            adapter: SurfaceAdapter::new(),
            scene: None,
            selection: None,
            generation: 1,
        };
        self.photos.insert(id, state);
        (
            id,
            LoadTicket {
                doc: id,
                generation: 1,
            },
        )
    }

    /// Restore a previously saved document as a new photo slot.
    ///
    /// The background still needs loading; a fresh ticket is returned.
    pub fn import_document(&mut self, doc: CompositionDocument) -> (DocumentId, LoadTicket) {
        let (id, ticket) = self.load_photo(&doc.background_ref);
        if let Some(state) = self.photos.get_mut(&id) {
            state.doc = doc;
        }
        (id, ticket)
    }

    /// Start replacing a photo's background, invalidating earlier tickets.
    pub fn begin_reload(&mut self, id: DocumentId) -> PhotomarkResult<LoadTicket> {
        let state = self.photo_mut(id)?;
        state.generation += 1;
        Ok(LoadTicket {
            doc: id,
            generation: state.generation,
        })
    }

    /// Deliver decoded background bytes for a pending load.
    ///
    /// No-op when the ticket is stale. Decode failures leave the photo
    /// unloaded and surface to the caller.
    #[instrument(skip(self, bytes))]
    pub fn complete_load(&mut self, ticket: LoadTicket, bytes: &[u8]) -> PhotomarkResult<()> {
        let Some(state) = self.photos.get_mut(&ticket.doc) else {
            debug!(?ticket, "load completed for a removed photo, ignoring");
            return Ok(());
        };
        if state.generation != ticket.generation {
            debug!(?ticket, "load completed for a superseded ticket, ignoring");
            return Ok(());
        }

        let (w, h) = self.images.insert_bytes(&state.doc.background_ref, bytes)?;
        self.raster.invalidate_source(&state.doc.background_ref);
        state.adapter.set_image_size(w, h);
        rebuild_scene(state)?;
        Ok(())
    }

    /// Close a photo and drop its document.
    pub fn remove_photo(&mut self, id: DocumentId) -> bool {
        self.photos.remove(&id).is_some()
    }

    /// Lifecycle state of a photo's display surface.
    pub fn surface_state(&self, id: DocumentId) -> PhotomarkResult<SurfaceState> {
        Ok(self.photo(id)?.adapter.state())
    }

    /// Displayed background bounds while `Ready`.
    pub fn background_bounds(&self, id: DocumentId) -> PhotomarkResult<Option<BackgroundBounds>> {
        Ok(self.photo(id)?.adapter.bounds().copied())
    }

    /// Schedule a viewport size for a photo. Coalesced; call
    /// [`Session::commit_resize`] to apply the latest one.
    pub fn set_viewport(&mut self, id: DocumentId, width: f64, height: f64) -> PhotomarkResult<()> {
        self.photo_mut(id)?.adapter.schedule_fit(width, height);
        Ok(())
    }

    /// Apply the most recently scheduled viewport size and refit.
    ///
    /// Returns `true` when the fit changed and the scene was rebuilt from
    /// the document's relative transforms.
    pub fn commit_resize(&mut self, id: DocumentId) -> PhotomarkResult<bool> {
        let state = self.photo_mut(id)?;
        let refit = state.adapter.commit_pending_fit()?;
        if refit {
            rebuild_scene(state)?;
        }
        Ok(refit)
    }

    /// Build and place a template, replacing the previous one.
    ///
    /// A manual scale tweak recorded against the previous instance of the
    /// same template carries over to the new object.
    #[instrument(skip(self, params))]
    pub fn apply_template(
        &mut self,
        id: DocumentId,
        template_id: &str,
        params: &serde_json::Value,
    ) -> PhotomarkResult<ObjectId> {
        let state = self
            .photos
            .get_mut(&id)
            .ok_or_else(|| PhotomarkError::validation("unknown document"))?;
        let bounds = *state
            .adapter
            .bounds()
            .ok_or_else(|| PhotomarkError::validation("photo is not ready"))?;
        let scene = state
            .scene
            .as_mut()
            .ok_or_else(|| PhotomarkError::validation("photo is not ready"))?;

        let mut object =
            self.catalog
                .build(template_id, params, &bounds, &self.user, &self.measurer)?;

        let mut carried_scale = None;
        if let Some(prev) = state.doc.active_template_object.take() {
            let factor = state.doc.manual_scale_overrides.remove(&prev);
            if state.doc.active_template_id.as_deref() == Some(template_id)
                && let Some(factor) = factor
            {
                object.transform.scale_x *= factor;
                object.transform.scale_y *= factor;
                carried_scale = Some(factor);
            }
            scene.delete(prev);
        }

        state.doc.alloc_ids(&mut object);
        let new_id = object.id;
        if let Some(factor) = carried_scale {
            state.doc.manual_scale_overrides.insert(new_id, factor);
        }
        scene.insert(object);
        state.doc.active_template_id = Some(template_id.to_string());
        state.doc.active_template_object = Some(new_id);
        state.selection = Some(new_id);
        sync_to_doc(state)?;
        Ok(new_id)
    }

    /// Add a free-form text object centered on the photo.
    pub fn add_text(&mut self, id: DocumentId, text: &str, fill: Rgba8) -> PhotomarkResult<ObjectId> {
        let state = self
            .photos
            .get_mut(&id)
            .ok_or_else(|| PhotomarkError::validation("unknown document"))?;
        let bounds = *state
            .adapter
            .bounds()
            .ok_or_else(|| PhotomarkError::validation("photo is not ready"))?;
        let scene = state
            .scene
            .as_mut()
            .ok_or_else(|| PhotomarkError::validation("photo is not ready"))?;

        let font_size = bounds.width * 0.05;
        let m = self.measurer.measure(text, font_size, 700.0);
        let mut object = SceneObject::new(
            Payload::Text(TextPayload {
                text: text.to_string(),
                font_size,
                weight: 700.0,
                fill,
            }),
            Transform::at(
                bounds.origin.x + (bounds.width - m.width) / 2.0,
                bounds.origin.y + (bounds.height - m.height) / 2.0,
            ),
        );
        state.doc.alloc_ids(&mut object);
        let new_id = object.id;
        scene.insert(object);
        state.selection = Some(new_id);
        sync_to_doc(state)?;
        Ok(new_id)
    }

    /// Hit-test a surface point and make the result the selection.
    ///
    /// A miss clears the selection. Hitting a child of a group selects the
    /// group.
    pub fn select_at(&mut self, id: DocumentId, x: f64, y: f64) -> PhotomarkResult<Option<ObjectId>> {
        let measurer = self.measurer;
        let state = self.photo_mut(id)?;
        let scene = state
            .scene
            .as_ref()
            .ok_or_else(|| PhotomarkError::validation("photo is not ready"))?;
        let hit = scene.hit_test(Point::new(x, y), &measurer);
        state.selection = hit;
        Ok(hit)
    }

    /// Select an object by id, or clear the selection with `None`.
    ///
    /// Selecting a group child selects the owning group.
    pub fn select_object(&mut self, id: DocumentId, object: Option<ObjectId>) -> PhotomarkResult<()> {
        let state = self.photo_mut(id)?;
        let Some(oid) = object else {
            state.selection = None;
            return Ok(());
        };
        let scene = state
            .scene
            .as_ref()
            .ok_or_else(|| PhotomarkError::validation("photo is not ready"))?;
        let (_, owner) = scene
            .owning_top_level(oid)
            .ok_or_else(|| PhotomarkError::validation("object not found"))?;
        if !owner.selectable {
            return Err(PhotomarkError::validation("object is not selectable"));
        }
        state.selection = Some(owner.id);
        Ok(())
    }

    /// Currently selected top-level object, if any.
    pub fn selected(&self, id: DocumentId) -> PhotomarkResult<Option<ObjectId>> {
        Ok(self.photo(id)?.selection)
    }

    /// Field names editable on the current selection.
    pub fn editable_fields(&self, id: DocumentId) -> PhotomarkResult<&'static [&'static str]> {
        let state = self.photo(id)?;
        let (Some(sel), Some(scene)) = (state.selection, state.scene.as_ref()) else {
            return Ok(&[]);
        };
        Ok(scene
            .find(sel)
            .map(controller::editable_fields)
            .unwrap_or(&[]))
    }

    /// Apply a field edit to the current selection.
    pub fn update_selected(&mut self, id: DocumentId, field: &EditField) -> PhotomarkResult<()> {
        self.with_selected(id, |object| controller::apply_edit(object, field))
    }

    /// Translate the current selection by surface pixels.
    pub fn move_selected(&mut self, id: DocumentId, dx: f64, dy: f64) -> PhotomarkResult<()> {
        if !(dx.is_finite() && dy.is_finite()) {
            return Err(PhotomarkError::validation("move delta must be finite"));
        }
        self.with_selected(id, |object| {
            object.transform.left += dx;
            object.transform.top += dy;
            Ok(())
        })
    }

    /// Scale the current selection uniformly, remembering the tweak so it
    /// survives re-applying the same template.
    pub fn scale_selected(&mut self, id: DocumentId, factor: f64) -> PhotomarkResult<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(PhotomarkError::validation(format!(
                "scale factor {factor} must be finite and > 0"
            )));
        }
        let state = self.photo_mut(id)?;
        let sel = state
            .selection
            .ok_or_else(|| PhotomarkError::validation("nothing selected"))?;
        let scene = state
            .scene
            .as_mut()
            .ok_or_else(|| PhotomarkError::validation("photo is not ready"))?;
        let object = scene
            .owning_top_level_mut(sel)
            .ok_or_else(|| PhotomarkError::validation("selection no longer exists"))?;
        object.transform.scale_x *= factor;
        object.transform.scale_y *= factor;
        *state.doc.manual_scale_overrides.entry(sel).or_insert(1.0) *= factor;
        sync_to_doc(state)
    }

    /// Set the opacity of the current selection.
    pub fn set_selected_opacity(&mut self, id: DocumentId, opacity: f64) -> PhotomarkResult<()> {
        if !opacity.is_finite() {
            return Err(PhotomarkError::validation("opacity must be finite"));
        }
        self.with_selected(id, |object| {
            object.transform.opacity = opacity.clamp(0.0, 1.0);
            Ok(())
        })
    }

    /// Delete the current selection. Deleting a group removes all of its
    /// children in the same step.
    pub fn delete_selected(&mut self, id: DocumentId) -> PhotomarkResult<bool> {
        let state = self.photo_mut(id)?;
        let Some(sel) = state.selection.take() else {
            return Ok(false);
        };
        let scene = state
            .scene
            .as_mut()
            .ok_or_else(|| PhotomarkError::validation("photo is not ready"))?;
        let Some(removed) = scene.delete(sel) else {
            warn!(object = sel.0, "selection vanished before delete");
            return Ok(false);
        };
        if state.doc.active_template_object == Some(removed.id) {
            state.doc.active_template_id = None;
            state.doc.active_template_object = None;
        }
        state.doc.manual_scale_overrides.remove(&removed.id);
        sync_to_doc(state)?;
        Ok(true)
    }

    /// Raise the current selection to the top of the stack.
    pub fn bring_selected_to_front(&mut self, id: DocumentId) -> PhotomarkResult<()> {
        self.reorder_selected(id, SceneGraph::bring_to_front)
    }

    /// Lower the current selection to just above the background.
    pub fn send_selected_to_back(&mut self, id: DocumentId) -> PhotomarkResult<()> {
        self.reorder_selected(id, SceneGraph::send_to_back)
    }

    /// Whether the surface has pending changes to draw; consumes the flag.
    pub fn take_redraw(&mut self, id: DocumentId) -> PhotomarkResult<bool> {
        Ok(self.photo_mut(id)?.adapter.take_redraw())
    }

    /// Render the photo's current scene at the committed viewport size.
    pub fn render(&mut self, id: DocumentId) -> PhotomarkResult<vello_cpu::Pixmap> {
        let state = self
            .photos
            .get_mut(&id)
            .ok_or_else(|| PhotomarkError::validation("unknown document"))?;
        let (vw, vh) = state
            .adapter
            .viewport()
            .ok_or_else(|| PhotomarkError::validation("photo is not ready"))?;
        state.adapter.take_redraw();
        let scene = state
            .scene
            .as_ref()
            .ok_or_else(|| PhotomarkError::validation("photo is not ready"))?;
        self.raster.render(
            scene,
            &self.images,
            &mut self.fonts,
            vw.ceil() as u32,
            vh.ceil() as u32,
        )
    }

    /// Flatten and encode the photo at native resolution times the
    /// requested multiplier, cropped to the exact background bounds.
    ///
    /// The scene is rebuilt from the document's relative transforms at the
    /// target resolution, so output stays crisp at any multiplier.
    #[instrument(skip(self))]
    pub fn export(&mut self, id: DocumentId, req: &ExportRequest) -> PhotomarkResult<ExportedImage> {
        req.validate()?;
        let state = self
            .photos
            .get(&id)
            .ok_or_else(|| PhotomarkError::validation("unknown document"))?;
        let (iw, ih) = state
            .adapter
            .image_size()
            .ok_or_else(|| PhotomarkError::export("background is not decoded yet"))?;

        let (out_w, out_h) = export_dimensions(iw, ih, req.multiplier);
        let bounds = BackgroundBounds::from_size(f64::from(out_w), f64::from(out_h));
        let background = background_object(&state.doc.background_ref, iw, ih, &bounds);
        let scene = state.doc.absolute_scene(&bounds, background)?;

        let pixmap = self
            .raster
            .render(&scene, &self.images, &mut self.fonts, out_w, out_h)?;
        encode_pixmap(&pixmap, out_w, out_h, req)
    }

    /// The durable document for a photo, for saving.
    pub fn document(&self, id: DocumentId) -> PhotomarkResult<&CompositionDocument> {
        Ok(&self.photo(id)?.doc)
    }

    fn photo(&self, id: DocumentId) -> PhotomarkResult<&PhotoState> {
        self.photos
            .get(&id)
            .ok_or_else(|| PhotomarkError::validation("unknown document"))
    }

    fn photo_mut(&mut self, id: DocumentId) -> PhotomarkResult<&mut PhotoState> {
        self.photos
            .get_mut(&id)
            .ok_or_else(|| PhotomarkError::validation("unknown document"))
    }

    fn with_selected(
        &mut self,
        id: DocumentId,
        f: impl FnOnce(&mut SceneObject) -> PhotomarkResult<()>,
    ) -> PhotomarkResult<()> {
        let state = self.photo_mut(id)?;
        let sel = state
            .selection
            .ok_or_else(|| PhotomarkError::validation("nothing selected"))?;
        let scene = state
            .scene
            .as_mut()
            .ok_or_else(|| PhotomarkError::validation("photo is not ready"))?;
        let object = scene
            .owning_top_level_mut(sel)
            .ok_or_else(|| PhotomarkError::validation("selection no longer exists"))?;
        f(object)?;
        sync_to_doc(state)
    }

    fn reorder_selected(
        &mut self,
        id: DocumentId,
        op: impl FnOnce(&mut SceneGraph, ObjectId) -> bool,
    ) -> PhotomarkResult<()> {
        let state = self.photo_mut(id)?;
        let sel = state
            .selection
            .ok_or_else(|| PhotomarkError::validation("nothing selected"))?;
        let scene = state
            .scene
            .as_mut()
            .ok_or_else(|| PhotomarkError::validation("photo is not ready"))?;
        if !op(scene, sel) {
            return Err(PhotomarkError::validation("selection no longer exists"));
        }
        sync_to_doc(state)
    }
}

/// Background object with its absolute fit transform.
fn background_object(
    background_ref: &str,
    native_width: u32,
    native_height: u32,
    bounds: &BackgroundBounds,
) -> SceneObject {
    let (iw, ih) = (f64::from(native_width), f64::from(native_height));
    SceneObject::new(
        Payload::Image(ImagePayload {
            source: background_ref.to_string(),
            width: iw,
            height: ih,
            clip: Default::default(),
        }),
        Transform {
            left: bounds.origin.x,
            top: bounds.origin.y,
            scale_x: bounds.width / iw,
            scale_y: bounds.height / ih,
            ..Transform::default()
        },
    )
}

/// Rebuild the absolute working scene from the document, if `Ready`.
fn rebuild_scene(state: &mut PhotoState) -> PhotomarkResult<()> {
    let Some(bounds) = state.adapter.bounds().copied() else {
        state.scene = None;
        return Ok(());
    };
    let Some((iw, ih)) = state.adapter.image_size() else {
        state.scene = None;
        return Ok(());
    };
    let background = background_object(&state.doc.background_ref, iw, ih, &bounds);
    state.scene = Some(state.doc.absolute_scene(&bounds, background)?);
    state.adapter.invalidate();
    Ok(())
}

/// Re-normalize the scene into the document after a successful mutation.
fn sync_to_doc(state: &mut PhotoState) -> PhotomarkResult<()> {
    let Some(scene) = state.scene.as_ref() else {
        return Ok(());
    };
    let Some(bounds) = state.adapter.bounds().copied() else {
        return Ok(());
    };
    state.doc.sync_from_scene(scene, &bounds)?;
    state.adapter.invalidate();
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/editor/session.rs"]
mod tests;
