use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::foundation::error::PhotomarkResult;
use crate::foundation::geometry::{BackgroundBounds, to_absolute, to_relative};
use crate::scene::graph::SceneGraph;
use crate::scene::object::{ObjectId, SceneObject};

/// Durable, display-independent record of one annotated photo.
///
/// Overlay transforms are stored in background-relative space so the
/// document reproduces identically on any surface and at any export
/// resolution. The background itself is not stored as an object; it is
/// reconstructed from `background_ref` when a working scene is built.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompositionDocument {
    /// Key of the background photo in the session image store.
    pub background_ref: String,
    /// Overlay objects in painter's order, transforms relative.
    pub objects: Vec<SceneObject>,
    /// Template last applied, if any.
    pub active_template_id: Option<String>,
    /// Top-level object produced by the active template.
    pub active_template_object: Option<ObjectId>,
    /// User scale tweaks, keyed by object id, carried across template
    /// re-application.
    pub manual_scale_overrides: BTreeMap<ObjectId, f64>,
    next_id: u64,
}

impl CompositionDocument {
    /// Empty document for a background photo.
    pub fn new(background_ref: impl Into<String>) -> Self {
        Self {
            background_ref: background_ref.into(),
            objects: Vec::new(),
            active_template_id: None,
            active_template_object: None,
            manual_scale_overrides: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Assign fresh ids to `object` and its descendants.
    pub fn alloc_ids(&mut self, object: &mut SceneObject) {
        object.assign_ids(&mut self.next_id);
    }

    /// Build the absolute working scene for the given display bounds.
    ///
    /// `background` must already carry its absolute fit transform; stored
    /// overlays are converted with [`to_absolute`]. Group children keep
    /// their group-local transforms untouched.
    pub fn absolute_scene(
        &self,
        bounds: &BackgroundBounds,
        background: SceneObject,
    ) -> PhotomarkResult<SceneGraph> {
        let mut scene = SceneGraph::new();
        scene.set_background(background);
        for stored in &self.objects {
            let mut obj = stored.clone();
            obj.transform = to_absolute(&stored.transform, bounds)?;
            scene.insert(obj);
        }
        Ok(scene)
    }

    /// Re-normalize the working scene back into this document.
    ///
    /// Replaces the stored overlays wholesale: payload edits, ordering and
    /// absolute transforms (converted with [`to_relative`]) all persist in
    /// one step, so the document is never half-updated.
    pub fn sync_from_scene(
        &mut self,
        scene: &SceneGraph,
        bounds: &BackgroundBounds,
    ) -> PhotomarkResult<()> {
        let mut stored = Vec::with_capacity(scene.overlays().len());
        for obj in scene.overlays() {
            let mut rel = obj.clone();
            rel.transform = to_relative(&obj.transform, bounds)?;
            stored.push(rel);
        }
        self.objects = stored;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
