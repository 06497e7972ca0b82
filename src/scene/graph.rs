use kurbo::Point;

use crate::scene::object::{ObjectId, Role, SceneObject};
use crate::text::measure::TextMeasurer;

/// Ordered set of scene objects in painter's order.
///
/// Index 0 holds the background when one is set; it is pinned there and
/// excluded from reordering, hit testing and deletion. Everything above it
/// draws bottom to top.
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    objects: Vec<SceneObject>,
}

impl SceneGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects in painter's order, background first when present.
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Install or replace the background object.
    ///
    /// The object is forced non-selectable and pinned at the bottom.
    pub fn set_background(&mut self, mut object: SceneObject) {
        object.role = Role::Background;
        object.selectable = false;
        if self.has_background() {
            self.objects[0] = object;
        } else {
            self.objects.insert(0, object);
        }
    }

    /// Background object, if set.
    pub fn background(&self) -> Option<&SceneObject> {
        self.objects.first().filter(|o| o.role == Role::Background)
    }

    fn has_background(&self) -> bool {
        self.background().is_some()
    }

    /// Lowest index a non-background object may occupy.
    fn floor(&self) -> usize {
        usize::from(self.has_background())
    }

    /// Append an object on top of the stack.
    pub fn insert(&mut self, object: SceneObject) {
        debug_assert!(
            object.role != Role::Background,
            "background must go through set_background"
        );
        self.objects.push(object);
    }

    /// Non-background top-level objects, bottom to top.
    pub fn overlays(&self) -> &[SceneObject] {
        &self.objects[self.floor()..]
    }

    /// Find an object or descendant by id.
    pub fn find(&self, id: ObjectId) -> Option<&SceneObject> {
        fn walk(obj: &SceneObject, id: ObjectId) -> Option<&SceneObject> {
            if obj.id == id {
                return Some(obj);
            }
            match &obj.payload {
                crate::scene::object::Payload::Group(g) => {
                    g.children.iter().find_map(|c| walk(c, id))
                }
                _ => None,
            }
        }
        self.objects.iter().find_map(|o| walk(o, id))
    }

    /// Top-level object that is or contains `id`, with its index.
    pub fn owning_top_level(&self, id: ObjectId) -> Option<(usize, &SceneObject)> {
        self.objects
            .iter()
            .enumerate()
            .skip(self.floor())
            .find(|(_, o)| o.contains_id(id))
    }

    /// Mutable access to the top-level object that is or contains `id`.
    pub fn owning_top_level_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        let floor = self.floor();
        self.objects
            .iter_mut()
            .skip(floor)
            .find(|o| o.contains_id(id))
    }

    /// Remove the top-level object that is or contains `id`.
    ///
    /// Removing a group removes all of its children with it. The background
    /// cannot be removed this way.
    pub fn delete(&mut self, id: ObjectId) -> Option<SceneObject> {
        let (index, _) = self.owning_top_level(id)?;
        Some(self.objects.remove(index))
    }

    /// Move the object owning `id` to the top of the stack.
    pub fn bring_to_front(&mut self, id: ObjectId) -> bool {
        let Some((index, _)) = self.owning_top_level(id) else {
            return false;
        };
        let obj = self.objects.remove(index);
        self.objects.push(obj);
        true
    }

    /// Move the object owning `id` just above the background.
    pub fn send_to_back(&mut self, id: ObjectId) -> bool {
        let floor = self.floor();
        let Some((index, _)) = self.owning_top_level(id) else {
            return false;
        };
        let obj = self.objects.remove(index);
        self.objects.insert(floor, obj);
        true
    }

    /// Topmost selectable object under `point`, in the graph's own space.
    ///
    /// A hit inside a group's bounds selects the group; children are not
    /// addressable individually.
    pub fn hit_test(&self, point: Point, measurer: &dyn TextMeasurer) -> Option<ObjectId> {
        for obj in self.objects.iter().skip(self.floor()).rev() {
            if !obj.selectable {
                continue;
            }
            let affine = obj.transform.to_affine();
            if affine.determinant().abs() < 1e-12 {
                continue;
            }
            let local = affine.inverse() * point;
            if obj.local_bounds(measurer).contains(local) {
                return Some(obj.id);
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
