use kurbo::{BezPath, Rect, Shape};
use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgba8;
use crate::foundation::geometry::Transform;
use crate::text::measure::TextMeasurer;

/// Stable per-document object identifier.
///
/// Ids are allocated once when an object enters a document and survive
/// reordering, refits and serialization.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// Placeholder id for objects not yet inserted into a document.
    pub const UNASSIGNED: Self = Self(0);
}

/// What an object is for. Drives selectability and replacement rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The photo itself. Exactly one per scene, always at the bottom,
    /// never selectable.
    Background,
    /// Watermark or agent badge produced by a template.
    Watermark,
    /// Full-bleed frame produced by a template.
    Frame,
    /// Decorative sticker.
    Sticker,
    /// Advertising strip.
    AdBlock,
    /// Free-form object added by the user.
    #[default]
    UserContent,
}

/// Optional mask applied to an image payload at draw time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageClip {
    /// Draw the full bitmap.
    #[default]
    None,
    /// Clip to the largest circle inscribed in the bitmap (avatar discs).
    Circle,
}

/// Bitmap drawn at a logical size in local units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImagePayload {
    /// Key into the session image store.
    pub source: String,
    /// Logical width in local units.
    pub width: f64,
    /// Logical height in local units.
    pub height: f64,
    /// Mask applied when drawing.
    #[serde(default)]
    pub clip: ImageClip,
}

/// Single-line text run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextPayload {
    /// Text content.
    pub text: String,
    /// Font size in local units.
    pub font_size: f64,
    /// Font weight (CSS scale, 100-900).
    pub weight: f32,
    /// Fill color.
    pub fill: Rgba8,
}

/// Filled vector geometry in local units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ShapeKind {
    /// Axis-aligned rectangle with rounded corners, origin at top-left.
    Rect {
        /// Width in local units.
        width: f64,
        /// Height in local units.
        height: f64,
        /// Corner radius in local units.
        radius: f64,
    },
    /// Circle occupying the square `(0, 0, 2r, 2r)`.
    Circle {
        /// Radius in local units.
        radius: f64,
    },
    /// Arbitrary filled path.
    Path {
        /// Path geometry in local units.
        path: BezPath,
    },
}

impl ShapeKind {
    /// Shape outline as a fillable path.
    pub fn to_path(&self) -> BezPath {
        match self {
            Self::Rect {
                width,
                height,
                radius,
            } => kurbo::RoundedRect::new(0.0, 0.0, *width, *height, *radius).to_path(0.1),
            Self::Circle { radius } => kurbo::Circle::new((*radius, *radius), *radius).to_path(0.1),
            Self::Path { path } => path.clone(),
        }
    }

    /// Axis-aligned bounds in local units.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Rect { width, height, .. } => Rect::new(0.0, 0.0, *width, *height),
            Self::Circle { radius } => Rect::new(0.0, 0.0, 2.0 * radius, 2.0 * radius),
            Self::Path { path } => path.bounding_box(),
        }
    }
}

/// Filled shape with a solid color.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapePayload {
    /// Shape geometry.
    pub kind: ShapeKind,
    /// Fill color.
    pub fill: Rgba8,
}

/// Ordered children composing under the group transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupPayload {
    /// Children in painter's order, transforms local to the group.
    pub children: Vec<SceneObject>,
}

/// Object content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    /// Bitmap image.
    Image(ImagePayload),
    /// Text run.
    Text(TextPayload),
    /// Filled shape.
    Shape(ShapePayload),
    /// Group of child objects.
    Group(GroupPayload),
}

/// One node in the scene graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Stable identifier, [`ObjectId::UNASSIGNED`] until inserted.
    pub id: ObjectId,
    /// Object content.
    pub payload: Payload,
    /// Placement; top-level objects use background-relative or surface
    /// space depending on context, group children use group-local units.
    pub transform: Transform,
    /// Whether the object can be picked and edited directly.
    pub selectable: bool,
    /// Purpose of the object.
    pub role: Role,
}

impl SceneObject {
    /// New selectable user-content object with an unassigned id.
    pub fn new(payload: Payload, transform: Transform) -> Self {
        Self {
            id: ObjectId::UNASSIGNED,
            payload,
            transform,
            selectable: true,
            role: Role::UserContent,
        }
    }

    /// Same object with a different role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Same object with explicit selectability.
    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    /// Assign fresh ids to this object and all descendants.
    pub fn assign_ids(&mut self, next: &mut u64) {
        *next += 1;
        self.id = ObjectId(*next);
        if let Payload::Group(g) = &mut self.payload {
            for child in &mut g.children {
                child.assign_ids(next);
            }
        }
    }

    /// Whether `id` names this object or one of its descendants.
    pub fn contains_id(&self, id: ObjectId) -> bool {
        if self.id == id {
            return true;
        }
        match &self.payload {
            Payload::Group(g) => g.children.iter().any(|c| c.contains_id(id)),
            _ => false,
        }
    }

    /// Content bounds in local units, before this object's transform.
    ///
    /// Text extents come from `measurer` so pure callers stay deterministic.
    pub fn local_bounds(&self, measurer: &dyn TextMeasurer) -> Rect {
        match &self.payload {
            Payload::Image(i) => Rect::new(0.0, 0.0, i.width, i.height),
            Payload::Text(t) => {
                let m = measurer.measure(&t.text, t.font_size, t.weight);
                Rect::new(0.0, 0.0, m.width, m.height)
            }
            Payload::Shape(s) => s.kind.bounds(),
            Payload::Group(g) => {
                let mut acc: Option<Rect> = None;
                for child in &g.children {
                    let b = child
                        .transform
                        .to_affine()
                        .transform_rect_bbox(child.local_bounds(measurer));
                    acc = Some(match acc {
                        Some(r) => r.union(b),
                        None => b,
                    });
                }
                acc.unwrap_or(Rect::ZERO)
            }
        }
    }

    /// First text payload in this subtree, depth-first.
    pub fn first_text(&self) -> Option<&TextPayload> {
        match &self.payload {
            Payload::Text(t) => Some(t),
            Payload::Group(g) => g.children.iter().find_map(|c| c.first_text()),
            _ => None,
        }
    }

    /// Mutable variant of [`SceneObject::first_text`].
    pub fn first_text_mut(&mut self) -> Option<&mut TextPayload> {
        match &mut self.payload {
            Payload::Text(t) => Some(t),
            Payload::Group(g) => g.children.iter_mut().find_map(|c| c.first_text_mut()),
            _ => None,
        }
    }

    /// Apply `f` to every text payload in this subtree. Returns the count.
    pub fn for_each_text_mut(&mut self, f: &mut dyn FnMut(&mut TextPayload)) -> usize {
        match &mut self.payload {
            Payload::Text(t) => {
                f(t);
                1
            }
            Payload::Group(g) => g
                .children
                .iter_mut()
                .map(|c| c.for_each_text_mut(f))
                .sum(),
            _ => 0,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/object.rs"]
mod tests;
