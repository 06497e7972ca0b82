//! Small constructors shared by the template builders.

use kurbo::BezPath;

use crate::foundation::color::Rgba8;
use crate::foundation::geometry::Transform;
use crate::scene::object::{
    GroupPayload, ImageClip, ImagePayload, Payload, Role, SceneObject, ShapeKind, ShapePayload,
    TextPayload,
};

pub(crate) fn rect(x: f64, y: f64, width: f64, height: f64, radius: f64, fill: Rgba8) -> SceneObject {
    shape(x, y, ShapeKind::Rect { width, height, radius }, fill)
}

pub(crate) fn circle(x: f64, y: f64, radius: f64, fill: Rgba8) -> SceneObject {
    shape(x, y, ShapeKind::Circle { radius }, fill)
}

pub(crate) fn path(x: f64, y: f64, path: BezPath, fill: Rgba8) -> SceneObject {
    shape(x, y, ShapeKind::Path { path }, fill)
}

pub(crate) fn shape(x: f64, y: f64, kind: ShapeKind, fill: Rgba8) -> SceneObject {
    SceneObject::new(
        Payload::Shape(ShapePayload { kind, fill }),
        Transform::at(x, y),
    )
    .with_selectable(false)
}

pub(crate) fn text(
    x: f64,
    y: f64,
    content: impl Into<String>,
    font_size: f64,
    weight: f32,
    fill: Rgba8,
) -> SceneObject {
    SceneObject::new(
        Payload::Text(TextPayload {
            text: content.into(),
            font_size,
            weight,
            fill,
        }),
        Transform::at(x, y),
    )
    .with_selectable(false)
}

pub(crate) fn image(
    x: f64,
    y: f64,
    source: impl Into<String>,
    width: f64,
    height: f64,
    clip: ImageClip,
) -> SceneObject {
    SceneObject::new(
        Payload::Image(ImagePayload {
            source: source.into(),
            width,
            height,
            clip,
        }),
        Transform::at(x, y),
    )
    .with_selectable(false)
}

pub(crate) fn group(children: Vec<SceneObject>, transform: Transform, role: Role) -> SceneObject {
    SceneObject::new(Payload::Group(GroupPayload { children }), transform).with_role(role)
}

/// Regular hexagon outline centered at `(cx, cy)`, flat vertex up.
pub(crate) fn hexagon(cx: f64, cy: f64, radius: f64) -> BezPath {
    let mut p = BezPath::new();
    for i in 0..6 {
        let angle = std::f64::consts::FRAC_PI_2 + f64::from(i) * std::f64::consts::FRAC_PI_3;
        let pt = (cx + radius * angle.cos(), cy - radius * angle.sin());
        if i == 0 {
            p.move_to(pt);
        } else {
            p.line_to(pt);
        }
    }
    p.close_path();
    p
}
