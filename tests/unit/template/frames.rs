use super::*;
use crate::scene::object::{Payload, ShapeKind};
use crate::text::measure::NominalTextMeasurer;
use serde_json::json;

fn user() -> UserProfile {
    UserProfile {
        name: "Jane".to_string(),
        phone: "555".to_string(),
        agency: "Sunrise Realty".to_string(),
        ..UserProfile::default()
    }
}

fn bounds() -> BackgroundBounds {
    BackgroundBounds::from_size(1000.0, 800.0)
}

fn group_children(obj: &SceneObject) -> &[SceneObject] {
    match &obj.payload {
        Payload::Group(g) => &g.children,
        _ => panic!("expected group"),
    }
}

#[test]
fn modern_frame_footer_covers_the_bottom_third() {
    let obj = FrameModern
        .build(&json!({}), &bounds(), &user(), &NominalTextMeasurer)
        .unwrap();
    assert_eq!(obj.role, Role::Frame);
    assert_eq!((obj.transform.left, obj.transform.top), (0.0, 0.0));

    let children = group_children(&obj);
    let footer = &children[0];
    assert_eq!(footer.transform.top, 800.0 * 0.65);
    let Payload::Shape(s) = &footer.payload else {
        panic!("expected footer shape");
    };
    assert_eq!(
        s.kind,
        ShapeKind::Rect {
            width: 1000.0,
            height: 800.0 * 0.35,
            radius: 0.0,
        }
    );
}

#[test]
fn modern_frame_title_and_price_are_overridable() {
    let obj = FrameModern
        .build(
            &json!({ "title": "RIVERSIDE VILLA", "price": "$450,000" }),
            &bounds(),
            &user(),
            &NominalTextMeasurer,
        )
        .unwrap();
    let texts: Vec<_> = group_children(&obj)
        .iter()
        .filter_map(|c| match &c.payload {
            Payload::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, ["RIVERSIDE VILLA", "$450,000"]);
}

#[test]
fn minimal_frame_draws_four_border_bars() {
    let obj = FrameMinimal
        .build(&json!({}), &bounds(), &user(), &NominalTextMeasurer)
        .unwrap();
    let children = group_children(&obj);

    let bars: Vec<_> = children
        .iter()
        .take(4)
        .map(|c| match &c.payload {
            Payload::Shape(s) => (&s.kind, c.transform),
            _ => panic!("expected bar"),
        })
        .collect();

    // inset 2% and bar 0.5% of a 1000-wide photo.
    let (inset, bar) = (20.0, 5.0);
    match bars[0].0 {
        ShapeKind::Rect { width, height, .. } => {
            assert_eq!((*width, *height), (1000.0 - 2.0 * inset, bar));
        }
        _ => panic!("expected rect"),
    }
    assert_eq!((bars[0].1.left, bars[0].1.top), (inset, inset));
    assert_eq!(bars[1].1.top, 800.0 - inset - bar);
    match bars[2].0 {
        ShapeKind::Rect { width, height, .. } => {
            assert_eq!((*width, *height), (bar, 800.0 - 2.0 * inset));
        }
        _ => panic!("expected rect"),
    }
}

#[test]
fn minimal_frame_caption_sits_in_the_accent_badge() {
    let obj = FrameMinimal
        .build(
            &json!({ "caption": "SOLD", "accent": "#27ae60" }),
            &bounds(),
            &user(),
            &NominalTextMeasurer,
        )
        .unwrap();
    let children = group_children(&obj);
    let badge = &children[4];
    let caption = &children[5];

    let Payload::Shape(s) = &badge.payload else {
        panic!("expected badge");
    };
    assert_eq!(s.fill, Rgba8::opaque(0x27, 0xae, 0x60));
    let Payload::Text(t) = &caption.payload else {
        panic!("expected caption");
    };
    assert_eq!(t.text, "SOLD");

    // Caption centered in the 400 x 100 badge: "SOLD" at font 40 is 96 wide.
    assert_eq!(caption.transform.left, 50.0 + (400.0 - 96.0) / 2.0);
    assert_eq!(caption.transform.top, 50.0 + (100.0 - 48.0) / 2.0);
}

#[test]
fn sticker_presets_have_distinct_labels_and_fills() {
    let mut ids = Vec::new();
    for preset in Sticker::PRESETS {
        let obj = preset
            .build(&json!({}), &bounds(), &user(), &NominalTextMeasurer)
            .unwrap();
        assert_eq!(obj.role, Role::Sticker);
        assert_eq!(preset.category(), TemplateCategory::Sticker);
        ids.push(preset.id());
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 6);
}

#[test]
fn sticker_defaults_to_a_centered_capsule() {
    let hot = Sticker::PRESETS[0];
    let obj = hot
        .build(&json!({}), &bounds(), &user(), &NominalTextMeasurer)
        .unwrap();

    // "HOT" at font 50: text 90 wide, pad 30; capsule 150 x 90, centered.
    assert_eq!(obj.transform.left, (1000.0 - 150.0) / 2.0);
    assert_eq!(obj.transform.top, (800.0 - 90.0) / 2.0);

    let children = group_children(&obj);
    let Payload::Shape(s) = &children[0].payload else {
        panic!("expected capsule");
    };
    assert_eq!(
        s.kind,
        ShapeKind::Rect {
            width: 150.0,
            height: 90.0,
            radius: 18.0,
        }
    );
}

#[test]
fn sticker_label_and_fill_overrides_apply() {
    let hot = Sticker::PRESETS[0];
    let obj = hot
        .build(
            &json!({ "label": "NEW", "fill": "#123456" }),
            &bounds(),
            &user(),
            &NominalTextMeasurer,
        )
        .unwrap();
    assert_eq!(obj.first_text().map(|t| t.text.as_str()), Some("NEW"));
    let Payload::Shape(s) = &group_children(&obj)[0].payload else {
        panic!("expected capsule");
    };
    assert_eq!(s.fill, Rgba8::opaque(0x12, 0x34, 0x56));
}

#[test]
fn ad_banner_hugs_the_bottom_edge() {
    let obj = AdBanner
        .build(&json!({}), &bounds(), &user(), &NominalTextMeasurer)
        .unwrap();
    assert_eq!(obj.role, Role::AdBlock);

    // Strip is 8% of width tall.
    assert_eq!(obj.transform.top, 800.0 - 80.0);

    let children = group_children(&obj);
    let texts: Vec<_> = children
        .iter()
        .filter_map(|c| match &c.payload {
            Payload::Text(t) => Some((t.text.as_str(), c.transform.left)),
            _ => None,
        })
        .collect();
    assert_eq!(texts[0].0, "Sunrise Realty");
    assert_eq!(texts[0].1, 30.0);
    assert_eq!(texts[1].0, "555");
    // Phone is right-aligned: 555 at font 35 is 63 wide.
    assert_eq!(texts[1].1, 1000.0 - 30.0 - 63.0);
}
