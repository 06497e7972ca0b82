use super::*;
use crate::text::measure::NominalTextMeasurer;
use serde_json::json;

fn user() -> UserProfile {
    UserProfile {
        name: "Jane Tran".to_string(),
        phone: "0901 234 567".to_string(),
        agency: "Sunrise Realty".to_string(),
        job_title: "Senior Agent".to_string(),
        avatar_ref: None,
    }
}

fn bounds() -> BackgroundBounds {
    BackgroundBounds::from_size(1000.0, 600.0)
}

#[test]
fn builtins_cover_the_full_catalog() {
    let catalog = TemplateCatalog::with_builtins();
    let ids: Vec<_> = catalog.ids().collect();
    for expected in [
        "pill",
        "banner",
        "tag_amber",
        "tag_luxury",
        "tag_blue",
        "avatar_badge",
        "frame_modern",
        "frame_minimal",
        "sticker_hot",
        "sticker_price_cut",
        "sticker_deed",
        "sticker_urgent",
        "sticker_storefront",
        "sticker_bank",
        "ad_banner",
    ] {
        assert!(ids.contains(&expected), "missing {expected}");
    }
}

#[test]
fn unknown_id_is_a_template_build_error() {
    let catalog = TemplateCatalog::with_builtins();
    let err = catalog
        .build("no_such", &json!({}), &bounds(), &user(), &NominalTextMeasurer)
        .unwrap_err();
    assert!(matches!(err, PhotomarkError::TemplateBuild(_)));
}

#[test]
fn rejected_params_fall_back_to_defaults() {
    let catalog = TemplateCatalog::with_builtins();
    let m = NominalTextMeasurer;

    let with_defaults = catalog
        .build("tag_amber", &json!({}), &bounds(), &user(), &m)
        .unwrap();
    let with_bad = catalog
        .build(
            "tag_amber",
            &json!({ "width_frac": 7.0 }),
            &bounds(),
            &user(),
            &m,
        )
        .unwrap();
    assert_eq!(with_defaults, with_bad);

    // Unknown fields are rejected too, then recovered from.
    let with_unknown = catalog
        .build(
            "pill",
            &json!({ "no_such_field": 1 }),
            &bounds(),
            &user(),
            &m,
        )
        .unwrap();
    let pill_defaults = catalog
        .build("pill", &json!({}), &bounds(), &user(), &m)
        .unwrap();
    assert_eq!(with_unknown, pill_defaults);
}

#[test]
fn bad_fill_strings_fall_back_to_defaults() {
    let catalog = TemplateCatalog::with_builtins();
    let m = NominalTextMeasurer;

    let defaults = catalog
        .build("sticker_hot", &json!({}), &bounds(), &user(), &m)
        .unwrap();
    for fill in ["#\u{20ac}\u{20ac}", "#nope", "red"] {
        let built = catalog
            .build("sticker_hot", &json!({ "fill": fill }), &bounds(), &user(), &m)
            .unwrap();
        assert_eq!(built, defaults, "fill {fill:?} did not recover");
    }
}

#[test]
fn degenerate_bounds_fail_before_building() {
    let catalog = TemplateCatalog::with_builtins();
    let err = catalog
        .build(
            "pill",
            &json!({}),
            &BackgroundBounds::from_size(0.0, 100.0),
            &user(),
            &NominalTextMeasurer,
        )
        .unwrap_err();
    assert!(matches!(err, PhotomarkError::DegenerateBounds(_)));
}

#[test]
fn builds_are_deterministic() {
    let catalog = TemplateCatalog::with_builtins();
    let m = NominalTextMeasurer;
    for id in catalog.ids() {
        let a = catalog.build(id, &json!({}), &bounds(), &user(), &m).unwrap();
        let b = catalog.build(id, &json!({}), &bounds(), &user(), &m).unwrap();
        assert_eq!(a, b, "{id} build is not deterministic");
    }
}

#[test]
fn every_builtin_output_is_a_selectable_group() {
    let catalog = TemplateCatalog::with_builtins();
    let m = NominalTextMeasurer;
    for id in catalog.ids() {
        let obj = catalog.build(id, &json!({}), &bounds(), &user(), &m).unwrap();
        assert!(
            matches!(obj.payload, crate::scene::object::Payload::Group(_)),
            "{id} is not a group"
        );
        assert!(obj.selectable, "{id} is not selectable");
    }
}

#[test]
fn null_params_mean_all_defaults() {
    #[derive(Debug, Default, PartialEq, serde::Deserialize)]
    struct P {
        x: u32,
    }
    let p: P = parse_params(&serde_json::Value::Null).unwrap();
    assert_eq!(p, P::default());
    let p: P = parse_params(&json!({ "x": 3 })).unwrap();
    assert_eq!(p, P { x: 3 });
    let err = parse_params::<P>(&json!({ "x": "nope" })).unwrap_err();
    assert!(matches!(err, PhotomarkError::TemplateBuild(_)));
}

#[test]
fn parse_color_maps_failures_to_template_errors() {
    assert_eq!(parse_color("#ffffff").unwrap(), Rgba8::WHITE);
    assert!(matches!(
        parse_color("#nope").unwrap_err(),
        PhotomarkError::TemplateBuild(_)
    ));
}
