use super::*;

fn solid_pixmap(width: u16, height: u16, px: [u8; 4]) -> vello_cpu::Pixmap {
    let pixels = vec![
        vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        };
        usize::from(width) * usize::from(height)
    ];
    vello_cpu::Pixmap::from_parts_with_opacity(pixels, width, height, px[3] != 255)
}

#[test]
fn dimensions_round_to_the_nearest_pixel() {
    assert_eq!(export_dimensions(200, 100, 1.0), (200, 100));
    assert_eq!(export_dimensions(200, 100, 1.5), (300, 150));
    assert_eq!(export_dimensions(200, 100, 3.0), (600, 300));
    assert_eq!(export_dimensions(25, 25, 1.1), (28, 28));
}

#[test]
fn dimensions_never_collapse_to_zero() {
    assert_eq!(export_dimensions(100, 100, 0.001), (1, 1));
    assert_eq!(export_dimensions(1, 1, 0.2), (1, 1));
}

#[test]
fn requests_are_validated() {
    assert!(ExportRequest::default().validate().is_ok());

    for multiplier in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let req = ExportRequest {
            multiplier,
            ..ExportRequest::default()
        };
        assert!(matches!(
            req.validate().unwrap_err(),
            PhotomarkError::Export(_)
        ));
    }

    let req = ExportRequest {
        format: ExportFormat::Jpeg,
        quality: 0,
        multiplier: 1.0,
    };
    assert!(req.validate().is_err());

    // Quality is ignored for PNG.
    let req = ExportRequest {
        format: ExportFormat::Png,
        quality: 0,
        multiplier: 1.0,
    };
    assert!(req.validate().is_ok());
}

#[test]
fn png_round_trips_opaque_pixels() {
    let pixmap = solid_pixmap(4, 3, [25, 50, 100, 255]);
    let req = ExportRequest {
        format: ExportFormat::Png,
        quality: 90,
        multiplier: 1.0,
    };
    let out = encode_pixmap(&pixmap, 4, 3, &req).unwrap();
    assert_eq!((out.width, out.height), (4, 3));

    let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (4, 3));
    assert_eq!(decoded.get_pixel(0, 0).0, [25, 50, 100, 255]);
}

#[test]
fn png_unpremultiplies_translucent_pixels() {
    let pixmap = solid_pixmap(2, 2, [50, 0, 128, 128]);
    let req = ExportRequest {
        format: ExportFormat::Png,
        quality: 90,
        multiplier: 1.0,
    };
    let out = encode_pixmap(&pixmap, 2, 2, &req).unwrap();
    let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [100, 0, 255, 128]);
}

#[test]
fn jpeg_flattens_transparency_over_white() {
    let pixmap = solid_pixmap(8, 8, [0, 0, 0, 0]);
    let req = ExportRequest {
        format: ExportFormat::Jpeg,
        quality: 90,
        multiplier: 1.0,
    };
    let out = encode_pixmap(&pixmap, 8, 8, &req).unwrap();
    assert_eq!(out.format, ExportFormat::Jpeg);

    let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgb8();
    let px = decoded.get_pixel(4, 4).0;
    assert!(px.iter().all(|c| *c >= 250), "{px:?}");
}

#[test]
fn jpeg_keeps_opaque_colors_close() {
    let pixmap = solid_pixmap(8, 8, [200, 40, 40, 255]);
    let req = ExportRequest {
        format: ExportFormat::Jpeg,
        quality: 95,
        multiplier: 1.0,
    };
    let out = encode_pixmap(&pixmap, 8, 8, &req).unwrap();
    let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgb8();
    let px = decoded.get_pixel(4, 4).0;
    assert!((i16::from(px[0]) - 200).abs() <= 8, "{px:?}");
    assert!((i16::from(px[1]) - 40).abs() <= 8, "{px:?}");
}

#[test]
fn mismatched_buffers_are_rejected() {
    let pixmap = solid_pixmap(2, 2, [0, 0, 0, 255]);
    let err = encode_pixmap(&pixmap, 3, 3, &ExportRequest::default()).unwrap_err();
    assert!(matches!(err, PhotomarkError::Export(_)));
}

#[test]
fn unpremultiply_restores_straight_alpha() {
    let mut px = [50, 0, 128, 128, 10, 20, 30, 255, 5, 5, 5, 0];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[100, 0, 255, 128]);
    assert_eq!(&px[4..8], &[10, 20, 30, 255]);
    assert_eq!(&px[8..12], &[5, 5, 5, 0]);
}

#[test]
fn flatten_adds_the_white_remainder() {
    let rgb = flatten_over_white(&[0, 0, 0, 128, 100, 50, 0, 255, 0, 0, 0, 0]);
    assert_eq!(rgb, vec![127, 127, 127, 100, 50, 0, 255, 255, 255]);
}
