use super::*;
use crate::PhotomarkError;

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

#[test]
fn decodes_and_premultiplies() {
    let bytes = png_bytes(4, 2, [200, 100, 50, 128]);
    let img = decode_image(&bytes).unwrap();
    assert_eq!((img.width, img.height), (4, 2));
    assert_eq!(img.rgba8_premul.len(), 4 * 2 * 4);

    let px = &img.rgba8_premul[0..4];
    assert_eq!(px[0], ((200u16 * 128 + 127) / 255) as u8);
    assert_eq!(px[1], ((100u16 * 128 + 127) / 255) as u8);
    assert_eq!(px[2], ((50u16 * 128 + 127) / 255) as u8);
    assert_eq!(px[3], 128);
}

#[test]
fn garbage_bytes_fail_with_a_decode_error() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, PhotomarkError::ImageDecode(_)));
}

#[test]
fn premultiply_zero_alpha_clears_color() {
    let mut px = [255, 255, 255, 0, 255, 255, 255, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[0, 0, 0, 0]);
    assert_eq!(&px[4..8], &[255, 255, 255, 255]);
}

#[test]
fn premultiply_is_exact_for_opaque_and_half_alpha() {
    let mut px = [100, 200, 10, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, [100, 200, 10, 255]);

    let mut px = [100, 0, 255, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, [50, 0, 128, 128]);
}

#[test]
fn circle_mask_keeps_center_and_clears_corners() {
    let bytes = png_bytes(16, 16, [255, 255, 255, 255]);
    let img = decode_image(&bytes).unwrap();
    let masked = circle_masked(&img);
    assert_eq!((masked.width, masked.height), (16, 16));

    let px = |x: usize, y: usize| &masked.rgba8_premul[(y * 16 + x) * 4..(y * 16 + x) * 4 + 4];
    assert_eq!(px(8, 8), &[255, 255, 255, 255]);
    assert_eq!(px(0, 0), &[0, 0, 0, 0]);
    assert_eq!(px(15, 15), &[0, 0, 0, 0]);
    // Edge midpoints sit on the rim and keep most of their coverage.
    assert!(px(8, 0)[3] > 0);
}

#[test]
fn circle_mask_does_not_touch_the_source() {
    let bytes = png_bytes(8, 8, [10, 20, 30, 255]);
    let img = decode_image(&bytes).unwrap();
    let _ = circle_masked(&img);
    assert_eq!(&img.rgba8_premul[0..4], &[10, 20, 30, 255]);
}
