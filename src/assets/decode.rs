use std::sync::Arc;

use crate::assets::store::PreparedImage;
use crate::foundation::error::{PhotomarkError, PhotomarkResult};

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> PhotomarkResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| PhotomarkError::image_decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Premultiply straight-alpha RGBA8 pixels in place.
pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Return a copy of `image` masked to its largest inscribed circle.
///
/// Coverage falls off linearly across one pixel at the rim so avatar discs
/// keep a soft edge without a vector clip.
pub fn circle_masked(image: &PreparedImage) -> PreparedImage {
    let w = image.width as usize;
    let h = image.height as usize;
    let mut data = image.rgba8_premul.as_ref().clone();

    let cx = image.width as f64 / 2.0;
    let cy = image.height as f64 / 2.0;
    let r = cx.min(cy);

    for y in 0..h {
        for x in 0..w {
            let dx = (x as f64 + 0.5) - cx;
            let dy = (y as f64 + 0.5) - cy;
            let d = (dx * dx + dy * dy).sqrt();
            let coverage = (r + 0.5 - d).clamp(0.0, 1.0);
            if coverage >= 1.0 {
                continue;
            }
            let px = &mut data[(y * w + x) * 4..(y * w + x) * 4 + 4];
            for c in px.iter_mut() {
                *c = (f64::from(*c) * coverage).round() as u8;
            }
        }
    }

    PreparedImage {
        width: image.width,
        height: image.height,
        rgba8_premul: Arc::new(data),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
