use serde::{Deserialize, Serialize};

use crate::foundation::error::{PhotomarkError, PhotomarkResult};

/// Output encoding for an export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Lossless PNG with alpha.
    Png,
    /// Lossy JPEG at the requested quality, flattened over white.
    Jpeg,
}

/// Export parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Output encoding.
    pub format: ExportFormat,
    /// JPEG quality in `1..=100`; ignored for PNG.
    pub quality: u8,
    /// Resolution multiplier over the photo's native size. The scene is
    /// re-rendered at the target resolution, never upscaled from pixels.
    pub multiplier: f64,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            format: ExportFormat::Jpeg,
            quality: 90,
            multiplier: 1.0,
        }
    }
}

impl ExportRequest {
    /// Reject requests that cannot produce a sensible output.
    pub fn validate(&self) -> PhotomarkResult<()> {
        if !self.multiplier.is_finite() || self.multiplier <= 0.0 {
            return Err(PhotomarkError::export(format!(
                "multiplier {} must be finite and > 0",
                self.multiplier
            )));
        }
        if self.format == ExportFormat::Jpeg && !(1..=100).contains(&self.quality) {
            return Err(PhotomarkError::export(format!(
                "jpeg quality {} must be in 1..=100",
                self.quality
            )));
        }
        Ok(())
    }
}

/// Encoded export output.
#[derive(Clone, Debug)]
pub struct ExportedImage {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Encoding used.
    pub format: ExportFormat,
    /// Encoded file bytes.
    pub bytes: Vec<u8>,
}

/// Exact output dimensions for a native photo size and multiplier.
pub fn export_dimensions(native_width: u32, native_height: u32, multiplier: f64) -> (u32, u32) {
    let w = (f64::from(native_width) * multiplier).round().max(1.0) as u32;
    let h = (f64::from(native_height) * multiplier).round().max(1.0) as u32;
    (w, h)
}

/// Encode a rendered pixmap into the requested file format.
pub fn encode_pixmap(
    pixmap: &vello_cpu::Pixmap,
    width: u32,
    height: u32,
    req: &ExportRequest,
) -> PhotomarkResult<ExportedImage> {
    let premul = pixmap.data_as_u8_slice();
    if premul.len() != width as usize * height as usize * 4 {
        return Err(PhotomarkError::export(
            "rendered pixel buffer does not match the requested dimensions",
        ));
    }

    let bytes = match req.format {
        ExportFormat::Png => {
            let mut data = premul.to_vec();
            unpremultiply_rgba8_in_place(&mut data);
            let img = image::RgbaImage::from_raw(width, height, data)
                .ok_or_else(|| PhotomarkError::export("pixel buffer size mismatch"))?;
            let mut out = Vec::new();
            image::DynamicImage::ImageRgba8(img)
                .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
                .map_err(|e| PhotomarkError::export(format!("png encode: {e}")))?;
            out
        }
        ExportFormat::Jpeg => {
            let rgb = flatten_over_white(premul);
            let mut out = Vec::new();
            let mut cursor = std::io::Cursor::new(&mut out);
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, req.quality);
            encoder
                .encode(&rgb, width, height, image::ExtendedColorType::Rgb8)
                .map_err(|e| PhotomarkError::export(format!("jpeg encode: {e}")))?;
            out
        }
    };

    Ok(ExportedImage {
        width,
        height,
        format: req.format,
        bytes,
    })
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in px.iter_mut().take(3) {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Composite premultiplied RGBA over an opaque white page, dropping alpha.
fn flatten_over_white(premul: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(premul.len() / 4 * 3);
    for px in premul.chunks_exact(4) {
        let inv_a = 255 - u16::from(px[3]);
        rgb.push((u16::from(px[0]) + inv_a).min(255) as u8);
        rgb.push((u16::from(px[1]) + inv_a).min(255) as u8);
        rgb.push((u16::from(px[2]) + inv_a).min(255) as u8);
    }
    rgb
}

#[cfg(test)]
#[path = "../../tests/unit/render/export.rs"]
mod tests;
