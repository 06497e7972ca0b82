use std::collections::HashMap;

use kurbo::Affine;
use tracing::warn;

use crate::assets::decode;
use crate::assets::store::{ImageStore, PreparedImage};
use crate::foundation::error::{PhotomarkError, PhotomarkResult};
use crate::scene::graph::SceneGraph;
use crate::scene::object::{ImageClip, Payload, SceneObject, TextPayload};
use crate::text::layout::TextLayoutEngine;

/// CPU scene rasterizer on top of `vello_cpu`.
///
/// Draws a scene in painter's order into a premultiplied RGBA8 pixmap. The
/// context and target are explicit arguments throughout; there is no ambient
/// current-object state. Image paints are cached per source and clip.
///
/// Draw-time inconsistencies (missing image key, no font) are invariant
/// violations upstream, so they assert in debug builds and degrade to a
/// logged skip in release builds.
#[derive(Default)]
pub struct CpuRasterizer {
    image_paints: HashMap<(String, ImageClip), (vello_cpu::Image, f64, f64)>,
    // One font per session; cached FontData is keyed to it.
    font: Option<vello_cpu::peniko::FontData>,
}

impl CpuRasterizer {
    /// Rasterizer with empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `scene` into a `width x height` pixmap.
    ///
    /// Scene coordinates map 1:1 to pixmap pixels; exports rebuild the scene
    /// at the target size instead of scaling the draw.
    pub fn render(
        &mut self,
        scene: &SceneGraph,
        images: &ImageStore,
        text: &mut TextLayoutEngine,
        width: u32,
        height: u32,
    ) -> PhotomarkResult<vello_cpu::Pixmap> {
        let w: u16 = width
            .try_into()
            .map_err(|_| PhotomarkError::export("render width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| PhotomarkError::export("render height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        for obj in scene.objects() {
            self.draw_object(&mut ctx, obj, Affine::IDENTITY, images, text)?;
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(pixmap)
    }

    fn draw_object(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        obj: &SceneObject,
        parent: Affine,
        images: &ImageStore,
        text: &mut TextLayoutEngine,
    ) -> PhotomarkResult<()> {
        let affine = parent * obj.transform.to_affine();
        if !affine.as_coeffs().iter().all(|c| c.is_finite()) {
            debug_assert!(false, "non-finite object transform");
            warn!(object = obj.id.0, "skipping object with non-finite transform");
            return Ok(());
        }

        let opacity = obj.transform.opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return Ok(());
        }
        let layered = opacity < 1.0;
        if layered {
            ctx.push_opacity_layer(opacity as f32);
        }

        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        match &obj.payload {
            Payload::Shape(s) => {
                ctx.set_transform(affine_to_cpu(affine));
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    s.fill.r, s.fill.g, s.fill.b, s.fill.a,
                ));
                ctx.fill_path(&bezpath_to_cpu(&s.kind.to_path()));
            }
            Payload::Image(img) => match self.image_paint(&img.source, img.clip, images)? {
                Some((paint, iw, ih)) => {
                    // Scale the natural bitmap into the payload's logical box.
                    let fit = affine * Affine::scale_non_uniform(img.width / iw, img.height / ih);
                    ctx.set_transform(affine_to_cpu(fit));
                    ctx.set_paint(paint);
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
                }
                None => {
                    debug_assert!(false, "image source missing from store");
                    warn!(source = %img.source, "image not in store, skipping");
                }
            },
            Payload::Text(t) => self.draw_text(ctx, t, affine, text)?,
            Payload::Group(g) => {
                for child in &g.children {
                    self.draw_object(ctx, child, affine, images, text)?;
                }
            }
        }

        if layered {
            ctx.pop_layer();
        }
        Ok(())
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        t: &TextPayload,
        affine: Affine,
        engine: &mut TextLayoutEngine,
    ) -> PhotomarkResult<()> {
        if !engine.has_font() {
            warn!("no font registered, skipping text");
            return Ok(());
        }
        let font = match &self.font {
            Some(f) => f.clone(),
            None => {
                let bytes = engine
                    .default_font_bytes()
                    .ok_or_else(|| PhotomarkError::validation("no font registered"))?;
                let f = vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
                    0,
                );
                self.font = Some(f.clone());
                f
            }
        };

        let layout = engine.layout(&t.text, t.font_size as f32, t.weight, t.fill, None)?;
        ctx.set_transform(affine_to_cpu(affine));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }

    /// Drop cached paints for a source whose pixels were replaced.
    pub fn invalidate_source(&mut self, source: &str) {
        self.image_paints.retain(|(key, _), _| key.as_str() != source);
    }

    fn image_paint(
        &mut self,
        source: &str,
        clip: ImageClip,
        images: &ImageStore,
    ) -> PhotomarkResult<Option<(vello_cpu::Image, f64, f64)>> {
        let key = (source.to_string(), clip);
        if let Some((paint, w, h)) = self.image_paints.get(&key) {
            return Ok(Some((paint.clone(), *w, *h)));
        }

        let Some(prepared) = images.get(source) else {
            return Ok(None);
        };
        let masked;
        let img: &PreparedImage = match clip {
            ImageClip::None => prepared,
            ImageClip::Circle => {
                masked = decode::circle_masked(prepared);
                &masked
            }
        };

        let pixmap = premul_bytes_to_pixmap(img.rgba8_premul.as_slice(), img.width, img.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        let (w, h) = (f64::from(img.width), f64::from(img.height));
        self.image_paints.insert(key, (paint.clone(), w, h));
        Ok(Some((paint, w, h)))
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> PhotomarkResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PhotomarkError::validation("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PhotomarkError::validation("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(PhotomarkError::validation(
            "prepared image byte length mismatch",
        ));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}
