use tracing::debug;

use crate::foundation::error::PhotomarkResult;
use crate::foundation::geometry::BackgroundBounds;

/// Lifecycle of a photo on a display surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceState {
    /// No decoded image yet.
    Unloaded,
    /// Image known, waiting for a usable viewport.
    Fitting,
    /// Fit computed; the scene can be built and drawn.
    Ready,
}

/// Per-photo fit state machine.
///
/// Owns the contain-fit math: `scale = min(vw/iw, vh/ih)`, background
/// centered in the viewport. Viewport changes are coalesced; only the most
/// recent scheduled size is applied when the owner commits, so a resize
/// burst costs one refit. A zero-extent viewport defers the fit instead of
/// dividing by it.
#[derive(Clone, Debug, Default)]
pub struct SurfaceAdapter {
    image_size: Option<(u32, u32)>,
    viewport: Option<(f64, f64)>,
    pending_viewport: Option<(f64, f64)>,
    bounds: Option<BackgroundBounds>,
    needs_redraw: bool,
}

impl SurfaceAdapter {
    /// Adapter with nothing loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SurfaceState {
        if self.image_size.is_none() {
            SurfaceState::Unloaded
        } else if self.bounds.is_none() {
            SurfaceState::Fitting
        } else {
            SurfaceState::Ready
        }
    }

    /// Record the decoded image dimensions and refit if a viewport is known.
    pub fn set_image_size(&mut self, width: u32, height: u32) {
        self.image_size = Some((width, height));
        self.bounds = None;
        self.refit();
    }

    /// Native image dimensions, once decoded.
    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image_size
    }

    /// Schedule a viewport size; only the last scheduled size wins.
    pub fn schedule_fit(&mut self, width: f64, height: f64) {
        self.pending_viewport = Some((width, height));
    }

    /// Apply the most recently scheduled viewport size.
    ///
    /// Returns `true` when a new fit was computed. A zero or non-finite
    /// extent is kept pending and retried on the next commit.
    pub fn commit_pending_fit(&mut self) -> PhotomarkResult<bool> {
        let Some((w, h)) = self.pending_viewport else {
            return Ok(false);
        };
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            debug!(width = w, height = h, "deferring fit for empty viewport");
            return Ok(false);
        }
        self.pending_viewport = None;
        self.viewport = Some((w, h));
        self.refit();
        Ok(self.bounds.is_some())
    }

    fn refit(&mut self) {
        let (Some((iw, ih)), Some((vw, vh))) = (self.image_size, self.viewport) else {
            return;
        };
        let (iw, ih) = (f64::from(iw), f64::from(ih));
        let scale = (vw / iw).min(vh / ih);
        let (bw, bh) = (iw * scale, ih * scale);
        self.bounds = Some(BackgroundBounds::new(
            (vw - bw) / 2.0,
            (vh - bh) / 2.0,
            bw,
            bh,
        ));
        self.needs_redraw = true;
        debug!(scale, width = bw, height = bh, "fitted background");
    }

    /// Committed viewport size, if any.
    pub fn viewport(&self) -> Option<(f64, f64)> {
        self.viewport
    }

    /// Displayed background bounds while `Ready`.
    pub fn bounds(&self) -> Option<&BackgroundBounds> {
        self.bounds.as_ref()
    }

    /// Display scale (displayed px per native px) while `Ready`.
    pub fn scale(&self) -> Option<f64> {
        let (iw, _) = self.image_size?;
        let b = self.bounds.as_ref()?;
        Some(b.width / f64::from(iw))
    }

    /// Mark the surface as needing a redraw.
    pub fn invalidate(&mut self) {
        self.needs_redraw = true;
    }

    /// Consume the redraw flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/adapter.rs"]
mod tests;
