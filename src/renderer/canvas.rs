//! 2D canvas surface (browser)

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Surface;
use super::style::DotStyle;
use crate::error::{FieldError, Result};
use crate::sim::Viewport;

/// Canvas element plus its 2D context, sized to the viewport
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    hi_dpi: bool,
    viewport: Viewport,
}

impl CanvasSurface {
    /// Wrap `canvas`, failing when no 2D context can be obtained
    pub fn new(canvas: HtmlCanvasElement, hi_dpi: bool) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .ok_or_else(|| FieldError::SurfaceUnavailable("no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| FieldError::SurfaceUnavailable("context is not 2d".into()))?;

        Ok(Self {
            canvas,
            ctx,
            hi_dpi,
            viewport: Viewport::default(),
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Takes effect on the next resize
    pub fn set_hi_dpi(&mut self, hi_dpi: bool) {
        self.hi_dpi = hi_dpi;
    }

    fn pixel_ratio(&self) -> f64 {
        if !self.hi_dpi {
            return 1.0;
        }
        web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .filter(|dpr| *dpr > 0.0)
            .unwrap_or(1.0)
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, viewport: Viewport) {
        let dpr = self.pixel_ratio();
        self.viewport = viewport;
        // Assigning width/height also clears the backing store
        self.canvas.set_width((viewport.width as f64 * dpr) as u32);
        self.canvas.set_height((viewport.height as f64 * dpr) as u32);
        // Keep drawing in CSS pixels
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.viewport.width as f64,
            self.viewport.height as f64,
        );
    }

    fn fill_disc(&mut self, center: Vec2, style: &DotStyle) {
        self.ctx.set_fill_style_str(&style.css());
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            style.radius as f64,
            0.0,
            std::f64::consts::TAU,
        );
        self.ctx.fill();
    }
}
