//! Rendering module
//!
//! Every dot is a filled disc; the [`Surface`] trait is the seam between the
//! field and whatever owns the pixels (a 2D canvas in the browser, a CPU
//! raster natively and in tests).

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod raster;
pub mod style;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use raster::Raster;
pub use style::{DotStyle, Rgba8, activation};

use glam::Vec2;

use crate::sim::{Field, Viewport};

/// A pixel surface the field can be drawn onto
pub trait Surface {
    /// Match the surface to a new viewport (content is discarded)
    fn resize(&mut self, viewport: Viewport);

    /// Erase the whole surface
    fn clear(&mut self);

    /// Fill a disc centred at `center`
    fn fill_disc(&mut self, center: Vec2, style: &DotStyle);
}

/// Draw every dot in lattice order
pub fn draw_field<S: Surface + ?Sized>(field: &Field, surface: &mut S) {
    let config = field.config();
    for point in field.points() {
        let style = DotStyle::for_point(point, config);
        surface.fill_disc(point.position, &style);
    }
}
