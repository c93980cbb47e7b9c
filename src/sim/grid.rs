//! Lattice construction
//!
//! The lattice is one cell wider and taller than the viewport needs and is
//! centred, so the outermost rows and columns sit just past each edge.

use glam::Vec2;

use super::point::Point;
use crate::consts::MAX_GRID_POINTS;

/// Viewport size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Column and row counts covering `viewport` with overscan
pub fn lattice_dims(viewport: Viewport, spacing: f32) -> (usize, usize) {
    let size = viewport.size();
    let cols = ((size.x / spacing).floor() as usize).saturating_add(2);
    let rows = ((size.y / spacing).floor() as usize).saturating_add(2);
    (cols, rows)
}

/// Build a fresh lattice at rest, row-major.
///
/// Returns an empty lattice when the layout would exceed `MAX_GRID_POINTS`.
pub fn build_grid(viewport: Viewport, spacing: f32) -> Vec<Point> {
    let (cols, rows) = lattice_dims(viewport, spacing);
    let Some(count) = cols.checked_mul(rows).filter(|n| *n <= MAX_GRID_POINTS) else {
        log::warn!(
            "Lattice {}x{} at spacing {} exceeds {} points, leaving field empty",
            cols,
            rows,
            spacing,
            MAX_GRID_POINTS
        );
        return Vec::new();
    };
    let size = viewport.size();
    let offset = Vec2::new(
        (size.x - (cols - 1) as f32 * spacing) / 2.0,
        (size.y - (rows - 1) as f32 * spacing) / 2.0,
    );

    let mut points = Vec::with_capacity(count);
    for r in 0..rows {
        for c in 0..cols {
            let origin = Vec2::new(c as f32 * spacing, r as f32 * spacing) + offset;
            points.push(Point::at_rest(origin));
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_800_by_600() {
        let viewport = Viewport::new(800, 600);
        assert_eq!(lattice_dims(viewport, 40.0), (22, 17));

        let grid = build_grid(viewport, 40.0);
        assert_eq!(grid.len(), 374);
        assert_eq!(grid[0].origin(), Vec2::new(-20.0, -20.0));
        assert_eq!(grid[373].origin(), Vec2::new(820.0, 620.0));
    }

    #[test]
    fn test_row_major_order() {
        let grid = build_grid(Viewport::new(100, 100), 40.0);
        // cols = 4: second point is one column to the right
        assert_eq!(grid[1].origin() - grid[0].origin(), Vec2::new(40.0, 0.0));
        assert_eq!(grid[4].origin() - grid[0].origin(), Vec2::new(0.0, 40.0));
    }

    #[test]
    fn test_empty_viewport_still_has_lattice() {
        let grid = build_grid(Viewport::new(0, 0), 40.0);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0].origin(), Vec2::new(-20.0, -20.0));
    }

    #[test]
    fn test_built_at_rest() {
        for p in build_grid(Viewport::new(333, 211), 40.0) {
            assert_eq!(p.position, p.origin());
            assert_eq!(p.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn test_oversized_lattice_refused() {
        let viewport = Viewport::new(800, 600);
        let (cols, rows) = lattice_dims(viewport, 1e-3);
        assert!(cols * rows > MAX_GRID_POINTS);
        assert!(build_grid(viewport, 1e-3).is_empty());

        // Saturating f32 -> usize cast must not wrap the product
        assert!(build_grid(Viewport::new(u32::MAX, u32::MAX), f32::MIN_POSITIVE).is_empty());
    }

    proptest! {
        #[test]
        fn prop_covers_viewport(w in 0u32..4000, h in 0u32..4000, spacing in 4.0f32..120.0) {
            let viewport = Viewport::new(w, h);
            let grid = build_grid(viewport, spacing);
            let min = grid.iter().map(|p| p.origin()).reduce(Vec2::min).unwrap();
            let max = grid.iter().map(|p| p.origin()).reduce(Vec2::max).unwrap();

            // Tolerance for f32 accumulation on large viewports
            let eps = 1e-3 * (w.max(h) as f32 + spacing);
            prop_assert!(min.x <= eps && min.y <= eps, "min {:?}", min);
            prop_assert!(max.x >= w as f32 - eps, "max.x {} < {}", max.x, w);
            prop_assert!(max.y >= h as f32 - eps, "max.y {} < {}", max.y, h);
        }

        #[test]
        fn prop_lattice_centred(w in 0u32..4000, h in 0u32..4000) {
            let viewport = Viewport::new(w, h);
            let grid = build_grid(viewport, 40.0);
            let first = grid[0].origin();
            let last = grid[grid.len() - 1].origin();
            let centre = (first + last) / 2.0;
            prop_assert!((centre - viewport.size() / 2.0).abs().max_element() < 1e-2);
        }
    }
}
