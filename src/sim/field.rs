//! Field state: lattice, pointer and constants

use glam::Vec2;

use super::grid::{Viewport, build_grid, lattice_dims};
use super::point::Point;
use crate::config::FieldConfig;
use crate::error::Result;

/// The simulated dot field
#[derive(Debug, Clone)]
pub struct Field {
    config: FieldConfig,
    viewport: Viewport,
    /// Surface-local pointer, or the config sentinel when away
    pointer: Vec2,
    points: Vec<Point>,
}

impl Field {
    /// Create an empty field; call [`Field::resize`] to lay out the lattice
    pub fn new(config: FieldConfig) -> Result<Self> {
        config.validate()?;
        let pointer = config.sentinel();
        Ok(Self {
            config,
            viewport: Viewport::default(),
            pointer,
            points: Vec::new(),
        })
    }

    /// Replace the lattice for a new viewport, discarding all motion
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.points = build_grid(viewport, self.config.spacing);
        let (cols, rows) = lattice_dims(viewport, self.config.spacing);
        log::debug!(
            "Lattice rebuilt for {}x{}: {} cols x {} rows",
            viewport.width,
            viewport.height,
            cols,
            rows
        );
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.pointer = pos;
    }

    pub fn pointer_left(&mut self) {
        self.pointer = self.config.sentinel();
    }

    /// True while the pointer is somewhere other than the sentinel
    pub fn pointer_active(&self) -> bool {
        self.pointer != self.config.sentinel()
    }

    /// Advance every point by one tick
    pub fn step(&mut self) {
        let pointer = self.pointer;
        for point in &mut self.points {
            point.update(pointer, &self.config);
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Largest displacement from rest across the lattice
    pub fn max_displacement(&self) -> f32 {
        self.points
            .iter()
            .map(Point::displacement)
            .fold(0.0, f32::max)
    }

    /// Index of the point whose rest position is closest to `pos`
    pub fn nearest(&self, pos: Vec2) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.origin()
                    .distance_squared(pos)
                    .total_cmp(&b.origin().distance_squared(pos))
            })
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;

    fn field_800_600() -> Field {
        let mut field = Field::new(FieldConfig::default()).unwrap();
        field.resize(Viewport::new(800, 600));
        field
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = FieldConfig {
            spacing: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            Field::new(config),
            Err(FieldError::NonPositive { name: "spacing", .. })
        ));
    }

    #[test]
    fn test_starts_with_pointer_away() {
        let field = field_800_600();
        assert!(!field.pointer_active());
        assert_eq!(field.points().len(), 374);
    }

    #[test]
    fn test_resize_discards_motion() {
        let mut field = field_800_600();
        field.pointer_moved(Vec2::new(400.0, 300.0));
        for _ in 0..10 {
            field.step();
        }
        assert!(field.max_displacement() > 0.0);

        field.resize(Viewport::new(1024, 768));
        assert_eq!(field.points().len(), (1024 / 40 + 2) * (768 / 40 + 2));
        for p in field.points() {
            assert_eq!(p.position, p.origin());
            assert_eq!(p.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn test_hold_then_release_at_centre() {
        let mut field = field_800_600();
        let centre = Vec2::new(400.0, 300.0);
        let nearest = field.nearest(centre).unwrap();

        field.pointer_moved(centre);
        for _ in 0..100 {
            field.step();
        }
        let held = field.points()[nearest].displacement();
        assert!(held > 1.0, "held displacement {}", held);

        field.pointer_left();
        for _ in 0..200 {
            field.step();
        }
        let released = field.points()[nearest].displacement();
        assert!(released < 0.01, "released displacement {}", released);
        assert!(field.max_displacement() < 0.01);
    }

    #[test]
    fn test_far_points_untouched() {
        let mut field = field_800_600();
        field.pointer_moved(Vec2::new(400.0, 300.0));
        field.step();
        // Corner point is ~530 away from the centre
        let corner = &field.points()[0];
        assert_eq!(corner.position, corner.origin());
    }

    #[test]
    fn test_pointer_left_restores_sentinel() {
        let mut field = field_800_600();
        field.pointer_moved(Vec2::new(10.0, 10.0));
        assert!(field.pointer_active());
        field.pointer_left();
        assert_eq!(field.pointer(), field.config().sentinel());
    }
}
