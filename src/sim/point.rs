//! Lattice points and the per-tick force model

use glam::Vec2;

use crate::config::FieldConfig;
use crate::unit_from_angle;

/// A point-mass anchored to its rest position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub position: Vec2,
    /// Rest position, fixed when the lattice is built
    origin: Vec2,
    pub velocity: Vec2,
}

impl Point {
    /// Point at rest on `origin`
    pub fn at_rest(origin: Vec2) -> Self {
        Self {
            position: origin,
            origin,
            velocity: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Distance from rest
    #[inline]
    pub fn displacement(&self) -> f32 {
        self.position.distance(self.origin)
    }

    /// Advance one tick.
    ///
    /// Repulsion and spring both accumulate into velocity, friction damps the
    /// sum, then position integrates the damped velocity.
    pub fn update(&mut self, pointer: Vec2, config: &FieldConfig) {
        let delta = pointer - self.position;
        let dist_sq = delta.length_squared();
        let radius = config.mouse_radius;

        if dist_sq < radius * radius {
            let push = repulsion(dist_sq.sqrt(), config);
            let angle = delta.y.atan2(delta.x);
            self.velocity -= unit_from_angle(angle) * push;
        }

        self.velocity += (self.origin - self.position) * config.spring_stiffness;
        self.velocity *= config.friction;
        self.position += self.velocity;
    }
}

/// Repulsion magnitude at distance `dist` from the pointer.
///
/// Falls off linearly from `mouse_force` at the pointer to 0 at the radius.
#[inline]
pub fn repulsion(dist: f32, config: &FieldConfig) -> f32 {
    let radius = config.mouse_radius;
    if dist >= radius {
        return 0.0;
    }
    (radius - dist) / radius * config.mouse_force
}

/// Spectral radius of the pointer-free update on one axis.
///
/// With displacement `e` and velocity `v`, one tick maps
/// `(e, v) -> ((1 - f*k) e + f v, -f*k e + f v)`; the point settles iff
/// both eigenvalues of that matrix lie inside the unit circle.
pub fn spectral_radius(stiffness: f32, friction: f32) -> f32 {
    let trace = 1.0 + friction - friction * stiffness;
    let det = friction;
    let disc = trace * trace - 4.0 * det;
    if disc < 0.0 {
        // Complex pair, |lambda|^2 = det
        det.sqrt()
    } else {
        let root = disc.sqrt();
        ((trace + root) / 2.0).abs().max(((trace - root) / 2.0).abs())
    }
}
