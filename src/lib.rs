//! Hero Particles - pointer-reactive dot grid for a hero section
//!
//! Core modules:
//! - `sim`: Point lattice and the per-tick spring/repulsion update
//! - `renderer`: Disc styling and drawing surfaces (canvas, CPU raster)
//! - `platform`: Frame loop, scheduling and browser wiring
//! - `config`: Tunable constants, validation and LocalStorage persistence

pub mod config;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::{FieldConfig, Timestep};
pub use error::FieldError;
pub use platform::{FieldLoop, FrameScheduler};
pub use sim::{Field, Point, Viewport};

use glam::Vec2;

/// Tuned field constants (the tested operating point)
pub mod consts {
    /// Lattice spacing between neighbouring rest positions
    pub const GRID_SPACING: f32 = 40.0;

    /// Pointer interaction range
    pub const MOUSE_RADIUS: f32 = 200.0;
    /// Repulsion strength at the pointer centre
    pub const MOUSE_FORCE: f32 = 1.5;
    /// Fraction of the origin offset added to velocity per tick
    pub const SPRING_STIFFNESS: f32 = 0.08;
    /// Velocity multiplier per tick
    pub const FRICTION: f32 = 0.90;

    /// Disc radius at rest
    pub const BASE_RADIUS: f32 = 1.5;
    /// Disc radius when fully activated
    pub const MAX_RADIUS: f32 = 4.5;
    /// Displacement at which a dot is fully activated
    pub const ACTIVATION_DISTANCE: f32 = 30.0;

    /// Resting dot colour (black)
    pub const BASE_COLOR: [u8; 3] = [0, 0, 0];
    /// Accent colour #3533cd
    pub const ACCENT_COLOR: [u8; 3] = [53, 51, 205];
    pub const ALPHA_FLOOR: f32 = 0.15;
    pub const ALPHA_PEAK: f32 = 1.0;

    /// Hero section background #f6f6fa
    pub const BACKGROUND: [u8; 3] = [246, 246, 250];

    /// Upper bound on lattice points; larger layouts are refused
    pub const MAX_GRID_POINTS: usize = 1 << 20;

    /// Pointer sentinel distance beyond the interaction radius
    pub const SENTINEL_MARGIN: f32 = 1000.0;

    /// Maximum substeps per frame in fixed-rate mode
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame gap (seconds) fed to the fixed-rate accumulator
    pub const MAX_FRAME_DT: f64 = 0.1;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Unit vector for an angle in radians
#[inline]
pub fn unit_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
