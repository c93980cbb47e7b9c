//! Field simulation module
//!
//! Pure and platform-free:
//! - One update per call, no wall-clock inside
//! - Stable iteration order (row-major lattice order)
//! - No rendering or browser dependencies

pub mod field;
pub mod grid;
pub mod point;

pub use field::Field;
pub use grid::{Viewport, build_grid, lattice_dims};
pub use point::{Point, repulsion, spectral_radius};
