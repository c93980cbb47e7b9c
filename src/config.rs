//! Field configuration
//!
//! Persisted in LocalStorage on the web. `ParticleField.setConfig(json)`
//! validates, stores and applies a new config to a mounted field; the stored
//! copy is picked up again on the next page load. Native builds always start
//! from the defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{FieldError, Result};
use crate::sim::spectral_radius;

/// How frame callbacks map onto simulation updates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Timestep {
    /// One update per display frame (feel depends on refresh rate)
    #[default]
    PerFrame,
    /// Whole updates at `hz`, driven by elapsed frame time
    Fixed { hz: f32 },
}

/// Field constants and appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    // === Lattice ===
    pub spacing: f32,

    // === Physics ===
    pub mouse_radius: f32,
    pub mouse_force: f32,
    pub spring_stiffness: f32,
    pub friction: f32,

    // === Appearance ===
    pub base_radius: f32,
    pub max_radius: f32,
    /// Displacement at which colour, size and alpha saturate
    pub activation_distance: f32,
    pub base_color: [u8; 3],
    pub accent_color: [u8; 3],
    pub alpha_floor: f32,
    pub alpha_peak: f32,

    // === Host ===
    pub timestep: Timestep,
    /// Scale the canvas backing store by devicePixelRatio
    pub hi_dpi: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            spacing: GRID_SPACING,

            mouse_radius: MOUSE_RADIUS,
            mouse_force: MOUSE_FORCE,
            spring_stiffness: SPRING_STIFFNESS,
            friction: FRICTION,

            base_radius: BASE_RADIUS,
            max_radius: MAX_RADIUS,
            activation_distance: ACTIVATION_DISTANCE,
            base_color: BASE_COLOR,
            accent_color: ACCENT_COLOR,
            alpha_floor: ALPHA_FLOOR,
            alpha_peak: ALPHA_PEAK,

            timestep: Timestep::PerFrame,
            hi_dpi: false,
        }
    }
}

fn positive(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FieldError::NonPositive { name, value })
    }
}

fn within(name: &'static str, value: f32, min: f32, max: f32, inclusive: bool) -> Result<()> {
    let ok = if inclusive {
        value >= min && value <= max
    } else {
        value > min && value < max
    };
    if ok {
        Ok(())
    } else {
        Err(FieldError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

impl FieldConfig {
    /// Check every constant, failing on the first bad one
    pub fn validate(&self) -> Result<()> {
        positive("spacing", self.spacing)?;
        positive("mouse_radius", self.mouse_radius)?;
        positive("mouse_force", self.mouse_force)?;
        positive("spring_stiffness", self.spring_stiffness)?;
        positive("base_radius", self.base_radius)?;
        positive("max_radius", self.max_radius)?;
        positive("activation_distance", self.activation_distance)?;
        within("friction", self.friction, 0.0, 1.0, false)?;
        within("alpha_floor", self.alpha_floor, 0.0, 1.0, true)?;
        within("alpha_peak", self.alpha_peak, 0.0, 1.0, true)?;

        if self.base_radius > self.max_radius {
            return Err(FieldError::InvertedRange {
                name: "radius",
                low: self.base_radius,
                high: self.max_radius,
            });
        }
        if self.alpha_floor > self.alpha_peak {
            return Err(FieldError::InvertedRange {
                name: "alpha",
                low: self.alpha_floor,
                high: self.alpha_peak,
            });
        }

        // Neighbouring dots at full size must not overlap
        let min_spacing = 2.0 * self.max_radius;
        if self.spacing < min_spacing {
            return Err(FieldError::OutOfRange {
                name: "spacing",
                value: self.spacing,
                min: min_spacing,
                max: f32::INFINITY,
            });
        }

        if spectral_radius(self.spring_stiffness, self.friction) >= 1.0 {
            return Err(FieldError::Unstable {
                stiffness: self.spring_stiffness,
                friction: self.friction,
            });
        }

        if let Timestep::Fixed { hz } = self.timestep {
            if !(hz.is_finite() && hz > 0.0) {
                return Err(FieldError::InvalidRate(hz));
            }
        }

        Ok(())
    }

    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Pointer position meaning "no pointer": beyond the interaction radius
    /// of every lattice point, including the overscan row and column
    pub fn sentinel(&self) -> Vec2 {
        Vec2::splat(-(self.mouse_radius + self.spacing + SENTINEL_MARGIN))
    }

    /// Resolve a stored JSON blob, falling back to defaults when it is
    /// missing, malformed or fails validation
    pub fn from_stored(stored: Option<&str>) -> Self {
        if let Some(json) = stored {
            match Self::from_json(json) {
                Ok(config) => {
                    log::info!("Loaded stored field config");
                    return config;
                }
                Err(e) => log::warn!("Ignoring stored field config: {}", e),
            }
        }

        log::info!("Using default field config");
        Self::default()
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "hero_particles_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok())
            .flatten();

        Self::from_stored(stored.as_deref())
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Field config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::from_stored(None)
    }
}
