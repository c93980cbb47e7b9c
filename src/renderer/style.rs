//! Dot appearance as a function of displacement

use bytemuck::{Pod, Zeroable};

use crate::config::FieldConfig;
use crate::lerp;
use crate::sim::Point;

/// 8-bit straight-alpha pixel
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Rgba8 = Rgba8::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// How activated a dot looks: 0 at rest, 1 at or past `activation_distance`
#[inline]
pub fn activation(displacement: f32, config: &FieldConfig) -> f32 {
    (displacement / config.activation_distance).clamp(0.0, 1.0)
}

/// Resolved radius and colour for one dot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotStyle {
    pub radius: f32,
    /// RGB channels in 0..=255
    pub rgb: [f32; 3],
    pub alpha: f32,
}

impl DotStyle {
    /// Size, colour and alpha all driven by the same factor
    pub fn for_factor(factor: f32, config: &FieldConfig) -> Self {
        let channel = |i: usize| {
            lerp(
                config.base_color[i] as f32,
                config.accent_color[i] as f32,
                factor,
            )
        };
        Self {
            radius: lerp(config.base_radius, config.max_radius, factor),
            rgb: [channel(0), channel(1), channel(2)],
            alpha: lerp(config.alpha_floor, config.alpha_peak, factor),
        }
    }

    pub fn for_point(point: &Point, config: &FieldConfig) -> Self {
        Self::for_factor(activation(point.displacement(), config), config)
    }

    /// CSS colour for `fillStyle`
    pub fn css(&self) -> String {
        format!(
            "rgba({:.1}, {:.1}, {:.1}, {:.3})",
            self.rgb[0], self.rgb[1], self.rgb[2], self.alpha
        )
    }

    pub fn to_rgba8(&self) -> Rgba8 {
        let q = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        Rgba8::new(
            q(self.rgb[0]),
            q(self.rgb[1]),
            q(self.rgb[2]),
            q(self.alpha * 255.0),
        )
    }
}
