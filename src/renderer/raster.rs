//! CPU raster surface
//!
//! Straight-alpha RGBA buffer with source-over disc fills. A pixel is covered
//! when its centre lies inside the disc.

use std::io::{self, Write};

use glam::Vec2;

use super::Surface;
use super::style::{DotStyle, Rgba8};
use crate::sim::Viewport;

/// Row-major RGBA pixel buffer
#[derive(Debug, Clone, Default)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl Raster {
    pub fn new(viewport: Viewport) -> Self {
        let mut raster = Self::default();
        raster.resize(viewport);
        raster
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// Raw RGBA bytes, suitable for `ImageData` or an encoder
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Number of pixels with any coverage
    pub fn painted(&self) -> usize {
        self.pixels.iter().filter(|p| p.a > 0).count()
    }

    /// Write a binary PPM, compositing over an opaque background
    pub fn write_ppm<W: Write>(&self, mut out: W, background: [u8; 3]) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut row = Vec::with_capacity(self.width as usize * 3);
        for line in self.pixels.chunks(self.width.max(1) as usize) {
            row.clear();
            for px in line {
                let a = px.a as f32 / 255.0;
                let over = |c: u8, bg: u8| (c as f32 * a + bg as f32 * (1.0 - a)).round() as u8;
                row.extend_from_slice(&[
                    over(px.r, background[0]),
                    over(px.g, background[1]),
                    over(px.b, background[2]),
                ]);
            }
            out.write_all(&row)?;
        }
        Ok(())
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn blend(dst: &mut Rgba8, src: Rgba8) {
        let sa = src.a as f32 / 255.0;
        let da = dst.a as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return;
        }
        let mix = |s: u8, d: u8| {
            ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        *dst = Rgba8::new(
            mix(src.r, dst.r),
            mix(src.g, dst.g),
            mix(src.b, dst.b),
            (out_a * 255.0).round() as u8,
        );
    }
}

impl Surface for Raster {
    fn resize(&mut self, viewport: Viewport) {
        self.width = viewport.width;
        self.height = viewport.height;
        self.pixels = vec![Rgba8::TRANSPARENT; viewport.width as usize * viewport.height as usize];
    }

    fn clear(&mut self) {
        self.pixels.fill(Rgba8::TRANSPARENT);
    }

    fn fill_disc(&mut self, center: Vec2, style: &DotStyle) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let r = style.radius;
        let x0 = (center.x - r).floor().max(0.0);
        let y0 = (center.y - r).floor().max(0.0);
        let x1 = (center.x + r).ceil().min(self.width as f32 - 1.0);
        let y1 = (center.y + r).ceil().min(self.height as f32 - 1.0);
        if x0 > x1 || y0 > y1 {
            return;
        }

        let color = style.to_rgba8();
        let r_sq = r * r;
        for y in y0 as u32..=y1 as u32 {
            for x in x0 as u32..=x1 as u32 {
                let pc = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if pc.distance_squared(center) <= r_sq {
                    let idx = self.index(x, y);
                    Self::blend(&mut self.pixels[idx], color);
                }
            }
        }
    }
}
