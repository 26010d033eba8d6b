//! RGBA textures and nearest-texel sampling
use std::path::Path;

use log::info;

use crate::color::Color;
use crate::error::{Error, Result};

/// An RGBA8 image, row-major, row 0 at `v = 0`
#[derive(Debug, Clone)]
pub struct Texture {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Texture {
    /// Wrap raw RGBA bytes. The buffer must hold exactly `width * height * 4` bytes.
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 || data.len() != width * height * 4 {
            return Err(Error::InvalidTexture {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Decode an image file (PNG, JPEG or BMP)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let rgba = image::open(path)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        info!("Loaded texture {} ({}x{})", path.display(), width, height);
        Self::from_rgba(width as usize, height as usize, rgba.into_raw())
    }

    /// Decode an in-memory image
    pub fn from_memory(bytes: &[u8]) -> Result<Self> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(width as usize, height as usize, rgba.into_raw())
    }

    /// A `size`x`size` checkerboard with `cells` squares per side
    pub fn checkerboard(size: usize, cells: usize, a: Color, b: Color) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        let mut data = Vec::with_capacity(size * size * 4);
        for y in 0..size {
            for x in 0..size {
                let c = if (x / cell + y / cell) % 2 == 0 { a } else { b };
                data.extend_from_slice(&[c.r(), c.g(), c.b(), c.a()]);
            }
        }
        Self {
            width: size,
            height: size,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Texel at integer coordinates, opaque black when out of bounds
    pub fn texel(&self, x: i64, y: i64) -> Color {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return Color::BLACK;
        }
        let i = (y as usize * self.width + x as usize) * 4;
        Color::from_rgb(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Nearest texel for normalized `(u, v)`.
    ///
    /// Coordinates outside `0..=1` repeat by their fractional part.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let u = wrap(u);
        let v = wrap(v);
        let x = ((u * self.width as f32) as i64).min(self.width as i64 - 1);
        let y = ((v * self.height as f32) as i64).min(self.height as i64 - 1);
        self.texel(x, y)
    }
}

fn wrap(t: f32) -> f32 {
    if (0.0..=1.0).contains(&t) {
        return t;
    }
    let f = t.fract();
    if f < 0.0 {
        f + 1.0
    } else {
        f
    }
}
