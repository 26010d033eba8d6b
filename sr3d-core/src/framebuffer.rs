//! CPU-owned pixel buffer the rasterizer writes into
use crate::color::Color;

/// Packed-pixel buffer with a logical resolution and an integer upscale.
///
/// Logical pixel `(x, y)` covers a `scale`x`scale` block of physical pixels.
/// Logical y grows upwards while physical row 0 is the top of the image, so
/// every write flips the vertical axis.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    scale: usize,
    pixels: Vec<Color>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize, scale: usize) -> Self {
        let scale = scale.max(1);
        Self {
            width,
            height,
            scale,
            pixels: vec![Color::BLACK; width * height * scale * scale],
        }
    }

    /// Logical width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Logical height
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn scale(&self) -> usize {
        self.scale
    }

    /// Width and height of the backing pixel grid
    pub fn physical_size(&self) -> (usize, usize) {
        (self.width * self.scale, self.height * self.scale)
    }

    /// Physical pixels, row 0 at the top
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Reallocate for a new logical size, clearing to black
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Color::BLACK; width * height * self.scale * self.scale];
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Bounds-checked logical pixel write
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let row = self.height - 1 - y as usize;
        let stride = self.width * self.scale;
        let px = x as usize * self.scale;
        let py = row * self.scale;
        for sy in 0..self.scale {
            let start = (py + sy) * stride + px;
            self.pixels[start..start + self.scale].fill(color);
        }
    }

    /// Logical pixel read-back, `None` when out of bounds
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        let row = self.height - 1 - y as usize;
        let stride = self.width * self.scale;
        Some(self.pixels[row * self.scale * stride + x as usize * self.scale])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_pixel_flips_rows() {
        let mut fb = Framebuffer::new(4, 3, 1);
        fb.set_pixel(1, 0, Color::WHITE);
        // Logical y = 0 is the bottom physical row
        assert_eq!(fb.pixels()[2 * 4 + 1], Color::WHITE);
        assert_eq!(fb.pixel(1, 0), Some(Color::WHITE));
        assert_eq!(fb.pixel(1, 2), Some(Color::BLACK));
    }

    #[test]
    fn test_set_pixel_scales_blocks() {
        let mut fb = Framebuffer::new(2, 2, 3);
        assert_eq!(fb.physical_size(), (6, 6));
        fb.set_pixel(1, 1, Color::WHITE);
        let lit = fb.pixels().iter().filter(|&&c| c == Color::WHITE).count();
        assert_eq!(lit, 9);
        // Top-right block
        assert_eq!(fb.pixels()[5], Color::WHITE);
        assert_eq!(fb.pixels()[2 * 6 + 3], Color::WHITE);
        assert_eq!(fb.pixels()[3 * 6 + 3], Color::BLACK);
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut fb = Framebuffer::new(2, 2, 1);
        fb.set_pixel(-1, 0, Color::WHITE);
        fb.set_pixel(0, 2, Color::WHITE);
        fb.set_pixel(2, 0, Color::WHITE);
        assert!(fb.pixels().iter().all(|&c| c == Color::BLACK));
        assert_eq!(fb.pixel(5, 5), None);
    }

    #[test]
    fn test_clear_and_resize() {
        let mut fb = Framebuffer::new(2, 2, 1);
        fb.clear(Color::WHITE);
        assert!(fb.pixels().iter().all(|&c| c == Color::WHITE));
        fb.resize(3, 1);
        assert_eq!(fb.pixels().len(), 3);
        assert_eq!(fb.pixel(2, 0), Some(Color::BLACK));
    }
}
