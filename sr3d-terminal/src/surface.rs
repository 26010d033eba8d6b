//! Terminal presentation of a framebuffer
use std::io::Write;

use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use sr3d_core::{Color as Rgba, Framebuffer};

/// Upper half block: foreground paints the top half of a cell, background the bottom
const HALF_BLOCK: char = '\u{2580}';

/// Presents a framebuffer with two physical pixel rows per terminal row
pub struct TerminalSurface {
    framebuffer: Framebuffer,
    /// First terminal row used for the image
    top: u16,
}

impl TerminalSurface {
    pub fn new(width: usize, height: usize, scale: usize) -> Self {
        Self {
            framebuffer: Framebuffer::new(width, height, scale),
            top: 0,
        }
    }

    /// Logical framebuffer size that fills `cols`x`rows` cells below `top` rows
    pub fn fit(cols: u16, rows: u16, top: u16, scale: usize) -> (usize, usize) {
        let scale = scale.max(1);
        let rows = rows.saturating_sub(top) as usize;
        ((cols as usize / scale).max(1), (rows * 2 / scale).max(1))
    }

    /// Size the surface to a terminal of `cols`x`rows`, keeping `top` rows free
    pub fn for_terminal(cols: u16, rows: u16, top: u16, scale: usize) -> Self {
        let (width, height) = Self::fit(cols, rows, top, scale);
        let mut surface = Self::new(width, height, scale);
        surface.top = top;
        surface
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        let (width, height) = Self::fit(cols, rows, self.top, self.framebuffer.scale());
        self.framebuffer.resize(width, height);
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Exclusive access to the pixels for the duration of one frame
    pub fn begin_frame(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    /// Queue the frame as colored half blocks and flush `writer`
    pub fn end_frame<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let (width, height) = self.framebuffer.physical_size();
        let pixels = self.framebuffer.pixels();
        let mut last: Option<(Color, Color)> = None;

        for (row, y) in (0..height).step_by(2).enumerate() {
            writer.queue(cursor::MoveTo(0, self.top + row as u16))?;
            for x in 0..width {
                let upper = to_terminal(pixels[y * width + x]);
                let lower = if y + 1 < height {
                    to_terminal(pixels[(y + 1) * width + x])
                } else {
                    Color::Black
                };
                if last != Some((upper, lower)) {
                    writer.queue(SetForegroundColor(upper))?;
                    writer.queue(SetBackgroundColor(lower))?;
                    last = Some((upper, lower));
                }
                writer.queue(Print(HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;
        writer.flush()
    }
}

fn to_terminal(color: Rgba) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb { r, g, b }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_uses_half_rows() {
        assert_eq!(TerminalSurface::fit(80, 24, 1, 1), (80, 46));
        assert_eq!(TerminalSurface::fit(80, 24, 0, 2), (40, 24));
        assert_eq!(TerminalSurface::fit(0, 0, 3, 1), (1, 1));
    }

    #[test]
    fn test_end_frame_writes_every_cell() {
        let mut surface = TerminalSurface::new(3, 3, 1);
        surface.begin_frame().set_pixel(0, 2, Rgba::from_rgb(255, 0, 0));

        let mut out = Vec::new();
        surface.end_frame(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        // Three columns over two terminal rows
        assert_eq!(text.matches(HALF_BLOCK).count(), 6);
        // The top-left pixel is red in the foreground
        assert!(text.contains("38;2;255;0;0"));
    }

    #[test]
    fn test_resize_keeps_scale() {
        let mut surface = TerminalSurface::for_terminal(40, 10, 0, 2);
        surface.resize(80, 20);
        assert_eq!(surface.framebuffer().scale(), 2);
        assert_eq!(surface.framebuffer().width(), 40);
        assert_eq!(surface.framebuffer().height(), 20);
    }
}
