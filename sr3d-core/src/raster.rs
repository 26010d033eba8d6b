//! Scanline rasterization into a [`Framebuffer`]
//!
//! Screen coordinates are pixels with y growing upwards; vertex positions are
//! truncated to integers before walking. No depth test is performed, callers
//! order triangles back to front. Geometry reaching past the framebuffer is
//! trimmed to it first, so walks never leave the visible area.
use crate::clip::clip_to_screen;
use crate::color::Color;
use crate::framebuffer::Framebuffer;
use crate::geometry::{TexCoord, Triangle};
use crate::queue::TriangleQueue;
use crate::texture::Texture;

/// Draw a line with integer Bresenham stepping.
///
/// The longer axis advances by one pixel per step while an accumulated error
/// term decides when the shorter axis moves.
pub fn draw_line(fb: &mut Framebuffer, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
    let Some((x1, y1, x2, y2)) = clip_line(fb, x1, y1, x2, y2) else {
        return;
    };
    let dx = x2 - x1;
    let dy = y2 - y1;
    let dx1 = dx.abs();
    let dy1 = dy.abs();
    // Both deltas share a sign: the minor axis moves forward
    let same_sign = (dx < 0 && dy < 0) || (dx > 0 && dy > 0);

    if dy1 <= dx1 {
        let (mut x, mut y, x_end) = if dx >= 0 { (x1, y1, x2) } else { (x2, y2, x1) };
        let mut err = 2 * dy1 - dx1;
        plot(fb, x, y, color);
        while x < x_end {
            x += 1;
            if err < 0 {
                err += 2 * dy1;
            } else {
                y += if same_sign { 1 } else { -1 };
                err += 2 * (dy1 - dx1);
            }
            plot(fb, x, y, color);
        }
    } else {
        let (mut x, mut y, y_end) = if dy >= 0 { (x1, y1, y2) } else { (x2, y2, y1) };
        let mut err = 2 * dx1 - dy1;
        plot(fb, x, y, color);
        while y < y_end {
            y += 1;
            if err <= 0 {
                err += 2 * dx1;
            } else {
                x += if same_sign { 1 } else { -1 };
                err += 2 * (dx1 - dy1);
            }
            plot(fb, x, y, color);
        }
    }
}

/// Outline a triangle
pub fn draw_triangle(fb: &mut Framebuffer, tri: &Triangle, color: Color) {
    outline(fb, pixel_coords(tri), color);
}

/// Fill row `y` from `x_start` to `x_end` inclusive
pub fn fill_span(fb: &mut Framebuffer, x_start: i32, x_end: i32, y: i32, color: Color) {
    let (lo, hi) = if x_start <= x_end {
        (x_start, x_end)
    } else {
        (x_end, x_start)
    };
    let lo = lo.max(0);
    let hi = hi.min(fb.width() as i32 - 1);
    for x in lo..=hi {
        fb.set_pixel(x, y, color);
    }
}

/// Flat-fill a triangle.
///
/// The outline is drawn first so thin slivers still show. The vertices are
/// then sorted by y and three Bresenham edge walkers (top to middle, middle
/// to bottom, top to bottom) report the pixels they cover on each row; the
/// span between the outermost ones is filled. Flat tops and bottoms need no
/// special case because a horizontal edge covers its whole row in one step.
pub fn fill_triangle(fb: &mut Framebuffer, tri: &Triangle, color: Color) {
    if fits(fb, tri) {
        fill_walk(fb, pixel_coords(tri), color);
    } else {
        for_each_on_screen(fb, tri, |fb, piece| fill_walk(fb, pixel_coords(piece), color));
    }
}

/// Texture-map a triangle with perspective correction.
///
/// Each vertex's texture coordinate must already hold `(u/w, v/w, 1/w)`.
/// These interpolate linearly across the screen; dividing by the
/// interpolated `1/w` per pixel recovers the true `(u, v)`. Texels are
/// modulated by the triangle's color, which carries its flat shade.
pub fn fill_textured_triangle(fb: &mut Framebuffer, tri: &Triangle, texture: &Texture) {
    if fits(fb, tri) {
        textured_walk(fb, tri, texture);
    } else {
        for_each_on_screen(fb, tri, |fb, piece| textured_walk(fb, piece, texture));
    }
}

fn pixel_coords(tri: &Triangle) -> [(i32, i32); 3] {
    tri.vertices.map(|v| (v.x as i32, v.y as i32))
}

/// Every vertex lands on a framebuffer pixel
fn fits(fb: &Framebuffer, tri: &Triangle) -> bool {
    let (w, h) = (fb.width() as i32, fb.height() as i32);
    pixel_coords(tri)
        .iter()
        .all(|&(x, y)| (0..w).contains(&x) && (0..h).contains(&y))
}

/// Clip `tri` to the framebuffer edges and hand each piece, snapped inside
/// the bounds, to `draw`.
fn for_each_on_screen(
    fb: &mut Framebuffer,
    tri: &Triangle,
    mut draw: impl FnMut(&mut Framebuffer, &Triangle),
) {
    let (w, h) = (fb.width(), fb.height());
    if w == 0 || h == 0 {
        return;
    }
    let mut queue = TriangleQueue::new();
    clip_to_screen(tri, w, h, &mut queue);
    let (max_x, max_y) = ((w - 1) as f32, (h - 1) as f32);
    for piece in queue.drain() {
        // Crossings carry rounding error; keep them on the edge pixels
        let piece = piece.map_vertices(|v| {
            let mut v = *v;
            v.x = v.x.clamp(0.0, max_x);
            v.y = v.y.clamp(0.0, max_y);
            v
        });
        draw(fb, &piece);
    }
}

fn outline(fb: &mut Framebuffer, [a, b, c]: [(i32, i32); 3], color: Color) {
    draw_line(fb, a.0, a.1, b.0, b.1, color);
    draw_line(fb, b.0, b.1, c.0, c.1, color);
    draw_line(fb, c.0, c.1, a.0, a.1, color);
}

/// Outline and scanline fill of a triangle already inside the framebuffer
fn fill_walk(fb: &mut Framebuffer, p: [(i32, i32); 3], color: Color) {
    outline(fb, p, color);

    let mut p = p;
    p.sort_by_key(|&(_, y)| y);
    let [top, mid, bottom] = p;

    let mut upper = EdgeWalker::new(top, mid);
    let mut lower = EdgeWalker::new(mid, bottom);
    let mut long = EdgeWalker::new(top, bottom);

    let last_row = bottom.1.min(fb.height() as i32 - 1);
    for y in top.1..=last_row {
        let (mut lo, mut hi) = long.next_row();
        if y <= mid.1 {
            let (a, b) = upper.next_row();
            lo = lo.min(a);
            hi = hi.max(b);
        }
        if y >= mid.1 {
            let (a, b) = lower.next_row();
            lo = lo.min(a);
            hi = hi.max(b);
        }
        fill_span(fb, lo as i32, hi as i32, y, color);
    }
}

fn textured_walk(fb: &mut Framebuffer, tri: &Triangle, texture: &Texture) {
    let mut corners = [0, 1, 2].map(|i| {
        let v = tri.vertex(i);
        (v.x as i32, v.y as i32, *tri.tex_coord(i))
    });
    corners.sort_by_key(|&(_, y, _)| y);
    let [top, mid, bottom] = corners;
    let rows = 0..fb.height() as i32;

    // The long edge spans the full height; the short edges split it in two
    let long = TexEdge::new(&top, &bottom);

    let upper = TexEdge::new(&top, &mid);
    for y in top.1.max(rows.start)..mid.1.min(rows.end) {
        textured_span(fb, y, upper.at(y), long.at(y), texture, tri.color);
    }

    let lower = TexEdge::new(&mid, &bottom);
    for y in mid.1.max(rows.start)..=bottom.1.min(rows.end - 1) {
        textured_span(fb, y, lower.at(y), long.at(y), texture, tri.color);
    }
}

/// Write a pixel whose coordinates are known to fit the framebuffer
fn plot(fb: &mut Framebuffer, x: i64, y: i64, color: Color) {
    fb.set_pixel(x as i32, y as i32, color);
}

/// Trim a segment to the framebuffer, `None` when it misses it entirely.
///
/// Segments already inside come back unchanged; others are cut with the
/// Liang-Barsky parametric test and their new ends rounded to pixels.
fn clip_line(fb: &Framebuffer, x1: i32, y1: i32, x2: i32, y2: i32) -> Option<(i64, i64, i64, i64)> {
    let max_x = fb.width() as i64 - 1;
    let max_y = fb.height() as i64 - 1;
    if max_x < 0 || max_y < 0 {
        return None;
    }
    let (x1, y1, x2, y2) = (x1 as i64, y1 as i64, x2 as i64, y2 as i64);
    let inside = |x: i64, y: i64| (0..=max_x).contains(&x) && (0..=max_y).contains(&y);
    if inside(x1, y1) && inside(x2, y2) {
        return Some((x1, y1, x2, y2));
    }

    let (sx, sy) = (x1 as f64, y1 as f64);
    let (dx, dy) = ((x2 - x1) as f64, (y2 - y1) as f64);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, sx),
        (dx, max_x as f64 - sx),
        (-dy, sy),
        (dy, max_y as f64 - sy),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    let at = |t: f64| ((sx + dx * t).round() as i64, (sy + dy * t).round() as i64);
    let ((ax, ay), (bx, by)) = (at(t0), at(t1));
    Some((
        ax.clamp(0, max_x),
        ay.clamp(0, max_y),
        bx.clamp(0, max_x),
        by.clamp(0, max_y),
    ))
}

/// Bresenham walk along one edge, one row at a time, top to bottom
struct EdgeWalker {
    x: i64,
    y: i64,
    x_end: i64,
    y_end: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    err: i64,
}

impl EdgeWalker {
    fn new(from: (i32, i32), to: (i32, i32)) -> Self {
        let (x0, y0) = (from.0 as i64, from.1 as i64);
        let (x1, y1) = (to.0 as i64, to.1 as i64);
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        Self {
            x: x0,
            y: y0,
            x_end: x1,
            y_end: y1,
            dx,
            dy,
            sx: if x0 < x1 { 1 } else { -1 },
            err: dx - dy,
        }
    }

    /// Leftmost and rightmost x the edge touches on the current row, then
    /// move to the next row. Shallow edges step x several times per row,
    /// steep ones step y every time. Past the end the final pixel repeats.
    fn next_row(&mut self) -> (i64, i64) {
        let row = self.y;
        let mut lo = self.x;
        let mut hi = self.x;
        while self.x != self.x_end || self.y != self.y_end {
            let e2 = 2 * self.err;
            if e2 >= -self.dy {
                self.err -= self.dy;
                self.x += self.sx;
            }
            if e2 <= self.dx {
                self.err += self.dx;
                self.y += 1;
            }
            if self.y != row {
                break;
            }
            lo = lo.min(self.x);
            hi = hi.max(self.x);
        }
        (lo, hi)
    }
}

/// Screen-space linear interpolation of x and texture terms along an edge
struct TexEdge {
    y0: i32,
    x0: f32,
    tex0: TexCoord,
    x_step: f32,
    u_step: f32,
    v_step: f32,
    w_step: f32,
}

impl TexEdge {
    fn new(from: &(i32, i32, TexCoord), to: &(i32, i32, TexCoord)) -> Self {
        let dy = (to.1 - from.1) as f32;
        // A flat edge contributes no slope; its rows are covered by the other half
        let step = |d: f32| if dy != 0.0 { d / dy.abs() } else { 0.0 };
        Self {
            y0: from.1,
            x0: from.0 as f32,
            tex0: from.2,
            x_step: step((to.0 - from.0) as f32),
            u_step: step(to.2.u - from.2.u),
            v_step: step(to.2.v - from.2.v),
            w_step: step(to.2.w - from.2.w),
        }
    }

    fn at(&self, y: i32) -> (f32, TexCoord) {
        let i = (y - self.y0) as f32;
        (
            self.x0 + i * self.x_step,
            TexCoord {
                u: self.tex0.u + i * self.u_step,
                v: self.tex0.v + i * self.v_step,
                w: self.tex0.w + i * self.w_step,
            },
        )
    }
}

/// Both ends inclusive; the interpolation parameter runs from 0 on the
/// left pixel to 1 on the right one.
fn textured_span(
    fb: &mut Framebuffer,
    y: i32,
    a: (f32, TexCoord),
    b: (f32, TexCoord),
    texture: &Texture,
    tint: Color,
) {
    let ((ax, start), (bx, end)) = if a.0 > b.0 { (b, a) } else { (a, b) };
    let x_start = ax as i64;
    let x_end = bx as i64;
    let width = x_end - x_start;

    for x in x_start.max(0)..=x_end.min(fb.width() as i64 - 1) {
        let t = if width > 0 {
            (x - x_start) as f32 / width as f32
        } else {
            0.0
        };
        let tc = start.lerp(&end, t);
        if tc.w == 0.0 {
            continue;
        }
        let texel = texture.sample(tc.u / tc.w, tc.v / tc.w);
        fb.set_pixel(x as i32, y, texel.modulate(tint));
    }
}
