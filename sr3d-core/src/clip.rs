//! Triangle clipping against oriented planes
use crate::geometry::Triangle;
use crate::math::{direction, dot, intersect_plane, normalize, vec3, Vec4};
use crate::queue::TriangleQueue;

/// Oriented plane; the side the normal points to is inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vec4,
    pub normal: Vec4,
}

impl Plane {
    /// The normal is normalized here, once
    pub fn new(point: Vec4, normal: Vec4) -> Self {
        Self {
            point,
            normal: normalize(&normal),
        }
    }

    /// Signed distance of `p`, non-negative inside
    pub fn distance(&self, p: &Vec4) -> f32 {
        dot(&self.normal, p) - dot(&self.normal, &self.point)
    }
}

/// Output of clipping one triangle against one plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clipped {
    None,
    One(Triangle),
    Two(Triangle, Triangle),
}

impl Clipped {
    pub fn len(&self) -> usize {
        match self {
            Clipped::None => 0,
            Clipped::One(_) => 1,
            Clipped::Two(_, _) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Clipped::None)
    }
}

impl IntoIterator for Clipped {
    type Item = Triangle;
    type IntoIter = std::iter::Flatten<std::array::IntoIter<Option<Triangle>, 2>>;

    fn into_iter(self) -> Self::IntoIter {
        let pair = match self {
            Clipped::None => [None, None],
            Clipped::One(a) => [Some(a), None],
            Clipped::Two(a, b) => [Some(a), Some(b)],
        };
        pair.into_iter().flatten()
    }
}

/// Clip `tri` to the inside half-space of `plane`.
///
/// New vertices are placed where edges cross the plane; texture coordinates
/// (including the perspective term) are interpolated with the same parameter.
/// Derived triangles keep the input's color.
pub fn clip_triangle(plane: &Plane, tri: &Triangle) -> Clipped {
    let mut inside = [0usize; 3];
    let mut outside = [0usize; 3];
    let (mut n_in, mut n_out) = (0, 0);
    for i in 0..3 {
        if plane.distance(tri.vertex(i)) >= 0.0 {
            inside[n_in] = i;
            n_in += 1;
        } else {
            outside[n_out] = i;
            n_out += 1;
        }
    }

    let crossing = |from: usize, to: usize| {
        let (point, t) = intersect_plane(
            &plane.point,
            &plane.normal,
            tri.vertex(from),
            tri.vertex(to),
        );
        (point, tri.tex_coord(from).lerp(tri.tex_coord(to), t))
    };

    match n_in {
        0 => Clipped::None,
        3 => Clipped::One(*tri),
        1 => {
            let a = inside[0];
            let (p1, t1) = crossing(a, outside[0]);
            let (p2, t2) = crossing(a, outside[1]);
            Clipped::One(Triangle {
                vertices: [tri.vertices[a], p1, p2],
                tex: [tri.tex[a], t1, t2],
                color: tri.color,
            })
        }
        _ => {
            let (a, b) = (inside[0], inside[1]);
            let (pa, ta) = crossing(a, outside[0]);
            let (pb, tb) = crossing(b, outside[0]);
            let first = Triangle {
                vertices: [tri.vertices[a], tri.vertices[b], pa],
                tex: [tri.tex[a], tri.tex[b], ta],
                color: tri.color,
            };
            let second = Triangle {
                vertices: [tri.vertices[b], pa, pb],
                tex: [tri.tex[b], ta, tb],
                color: tri.color,
            };
            Clipped::Two(first, second)
        }
    }
}

/// The four inward-facing viewport edges: bottom, top, left, right.
///
/// Edges sit on the first and last pixel rows and columns.
pub fn screen_planes(width: usize, height: usize) -> [Plane; 4] {
    let right = width.saturating_sub(1) as f32;
    let top = height.saturating_sub(1) as f32;
    [
        Plane::new(vec3(0.0, 0.0, 0.0), direction(0.0, 1.0, 0.0)),
        Plane::new(vec3(0.0, top, 0.0), direction(0.0, -1.0, 0.0)),
        Plane::new(vec3(0.0, 0.0, 0.0), direction(1.0, 0.0, 0.0)),
        Plane::new(vec3(right, 0.0, 0.0), direction(-1.0, 0.0, 0.0)),
    ]
}

/// Clip a screen-space triangle against all four viewport edges.
///
/// `queue` is reset and left holding the surviving fragments. For each
/// plane, only the triangles queued after the previous plane are processed;
/// their clipped results are queued behind them.
pub fn clip_to_screen(tri: &Triangle, width: usize, height: usize, queue: &mut TriangleQueue) {
    queue.reset();
    // Capacity is at least one, so the source triangle always fits
    if queue.push_back(*tri).is_err() {
        return;
    }

    for plane in screen_planes(width, height) {
        let pending = queue.len();
        for _ in 0..pending {
            let Some(current) = queue.pop_front() else {
                break;
            };
            for piece in clip_triangle(&plane, &current) {
                // Overflow is counted by the queue
                let _ = queue.push_back(piece);
            }
        }
    }
}
