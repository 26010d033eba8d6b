//! Geometry primitives for 3D rendering
use crate::color::Color;
use crate::math::{cross, length, normalize, vec3, Vec4};

/// Texture coordinate with its perspective term.
///
/// `w` is 1 in model space. After projection it holds `1 / w_clip`, and `u`
/// and `v` are pre-divided by `w_clip` so all three interpolate linearly in
/// screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexCoord {
    pub u: f32,
    pub v: f32,
    pub w: f32,
}

impl TexCoord {
    pub fn new(u: f32, v: f32) -> Self {
        Self { u, v, w: 1.0 }
    }

    /// Linear blend towards `other` by `t`
    pub fn lerp(&self, other: &TexCoord, t: f32) -> TexCoord {
        TexCoord {
            u: self.u + (other.u - self.u) * t,
            v: self.v + (other.v - self.v) * t,
            w: self.w + (other.w - self.w) * t,
        }
    }
}

impl Default for TexCoord {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// A triangle face: three vertices, their texture coordinates and one flat color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec4; 3],
    pub tex: [TexCoord; 3],
    pub color: Color,
}

impl Triangle {
    pub fn new(v0: Vec4, v1: Vec4, v2: Vec4) -> Self {
        Self {
            vertices: [v0, v1, v2],
            tex: [TexCoord::default(); 3],
            color: Color::WHITE,
        }
    }

    pub fn with_tex(mut self, t0: TexCoord, t1: TexCoord, t2: TexCoord) -> Self {
        self.tex = [t0, t1, t2];
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn vertex(&self, i: usize) -> &Vec4 {
        &self.vertices[i]
    }

    pub fn tex_coord(&self, i: usize) -> &TexCoord {
        &self.tex[i]
    }

    /// Apply `f` to every vertex, keeping texture coordinates and color
    pub fn map_vertices(&self, f: impl Fn(&Vec4) -> Vec4) -> Triangle {
        Triangle {
            vertices: [
                f(&self.vertices[0]),
                f(&self.vertices[1]),
                f(&self.vertices[2]),
            ],
            ..*self
        }
    }

    /// Unnormalized face normal, `cross(v1 - v0, v2 - v0)`
    pub fn face_normal(&self) -> Vec4 {
        let edge1 = self.vertices[1] - self.vertices[0];
        let edge2 = self.vertices[2] - self.vertices[0];
        cross(&edge1, &edge2)
    }

    /// Calculate the unit face normal from the triangle's vertices.
    ///
    /// Degenerate (zero-area) triangles produce NaN components.
    pub fn calculate_normal(&self) -> Vec4 {
        normalize(&self.face_normal())
    }

    /// Area of the triangle in 3D
    pub fn area(&self) -> f32 {
        length(&self.face_normal()) * 0.5
    }

    /// Mean z of the three vertices, used for back-to-front ordering
    pub fn average_depth(&self) -> f32 {
        (self.vertices[0].z + self.vertices[1].z + self.vertices[2].z) / 3.0
    }
}

impl Default for Triangle {
    fn default() -> Self {
        let origin = vec3(0.0, 0.0, 0.0);
        Self::new(origin, origin, origin)
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    /// A mesh of `count` zeroed triangles, to be filled in place
    pub fn new(count: usize) -> Self {
        Self {
            triangles: vec![Triangle::default(); count],
        }
    }

    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// Create a textured cube centred on the origin.
    ///
    /// Faces wind clockwise when seen from outside, so their normals point
    /// outwards in the left-handed frame.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let p = |x: f32, y: f32, z: f32| vec3(x * h, y * h, z * h);
        let t = TexCoord::new;
        let mut mesh = Self::with_capacity(12);

        // Each face as (bottom-left, top-left, top-right, bottom-right) seen from outside
        let faces = [
            // South
            [p(-1.0, -1.0, -1.0), p(-1.0, 1.0, -1.0), p(1.0, 1.0, -1.0), p(1.0, -1.0, -1.0)],
            // East
            [p(1.0, -1.0, -1.0), p(1.0, 1.0, -1.0), p(1.0, 1.0, 1.0), p(1.0, -1.0, 1.0)],
            // North
            [p(1.0, -1.0, 1.0), p(1.0, 1.0, 1.0), p(-1.0, 1.0, 1.0), p(-1.0, -1.0, 1.0)],
            // West
            [p(-1.0, -1.0, 1.0), p(-1.0, 1.0, 1.0), p(-1.0, 1.0, -1.0), p(-1.0, -1.0, -1.0)],
            // Top
            [p(-1.0, 1.0, -1.0), p(-1.0, 1.0, 1.0), p(1.0, 1.0, 1.0), p(1.0, 1.0, -1.0)],
            // Bottom
            [p(1.0, -1.0, 1.0), p(-1.0, -1.0, 1.0), p(-1.0, -1.0, -1.0), p(1.0, -1.0, -1.0)],
        ];

        for [bl, tl, tr, br] in faces {
            mesh.add_triangle(
                Triangle::new(bl, tl, tr).with_tex(t(0.0, 1.0), t(0.0, 0.0), t(1.0, 0.0)),
            );
            mesh.add_triangle(
                Triangle::new(bl, tr, br).with_tex(t(0.0, 1.0), t(1.0, 0.0), t(1.0, 1.0)),
            );
        }

        mesh
    }
}

impl<'a> IntoIterator for &'a Mesh {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{direction, dot};
    use approx::assert_relative_eq;

    fn outward(triangle: &Triangle) -> Vec4 {
        let c = (triangle.vertices[0] + triangle.vertices[1] + triangle.vertices[2]) / 3.0;
        direction(c.x, c.y, c.z)
    }

    #[test]
    fn test_cube_has_twelve_triangles() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.len(), 12);
        assert!(!cube.is_empty());
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let cube = Mesh::cube(2.0);
        for tri in &cube {
            let n = tri.calculate_normal();
            assert!(dot(&n, &outward(tri)) > 0.0, "inward face: {:?}", tri);
            assert_relative_eq!(dot(&n, &n), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_mesh_new_is_zeroed() {
        let mesh = Mesh::new(3);
        assert_eq!(mesh.len(), 3);
        assert_eq!(mesh.triangles[2], Triangle::default());
    }

    #[test]
    fn test_area_and_depth() {
        let tri = Triangle::new(vec3(0.0, 0.0, 1.0), vec3(4.0, 0.0, 2.0), vec3(0.0, 3.0, 3.0));
        assert_relative_eq!(tri.average_depth(), 2.0);

        let flat = Triangle::new(vec3(0.0, 0.0, 0.0), vec3(4.0, 0.0, 0.0), vec3(0.0, 3.0, 0.0));
        assert_relative_eq!(flat.area(), 6.0);
    }

    #[test]
    fn test_map_vertices_keeps_attributes() {
        let tri = Triangle::new(vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0))
            .with_tex(TexCoord::new(0.0, 0.0), TexCoord::new(1.0, 0.0), TexCoord::new(0.0, 1.0))
            .with_color(Color::BLACK);
        let moved = tri.map_vertices(|v| v + direction(0.0, 0.0, 5.0));
        assert_eq!(moved.vertex(1).z, 5.0);
        assert_eq!(moved.tex, tri.tex);
        assert_eq!(moved.color, Color::BLACK);
    }

    #[test]
    fn test_tex_coord_lerp() {
        let a = TexCoord { u: 0.0, v: 1.0, w: 1.0 };
        let b = TexCoord { u: 1.0, v: 0.0, w: 0.5 };
        let m = a.lerp(&b, 0.5);
        assert_relative_eq!(m.u, 0.5);
        assert_relative_eq!(m.v, 0.5);
        assert_relative_eq!(m.w, 0.75);
    }
}
