//! Homogeneous vector helpers
//!
//! Vectors are `nalgebra::Vector4<f32>`. Points carry `w = 1`, directions
//! (point differences, cross products) carry `w = 0`. The 3D operations here
//! read only x, y and z so that w can hold the perspective divisor after
//! projection.
use nalgebra::{Matrix4, Vector4};

pub type Vec4 = Vector4<f32>;
pub type Mat4 = Matrix4<f32>;

/// A point at (x, y, z) with `w = 1`
pub fn vec3(x: f32, y: f32, z: f32) -> Vec4 {
    Vec4::new(x, y, z, 1.0)
}

/// A direction (x, y, z) with `w = 0`
pub fn direction(x: f32, y: f32, z: f32) -> Vec4 {
    Vec4::new(x, y, z, 0.0)
}

pub fn dot(a: &Vec4, b: &Vec4) -> f32 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// Cross product of the xyz parts; the result is a direction
pub fn cross(a: &Vec4, b: &Vec4) -> Vec4 {
    direction(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

pub fn length(v: &Vec4) -> f32 {
    dot(v, v).sqrt()
}

/// Scale xyz to unit length, keeping w.
///
/// The zero vector has no direction and yields NaN components; callers must
/// not pass degenerate input.
pub fn normalize(v: &Vec4) -> Vec4 {
    let l = length(v);
    Vec4::new(v.x / l, v.y / l, v.z / l, v.w)
}

/// Divide xyz by `s`, keeping w. Used for the perspective divide `divide(v, v.w)`.
pub fn divide(v: &Vec4, s: f32) -> Vec4 {
    Vec4::new(v.x / s, v.y / s, v.z / s, v.w)
}

/// Row-vector product `v · M`, including the w term and without any divide
pub fn multiply_vec(m: &Mat4, v: &Vec4) -> Vec4 {
    m.tr_mul(v)
}

/// `left ∘ right`: with row vectors, `left` is applied first
pub fn multiply(left: &Mat4, right: &Mat4) -> Mat4 {
    left * right
}

/// Parametric intersection of the segment `start..end` with a plane.
///
/// Returns the point and the parameter `t` so callers can interpolate other
/// attributes the same way.
pub fn intersect_plane(
    plane_point: &Vec4,
    plane_normal: &Vec4,
    start: &Vec4,
    end: &Vec4,
) -> (Vec4, f32) {
    let plane_d = dot(plane_normal, plane_point);
    let ad = dot(start, plane_normal);
    let bd = dot(end, plane_normal);
    let denom = bd - ad;
    let t = if denom == 0.0 { 0.0 } else { (plane_d - ad) / denom };
    (start + (end - start) * t, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dot_ignores_w() {
        let a = Vec4::new(1.0, 2.0, 3.0, 10.0);
        let b = Vec4::new(4.0, 5.0, 6.0, 10.0);
        assert_relative_eq!(dot(&a, &b), 32.0);
    }

    #[test]
    fn test_cross_is_left_handed_basis() {
        let x = direction(1.0, 0.0, 0.0);
        let y = direction(0.0, 1.0, 0.0);
        let z = cross(&x, &y);
        assert_relative_eq!(z, direction(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_normalize_unit_and_idempotent() {
        for v in [
            vec3(3.0, 4.0, 0.0),
            direction(-2.0, 0.5, 7.0),
            vec3(0.001, -0.002, 0.003),
        ] {
            let n = normalize(&v);
            assert_relative_eq!(dot(&n, &n), 1.0, epsilon = 1e-5);
            let nn = normalize(&n);
            assert_relative_eq!(n, nn, epsilon = 1e-6);
            assert_eq!(n.w, v.w);
        }
    }

    #[test]
    fn test_normalize_zero_is_nan() {
        let n = normalize(&direction(0.0, 0.0, 0.0));
        assert!(n.x.is_nan());
    }

    #[test]
    fn test_divide_keeps_w() {
        let v = Vec4::new(2.0, 4.0, 6.0, 2.0);
        assert_eq!(divide(&v, v.w), Vec4::new(1.0, 2.0, 3.0, 2.0));
    }

    #[test]
    fn test_point_minus_point_is_direction() {
        let d = vec3(1.0, 2.0, 3.0) - vec3(0.0, 0.0, 1.0);
        assert_eq!(d.w, 0.0);
    }

    #[test]
    fn test_intersect_plane_midpoint() {
        let (p, t) = intersect_plane(
            &vec3(0.0, 0.0, 0.0),
            &direction(0.0, 0.0, 1.0),
            &vec3(0.0, 0.0, -1.0),
            &vec3(2.0, 0.0, 1.0),
        );
        assert_relative_eq!(t, 0.5);
        assert_relative_eq!(p, vec3(1.0, 0.0, 0.0));
    }
}
