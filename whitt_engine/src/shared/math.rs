use crate::core::types::{Colour, Number, Point3, Vector3};
use crate::shared::ray::Ray;

/// Epsilon used for parallel-ray rejection and shadow-ray offsets
pub const SAFETY_EPS: Number = 1e-9;

/// Calculates the vector reflection of vector `d` across the surface normal `n`
pub fn reflect(d: Vector3, n: Vector3) -> Vector3 { d - n * (2. * d.dot(n)) }

/// Linearly interpolates between two colours
pub fn lerp(a: Colour, b: Colour, t: Number) -> Colour {
    glam::DVec4::lerp(glam::DVec4::from(a.0), glam::DVec4::from(b.0), t)
        .to_array()
        .into()
}

/// Exact ray/triangle test shared by all triangle-based primitives.
///
/// Solves the ray against the triangle's supporting plane, then checks
/// containment with a 2x2 barycentric solve on the edge vectors. Returns the
/// barycentric weights `(w0, w1, w2)` of the hit point (summing to one, in
/// vertex order) and the ray parameter `lambda`.
///
/// Near-parallel rays and degenerate (zero-area) triangles are misses, never
/// errors. `lambda` is *not* range-checked here; callers compare it against
/// their own running bound.
pub fn intersect_ray_triangle(
    ray: &Ray,
    v0: Point3,
    v1: Point3,
    v2: Point3,
) -> Option<(Vector3, Number)> {
    let t1 = v1 - v0;
    let t2 = v2 - v0;
    let normal = t1.cross(t2);

    let d = ray.direction().dot(normal);
    if d.abs() < SAFETY_EPS {
        return None;
    }
    let lambda = (v0 - ray.origin()).dot(normal) / d;

    let p = ray.point_at(lambda) - v0;

    let d11 = t1.dot(t1);
    let d22 = t2.dot(t2);
    let d12 = t1.dot(t2);
    let denominator = d11 * d22 - d12 * d12;
    if denominator.abs() < SAFETY_EPS {
        return None;
    }

    let w1 = (d22 * t1.dot(p) - d12 * t2.dot(p)) / denominator;
    let w2 = (d11 * t2.dot(p) - d12 * t1.dot(p)) / denominator;
    if w1 < 0. || w2 < 0. || w1 + w2 > 1. {
        return None;
    }

    Some((Vector3::new(1. - w1 - w2, w1, w2), lambda))
}
