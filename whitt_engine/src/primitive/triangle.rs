use crate::core::types::{Number, Point3, Vector3};
use crate::primitive::Primitive;
use crate::shared::aabb::Aabb;
use crate::shared::intersect::RayIntersection;
use crate::shared::math::intersect_ray_triangle;
use crate::shared::ray::Ray;
use crate::shared::scratch::QueryScratch;
use getset::CopyGetters;

/// A single triangle, given by its three model-space vertices.
///
/// The geometric normal is derived from the winding order `v0 -> v1 -> v2`
/// (right-handed) and cached at construction.
#[derive(CopyGetters, Copy, Clone, Debug)]
#[getset(get_copy = "pub")]
pub struct Triangle {
    v0: Point3,
    v1: Point3,
    v2: Point3,
    normal: Vector3,
}

impl Triangle {
    pub fn new(v0: Point3, v1: Point3, v2: Point3) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize();
        Self { v0, v1, v2, normal }
    }
}

impl Primitive for Triangle {
    fn closest_intersection_model(
        &self,
        ray: &Ray,
        max_lambda: Number,
        _scratch: &mut QueryScratch,
    ) -> Option<RayIntersection> {
        let (weights, lambda) = intersect_ray_triangle(ray, self.v0, self.v1, self.v2)?;
        if lambda < 0. || lambda > max_lambda {
            return None;
        }
        // Barycentric weights double as the surface coordinate
        Some(RayIntersection::new(*ray, lambda, self.normal, weights))
    }

    fn compute_bounding_box(&self) -> Aabb {
        Aabb::from_points([self.v0, self.v1, self.v2])
    }
}
