use crate::core::types::{Number, Vector3};
use crate::primitive::Primitive;
use crate::shared::aabb::Aabb;
use crate::shared::intersect::RayIntersection;
use crate::shared::math::SAFETY_EPS;
use crate::shared::ray::Ray;
use crate::shared::scratch::QueryScratch;
use getset::CopyGetters;

/// An infinite plane through the model-space origin.
///
/// An orthonormal tangent/bitangent basis is built once at construction and
/// projects hit points into a `(u, v)` surface parametrisation, so patterned
/// materials can tile the plane.
#[derive(CopyGetters, Copy, Clone, Debug)]
#[getset(get_copy = "pub")]
pub struct Plane {
    normal: Vector3,
    tangent: Vector3,
    bitangent: Vector3,
}

impl Plane {
    pub fn new(normal: Vector3) -> Self {
        let normal = normal.normalize();

        // Complete the basis from an arbitrary tangent; if the normal is
        // (anti)parallel to it, fall back to a fixed frame.
        let mut tangent = Vector3::new(1., 0., 0.);
        let mut bitangent = normal.cross(tangent);
        match bitangent.try_normalize() {
            Some(unit_bitangent) => {
                bitangent = unit_bitangent;
                tangent = bitangent.cross(normal).normalize();
            }
            None => {
                tangent = Vector3::new(0., 1., 0.);
                bitangent = Vector3::new(0., 0., 1.);
            }
        }

        Self {
            normal,
            tangent,
            bitangent,
        }
    }
}

impl Primitive for Plane {
    fn closest_intersection_model(
        &self,
        ray: &Ray,
        max_lambda: Number,
        _scratch: &mut QueryScratch,
    ) -> Option<RayIntersection> {
        // Linear solve for lambda; near-parallel rays are a miss, not an error
        let d = ray.direction().dot(self.normal);
        if d.abs() < SAFETY_EPS {
            return None;
        }
        let lambda = -ray.origin().to_vector().dot(self.normal) / d;
        if lambda < 0. || lambda > max_lambda {
            return None;
        }

        let p = ray.point_at(lambda).to_vector();
        let uvw = Vector3::new(p.dot(self.tangent), p.dot(self.bitangent), 0.);
        Some(RayIntersection::new(*ray, lambda, self.normal, uvw))
    }

    fn compute_bounding_box(&self) -> Aabb { Aabb::infinite() }
}
