use crate::core::types::{Number, Point3, Vector3};
use crate::primitive::Primitive;
use crate::shared::aabb::Aabb;
use crate::shared::intersect::RayIntersection;
use crate::shared::ray::Ray;
use crate::shared::scratch::QueryScratch;
use glamour::AngleConsts;

/// The unit sphere, centred at the model-space origin.
///
/// Position, radius and any squashing come from the owning renderable's
/// transform, so the sphere itself carries no state.
#[derive(Copy, Clone, Debug, Default)]
pub struct Sphere;

impl Sphere {
    pub fn new() -> Self { Self }
}

impl Primitive for Sphere {
    fn closest_intersection_model(
        &self,
        ray: &Ray,
        max_lambda: Number,
        _scratch: &mut QueryScratch,
    ) -> Option<RayIntersection> {
        // Quadratic formula on |origin + lambda * direction|^2 = 1; since the
        // direction is unit length the leading coefficient is one.
        let origin = ray.origin().to_vector();
        let half_b = ray.direction().dot(origin);
        let c = origin.length_squared() - 1.;

        let discriminant = half_b * half_b - c;
        if discriminant <= 0. {
            return None;
        }
        let sqrt_d = discriminant.sqrt();

        // Prefer the nearer root; if it lies behind the origin the ray
        // starts inside the sphere and the far root is the exit point.
        let mut lambda = -half_b - sqrt_d;
        if lambda < 0. {
            lambda = -half_b + sqrt_d;
        }
        if lambda <= 0. || lambda > max_lambda {
            return None;
        }

        let normal = ray.point_at(lambda).to_vector().normalize();
        Some(RayIntersection::new(*ray, lambda, normal, sphere_uvw(normal)))
    }

    fn compute_bounding_box(&self) -> Aabb {
        Aabb::new(Point3::new(-1., -1., -1.), Point3::new(1., 1., 1.))
    }
}

/// Converts a point on the unit sphere into a `(u, v, 0)` surface coordinate
fn sphere_uvw(p: Vector3) -> Vector3 {
    let theta = Number::acos((-p.y).clamp(-1., 1.));
    let phi = Number::atan2(-p.z, p.x) + Number::PI;

    Vector3::new(phi / (2. * Number::PI), theta / Number::PI, 0.)
}
