use crate::core::types::{Matrix4, Number, Point3, Vector3};

/// A ray, the `origin + lambda * direction` parametrisation of a half-line.
///
/// # Invariants
/// - `direction` is normalised. Every constructor and mutator re-normalises,
///   so transformed rays stay unit-length even under scaling transforms.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Ray {
    origin: Point3,
    direction: Vector3,
}

impl Ray {
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    #[inline(always)]
    pub fn origin(&self) -> Point3 { self.origin }

    #[inline(always)]
    pub fn direction(&self) -> Vector3 { self.direction }

    pub fn set_origin(&mut self, origin: Point3) { self.origin = origin; }

    pub fn set_direction(&mut self, direction: Vector3) { self.direction = direction.normalize(); }

    /// Gets the point at parametric distance `lambda` along the ray
    pub fn point_at(&self, lambda: Number) -> Point3 { self.origin + self.direction * lambda }

    /// Maps the ray through an affine transform, re-normalising the direction
    pub fn transformed(&self, transform: &Matrix4) -> Self {
        Self::new(
            transform.transform_point(self.origin),
            transform.transform_vector(self.direction),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn direction_is_normalised() {
        let ray = Ray::new(Point3::ZERO, Vector3::new(0., 3., 4.));
        assert_relative_eq!(ray.direction().length(), 1.);
        assert_relative_eq!(ray.point_at(5.).y, 3.);
    }

    #[test]
    fn transform_round_trips() {
        let transform = Matrix4::from_scale(Vector3::new(2., 3., 4.))
            * Matrix4::from_translation(Vector3::new(-1., 5., 0.5));
        let inverse = transform.inverse();

        let ray = Ray::new(Point3::new(1., 2., 3.), Vector3::new(-1., 0.5, 2.));
        let round_trip = ray.transformed(&transform).transformed(&inverse);

        assert_relative_eq!((round_trip.origin() - ray.origin()).length(), 0., epsilon = 1e-12);
        assert_relative_eq!(
            (round_trip.direction() - ray.direction()).length(),
            0.,
            epsilon = 1e-12
        );
    }
}
