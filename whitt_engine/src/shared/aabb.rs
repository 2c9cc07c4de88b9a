use crate::core::types::{Number, Point3};
use crate::shared::ray::Ray;
use getset::CopyGetters;

/// An **Axis-Aligned Bounding Box** (AABB)
///
/// The box spans between the two corners `min` and `max`. A freshly created
/// box is *empty*: the corners sit at `+inf`/`-inf` so that the first
/// [`Aabb::merge`] or [`Aabb::expand_by_point`] snaps it onto real geometry.
#[derive(CopyGetters, Copy, Clone, Debug, PartialEq)]
#[getset(get_copy = "pub")]
pub struct Aabb {
    /// The lower corner; the corner with the smallest coordinates
    min: Point3,
    /// The upper corner; the corner with the largest coordinates
    max: Point3,
}

impl Default for Aabb {
    fn default() -> Self { Self::EMPTY }
}

impl Aabb {
    /// The empty box; merging it with anything yields the other operand
    pub const EMPTY: Self = Self {
        min: Point3 {
            x: Number::INFINITY,
            y: Number::INFINITY,
            z: Number::INFINITY,
        },
        max: Point3 {
            x: Number::NEG_INFINITY,
            y: Number::NEG_INFINITY,
            z: Number::NEG_INFINITY,
        },
    };

    pub const fn new(min: Point3, max: Point3) -> Self { Self { min, max } }

    /// A box covering all of space. Used by unbounded primitives (planes).
    pub const fn infinite() -> Self {
        Self {
            min: Self::EMPTY.max,
            max: Self::EMPTY.min,
        }
    }

    /// Grows `self` to the component-wise union with `other`
    pub fn merge(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Returns the union of two boxes
    #[must_use]
    pub fn merged(mut self, other: &Aabb) -> Self {
        self.merge(other);
        self
    }

    /// Grows `self` to contain `point`
    pub fn expand_by_point(&mut self, point: Point3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Builds the bounding box of a point set
    pub fn from_points(points: impl IntoIterator<Item = Point3>) -> Self {
        let mut aabb = Self::EMPTY;
        for p in points {
            aabb.expand_by_point(p);
        }
        aabb
    }

    /// Surface area of the box; the quantity the SAH build cost is measured in
    pub fn area(&self) -> Number {
        let d = self.max - self.min;
        2. * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    /// Slab test: does `ray` pass through the box within `0..=max_lambda`?
    ///
    /// For each axis the entry/exit distances against the two bounding planes
    /// narrow a running `[t_near, t_far]` interval; the interval turning
    /// inside-out, lying fully behind the origin, or starting beyond
    /// `max_lambda` all reject. An axis with a (numerically) zero direction
    /// component degenerates to a point-in-slab test on the origin.
    pub fn any_intersection(&self, ray: &Ray, max_lambda: Number) -> bool {
        // an inverted box (min above max, like the empty box) contains nothing
        if self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z {
            return false;
        }

        let mut t_near = Number::MIN;
        let mut t_far = Number::MAX;

        let origin = ray.origin().to_array();
        let direction = ray.direction().to_array();
        let min = self.min.to_array();
        let max = self.max.to_array();

        for axis in 0..3 {
            if direction[axis] != 0. {
                let mut t1 = (min[axis] - origin[axis]) / direction[axis];
                let mut t2 = (max[axis] - origin[axis]) / direction[axis];
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }
                t_near = t_near.max(t1);
                t_far = t_far.min(t2);
                if t_near > t_far || t_far < 0. || t_near > max_lambda {
                    return false;
                }
            } else if origin[axis] < min[axis] || origin[axis] > max[axis] {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vector3;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn unit_box() -> Aabb { Aabb::new(Point3::new(-1., -1., -1.), Point3::new(1., 1., 1.)) }

    /// Reference slab test without the early-outs, for cross-checking
    fn brute_force_hit(aabb: &Aabb, ray: &Ray, max_lambda: Number) -> bool {
        let (o, d) = (ray.origin().to_array(), ray.direction().to_array());
        let (min, max) = (aabb.min().to_array(), aabb.max().to_array());

        let mut t_near = Number::MIN;
        let mut t_far = Number::MAX;
        for i in 0..3 {
            if d[i] == 0. {
                if o[i] < min[i] || o[i] > max[i] {
                    return false;
                }
                continue;
            }
            let (t1, t2) = ((min[i] - o[i]) / d[i], (max[i] - o[i]) / d[i]);
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
        }
        t_near <= t_far && t_far >= 0. && t_near <= max_lambda
    }

    #[test]
    fn hits_and_misses() {
        let aabb = unit_box();
        let towards = Ray::new(Point3::new(0., 0., 5.), Vector3::new(0., 0., -1.));
        let away = Ray::new(Point3::new(0., 0., 5.), Vector3::new(0., 0., 1.));
        let offset = Ray::new(Point3::new(3., 0., 5.), Vector3::new(0., 0., -1.));

        assert!(aabb.any_intersection(&towards, Number::INFINITY));
        assert!(!aabb.any_intersection(&away, Number::INFINITY));
        assert!(!aabb.any_intersection(&offset, Number::INFINITY));
        // entry point is at lambda = 4, so a shorter segment misses
        assert!(!aabb.any_intersection(&towards, 3.));
        assert!(aabb.any_intersection(&towards, 4.5));
    }

    #[test]
    fn axis_aligned_ray_inside_slab() {
        let aabb = unit_box();
        // direction is exactly zero on x and y; origin x within the slab
        let inside = Ray::new(Point3::new(0.5, 0., 5.), Vector3::new(0., 0., -1.));
        let outside = Ray::new(Point3::new(1.5, 0., 5.), Vector3::new(0., 0., -1.));

        assert!(aabb.any_intersection(&inside, Number::INFINITY));
        assert!(!aabb.any_intersection(&outside, Number::INFINITY));
    }

    #[test]
    fn empty_box_rejects_everything() {
        let ray = Ray::new(Point3::ZERO, Vector3::new(1., 1., 1.));
        assert!(!Aabb::EMPTY.any_intersection(&ray, Number::INFINITY));

        // a box inverted on a single axis is just as empty
        let inverted = Aabb::new(Point3::new(-1., 1., -1.), Point3::new(1., -1., 1.));
        assert!(!inverted.any_intersection(&ray, Number::INFINITY));
    }

    #[test]
    fn matches_brute_force_on_random_rays() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for _ in 0..2000 {
            let aabb = {
                let a = Point3::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
                let b = Point3::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
                Aabb::new(a.min(b), a.max(b))
            };
            let ray = Ray::new(
                Point3::new(rng.gen_range(-4.0..4.0), rng.gen_range(-4.0..4.0), rng.gen_range(-4.0..4.0)),
                Vector3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)),
            );
            let max_lambda = rng.gen_range(0.0..10.0);

            assert_eq!(
                aabb.any_intersection(&ray, max_lambda),
                brute_force_hit(&aabb, &ray, max_lambda),
                "aabb {aabb:?} vs ray {ray:?} (max_lambda {max_lambda})"
            );
        }
    }

    #[test]
    fn merge_and_area() {
        let mut aabb = Aabb::EMPTY;
        aabb.merge(&Aabb::new(Point3::ZERO, Point3::new(1., 1., 1.)));
        aabb.merge(&Aabb::new(Point3::new(-1., 0., 0.), Point3::new(0., 2., 0.5)));

        assert_eq!(aabb.min(), Point3::new(-1., 0., 0.));
        assert_eq!(aabb.max(), Point3::new(1., 2., 1.));
        // 2 * (2*2 + 2*1 + 2*1) = 16
        assert_eq!(aabb.area(), 16.);
    }
}
