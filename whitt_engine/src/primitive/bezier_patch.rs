use crate::core::types::{Number, Point3, Vector2, Vector3};
use crate::primitive::bvh_mesh::BvhTriangleMesh;
use crate::primitive::indexed_mesh::IndexedTriangleMesh;
use crate::primitive::Primitive;
use crate::shared::aabb::Aabb;
use crate::shared::intersect::RayIntersection;
use crate::shared::ray::Ray;
use crate::shared::scratch::QueryScratch;
use itertools::iproduct;
use num_traits::Zero;

/// A sample of the continuous patch surface at one `(u, v)` parameter
#[derive(Copy, Clone, Debug)]
pub struct BezierPatchSample {
    pub position: Point3,
    /// Surface normal; zero when both tangents are parallel or vanish
    pub normal: Vector3,
    pub uv: Vector2,
}

/// A tensor-product Bezier patch, rendered through a tessellation.
///
/// The patch stores an `m` by `n` grid of control points. Tessellation
/// happens in [`Primitive::initialize`]: the continuous surface is sampled on
/// a regular `res_u` by `res_v` parameter grid and every grid cell becomes
/// two triangles in an inner BVH-accelerated mesh, which then answers all ray
/// queries. Control point edits after initialization require another
/// initialization pass to become visible.
#[derive(Clone, Debug)]
pub struct BezierPatchMesh {
    m: usize,
    n: usize,
    res_u: usize,
    res_v: usize,
    /// Row-major, `control_points[j * m + i]` is point `(i, j)`
    control_points: Vec<Point3>,
    mesh: BvhTriangleMesh,
}

impl BezierPatchMesh {
    /// Creates a patch with `m` by `n` control points (all at the origin
    /// until set) tessellated at `res_u` by `res_v` samples.
    ///
    /// # Panics
    /// If either control dimension is below 2, or either resolution is below
    /// 2 (a single sample row cannot form triangles).
    pub fn new(m: usize, n: usize, res_u: usize, res_v: usize) -> Self {
        assert!(m >= 2 && n >= 2, "patch needs at least 2x2 control points");
        assert!(res_u >= 2 && res_v >= 2, "tessellation needs at least 2x2 samples");
        Self {
            m,
            n,
            res_u,
            res_v,
            control_points: vec![Point3::ZERO; m * n],
            mesh: BvhTriangleMesh::default(),
        }
    }

    pub fn set_control_point(&mut self, i: usize, j: usize, point: Point3) {
        self.control_points[j * self.m + i] = point;
    }

    pub fn control_point(&self, i: usize, j: usize) -> Point3 {
        self.control_points[j * self.m + i]
    }

    /// Evaluates the continuous surface at `(u, v)`, both in `[0, 1]`.
    ///
    /// Runs de Casteljau twice per direction: once collapsing rows at `u` to
    /// get the iso-curve whose tangent at `v` is the v-tangent, and once
    /// collapsing columns at `v` for the surface point and u-tangent. The
    /// normal is the cross product of the tangents, zero if degenerate.
    pub fn sample(&self, u: Number, v: Number) -> BezierPatchSample {
        let mut u_points = Vec::with_capacity(self.m);
        let mut v_points = Vec::with_capacity(self.n);

        for j in 0..self.n {
            u_points.clear();
            u_points.extend((0..self.m).map(|i| self.control_point(i, j)));
            v_points.push(de_casteljau(&mut u_points, u).0);
        }
        let v_tangent = de_casteljau(&mut v_points, v).1;

        u_points.clear();
        for i in 0..self.m {
            v_points.clear();
            v_points.extend((0..self.n).map(|j| self.control_point(i, j)));
            u_points.push(de_casteljau(&mut v_points, v).0);
        }
        let (position, u_tangent) = de_casteljau(&mut u_points, u);

        let normal = u_tangent
            .cross(v_tangent)
            .try_normalize()
            .unwrap_or(Vector3::ZERO);

        BezierPatchSample {
            position,
            normal,
            uv: Vector2::new(u, v),
        }
    }

    fn add_tessellation_triangle(mesh: &mut IndexedTriangleMesh, corners: [&BezierPatchSample; 3]) {
        let mut normals = [corners[0].normal, corners[1].normal, corners[2].normal];
        if normals.iter().any(|n| n.length_squared().is_zero()) {
            // flat shading where the surface normal is undefined
            let face = (corners[1].position - corners[0].position)
                .cross(corners[2].position - corners[0].position)
                .normalize();
            normals = [face; 3];
        }

        let indices = [0, 1, 2].map(|k| {
            let s: &BezierPatchSample = corners[k];
            mesh.add_vertex(s.position, normals[k], Vector3::new(s.uv.x, s.uv.y, 0.))
        });
        mesh.add_triangle(indices[0], indices[1], indices[2]);
    }
}

impl Primitive for BezierPatchMesh {
    fn closest_intersection_model(
        &self,
        ray: &Ray,
        max_lambda: Number,
        scratch: &mut QueryScratch,
    ) -> Option<RayIntersection> {
        self.mesh.closest_intersection_model(ray, max_lambda, scratch)
    }

    fn any_intersection_model(&self, ray: &Ray, max_lambda: Number, scratch: &mut QueryScratch) -> bool {
        self.mesh.any_intersection_model(ray, max_lambda, scratch)
    }

    fn compute_bounding_box(&self) -> Aabb {
        // the surface lies in the convex hull of its control net
        Aabb::from_points(self.control_points.iter().copied())
    }

    fn initialize(&mut self) {
        let samples: Vec<BezierPatchSample> = iproduct!(0..self.res_v, 0..self.res_u)
            .map(|(j, i)| {
                self.sample(
                    i as Number / (self.res_u - 1) as Number,
                    j as Number / (self.res_v - 1) as Number,
                )
            })
            .collect();

        // rebuilt from scratch so repeated initialization stays idempotent
        let mut mesh = IndexedTriangleMesh::new();
        for (j, i) in iproduct!(0..self.res_v - 1, 0..self.res_u - 1) {
            let i00 = self.res_u * j + i;
            let i10 = self.res_u * j + i + 1;
            let i01 = self.res_u * (j + 1) + i;
            let i11 = self.res_u * (j + 1) + i + 1;

            Self::add_tessellation_triangle(&mut mesh, [&samples[i00], &samples[i10], &samples[i01]]);
            Self::add_tessellation_triangle(&mut mesh, [&samples[i10], &samples[i11], &samples[i01]]);
        }

        self.mesh = BvhTriangleMesh::new(mesh);
        self.mesh.initialize();
    }
}

/// One full de Casteljau evaluation of a Bezier curve at `t`.
///
/// Repeatedly lerps adjacent control points in place until two remain, then
/// returns the curve point together with the (scaled, non-unit) tangent.
/// Consumes `points` as its workspace.
fn de_casteljau(points: &mut Vec<Point3>, t: Number) -> (Point3, Vector3) {
    let n = points.len();
    debug_assert!(n >= 2);

    while points.len() > 2 {
        for i in 0..points.len() - 1 {
            points[i] = points[i] + (points[i + 1] - points[i]) * t;
        }
        points.pop();
    }

    let point = points[0] + (points[1] - points[0]) * t;
    let tangent = (points[1] - points[0]) * n as Number;
    (point, tangent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// A flat 3x3 patch spanning the unit square in the z = 0 plane
    fn flat_patch() -> BezierPatchMesh {
        let mut patch = BezierPatchMesh::new(3, 3, 8, 8);
        for j in 0..3 {
            for i in 0..3 {
                patch.set_control_point(i, j, Point3::new(i as Number / 2., j as Number / 2., 0.));
            }
        }
        patch
    }

    #[test]
    fn flat_patch_samples_lie_in_plane() {
        let patch = flat_patch();
        for (u, v) in [(0., 0.), (1., 1.), (0.5, 0.5), (0.25, 0.75)] {
            let s = patch.sample(u, v);
            assert_relative_eq!(s.position.z, 0., epsilon = 1e-12);
            // a flat patch in z = 0 has a +-z normal everywhere
            assert_relative_eq!(s.normal.x, 0., epsilon = 1e-12);
            assert_relative_eq!(s.normal.y, 0., epsilon = 1e-12);
            assert_relative_eq!(s.normal.z.abs(), 1., epsilon = 1e-12);
        }
    }

    #[test]
    fn corners_interpolate_control_points() {
        let mut patch = BezierPatchMesh::new(3, 2, 4, 4);
        patch.set_control_point(0, 0, Point3::new(-1., 0., 2.));
        patch.set_control_point(2, 1, Point3::new(3., 1., -1.));

        // Bezier surfaces interpolate the four corner control points
        let s00 = patch.sample(0., 0.);
        let s11 = patch.sample(1., 1.);
        assert_relative_eq!((s00.position - Point3::new(-1., 0., 2.)).length(), 0., epsilon = 1e-12);
        assert_relative_eq!((s11.position - Point3::new(3., 1., -1.)).length(), 0., epsilon = 1e-12);
    }

    #[test]
    fn tessellation_is_hittable_after_initialize() {
        let mut patch = flat_patch();
        patch.initialize();

        let ray = Ray::new(Point3::new(0.5, 0.5, 2.), Vector3::new(0., 0., -1.));
        let hit = patch
            .closest_intersection_model(&ray, Number::INFINITY, &mut QueryScratch::new())
            .unwrap();

        assert_relative_eq!(hit.lambda(), 2., epsilon = 1e-9);
        assert_relative_eq!(hit.uvw().x, 0.5, epsilon = 1e-9);
        assert_relative_eq!(hit.uvw().y, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn initialize_twice_does_not_duplicate_geometry() {
        let mut patch = flat_patch();
        patch.initialize();
        let triangles = patch.mesh.mesh().triangles().len();
        patch.initialize();
        assert_eq!(patch.mesh.mesh().triangles().len(), triangles);
    }

    #[test]
    fn bounding_box_spans_control_net() {
        let patch = flat_patch();
        let aabb = patch.compute_bounding_box();
        assert_relative_eq!((aabb.min() - Point3::new(0., 0., 0.)).length(), 0.);
        assert_relative_eq!((aabb.max() - Point3::new(1., 1., 0.)).length(), 0.);
    }
}
