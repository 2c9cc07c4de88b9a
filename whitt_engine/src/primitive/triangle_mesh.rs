use crate::core::types::{Number, Point3, Vector3};
use crate::primitive::Primitive;
use crate::shared::aabb::Aabb;
use crate::shared::intersect::RayIntersection;
use crate::shared::math::intersect_ray_triangle;
use crate::shared::ray::Ray;
use crate::shared::scratch::QueryScratch;

/// Per-triangle record: positions, per-vertex normals and surface coordinates
#[derive(Copy, Clone, Debug)]
struct TriangleRecord {
    positions: [Point3; 3],
    normals: [Vector3; 3],
    uvws: [Vector3; 3],
}

/// An unindexed triangle soup, intersected by linear scan.
///
/// Each triangle carries its own vertices, so shared vertices are duplicated;
/// see [`crate::primitive::indexed_mesh::IndexedTriangleMesh`] for the shared
/// variant. Queries are `O(n)` in the triangle count, which is fine for the
/// handful-of-triangles case this is meant for.
#[derive(Clone, Debug, Default)]
pub struct TriangleMesh {
    triangles: Vec<TriangleRecord>,
}

impl TriangleMesh {
    pub fn new() -> Self { Self::default() }

    /// Adds a flat-shaded triangle; all three vertices share the face normal
    pub fn add_triangle(&mut self, v0: Point3, v1: Point3, v2: Point3) {
        let normal = (v1 - v0).cross(v2 - v0).normalize();
        self.add_triangle_with_attributes(
            [v0, v1, v2],
            [normal; 3],
            [Vector3::ZERO; 3],
        );
    }

    /// Adds a triangle with per-vertex normals (no surface coordinates)
    pub fn add_triangle_with_normals(
        &mut self,
        positions: [Point3; 3],
        normals: [Vector3; 3],
    ) {
        self.add_triangle_with_attributes(positions, normals, [Vector3::ZERO; 3]);
    }

    /// Adds a fully-attributed triangle
    pub fn add_triangle_with_attributes(
        &mut self,
        positions: [Point3; 3],
        normals: [Vector3; 3],
        uvws: [Vector3; 3],
    ) {
        self.triangles.push(TriangleRecord {
            positions,
            normals,
            uvws,
        });
    }

    pub fn len(&self) -> usize { self.triangles.len() }

    pub fn is_empty(&self) -> bool { self.triangles.is_empty() }
}

impl Primitive for TriangleMesh {
    fn closest_intersection_model(
        &self,
        ray: &Ray,
        max_lambda: Number,
        _scratch: &mut QueryScratch,
    ) -> Option<RayIntersection> {
        let mut closest_lambda = max_lambda;
        let mut closest: Option<(&TriangleRecord, Vector3)> = None;

        for tri in &self.triangles {
            let [v0, v1, v2] = tri.positions;
            if let Some((weights, lambda)) = intersect_ray_triangle(ray, v0, v1, v2) {
                if lambda > 0. && lambda < closest_lambda {
                    closest_lambda = lambda;
                    closest = Some((tri, weights));
                }
            }
        }

        let (tri, w) = closest?;
        let normal =
            (tri.normals[0] * w.x + tri.normals[1] * w.y + tri.normals[2] * w.z).normalize();
        let uvw = tri.uvws[0] * w.x + tri.uvws[1] * w.y + tri.uvws[2] * w.z;
        Some(RayIntersection::new(*ray, closest_lambda, normal, uvw))
    }

    fn any_intersection_model(&self, ray: &Ray, max_lambda: Number, _scratch: &mut QueryScratch) -> bool {
        self.triangles.iter().any(|tri| {
            let [v0, v1, v2] = tri.positions;
            matches!(
                intersect_ray_triangle(ray, v0, v1, v2),
                Some((_, lambda)) if lambda > 0. && lambda < max_lambda
            )
        })
    }

    fn compute_bounding_box(&self) -> Aabb {
        Aabb::from_points(self.triangles.iter().flat_map(|t| t.positions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_quads() -> TriangleMesh {
        // two parallel unit quads at z = 0 and z = -2
        let mut mesh = TriangleMesh::new();
        for z in [0., -2.] {
            let (a, b, c, d) = (
                Point3::new(0., 0., z),
                Point3::new(1., 0., z),
                Point3::new(1., 1., z),
                Point3::new(0., 1., z),
            );
            mesh.add_triangle(a, b, c);
            mesh.add_triangle(a, c, d);
        }
        mesh
    }

    #[test]
    fn closest_of_overlapping_triangles_wins() {
        let mesh = two_quads();
        let ray = Ray::new(Point3::new(0.5, 0.5, 3.), Vector3::new(0., 0., -1.));
        let hit = mesh
            .closest_intersection_model(&ray, Number::INFINITY, &mut QueryScratch::new())
            .unwrap();

        // the z = 0 quad sits in front of the z = -2 one
        assert_relative_eq!(hit.lambda(), 3.);
        assert_relative_eq!((hit.normal() - Vector3::new(0., 0., 1.)).length(), 0.);
    }

    #[test]
    fn any_intersection_respects_bound() {
        let mesh = two_quads();
        let mut scratch = QueryScratch::new();
        let ray = Ray::new(Point3::new(0.5, 0.5, 3.), Vector3::new(0., 0., -1.));

        assert!(mesh.any_intersection_model(&ray, 10., &mut scratch));
        assert!(!mesh.any_intersection_model(&ray, 2.5, &mut scratch));
    }

    #[test]
    fn interpolates_vertex_normals() {
        let mut mesh = TriangleMesh::new();
        mesh.add_triangle_with_normals(
            [
                Point3::new(0., 0., 0.),
                Point3::new(1., 0., 0.),
                Point3::new(0., 1., 0.),
            ],
            [
                Vector3::new(0., 0., 1.),
                Vector3::new(1., 0., 1.).normalize(),
                Vector3::new(0., 1., 1.).normalize(),
            ],
        );

        // a hit at v0 keeps that vertex's normal exactly
        let ray = Ray::new(Point3::new(0., 0., 1.), Vector3::new(0., 0., -1.));
        let hit = mesh
            .closest_intersection_model(&ray, Number::INFINITY, &mut QueryScratch::new())
            .unwrap();
        assert_relative_eq!((hit.normal() - Vector3::new(0., 0., 1.)).length(), 0., epsilon = 1e-12);
    }

    #[test]
    fn empty_mesh_never_hits() {
        let mesh = TriangleMesh::new();
        let ray = Ray::new(Point3::ZERO, Vector3::new(0., 0., -1.));
        assert!(mesh
            .closest_intersection_model(&ray, Number::INFINITY, &mut QueryScratch::new())
            .is_none());
        assert_eq!(mesh.compute_bounding_box(), Aabb::EMPTY);
    }
}
