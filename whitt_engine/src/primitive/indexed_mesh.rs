use crate::core::types::{Number, Point3, Vector3};
use crate::primitive::Primitive;
use crate::shared::aabb::Aabb;
use crate::shared::intersect::RayIntersection;
use crate::shared::math::intersect_ray_triangle;
use crate::shared::ray::Ray;
use crate::shared::scratch::QueryScratch;

/// A triangle mesh with shared vertices.
///
/// Vertex attributes live in parallel arrays indexed by [`[u32; 3]`] triples,
/// so each vertex is stored once however many triangles reference it. The
/// normal and surface-coordinate arrays may be left empty, in which case hits
/// fall back to the face normal and a zero coordinate.
///
/// Queries are a linear scan; wrap the mesh in a
/// [`crate::primitive::bvh_mesh::BvhTriangleMesh`] for sublinear queries on
/// large meshes.
#[derive(Clone, Debug, Default)]
pub struct IndexedTriangleMesh {
    positions: Vec<Point3>,
    normals: Vec<Vector3>,
    uvws: Vec<Vector3>,
    triangles: Vec<[u32; 3]>,
}

impl IndexedTriangleMesh {
    pub fn new() -> Self { Self::default() }

    /// Builds a position-only mesh; hits use face normals and zero coordinates
    pub fn from_positions(positions: Vec<Point3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            normals: Vec::new(),
            uvws: Vec::new(),
            triangles,
        }
    }

    /// Appends a fully-attributed vertex and returns its index
    pub fn add_vertex(&mut self, position: Point3, normal: Vector3, uvw: Vector3) -> u32 {
        self.positions.push(position);
        self.normals.push(normal);
        self.uvws.push(uvw);
        (self.positions.len() - 1) as u32
    }

    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.triangles.push([i0, i1, i2]);
    }

    pub fn positions(&self) -> &[Point3] { &self.positions }

    pub fn normals(&self) -> &[Vector3] { &self.normals }

    pub fn uvws(&self) -> &[Vector3] { &self.uvws }

    pub fn triangles(&self) -> &[[u32; 3]] { &self.triangles }

    /// Exact test of one indexed triangle; weights are barycentric
    pub(crate) fn intersect_triangle(
        &self,
        triangle: u32,
        ray: &Ray,
    ) -> Option<(Vector3, Number)> {
        let [i0, i1, i2] = self.triangles[triangle as usize];
        intersect_ray_triangle(
            ray,
            self.positions[i0 as usize],
            self.positions[i1 as usize],
            self.positions[i2 as usize],
        )
    }

    /// Builds the hit record for `triangle` from its barycentric `weights`,
    /// interpolating vertex attributes where present.
    pub(crate) fn hit_record(
        &self,
        triangle: u32,
        weights: Vector3,
        ray: &Ray,
        lambda: Number,
    ) -> RayIntersection {
        let [i0, i1, i2] = self.triangles[triangle as usize];
        let (i0, i1, i2) = (i0 as usize, i1 as usize, i2 as usize);

        let normal = if self.normals.is_empty() {
            (self.positions[i1] - self.positions[i0])
                .cross(self.positions[i2] - self.positions[i0])
        } else {
            self.normals[i0] * weights.x
                + self.normals[i1] * weights.y
                + self.normals[i2] * weights.z
        }
        .normalize();

        let uvw = if self.uvws.is_empty() {
            Vector3::ZERO
        } else {
            self.uvws[i0] * weights.x + self.uvws[i1] * weights.y + self.uvws[i2] * weights.z
        };

        RayIntersection::new(*ray, lambda, normal, uvw)
    }
}

impl Primitive for IndexedTriangleMesh {
    fn closest_intersection_model(
        &self,
        ray: &Ray,
        max_lambda: Number,
        _scratch: &mut QueryScratch,
    ) -> Option<RayIntersection> {
        let mut closest_lambda = max_lambda;
        let mut closest: Option<(u32, Vector3)> = None;

        for triangle in 0..self.triangles.len() as u32 {
            if let Some((weights, lambda)) = self.intersect_triangle(triangle, ray) {
                if lambda > 0. && lambda < closest_lambda {
                    closest_lambda = lambda;
                    closest = Some((triangle, weights));
                }
            }
        }

        let (triangle, weights) = closest?;
        Some(self.hit_record(triangle, weights, ray, closest_lambda))
    }

    fn any_intersection_model(&self, ray: &Ray, max_lambda: Number, _scratch: &mut QueryScratch) -> bool {
        (0..self.triangles.len() as u32).any(|triangle| {
            matches!(
                self.intersect_triangle(triangle, ray),
                Some((_, lambda)) if lambda > 0. && lambda < max_lambda
            )
        })
    }

    fn compute_bounding_box(&self) -> Aabb {
        Aabb::from_points(self.positions.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// A unit quad in the z = 0 plane with outward (+z) vertex normals
    pub(super) fn quad() -> IndexedTriangleMesh {
        let mut mesh = IndexedTriangleMesh::new();
        let n = Vector3::new(0., 0., 1.);
        let a = mesh.add_vertex(Point3::new(0., 0., 0.), n, Vector3::new(0., 0., 0.));
        let b = mesh.add_vertex(Point3::new(1., 0., 0.), n, Vector3::new(1., 0., 0.));
        let c = mesh.add_vertex(Point3::new(1., 1., 0.), n, Vector3::new(1., 1., 0.));
        let d = mesh.add_vertex(Point3::new(0., 1., 0.), n, Vector3::new(0., 1., 0.));
        mesh.add_triangle(a, b, c);
        mesh.add_triangle(a, c, d);
        mesh
    }

    #[test]
    fn shared_vertices_are_stored_once() {
        let mesh = quad();
        assert_eq!(mesh.positions().len(), 4);
        assert_eq!(mesh.triangles().len(), 2);
    }

    #[test]
    fn hit_interpolates_surface_coordinates() {
        let mesh = quad();
        let ray = Ray::new(Point3::new(0.25, 0.75, 1.), Vector3::new(0., 0., -1.));
        let hit = mesh
            .closest_intersection_model(&ray, Number::INFINITY, &mut QueryScratch::new())
            .unwrap();

        assert_relative_eq!(hit.lambda(), 1.);
        assert_relative_eq!(hit.uvw().x, 0.25, epsilon = 1e-12);
        assert_relative_eq!(hit.uvw().y, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn position_only_mesh_uses_face_normal() {
        let mesh = IndexedTriangleMesh::from_positions(
            vec![
                Point3::new(0., 0., 0.),
                Point3::new(1., 0., 0.),
                Point3::new(0., 1., 0.),
            ],
            vec![[0, 1, 2]],
        );
        let ray = Ray::new(Point3::new(0.2, 0.2, 1.), Vector3::new(0., 0., -1.));
        let hit = mesh
            .closest_intersection_model(&ray, Number::INFINITY, &mut QueryScratch::new())
            .unwrap();

        assert_relative_eq!((hit.normal() - Vector3::new(0., 0., 1.)).length(), 0.);
        assert_relative_eq!(hit.uvw().length(), 0.);
    }
}
