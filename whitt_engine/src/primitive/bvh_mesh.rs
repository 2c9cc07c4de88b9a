use crate::accel::BvTree;
use crate::core::types::{Number, Vector3};
use crate::primitive::indexed_mesh::IndexedTriangleMesh;
use crate::primitive::Primitive;
use crate::shared::aabb::Aabb;
use crate::shared::intersect::RayIntersection;
use crate::shared::ray::Ray;
use crate::shared::scratch::QueryScratch;
use getset::Getters;

/// An [`IndexedTriangleMesh`] with a bounding-volume hierarchy over its
/// triangles.
///
/// Queries first traverse the tree to collect candidate triangles, then run
/// the exact test only on those. The tree is rebuilt from the current
/// geometry by [`Primitive::initialize`], which the scene preparation pass
/// calls before rendering; querying a mesh whose geometry changed since the
/// last build returns stale results.
#[derive(Getters, Clone, Debug, Default)]
pub struct BvhTriangleMesh {
    #[getset(get = "pub")]
    mesh: IndexedTriangleMesh,
    tree: BvTree,
}

impl BvhTriangleMesh {
    pub fn new(mesh: IndexedTriangleMesh) -> Self {
        Self {
            mesh,
            tree: BvTree::default(),
        }
    }

    /// Mutable access to the geometry; call sites must re-[`Primitive::initialize`]
    /// before querying again.
    pub fn mesh_mut(&mut self) -> &mut IndexedTriangleMesh { &mut self.mesh }
}

impl From<IndexedTriangleMesh> for BvhTriangleMesh {
    fn from(mesh: IndexedTriangleMesh) -> Self { Self::new(mesh) }
}

impl Primitive for BvhTriangleMesh {
    fn closest_intersection_model(
        &self,
        ray: &Ray,
        max_lambda: Number,
        scratch: &mut QueryScratch,
    ) -> Option<RayIntersection> {
        self.tree.intersect_bounding_boxes(ray, max_lambda, scratch);

        let mut closest_lambda = max_lambda;
        let mut closest: Option<(u32, Vector3)> = None;

        for i in 0..scratch.candidates.len() {
            let triangle = scratch.candidates[i];
            if let Some((weights, lambda)) = self.mesh.intersect_triangle(triangle, ray) {
                if lambda > 0. && lambda < closest_lambda {
                    closest_lambda = lambda;
                    closest = Some((triangle, weights));
                }
            }
        }

        let (triangle, weights) = closest?;
        Some(self.mesh.hit_record(triangle, weights, ray, closest_lambda))
    }

    fn any_intersection_model(&self, ray: &Ray, max_lambda: Number, scratch: &mut QueryScratch) -> bool {
        self.tree.intersect_bounding_boxes(ray, max_lambda, scratch);

        for i in 0..scratch.candidates.len() {
            let triangle = scratch.candidates[i];
            if matches!(
                self.mesh.intersect_triangle(triangle, ray),
                Some((_, lambda)) if lambda > 0. && lambda < max_lambda
            ) {
                return true;
            }
        }
        false
    }

    fn compute_bounding_box(&self) -> Aabb { self.mesh.compute_bounding_box() }

    fn initialize(&mut self) {
        self.tree = BvTree::build(self.mesh.positions(), self.mesh.triangles());
    }
}
