//! The closed set of geometric primitives the engine can render.
//!
//! Every primitive works purely in its own *model space*; placement, scaling
//! and orientation in the world are the job of the owning
//! [`crate::object::Renderable`], which hands rays in here already
//! transformed. Dispatch goes through [`PrimitiveInstance`] so the scene can
//! store a homogeneous arena without boxing.

use crate::core::types::Number;
use crate::shared::aabb::Aabb;
use crate::shared::intersect::RayIntersection;
use crate::shared::ray::Ray;
use crate::shared::scratch::QueryScratch;
use crate::shared::RtRequirement;
use enum_dispatch::enum_dispatch;

// noinspection ALL - Used by enum_dispatch macro
#[allow(unused_imports)]
use self::{
    bezier_patch::BezierPatchMesh, bvh_mesh::BvhTriangleMesh, indexed_mesh::IndexedTriangleMesh,
    plane::Plane, sphere::Sphere, triangle::Triangle, triangle_mesh::TriangleMesh,
};

pub mod bezier_patch;
pub mod bvh_mesh;
pub mod indexed_mesh;
pub mod plane;
pub mod sphere;
pub mod triangle;
pub mod triangle_mesh;

/// Model-space behaviour required of every primitive.
#[enum_dispatch]
pub trait Primitive: RtRequirement {
    /// Finds the closest intersection along `ray` with `lambda` in
    /// `(0, max_lambda]`, in model space.
    ///
    /// `scratch` is the calling worker's BVH traversal state; primitives
    /// without an acceleration structure ignore it.
    fn closest_intersection_model(
        &self,
        ray: &Ray,
        max_lambda: Number,
        scratch: &mut QueryScratch,
    ) -> Option<RayIntersection>;

    /// Tests whether *any* intersection exists within `max_lambda`.
    ///
    /// Defaults to the closest-hit computation; meshes override this with an
    /// early-exit scan since shadow rays don't need the nearest hit.
    fn any_intersection_model(&self, ray: &Ray, max_lambda: Number, scratch: &mut QueryScratch) -> bool {
        self.closest_intersection_model(ray, max_lambda, scratch).is_some()
    }

    /// The model-space bounding box of this primitive
    fn compute_bounding_box(&self) -> Aabb;

    /// Pre-render hook, run once per frame by the scene preparation pass.
    ///
    /// This is where BVH-backed meshes (re)build their tree and parametric
    /// surfaces re-tessellate.
    fn initialize(&mut self) {}
}

/// An optimised implementation of [`Primitive`], static-dispatched over the
/// closed primitive set.
#[enum_dispatch(Primitive)]
#[derive(Clone, Debug)]
pub enum PrimitiveInstance {
    Sphere,
    Plane,
    Triangle,
    TriangleMesh,
    IndexedTriangleMesh,
    BvhTriangleMesh,
    BezierPatchMesh,
}
