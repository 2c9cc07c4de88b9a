//! World-space placement of primitives.

use crate::core::targets::OBJECT;
use crate::core::types::{Matrix4, Number};
use crate::material::MaterialInstance;
use crate::primitive::{Primitive, PrimitiveInstance};
use crate::shared::aabb::Aabb;
use crate::shared::intersect::RayIntersection;
use crate::shared::ray::Ray;
use crate::shared::scratch::QueryScratch;
use getset::Getters;
use tracing::warn;

/// Cached matrices derived from a renderable's transform.
///
/// Mutating the transform flips the cache to [`TransformCache::Stale`]; the
/// scene preparation pass recomputes it via [`Renderable::commit_transform`]
/// before any query runs, so query code can rely on a `Clean` cache.
#[derive(Copy, Clone, Debug, Default)]
enum TransformCache {
    #[default]
    Stale,
    Clean {
        inverse: Matrix4,
        inverse_transpose: Matrix4,
    },
}

/// A primitive placed in the world: geometry, material and a transform.
///
/// All ray queries arrive in world space. The renderable maps them into the
/// primitive's model space through the cached inverse transform, runs the
/// model-space test (with a bounding-box early-out), and maps any hit back
/// out to world space.
#[derive(Getters, Clone, Debug)]
pub struct Renderable {
    #[getset(get = "pub")]
    primitive: PrimitiveInstance,
    #[getset(get = "pub")]
    material: MaterialInstance,
    transform: Matrix4,
    cache: TransformCache,
    /// Model-space bounding box, refreshed by [`Renderable::update_bounding_box`]
    aabb: Aabb,
}

impl Renderable {
    pub fn new(primitive: impl Into<PrimitiveInstance>, material: impl Into<MaterialInstance>) -> Self {
        Self {
            primitive: primitive.into(),
            material: material.into(),
            transform: Matrix4::IDENTITY,
            cache: TransformCache::Stale,
            aabb: Aabb::EMPTY,
        }
    }

    pub fn with_transform(mut self, transform: Matrix4) -> Self {
        *self.transform_mut() = transform;
        self
    }

    pub fn transform(&self) -> &Matrix4 { &self.transform }

    /// Mutable access to the transform. Marks the derived-matrix cache stale;
    /// the change only affects queries after the next preparation pass.
    pub fn transform_mut(&mut self) -> &mut Matrix4 {
        self.cache = TransformCache::Stale;
        &mut self.transform
    }

    pub fn set_material(&mut self, material: impl Into<MaterialInstance>) {
        self.material = material.into();
    }

    pub fn primitive_mut(&mut self) -> &mut PrimitiveInstance { &mut self.primitive }

    /// Recomputes the cached inverse matrices if the transform changed.
    ///
    /// A singular transform cannot be inverted; it is reported and the
    /// renderable falls back to the identity so queries stay finite.
    pub fn commit_transform(&mut self) {
        if matches!(self.cache, TransformCache::Clean { .. }) {
            return;
        }

        let mut transform = self.transform;
        if transform.determinant() == 0. {
            warn!(target: OBJECT, ?transform, "transform not invertible, falling back to identity");
            transform = Matrix4::IDENTITY;
            self.transform = transform;
        }
        let inverse = transform.inverse();
        self.cache = TransformCache::Clean {
            inverse,
            inverse_transpose: inverse.transpose(),
        };
    }

    /// Recomputes the cached model-space bounding box from the primitive
    pub fn update_bounding_box(&mut self) { self.aabb = self.primitive.compute_bounding_box(); }

    /// Runs the primitive's pre-render hook (BVH builds, tessellation)
    pub fn initialize(&mut self) { self.primitive.initialize(); }

    fn clean_cache(&self) -> (&Matrix4, &Matrix4) {
        match &self.cache {
            TransformCache::Clean {
                inverse,
                inverse_transpose,
            } => (inverse, inverse_transpose),
            // prepare() commits every cache before queries start
            TransformCache::Stale => {
                unreachable!("transform cache queried before commit_transform")
            }
        }
    }

    /// Maximal model-space lambda equivalent to the world-space `max_lambda`.
    ///
    /// Model rays are re-normalised, so distances scale by the length the
    /// inverse transform gives the world direction.
    fn model_max_lambda(&self, inverse: &Matrix4, ray: &Ray, max_lambda: Number) -> Number {
        max_lambda * inverse.transform_vector(ray.direction()).length()
    }

    /// Closest world-space intersection with `lambda` in `(0, max_lambda]`
    pub fn closest_intersection(
        &self,
        ray: &Ray,
        max_lambda: Number,
        scratch: &mut QueryScratch,
    ) -> Option<RayIntersection> {
        let (inverse, inverse_transpose) = self.clean_cache();
        let model_ray = ray.transformed(inverse);
        let model_max_lambda = self.model_max_lambda(inverse, ray, max_lambda);

        if !self.aabb.any_intersection(&model_ray, model_max_lambda) {
            return None;
        }

        let mut hit = self
            .primitive
            .closest_intersection_model(&model_ray, model_max_lambda, scratch)?;
        hit.transform(&self.transform, inverse_transpose);
        Some(hit)
    }

    /// Does `ray` hit this renderable at all within `max_lambda`?
    pub fn any_intersection(&self, ray: &Ray, max_lambda: Number, scratch: &mut QueryScratch) -> bool {
        let (inverse, _) = self.clean_cache();
        let model_ray = ray.transformed(inverse);
        let model_max_lambda = self.model_max_lambda(inverse, ray, max_lambda);

        self.aabb.any_intersection(&model_ray, model_max_lambda)
            && self
                .primitive
                .any_intersection_model(&model_ray, model_max_lambda, scratch)
    }
}
