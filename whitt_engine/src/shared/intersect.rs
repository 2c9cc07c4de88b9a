use crate::core::types::{Matrix4, Number, Point3, Vector3};
use crate::scene::RenderableId;
use crate::shared::ray::Ray;
use getset::{CopyGetters, Getters};
use glamour::{FromRaw, ToRaw};

/// A ray/renderable intersection record.
///
/// Primitives create these in model space; [`crate::object::Renderable`] maps
/// them to world space via [`RayIntersection::transform`], and the scene scan
/// tags the winning record with the arena index of the renderable that was
/// hit. The renderable is owned by the scene; the record only carries the
/// index.
///
/// # Invariants
/// - `position == ray.origin + lambda * ray.direction`
/// - `lambda >= 0`
#[derive(Getters, CopyGetters, Copy, Clone, Debug)]
pub struct RayIntersection {
    /// The (world-space, after transformation) ray that produced this hit
    #[getset(get = "pub")]
    ray: Ray,
    /// Index of the hit renderable in the scene arena; set by the scene scan
    #[getset(get_copy = "pub")]
    renderable: Option<RenderableId>,
    /// Hit distance along the ray
    #[getset(get_copy = "pub")]
    lambda: Number,
    #[getset(get_copy = "pub")]
    position: Point3,
    /// Surface normal at the hit point, unit length
    #[getset(get_copy = "pub")]
    normal: Vector3,
    /// Parametric surface coordinate, for texture/pattern lookups
    #[getset(get_copy = "pub")]
    uvw: Vector3,
}

impl RayIntersection {
    pub fn new(ray: Ray, lambda: Number, normal: Vector3, uvw: Vector3) -> Self {
        Self {
            ray,
            renderable: None,
            lambda,
            position: ray.point_at(lambda),
            normal,
            uvw,
        }
    }

    pub(crate) fn set_renderable(&mut self, renderable: RenderableId) {
        self.renderable = Some(renderable);
    }

    /// Maps a model-space intersection into world space.
    ///
    /// The position goes through the forward `transform`, the normal through
    /// the linear part of the inverse-transpose (so it stays perpendicular
    /// under non-uniform scaling; the transpose of an inverted translation is
    /// not affine, so the full 4x4 cannot be applied to a vector), and the
    /// ray through the forward transform. Since the transformed ray direction
    /// is re-normalised, `lambda` cannot simply be scaled; it is recomputed
    /// as the distance from the transformed ray origin to the transformed
    /// position.
    pub fn transform(&mut self, transform: &Matrix4, inverse_transpose: &Matrix4) {
        let normal_matrix = glam::DMat3::from_mat4(*inverse_transpose.to_raw());
        self.position = transform.transform_point(self.position);
        self.normal = Vector3::from_raw(normal_matrix * self.normal.to_raw()).normalize();
        self.ray = self.ray.transformed(transform);
        self.lambda = (self.position - self.ray.origin()).length();
    }
}
