//! The scene aggregate: renderables, lights, camera and background.

pub mod camera;

use crate::core::targets::SCENE;
use crate::core::types::{Colour, Number};
use crate::light::PointLight;
use crate::object::Renderable;
use crate::scene::camera::Camera;
use crate::shared::intersect::RayIntersection;
use crate::shared::ray::Ray;
use crate::shared::scratch::QueryScratch;
use tracing::debug;

/// Index of a renderable in a [`Scene`]'s arena.
///
/// Stable for the lifetime of the scene; renderables are never removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RenderableId(pub(crate) usize);

/// Everything the renderer needs to draw a frame.
///
/// Renderables live in an arena and are addressed by [`RenderableId`];
/// intersections refer back to their renderable through that index rather
/// than a pointer, which keeps hit records `Copy` and the arena free to
/// reallocate during setup.
///
/// [`Scene::prepare`] must run after the last mutation and before the first
/// query; the renderer does this automatically at the start of a frame.
#[derive(Debug, Default)]
pub struct Scene {
    renderables: Vec<Renderable>,
    lights: Vec<PointLight>,
    camera: Option<Box<dyn Camera>>,
    background: Colour,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            renderables: Vec::new(),
            lights: Vec::new(),
            camera: None,
            // fully transparent so compositors can tell "miss" from "black"
            background: Colour::rgba(0., 0., 0., 0.),
        }
    }

    // region Setup

    pub fn add_renderable(&mut self, renderable: Renderable) -> RenderableId {
        self.renderables.push(renderable);
        RenderableId(self.renderables.len() - 1)
    }

    pub fn add_light(&mut self, light: PointLight) { self.lights.push(light); }

    pub fn set_camera(&mut self, camera: impl Camera + 'static) {
        self.camera = Some(Box::new(camera));
    }

    pub fn set_background_colour(&mut self, colour: Colour) { self.background = colour; }

    // endregion Setup

    // region Accessors

    pub fn renderable(&self, id: RenderableId) -> &Renderable { &self.renderables[id.0] }

    pub fn renderable_mut(&mut self, id: RenderableId) -> &mut Renderable {
        &mut self.renderables[id.0]
    }

    pub fn renderables(&self) -> &[Renderable] { &self.renderables }

    pub fn lights(&self) -> &[PointLight] { &self.lights }

    pub fn camera(&self) -> Option<&dyn Camera> { self.camera.as_deref() }

    pub fn camera_mut(&mut self) -> Option<&mut (dyn Camera + 'static)> {
        self.camera.as_deref_mut()
    }

    pub fn background_colour(&self) -> Colour { self.background }

    // endregion Accessors

    /// Refreshes all per-frame caches: bounding boxes, primitive
    /// initialization (BVH builds, tessellation) and transform matrices.
    ///
    /// Takes `&mut self`, so the borrow checker guarantees it cannot overlap
    /// the (shared-borrow) query phase.
    pub fn prepare(&mut self) {
        debug!(target: SCENE, renderables = self.renderables.len(), lights = self.lights.len(), "preparing scene");
        for renderable in &mut self.renderables {
            renderable.update_bounding_box();
            renderable.initialize();
            renderable.commit_transform();
        }
    }

    /// The closest hit along `ray` over all renderables, within `max_lambda`.
    ///
    /// The running closest distance is passed down as each renderable's
    /// bound, so later renderables can cull against it. Ties keep the
    /// earlier renderable (strictly-closer replacement).
    pub fn closest_intersection(
        &self,
        ray: &Ray,
        max_lambda: Number,
        scratch: &mut QueryScratch,
    ) -> Option<RayIntersection> {
        let mut closest_lambda = max_lambda;
        let mut closest: Option<RayIntersection> = None;

        for (index, renderable) in self.renderables.iter().enumerate() {
            if let Some(mut hit) = renderable.closest_intersection(ray, closest_lambda, scratch) {
                if hit.lambda() < closest_lambda {
                    closest_lambda = hit.lambda();
                    hit.set_renderable(RenderableId(index));
                    closest = Some(hit);
                }
            }
        }

        closest
    }

    /// Whether anything at all blocks `ray` within `max_lambda`
    pub fn any_intersection(&self, ray: &Ray, max_lambda: Number, scratch: &mut QueryScratch) -> bool {
        self.renderables
            .iter()
            .any(|r| r.any_intersection(ray, max_lambda, scratch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Matrix4, Point3, Vector3};
    use crate::material::diffuse::DiffuseMaterial;
    use crate::primitive::sphere::Sphere;
    use approx::assert_relative_eq;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn sphere_at(x: Number, y: Number, z: Number) -> Renderable {
        Renderable::new(Sphere::new(), DiffuseMaterial::default())
            .with_transform(Matrix4::from_translation(Vector3::new(x, y, z)))
    }

    fn row_of_spheres() -> Scene {
        let mut scene = Scene::new();
        for z in [0., -4., -8.] {
            scene.add_renderable(sphere_at(0., 0., z));
        }
        scene.prepare();
        scene
    }

    #[test]
    fn closest_renderable_wins() {
        let scene = row_of_spheres();
        let ray = Ray::new(Point3::new(0., 0., 5.), Vector3::new(0., 0., -1.));
        let hit = scene
            .closest_intersection(&ray, Number::INFINITY, &mut QueryScratch::new())
            .unwrap();

        assert_relative_eq!(hit.lambda(), 4.);
        assert_eq!(hit.renderable(), Some(RenderableId(0)));
    }

    #[test]
    fn max_lambda_skips_near_geometry() {
        let scene = row_of_spheres();
        // shoot from between the first two spheres
        let ray = Ray::new(Point3::new(0., 0., -2.), Vector3::new(0., 0., -1.));
        let hit = scene
            .closest_intersection(&ray, Number::INFINITY, &mut QueryScratch::new())
            .unwrap();
        assert_eq!(hit.renderable(), Some(RenderableId(1)));

        assert!(scene
            .closest_intersection(&ray, 0.5, &mut QueryScratch::new())
            .is_none());
    }

    #[test]
    fn any_intersection_finds_occluders() {
        let scene = row_of_spheres();
        let mut scratch = QueryScratch::new();
        let blocked = Ray::new(Point3::new(0., 0., 5.), Vector3::new(0., 0., -1.));
        let clear = Ray::new(Point3::new(0., 5., 5.), Vector3::new(0., 0., -1.));

        assert!(scene.any_intersection(&blocked, Number::INFINITY, &mut scratch));
        assert!(!scene.any_intersection(&clear, Number::INFINITY, &mut scratch));
        assert!(!scene.any_intersection(&blocked, 3.9, &mut scratch));
    }

    #[test]
    fn closest_hit_matches_per_renderable_scan() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut scene = Scene::new();
        for _ in 0..20 {
            scene.add_renderable(sphere_at(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
            ));
        }
        scene.prepare();

        let mut scratch = QueryScratch::new();
        for _ in 0..200 {
            let ray = Ray::new(
                Point3::new(rng.gen_range(-8.0..8.0), rng.gen_range(-8.0..8.0), 10.),
                Vector3::new(rng.gen_range(-0.3..0.3), rng.gen_range(-0.3..0.3), -1.),
            );

            let via_scene = scene.closest_intersection(&ray, Number::INFINITY, &mut scratch);
            let via_scan = scene
                .renderables()
                .iter()
                .filter_map(|r| r.closest_intersection(&ray, Number::INFINITY, &mut scratch))
                .min_by(|a, b| a.lambda().total_cmp(&b.lambda()));

            match (via_scene, via_scan) {
                (Some(a), Some(b)) => assert_relative_eq!(a.lambda(), b.lambda(), epsilon = 1e-12),
                (None, None) => {}
                (a, b) => panic!("scene {a:?} disagrees with scan {b:?}"),
            }
        }
    }
}
