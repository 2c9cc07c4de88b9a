use crate::core::image::ImageBuffer;
use crate::core::targets::RENDERER;
use crate::core::types::{Colour, Number};
use crate::material::Material;
use crate::scene::Scene;
use crate::shared::intersect::RayIntersection;
use crate::shared::math::{lerp, reflect, SAFETY_EPS};
use crate::shared::ray::Ray;
use crate::shared::scratch::QueryScratch;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;
use tracing::{debug, trace};

/// Reflection recursion limit used by [`Raytracer::new`]
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// A Whitted-style ray tracer.
///
/// Shades every pixel with direct lighting (shadow-tested against the scene)
/// and, for materials with a positive reflectance, follows mirror reflections
/// up to a fixed depth. Pixels are computed in parallel on an internal worker
/// pool, one task per image row.
#[derive(Debug)]
pub struct Raytracer {
    /// A thread pool used to distribute the workload
    thread_pool: ThreadPool,
    max_depth: usize,
}

#[derive(Error, Debug)]
pub enum RaytracerCreateError {
    #[error("failed to create worker thread pool")]
    ThreadPoolError {
        #[from]
        source: ThreadPoolBuildError,
    },
}

impl Raytracer {
    pub fn new() -> Result<Self, RaytracerCreateError> {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Creates a renderer following at most `max_depth` reflection bounces;
    /// zero disables reflections entirely.
    pub fn with_max_depth(max_depth: usize) -> Result<Self, RaytracerCreateError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(0)
            .thread_name(|id| format!("Raytracer::worker_{id}"))
            .build()
            .map_err(RaytracerCreateError::from)?;

        Ok(Self {
            thread_pool: pool,
            max_depth,
        })
    }

    pub fn max_depth(&self) -> usize { self.max_depth }

    /// Renders `scene` into `image` at the image's resolution.
    ///
    /// Runs the scene preparation pass first, then shades all pixels in
    /// parallel. Without a camera the image is left untouched.
    pub fn render_to_image(&self, scene: &mut Scene, image: &mut ImageBuffer) {
        if scene.camera().is_none() {
            trace!(target: RENDERER, "no camera set, skipping render");
            return;
        }

        scene.prepare();
        let (width, height) = (image.width(), image.height());
        if let Some(camera) = scene.camera_mut() {
            camera.set_resolution(width, height);
        }

        debug!(target: RENDERER, width, height, "rendering");

        // mutation is over; the render pass only needs shared access
        let scene: &Scene = scene;
        let camera = match scene.camera() {
            Some(camera) => camera,
            None => return,
        };
        self.thread_pool.in_place_scope(|scope| {
            for (y, row) in image.rows_mut().enumerate() {
                scope.spawn(move |_| {
                    let mut scratch = QueryScratch::new();
                    for (x, pixel) in row.iter_mut().enumerate() {
                        let ray = camera.primary_ray(x, y);
                        *pixel = self.trace(scene, &ray, 0, &mut scratch);
                    }
                });
            }
        });
    }

    /// Traces one ray into the scene: closest hit shaded, miss yields the
    /// background colour.
    fn trace(&self, scene: &Scene, ray: &Ray, depth: usize, scratch: &mut QueryScratch) -> Colour {
        match scene.closest_intersection(ray, Number::INFINITY, scratch) {
            Some(hit) => self.shade(scene, &hit, depth, scratch),
            None => scene.background_colour(),
        }
    }

    /// Direct lighting at a hit point, plus an optional reflection bounce.
    ///
    /// Each light is shadow-tested with a ray cast *from the light towards*
    /// the hit point (offset along the normal to avoid self-shadowing);
    /// occluded lights contribute nothing.
    fn shade(
        &self,
        scene: &Scene,
        hit: &RayIntersection,
        depth: usize,
        scratch: &mut QueryScratch,
    ) -> Colour {
        let material = match hit.renderable() {
            Some(id) => scene.renderable(id).material(),
            None => return Colour::rgba(0., 0., 0., 1.),
        };

        let shadow_target = hit.position() + hit.normal() * SAFETY_EPS;
        let mut colour = Colour::rgba(0., 0., 0., 1.);

        for light in scene.lights() {
            let to_target = shadow_target - light.position();
            let distance = to_target.length();
            if distance == 0. {
                continue;
            }

            let shadow_ray = Ray::new(light.position(), to_target);
            if !scene.any_intersection(&shadow_ray, distance, scratch) {
                colour += material.shade(hit, light);
            }
        }

        let reflectance = material.reflectance();
        if reflectance > 0. && depth < self.max_depth {
            let direction = reflect(hit.ray().direction(), hit.normal());
            let bounce_ray = Ray::new(shadow_target, direction);
            let bounce = self.trace(scene, &bounce_ray, depth + 1, scratch);
            colour = lerp(colour, bounce, reflectance);
        }

        colour
    }
}
