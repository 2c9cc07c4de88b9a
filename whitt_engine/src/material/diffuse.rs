use crate::core::types::Colour;
use crate::light::PointLight;
use crate::material::Material;
use crate::shared::intersect::RayIntersection;

/// Ideal Lambertian reflector: brightness scales with the cosine between the
/// surface normal and the light direction, independent of view direction.
#[derive(Copy, Clone, Debug)]
pub struct DiffuseMaterial {
    pub colour: Colour,
}

impl DiffuseMaterial {
    pub fn new(colour: Colour) -> Self { Self { colour } }
}

impl Default for DiffuseMaterial {
    fn default() -> Self { Self::new(Colour::rgb(0.5, 0.5, 0.5)) }
}

impl Material for DiffuseMaterial {
    fn shade(&self, intersection: &RayIntersection, light: &PointLight) -> Colour {
        let to_light = (light.position() - intersection.position()).normalize();
        let cos_nl = intersection.normal().dot(to_light).max(0.);

        Colour::rgb(
            self.colour.r() * cos_nl,
            self.colour.g() * cos_nl,
            self.colour.b() * cos_nl,
        )
    }
}
