use crate::core::types::{Colour, Number};
use crate::light::PointLight;
use crate::material::Material;
use crate::shared::intersect::RayIntersection;
use crate::shared::math::reflect;
use glamour::AngleConsts;

/// Normalised Phong model: Lambertian diffuse term plus a specular lobe
/// around the mirror direction, with quadratic distance falloff of the light.
#[derive(Copy, Clone, Debug)]
pub struct PhongMaterial {
    pub colour: Colour,
    pub reflectance: Number,
    pub shininess: Number,
}

impl PhongMaterial {
    pub fn new(colour: Colour, reflectance: Number, shininess: Number) -> Self {
        Self {
            colour,
            reflectance,
            shininess,
        }
    }
}

impl Material for PhongMaterial {
    fn shade(&self, intersection: &RayIntersection, light: &PointLight) -> Colour {
        let normal = intersection.normal();
        let offset = light.position() - intersection.position();
        let distance_squared = offset.length_squared();
        let to_light = offset.normalize();

        let cos_nl = normal.dot(to_light).max(0.);

        // irradiance with quadratic falloff, per channel
        let c_l = light.spectral_intensity() / distance_squared;
        // energy-conserving diffuse albedo
        let c_r = [self.colour.r(), self.colour.g(), self.colour.b()].map(|c| c / Number::PI);

        // specular lobe around the mirror direction, normalised so total
        // reflected energy stays constant as shininess sharpens the highlight
        let c_p = 0.04 * (self.shininess + 2.) / (2. * Number::PI);
        let mirror = -reflect(to_light, normal);
        let to_viewer = -intersection.ray().direction();
        let lobe = c_p * mirror.dot(to_viewer).max(0.).powf(self.shininess);

        let channel = |albedo: Number, irradiance: Number| {
            albedo * irradiance * cos_nl + lobe * irradiance
        };
        Colour::rgb(
            channel(c_r[0], c_l.x),
            channel(c_r[1], c_l.y),
            channel(c_r[2], c_l.z),
        )
    }

    fn reflectance(&self) -> Number { self.reflectance }
}
