use crate::core::types::Colour;
use crate::light::PointLight;
use crate::material::Material;
use crate::shared::intersect::RayIntersection;

/// Unlit material; every light contributes the flat colour unchanged.
/// Useful for debugging visibility and for emissive-looking surfaces.
#[derive(Copy, Clone, Debug)]
pub struct ConstantMaterial {
    pub colour: Colour,
}

impl ConstantMaterial {
    pub fn new(colour: Colour) -> Self { Self { colour } }
}

impl Default for ConstantMaterial {
    fn default() -> Self { Self::new(Colour::rgb(0.5, 0.5, 0.5)) }
}

impl Material for ConstantMaterial {
    fn shade(&self, _intersection: &RayIntersection, _light: &PointLight) -> Colour {
        Colour::rgb(self.colour.r(), self.colour.g(), self.colour.b())
    }
}
