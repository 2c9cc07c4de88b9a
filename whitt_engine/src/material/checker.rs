use crate::core::types::{Colour, Number, Vector2};
use crate::light::PointLight;
use crate::material::{Material, MaterialInstance};
use crate::shared::intersect::RayIntersection;

/// A checkerboard over the surface's `(u, v)` parametrisation, delegating
/// each cell to one of two sub-materials.
///
/// `tiles` gives the pattern frequency per parameter direction; a value of
/// `(2, 2)` puts two full light/dark cycles into one unit of `u` and `v`.
/// The parity test is mirrored for negative coordinates so the pattern
/// continues seamlessly across the origin.
#[derive(Clone, Debug)]
pub struct CheckerMaterial {
    material_1: Box<MaterialInstance>,
    material_2: Box<MaterialInstance>,
    tiles: Vector2,
}

impl CheckerMaterial {
    pub fn new(material_1: MaterialInstance, material_2: MaterialInstance, tiles: Vector2) -> Self {
        Self {
            material_1: Box::new(material_1),
            material_2: Box::new(material_2),
            tiles,
        }
    }
}

/// Which half of its tile-period `coordinate` falls into, mirrored below zero
fn first_half(coordinate: Number, tiles: Number) -> bool {
    let period = 1. / tiles;
    (coordinate.abs() % period < period / 2.) ^ (coordinate < 0.)
}

impl Material for CheckerMaterial {
    fn shade(&self, intersection: &RayIntersection, light: &PointLight) -> Colour {
        let uvw = intersection.uvw();
        let left = first_half(uvw.x, self.tiles.x);
        let lower = first_half(uvw.y, self.tiles.y);

        if left ^ lower {
            self.material_1.shade(intersection, light)
        } else {
            self.material_2.shade(intersection, light)
        }
    }
}
