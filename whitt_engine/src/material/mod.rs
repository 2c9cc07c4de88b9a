//! Surface materials, evaluated once per unoccluded light at each hit point.

use crate::core::types::{Colour, Number};
use crate::light::PointLight;
use crate::shared::intersect::RayIntersection;
use crate::shared::RtRequirement;
use enum_dispatch::enum_dispatch;

// noinspection ALL - Used by enum_dispatch macro
#[allow(unused_imports)]
use self::{
    checker::CheckerMaterial, constant::ConstantMaterial, diffuse::DiffuseMaterial,
    phong::PhongMaterial,
};

pub mod checker;
pub mod constant;
pub mod diffuse;
pub mod phong;

/// The trait that defines how a surface responds to light.
#[enum_dispatch]
pub trait Material: RtRequirement {
    /// Returns the RGBA contribution of `light` at the intersection point.
    ///
    /// Called once per light that has an unobstructed view of the point; the
    /// renderer sums the contributions. Visibility is the renderer's problem,
    /// not the material's.
    fn shade(&self, intersection: &RayIntersection, light: &PointLight) -> Colour;

    /// Fraction of incoming light reflected specularly, in `[0, 1]`.
    ///
    /// Materials with a non-zero reflectance get a recursive reflection ray
    /// traced for them (up to the renderer's depth limit), and their shaded
    /// colour is blended with the reflected colour by this weight.
    fn reflectance(&self) -> Number { 0. }
}

/// An optimised implementation of [`Material`], static-dispatched over the
/// closed material set.
#[enum_dispatch(Material)]
#[derive(Clone, Debug)]
pub enum MaterialInstance {
    DiffuseMaterial,
    PhongMaterial,
    ConstantMaterial,
    CheckerMaterial,
}
