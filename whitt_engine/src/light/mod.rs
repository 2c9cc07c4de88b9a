//! Light sources.

use crate::core::types::{Point3, Vector3};
use getset::{CopyGetters, Setters};

/// A point light with a position and an RGB spectral intensity.
///
/// The intensity is per-channel radiant power; materials that model physical
/// falloff divide it by the squared distance to the lit point.
#[derive(CopyGetters, Setters, Copy, Clone, Debug)]
#[getset(get_copy = "pub", set = "pub")]
pub struct PointLight {
    position: Point3,
    spectral_intensity: Vector3,
}

impl PointLight {
    pub fn new(position: Point3, spectral_intensity: Vector3) -> Self {
        Self {
            position,
            spectral_intensity,
        }
    }
}

impl Default for PointLight {
    fn default() -> Self { Self::new(Point3::ZERO, Vector3::ONE) }
}
