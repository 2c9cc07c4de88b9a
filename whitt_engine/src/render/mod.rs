//! The renderer: turns a prepared [`crate::scene::Scene`] into pixels.

mod raytracer;

pub use raytracer::{Raytracer, RaytracerCreateError};
