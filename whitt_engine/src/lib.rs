//! # `whitt_engine`
//!
//! An offline Whitted-style ray tracing core. A [`scene::Scene`] owns a set of
//! transformable [`object::Renderable`]s, point lights and a camera; the
//! [`render::Raytracer`] shoots one primary ray per pixel (in parallel) and
//! shades hits against each light with shadow tests. Triangle meshes are
//! accelerated with a surface-area-heuristic BVH ([`accel::BvTree`]).

pub mod accel;
pub mod core;
pub mod light;
pub mod material;
pub mod object;
pub mod primitive;
pub mod render;
pub mod scene;
pub mod shared;
