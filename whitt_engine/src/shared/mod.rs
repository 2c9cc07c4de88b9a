use std::fmt::Debug;

pub mod aabb;
pub mod intersect;
pub mod math;
pub mod ray;
pub mod scratch;

/// A simple marker trait that enforces the few other traits we need on
/// everything queried during the parallel render pass
pub trait RtRequirement: Debug + Send + Sync {}
impl<T: Debug + Send + Sync> RtRequirement for T {}
