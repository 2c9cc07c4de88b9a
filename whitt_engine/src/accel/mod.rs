//! Spatial acceleration structures for ray/triangle-set queries.

mod bvh;

pub use bvh::{BvTree, Node};
