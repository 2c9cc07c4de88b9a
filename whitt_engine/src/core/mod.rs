pub mod colour;
pub mod image;
pub mod targets;
pub mod types;
