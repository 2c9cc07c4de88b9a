//! Log target names for the engine's [tracing] calls, one per subsystem.

pub const RENDERER: &str = "renderer";
pub const SCENE: &str = "scene";
pub const OBJECT: &str = "object";
pub const PRIMITIVE: &str = "primitive";
pub const ACCEL: &str = "accel";
