//! Debug module for visualization and debugging tools
//!
//! The collision core never renders directly. It talks to a host-provided
//! [`DebugDraw`] surface, or to the recording [`DebugDrawSystem`].

pub mod collision_debug;
pub mod draw;

pub use collision_debug::CollisionDebugVisualizer;
pub use draw::{DebugDraw, DebugDrawSystem, DebugShape, DebugShapeId};
